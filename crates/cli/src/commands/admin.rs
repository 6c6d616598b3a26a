//! Administrator management commands.
//!
//! # Usage
//!
//! ```bash
//! # Create the default administrator if it is missing
//! sg-cli init-db
//!
//! # Create a named administrator
//! sg-cli admin create -u alice -p 'correct horse'
//! ```

use sqlx::SqlitePool;

use smart_gadgets_storefront::services::auth::{AuthError, AuthService};

/// Username of the administrator created by `init-db`.
pub const DEFAULT_ADMIN_USERNAME: &str = "admin";

/// Password of the administrator created by `init-db`. Change it after the
/// first login.
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

/// Create a new administrator.
///
/// # Errors
///
/// Returns `AuthError::UserAlreadyExists` if the username is taken, or a
/// validation error for a bad username or short password.
pub async fn create(pool: &SqlitePool, username: &str, password: &str) -> Result<(), AuthError> {
    tracing::info!("Creating administrator: {username}");

    let user = AuthService::new(pool).create_admin(username, password).await?;

    tracing::info!(
        "Administrator created successfully! ID: {}, Username: {}",
        user.id,
        user.username
    );
    Ok(())
}

/// Create the default administrator unless that username already exists.
///
/// # Errors
///
/// Returns an error if the account cannot be created for any reason other
/// than already existing.
pub async fn ensure_default(pool: &SqlitePool) -> Result<(), AuthError> {
    match create(pool, DEFAULT_ADMIN_USERNAME, DEFAULT_ADMIN_PASSWORD).await {
        Ok(()) => {
            tracing::warn!(
                "Default administrator '{DEFAULT_ADMIN_USERNAME}' uses a well-known password; change it"
            );
            Ok(())
        }
        Err(AuthError::UserAlreadyExists) => {
            tracing::info!("Administrator '{DEFAULT_ADMIN_USERNAME}' already exists, skipping");
            Ok(())
        }
        Err(e) => Err(e),
    }
}
