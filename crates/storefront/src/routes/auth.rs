//! Authentication route handlers.
//!
//! Registration, login and logout with username and password. Failures the
//! visitor can correct come back as a notice on the same form.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Form, extract::State, response::Redirect};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::forms::CredentialsForm;
use crate::middleware::{PageContext, log_in, log_out};
use crate::models::CurrentUser;
use crate::services::auth::{AuthError, AuthService};
use crate::services::notices;
use crate::state::AppState;

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub ctx: PageContext,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub ctx: PageContext,
}

// =============================================================================
// Registration
// =============================================================================

/// Display the registration page.
pub async fn register_page(ctx: PageContext) -> RegisterTemplate {
    RegisterTemplate { ctx }
}

/// Create an account, then send the visitor to log in.
#[instrument(skip_all, fields(username = %form.username))]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<CredentialsForm>,
) -> Result<Redirect> {
    match AuthService::new(state.pool())
        .register(&form.username, &form.password)
        .await
    {
        Ok(_) => {
            notices::success(&session, "Registration successful! Please log in.").await?;
            Ok(Redirect::to("/login"))
        }
        Err(AuthError::UserAlreadyExists) => {
            notices::error(&session, "User already exists!").await?;
            Ok(Redirect::to("/register"))
        }
        Err(e) if e.is_user_facing() => {
            notices::error(&session, registration_message(&e)).await?;
            Ok(Redirect::to("/register"))
        }
        Err(e) => Err(AppError::Auth(e)),
    }
}

fn registration_message(err: &AuthError) -> String {
    match err {
        AuthError::InvalidUsername(e) => format!("Invalid username: {e}."),
        AuthError::WeakPassword(msg) => format!("Invalid password: {msg}."),
        other => other.to_string(),
    }
}

// =============================================================================
// Login / Logout
// =============================================================================

/// Display the login page.
pub async fn login_page(ctx: PageContext) -> LoginTemplate {
    LoginTemplate { ctx }
}

/// Check credentials and store the user in the session.
#[instrument(skip_all, fields(username = %form.username))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<CredentialsForm>,
) -> Result<Redirect> {
    let user = match AuthService::new(state.pool())
        .login(&form.username, &form.password)
        .await
    {
        Ok(user) => user,
        Err(AuthError::InvalidCredentials) => {
            tracing::info!("Login failed");
            notices::error(&session, "Invalid username or password!").await?;
            return Ok(Redirect::to("/login"));
        }
        Err(e) => return Err(AppError::Auth(e)),
    };

    log_in(&session, &CurrentUser::from(&user)).await?;
    set_sentry_user(&user.id, user.username.as_str());
    tracing::info!(user_id = %user.id, is_admin = user.is_admin, "Logged in");

    notices::success(&session, "Logged in successfully!").await?;
    Ok(Redirect::to("/"))
}

/// Clear the whole session.
#[instrument(skip_all)]
pub async fn logout(session: Session) -> Result<Redirect> {
    log_out(&session).await?;
    clear_sentry_user();

    notices::info(&session, "You have been logged out.").await?;
    Ok(Redirect::to("/"))
}
