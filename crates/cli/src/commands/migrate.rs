//! Database migration command.
//!
//! Migrations live in `crates/storefront/migrations/` and are embedded in the
//! storefront library, so the CLI and the server always agree on the schema.

use sqlx::SqlitePool;

use smart_gadgets_storefront::db;

/// Apply every pending migration.
///
/// # Errors
///
/// Returns an error if a migration fails to apply.
pub async fn run(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    tracing::info!("Running migrations...");
    db::migrate(pool).await?;
    tracing::info!("Migrations complete!");
    Ok(())
}
