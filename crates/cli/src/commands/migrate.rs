//! Database migration commands.
//!
//! Migrations are embedded from `crates/storefront/migrations/` at compile
//! time:
//!
//! ```text
//! migrations/
//! ├── 20260124000001_catalog.sql
//! └── 20260124000002_sessions.sql
//! ```

/// Run storefront database migrations.
///
/// # Errors
///
/// Returns an error if the database is unreachable or a migration fails.
pub async fn storefront() -> Result<(), Box<dyn std::error::Error>> {
    let pool = super::connect().await?;

    tracing::info!("Running storefront migrations...");
    sqlx::migrate!("../storefront/migrations").run(&pool).await?;

    tracing::info!("Storefront migrations complete!");
    Ok(())
}
