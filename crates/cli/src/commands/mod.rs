//! CLI command implementations.

pub mod catalog;
pub mod migrate;
pub mod seed;

use secrecy::SecretString;
use sqlx::PgPool;

use corner_shop_storefront::db;

/// Connect to the storefront database named by `SHOP_DATABASE_URL`
/// (falling back to `DATABASE_URL`).
///
/// # Errors
///
/// Returns an error if neither variable is set or the connection fails.
pub async fn connect() -> Result<PgPool, Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("SHOP_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| "SHOP_DATABASE_URL not set")?;

    let pool = db::create_pool(&database_url).await?;
    tracing::info!("Connected to database");
    Ok(pool)
}
