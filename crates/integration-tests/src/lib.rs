//! Integration tests for Corner Shop.
//!
//! # Running Tests
//!
//! ```bash
//! # Database tests need a PostgreSQL instance
//! export SHOP_DATABASE_URL=postgres://localhost/corner_shop_test
//! cargo test -p corner-shop-integration-tests -- --ignored
//!
//! # HTTP tests additionally need the storefront running against that database
//! cargo run -p corner-shop-storefront &
//! ```
//!
//! # Test Categories
//!
//! - `catalog_repository` - Repository queries against a real database
//! - `storefront_cart` - Cart endpoints over HTTP with a cookie session

use corner_shop_core::{CategoryId, Price, Slug};
use corner_shop_storefront::db::{CategoryRepository, ProductRepository, create_pool};
use corner_shop_storefront::models::{Category, NewCategory, NewProduct, Product};
use reqwest::Client;
use secrecy::SecretString;
use sqlx::PgPool;

/// Base URL of a running storefront (configurable via environment).
#[must_use]
pub fn storefront_base_url() -> String {
    std::env::var("STOREFRONT_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// HTTP client that keeps the session cookie between requests.
///
/// # Panics
///
/// Panics if the client cannot be built.
#[must_use]
pub fn session_client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

/// Connect to the test database and apply storefront migrations.
///
/// # Panics
///
/// Panics if no database URL is set or the database is unreachable.
pub async fn test_pool() -> PgPool {
    let url = std::env::var("SHOP_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .expect("SHOP_DATABASE_URL or DATABASE_URL must be set");

    let pool = create_pool(&SecretString::from(url))
        .await
        .expect("Failed to connect to test database");

    sqlx::migrate!("../storefront/migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

/// A slug that will not collide with data from earlier runs.
///
/// # Panics
///
/// Never in practice; the generated string is always slug-safe.
#[must_use]
pub fn unique_slug(prefix: &str) -> Slug {
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    Slug::parse(&format!("{prefix}-{suffix}")).expect("uuid suffix is slug-safe")
}

/// Create a category with a unique slug.
///
/// # Panics
///
/// Panics if the insert fails.
pub async fn create_category(pool: &PgPool, name: &str, parent: Option<&Category>) -> Category {
    CategoryRepository::new(pool)
        .create(&NewCategory {
            name: name.to_string(),
            slug: Some(unique_slug("it-cat")),
            parent_id: parent.map(|c| c.id),
        })
        .await
        .expect("Failed to create test category")
}

/// Create a product with a unique slug.
///
/// # Panics
///
/// Panics if the insert fails.
pub async fn create_product(
    pool: &PgPool,
    category_id: CategoryId,
    name: &str,
    price: Price,
    available: bool,
) -> Product {
    ProductRepository::new(pool)
        .create(&NewProduct {
            category_id,
            name: name.to_string(),
            brand: "Integration".to_string(),
            description: String::new(),
            slug: Some(unique_slug("it-prod")),
            price,
            image: None,
            available,
        })
        .await
        .expect("Failed to create test product")
}
