//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - All available products
//! GET  /products/{slug}        - Product detail
//! GET  /categories/{slug}      - Category page (products of the whole subtree)
//!
//! # Cart
//! GET  /cart                   - Cart page
//! GET  /cart/count             - Item count (JSON)
//! POST /cart/ajax/add          - Add product (JSON)
//! POST /cart/ajax/update       - Set quantity (JSON)
//! POST /cart/ajax/delete       - Remove product (JSON)
//! ```
//!
//! Health checks live under `/health`; static files are mounted by
//! [`crate::app`].

pub mod cart;
pub mod categories;
pub mod health;
pub mod layout;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::middleware::rate_limit::RateLimiterLayer;
use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new().route("/{slug}", get(products::show))
}

/// Create the category routes router.
pub fn category_routes() -> Router<AppState> {
    Router::new().route("/{slug}", get(categories::show))
}

/// Create the cart mutation routes router.
pub fn cart_ajax_routes() -> Router<AppState> {
    Router::new()
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/delete", post(cart::delete))
}

/// Create the cart routes router.
///
/// With a limiter given the mutation endpoints are limited per client IP.
pub fn cart_routes(limiter: Option<RateLimiterLayer>) -> Router<AppState> {
    let ajax = match limiter {
        Some(limiter) => cart_ajax_routes().layer(limiter),
        None => cart_ajax_routes(),
    };

    Router::new()
        .route("/", get(cart::show))
        .route("/count", get(cart::count))
        .nest("/ajax", ajax)
}

/// Create all routes for the storefront.
pub fn routes(cart_limiter: Option<RateLimiterLayer>) -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .route("/", get(products::index))
        .nest("/products", product_routes())
        .nest("/categories", category_routes())
        .nest("/cart", cart_routes(cart_limiter))
}
