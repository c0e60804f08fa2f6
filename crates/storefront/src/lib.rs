//! Corner Shop Storefront library.
//!
//! This crate provides the storefront functionality as a library,
//! allowing it to be tested and reused by the CLI.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

use axum::{Router, middleware::from_fn};
use tower_http::services::ServeDir;
use tower_sessions::SessionStore;

use crate::state::AppState;

/// Build the storefront application over the given session store.
///
/// Includes every route, static and media files, sessions, security
/// headers and request IDs. With `rate_limit` set the cart mutations are
/// rate limited per client IP. Tracing and Sentry layers are added by the
/// binary.
pub fn app<S>(state: AppState, session_store: S, rate_limit: bool) -> Router
where
    S: SessionStore + Clone,
{
    let config = state.config();
    let session_layer = middleware::session_layer(session_store, config.is_secure());
    let static_files = ServeDir::new(&config.static_dir);
    let media_files = ServeDir::new(&config.media_dir);
    let cart_limiter =
        rate_limit.then(|| middleware::cart_rate_limiter(config.trust_proxy_headers));

    Router::new()
        .merge(routes::routes(cart_limiter))
        .nest_service("/static", static_files)
        .nest_service("/media", media_files)
        .layer(session_layer)
        .layer(from_fn(middleware::security_headers_middleware))
        .layer(from_fn(middleware::request_id_middleware))
        .with_state(state)
}
