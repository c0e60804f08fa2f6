//! Session middleware configuration.
//!
//! Sessions are anonymous and exist to carry the cart. The binary uses the
//! `PostgreSQL` store (table `tower_sessions.session`, created by the
//! storefront migrations); tests plug in `MemoryStore`.

use tower_sessions::cookie::SameSite;
use tower_sessions::cookie::time::Duration;
use tower_sessions::{Expiry, SessionManagerLayer, SessionStore};

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "cs_session";

/// Idle time after which a session (and its cart) expires: 14 days.
const SESSION_EXPIRY_SECONDS: i64 = 14 * 24 * 60 * 60;

/// Build a session layer over any store with the storefront cookie settings.
#[must_use]
pub fn session_layer<S>(store: S, secure: bool) -> SessionManagerLayer<S>
where
    S: SessionStore + Clone,
{
    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(Duration::seconds(
            SESSION_EXPIRY_SECONDS,
        )))
        .with_secure(secure)
        .with_same_site(SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}
