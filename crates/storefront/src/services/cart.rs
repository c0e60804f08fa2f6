//! Session-backed cart persistence.
//!
//! The cart is serialized into the session under
//! [`session_keys::CART`](crate::models::session_keys::CART); a missing
//! entry is an empty cart.

use tower_sessions::Session;
use tower_sessions::session::Error as SessionError;

use corner_shop_core::Cart;

use crate::models::session_keys;

/// Load the cart from the session.
///
/// # Errors
///
/// Returns `SessionError` if the session store fails or the stored cart
/// cannot be deserialized.
pub async fn load(session: &Session) -> Result<Cart, SessionError> {
    Ok(session
        .get::<Cart>(session_keys::CART)
        .await?
        .unwrap_or_default())
}

/// Write the cart back to the session.
///
/// # Errors
///
/// Returns `SessionError` if the cart cannot be serialized.
pub async fn save(session: &Session, cart: &Cart) -> Result<(), SessionError> {
    session.insert(session_keys::CART, cart).await
}
