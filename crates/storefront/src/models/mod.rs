//! Domain models for the storefront.
//!
//! Row types map one-to-one onto the `shop` schema; the catalog is written
//! by `cs-cli` and only read here.

pub mod category;
pub mod product;
pub mod session;

pub use category::{Category, NewCategory};
pub use product::{NewProduct, Product};
pub use session::keys as session_keys;
