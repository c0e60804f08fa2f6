//! Business logic services for the storefront.
//!
//! # Services
//!
//! - `catalog` - Cached category tree
//! - `cart` - Session-backed cart persistence

pub mod cart;
pub mod catalog;

pub use catalog::CategoryTreeCache;
