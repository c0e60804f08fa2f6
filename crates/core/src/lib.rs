//! Corner Shop Core - Shared domain library.
//!
//! This crate provides the types and logic used across all Corner Shop
//! components:
//! - `storefront` - Public catalog and cart web site
//! - `cli` - Command-line tools for migrations and catalog management
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no database
//! access, no HTTP. Enabling the `postgres` feature adds sqlx encoding for the
//! newtypes so they can be bound and fetched directly.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, slugs and prices
//! - [`category_tree`] - Parent/child index with descendant resolution
//! - [`cart`] - Session cart arithmetic

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod category_tree;
pub mod types;

pub use cart::{Cart, CartError, CartLine, ProductSnapshot};
pub use category_tree::{CategoryNode, CategoryTree};
pub use types::*;
