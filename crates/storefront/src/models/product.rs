//! Product domain types.

use chrono::{DateTime, Utc};

use corner_shop_core::{CategoryId, Price, ProductId, ProductSnapshot, Slug};

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Category the product belongs to.
    pub category_id: CategoryId,
    pub name: String,
    pub brand: String,
    /// Free-form description, may be empty.
    pub description: String,
    /// URL slug (unique).
    pub slug: Slug,
    /// Current unit price.
    pub price: Price,
    /// Image path relative to the media directory.
    pub image: Option<String>,
    /// Unavailable products are hidden from the storefront.
    pub available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Storefront URL of the product detail page.
    #[must_use]
    pub fn url(&self) -> String {
        product_url(&self.slug)
    }

    /// Public URL of the product image, if it has one.
    #[must_use]
    pub fn image_url(&self) -> Option<String> {
        self.image
            .as_deref()
            .filter(|path| !path.is_empty())
            .map(|path| format!("/media/{}", path.trim_start_matches('/')))
    }

    /// The data a cart keeps about this product.
    #[must_use]
    pub fn snapshot(&self) -> ProductSnapshot {
        ProductSnapshot {
            product_id: self.id,
            name: self.name.clone(),
            slug: self.slug.clone(),
            price: self.price,
        }
    }
}

/// Storefront URL of a product detail page.
#[must_use]
pub fn product_url(slug: &Slug) -> String {
    format!("/products/{slug}")
}

/// Parameters for creating a product.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub category_id: CategoryId,
    pub name: String,
    pub brand: String,
    pub description: String,
    /// Explicit slug; derived from the name when `None`.
    pub slug: Option<Slug>,
    pub price: Price,
    pub image: Option<String>,
    pub available: bool,
}
