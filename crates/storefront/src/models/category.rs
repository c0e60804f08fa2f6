//! Category domain types.

use chrono::{DateTime, Utc};

use corner_shop_core::{CategoryId, CategoryNode, Slug};

/// A product category. Categories form a forest through `parent_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    /// Unique category ID.
    pub id: CategoryId,
    /// Display name.
    pub name: String,
    /// URL slug (unique).
    pub slug: Slug,
    /// Parent category, `None` for top-level categories.
    pub parent_id: Option<CategoryId>,
    /// When the category was created.
    pub created_at: DateTime<Utc>,
}

impl Category {
    /// Storefront URL of the category page.
    #[must_use]
    pub fn url(&self) -> String {
        category_url(&self.slug)
    }
}

/// Storefront URL of a category page.
#[must_use]
pub fn category_url(slug: &Slug) -> String {
    format!("/categories/{slug}")
}

impl From<Category> for CategoryNode {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            name: category.name,
            slug: category.slug,
            parent_id: category.parent_id,
        }
    }
}

/// Parameters for creating a category.
#[derive(Debug, Clone)]
pub struct NewCategory {
    /// Display name (at most 100 characters).
    pub name: String,
    /// Explicit slug; generated from the name when `None`.
    pub slug: Option<Slug>,
    /// Parent category.
    pub parent_id: Option<CategoryId>,
}
