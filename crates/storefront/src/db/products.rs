//! Product repository.
//!
//! The storefront only ever shows available products, so every read here
//! filters on `available`.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::instrument;

use corner_shop_core::{CategoryId, Price, ProductId, Slug};

use super::{RepositoryError, map_insert_error};
use crate::models::{NewProduct, Product};

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for product queries.
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: i32,
    category_id: i32,
    name: String,
    brand: String,
    description: String,
    slug: String,
    price: Decimal,
    image: Option<String>,
    available: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ProductRow> for Product {
    type Error = RepositoryError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let slug = Slug::parse(&row.slug).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid product slug in database: {e}"))
        })?;
        let price = Price::new(row.price).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid product price in database: {e}"))
        })?;

        Ok(Self {
            id: ProductId::new(row.id),
            category_id: CategoryId::new(row.category_id),
            name: row.name,
            brand: row.brand,
            description: row.description,
            slug,
            price,
            image: row.image,
            available: row.available,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const PRODUCT_COLUMNS: &str = "id, category_id, name, brand, description, slug, price, \
                               image, available, created_at, updated_at";

// =============================================================================
// Repository
// =============================================================================

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all available products, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a row is invalid.
    #[instrument(skip(self))]
    pub async fn list_available(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM shop.product WHERE available ORDER BY id"
        ))
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// List available products belonging to any of the given categories.
    ///
    /// Callers pass a category's scope (itself plus descendants) to get
    /// everything under it.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self, category_ids), fields(categories = category_ids.len()))]
    pub async fn list_available_in_categories(
        &self,
        category_ids: &[CategoryId],
    ) -> Result<Vec<Product>, RepositoryError> {
        if category_ids.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i32> = category_ids.iter().map(CategoryId::as_i32).collect();
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM shop.product \
             WHERE available AND category_id = ANY($1) ORDER BY id"
        ))
        .bind(&ids)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Get an available product by slug.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_available_by_slug(
        &self,
        slug: &Slug,
    ) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM shop.product WHERE slug = $1 AND available"
        ))
        .bind(slug.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Get an available product by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_available_by_id(
        &self,
        id: ProductId,
    ) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM shop.product WHERE id = $1 AND available"
        ))
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Create a product.
    ///
    /// Without an explicit slug the name is slugified; names with nothing
    /// sluggable get a random token instead.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the slug already exists.
    /// Returns `RepositoryError::NotFound` if the category does not exist.
    /// Returns `RepositoryError::Database` for other database errors.
    #[instrument(skip(self, new), fields(name = %new.name))]
    pub async fn create(&self, new: &NewProduct) -> Result<Product, RepositoryError> {
        let slug = match &new.slug {
            Some(slug) => slug.clone(),
            None => Slug::from_name(&new.name)
                .unwrap_or_else(|_| Slug::generate(&new.name, &mut rand::rng())),
        };

        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "INSERT INTO shop.product \
             (category_id, name, brand, description, slug, price, image, available) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(new.category_id.as_i32())
        .bind(&new.name)
        .bind(&new.brand)
        .bind(&new.description)
        .bind(slug.as_str())
        .bind(new.price.amount())
        .bind(new.image.as_deref())
        .bind(new.available)
        .fetch_one(self.pool)
        .await
        .map_err(|e| map_insert_error(e, "product"))?;

        row.try_into()
    }
}
