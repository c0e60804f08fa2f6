//! Category repository.
//!
//! Categories are read in bulk and indexed in memory by
//! [`CategoryTree`]; the database only stores parent links.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;

use corner_shop_core::{CategoryId, CategoryNode, CategoryTree, Slug};

use super::{RepositoryError, map_insert_error};
use crate::models::{Category, NewCategory};

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for category queries.
#[derive(Debug, sqlx::FromRow)]
struct CategoryRow {
    id: i32,
    name: String,
    slug: String,
    parent_id: Option<i32>,
    created_at: DateTime<Utc>,
}

impl TryFrom<CategoryRow> for Category {
    type Error = RepositoryError;

    fn try_from(row: CategoryRow) -> Result<Self, Self::Error> {
        let slug = Slug::parse(&row.slug).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid category slug in database: {e}"))
        })?;

        Ok(Self {
            id: CategoryId::new(row.id),
            name: row.name,
            slug,
            parent_id: row.parent_id.map(CategoryId::new),
            created_at: row.created_at,
        })
    }
}

const CATEGORY_COLUMNS: &str = "id, name, slug, parent_id, created_at";

// =============================================================================
// Repository
// =============================================================================

/// Repository for category database operations.
pub struct CategoryRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CategoryRepository<'a> {
    /// Create a new category repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List every category ordered by name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored slug is invalid.
    pub async fn list_all(&self) -> Result<Vec<Category>, RepositoryError> {
        let rows = sqlx::query_as::<_, CategoryRow>(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM shop.category ORDER BY name, id"
        ))
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Load every category into a [`CategoryTree`].
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the categories cannot be read.
    #[instrument(skip(self))]
    pub async fn load_tree(&self) -> Result<CategoryTree, RepositoryError> {
        let categories = self.list_all().await?;
        tracing::debug!(count = categories.len(), "Loaded category tree");
        Ok(CategoryTree::new(
            categories.into_iter().map(CategoryNode::from),
        ))
    }

    /// Get a category by slug.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_slug(&self, slug: &Slug) -> Result<Option<Category>, RepositoryError> {
        let row = sqlx::query_as::<_, CategoryRow>(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM shop.category WHERE slug = $1"
        ))
        .bind(slug.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Find a category by exact name among the children of `parent_id`
    /// (the roots when `None`). The oldest match wins.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn find_by_name(
        &self,
        name: &str,
        parent_id: Option<CategoryId>,
    ) -> Result<Option<Category>, RepositoryError> {
        let row = sqlx::query_as::<_, CategoryRow>(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM shop.category \
             WHERE name = $1 AND parent_id IS NOT DISTINCT FROM $2 \
             ORDER BY id LIMIT 1"
        ))
        .bind(name)
        .bind(parent_id.map(|id| id.as_i32()))
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Create a category.
    ///
    /// Without an explicit slug one is generated from the name with a short
    /// random prefix, so two categories may share a name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the slug already exists.
    /// Returns `RepositoryError::NotFound` if the parent does not exist.
    /// Returns `RepositoryError::Database` for other database errors.
    #[instrument(skip(self, new), fields(name = %new.name))]
    pub async fn create(&self, new: &NewCategory) -> Result<Category, RepositoryError> {
        let slug = new
            .slug
            .clone()
            .unwrap_or_else(|| Slug::generate(&new.name, &mut rand::rng()));

        let row = sqlx::query_as::<_, CategoryRow>(&format!(
            "INSERT INTO shop.category (name, slug, parent_id) VALUES ($1, $2, $3) \
             RETURNING {CATEGORY_COLUMNS}"
        ))
        .bind(&new.name)
        .bind(slug.as_str())
        .bind(new.parent_id.map(|id| id.as_i32()))
        .fetch_one(self.pool)
        .await
        .map_err(|e| map_insert_error(e, "category"))?;

        row.try_into()
    }
}
