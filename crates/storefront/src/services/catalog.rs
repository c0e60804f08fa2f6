//! Category tree cache.
//!
//! Every page renders the root categories in its navigation, so the tree is
//! kept in memory for a short TTL. Category pages resolve their listing
//! scope from a freshly loaded tree and prime the cache with it.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use sqlx::PgPool;
use tracing::{debug, instrument};

use corner_shop_core::CategoryTree;

use crate::db::{CategoryRepository, RepositoryError};

/// In-memory cache holding the current [`CategoryTree`].
#[derive(Clone)]
pub struct CategoryTreeCache {
    cache: Cache<(), Arc<CategoryTree>>,
}

impl CategoryTreeCache {
    /// Create an empty cache whose entry expires after `ttl`.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        let cache = Cache::builder().max_capacity(1).time_to_live(ttl).build();
        Self { cache }
    }

    /// Return the cached tree, loading it from the database on a miss.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the tree has to be loaded and the load fails.
    #[instrument(skip(self, pool))]
    pub async fn get_or_load(&self, pool: &PgPool) -> Result<Arc<CategoryTree>, RepositoryError> {
        if let Some(tree) = self.cache.get(&()).await {
            debug!("Cache hit for category tree");
            return Ok(tree);
        }

        let tree = Arc::new(CategoryRepository::new(pool).load_tree().await?);
        self.cache.insert((), Arc::clone(&tree)).await;
        Ok(tree)
    }

    /// Store a tree directly, replacing whatever is cached.
    pub async fn prime(&self, tree: CategoryTree) {
        self.cache.insert((), Arc::new(tree)).await;
    }

    /// Drop the cached tree so the next read reloads it.
    pub async fn invalidate(&self) {
        self.cache.invalidate_all();
        self.cache.run_pending_tasks().await;
    }
}
