//! Data shared by every page layout.

use std::sync::Arc;

use tower_sessions::Session;

use corner_shop_core::{CategoryId, CategoryNode, CategoryTree};

use crate::models::category::category_url;
use crate::services::cart;
use crate::state::AppState;

/// A link to a category page.
#[derive(Clone)]
pub struct CategoryLinkView {
    pub name: String,
    pub url: String,
}

impl From<&CategoryNode> for CategoryLinkView {
    fn from(node: &CategoryNode) -> Self {
        Self {
            name: node.name.clone(),
            url: category_url(&node.slug),
        }
    }
}

/// Header navigation: top-level categories and the cart badge.
#[derive(Clone, Default)]
pub struct NavView {
    pub categories: Vec<CategoryLinkView>,
    pub cart_qty: u32,
}

impl NavView {
    /// Build the navigation from an optional tree and the cart item count.
    #[must_use]
    pub fn new(tree: Option<&CategoryTree>, cart_qty: u32) -> Self {
        Self {
            categories: tree
                .map(|t| t.roots().map(CategoryLinkView::from).collect())
                .unwrap_or_default(),
            cart_qty,
        }
    }
}

/// Root-to-category breadcrumb links.
#[must_use]
pub fn breadcrumbs(tree: &CategoryTree, id: CategoryId) -> Vec<CategoryLinkView> {
    tree.path(id).into_iter().map(CategoryLinkView::from).collect()
}

/// Fetch the category tree for page chrome.
///
/// A failed load is logged and the page renders without navigation.
pub async fn tree_for_layout(state: &AppState) -> Option<Arc<CategoryTree>> {
    match state.categories().get_or_load(state.pool()).await {
        Ok(tree) => Some(tree),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load category tree for navigation");
            None
        }
    }
}

/// Cart item count for the header badge; zero if the session is unreadable.
pub async fn cart_qty(session: &Session) -> u32 {
    match cart::load(session).await {
        Ok(cart) => cart.item_count(),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read cart from session");
            0
        }
    }
}
