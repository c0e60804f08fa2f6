//! Category route handlers.
//!
//! A category page lists every available product in the category or any of
//! its subcategories.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
};
use tower_sessions::Session;
use tracing::instrument;

use corner_shop_core::{CategoryId, CategoryNode, CategoryTree, Slug};

use super::layout::{self, CategoryLinkView, NavView};
use super::products::ProductCardView;
use crate::db::{CategoryRepository, ProductRepository};
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Category header data for templates.
#[derive(Clone)]
pub struct CategoryView {
    pub name: String,
    /// Full path, e.g. `"Books > Fiction"`.
    pub display_name: String,
}

/// Category page template.
#[derive(Template, WebTemplate)]
#[template(path = "categories/show.html")]
pub struct CategoryShowTemplate {
    pub nav: NavView,
    pub category: CategoryView,
    pub breadcrumbs: Vec<CategoryLinkView>,
    pub subcategories: Vec<CategoryLinkView>,
    pub products: Vec<ProductCardView>,
}

/// What a category page shows: the category and the ids its product
/// listing covers (itself plus every descendant).
#[derive(Debug)]
pub struct CategoryScope<'a> {
    pub node: &'a CategoryNode,
    pub ids: Vec<CategoryId>,
}

/// Resolve the listing scope for `slug` in `tree`.
#[must_use]
pub fn resolve_scope<'a>(tree: &'a CategoryTree, slug: &Slug) -> Option<CategoryScope<'a>> {
    let node = tree.find_by_slug(slug)?;
    Some(CategoryScope {
        node,
        ids: tree.scope(node.id),
    })
}

/// Display a category with the products of its whole subtree.
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse> {
    let not_found = || AppError::NotFound(format!("category {slug}"));
    let parsed = Slug::parse(&slug).map_err(|_| not_found())?;

    // The listing scope must see subcategories added since the cache was filled
    let tree = CategoryRepository::new(state.pool()).load_tree().await?;
    state.categories().prime(tree.clone()).await;

    let CategoryScope { node, ids } = resolve_scope(&tree, &parsed).ok_or_else(not_found)?;
    let products = ProductRepository::new(state.pool())
        .list_available_in_categories(&ids)
        .await?;

    Ok(CategoryShowTemplate {
        nav: NavView::new(Some(&tree), layout::cart_qty(&session).await),
        category: CategoryView {
            name: node.name.clone(),
            display_name: tree
                .display_name(node.id)
                .unwrap_or_else(|| node.name.clone()),
        },
        breadcrumbs: layout::breadcrumbs(&tree, node.id),
        subcategories: tree.children(node.id).map(CategoryLinkView::from).collect(),
        products: products.iter().map(ProductCardView::from).collect(),
    })
}
