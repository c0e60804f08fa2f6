//! Product route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
};
use tower_sessions::Session;
use tracing::instrument;

use corner_shop_core::{ProductId, Slug};

use super::layout::{self, CategoryLinkView, NavView};
use crate::db::ProductRepository;
use crate::error::{AppError, Result};
use crate::models::Product;
use crate::state::AppState;

/// Product card data for listings.
#[derive(Clone)]
pub struct ProductCardView {
    pub name: String,
    pub brand: String,
    pub url: String,
    pub price: String,
    pub image_url: Option<String>,
}

impl From<&Product> for ProductCardView {
    fn from(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            brand: product.brand.clone(),
            url: product.url(),
            price: product.price.display(),
            image_url: product.image_url(),
        }
    }
}

/// Product detail data for templates.
#[derive(Clone)]
pub struct ProductView {
    pub id: ProductId,
    pub name: String,
    pub brand: String,
    pub description: String,
    pub price: String,
    pub image_url: Option<String>,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            brand: product.brand.clone(),
            description: product.description.clone(),
            price: product.price.display(),
            image_url: product.image_url(),
        }
    }
}

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub nav: NavView,
    pub products: Vec<ProductCardView>,
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub nav: NavView,
    pub product: ProductView,
    pub breadcrumbs: Vec<CategoryLinkView>,
}

/// Display all available products.
#[instrument(skip(state, session))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse> {
    let products = ProductRepository::new(state.pool())
        .list_available()
        .await?;

    let tree = layout::tree_for_layout(&state).await;
    let nav = NavView::new(tree.as_deref(), layout::cart_qty(&session).await);

    Ok(ProductsIndexTemplate {
        nav,
        products: products.iter().map(ProductCardView::from).collect(),
    })
}

/// Display product detail page.
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse> {
    let not_found = || AppError::NotFound(format!("product {slug}"));
    let parsed = Slug::parse(&slug).map_err(|_| not_found())?;

    let product = ProductRepository::new(state.pool())
        .get_available_by_slug(&parsed)
        .await?
        .ok_or_else(not_found)?;

    let tree = layout::tree_for_layout(&state).await;
    let breadcrumbs = tree
        .as_deref()
        .map(|t| layout::breadcrumbs(t, product.category_id))
        .unwrap_or_default();
    let nav = NavView::new(tree.as_deref(), layout::cart_qty(&session).await);

    Ok(ProductShowTemplate {
        nav,
        product: ProductView::from(&product),
        breadcrumbs,
    })
}
