//! Cart route handlers.
//!
//! The cart lives in the session. The page is server-rendered; mutations
//! are small form posts answered with JSON so the page script can update
//! the badge and totals in place.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Form, Json, extract::State, response::IntoResponse};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use corner_shop_core::{Cart, CartError, CartLine, Price, ProductId};

use super::layout::{self, NavView};
use crate::db::ProductRepository;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::models::product::product_url;
use crate::services::cart;
use crate::state::AppState;

/// Cart line display data for templates.
#[derive(Clone)]
pub struct CartLineView {
    pub product_id: ProductId,
    pub name: String,
    pub url: String,
    pub quantity: u32,
    pub price: String,
    pub line_total: String,
}

impl From<&CartLine> for CartLineView {
    fn from(line: &CartLine) -> Self {
        Self {
            product_id: line.product_id,
            name: line.name.clone(),
            url: product_url(&line.slug),
            quantity: line.quantity,
            price: line.price.display(),
            line_total: line.line_total().display(),
        }
    }
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    pub total: String,
    pub item_count: u32,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            lines: cart.lines().iter().map(CartLineView::from).collect(),
            total: cart.total().display(),
            item_count: cart.item_count(),
        }
    }
}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: i32,
    pub quantity: Option<i64>,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: i32,
    pub quantity: i64,
}

/// Delete from cart form data.
#[derive(Debug, Deserialize)]
pub struct DeleteFromCartForm {
    pub product_id: i32,
}

/// Response to an add: new item count and the product's name.
#[derive(Debug, Serialize)]
pub struct AddResponse {
    pub qty: u32,
    pub product: String,
}

/// Response to an update or delete: new item count and cart total.
#[derive(Debug, Serialize)]
pub struct CartSummary {
    pub qty: u32,
    pub total: Price,
}

impl From<&Cart> for CartSummary {
    fn from(cart: &Cart) -> Self {
        Self {
            qty: cart.item_count(),
            total: cart.total(),
        }
    }
}

/// Response to a count request.
#[derive(Debug, Serialize)]
pub struct CountResponse {
    pub qty: u32,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub nav: NavView,
    pub cart: CartView,
}

/// Display cart page.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Result<impl IntoResponse> {
    let cart = cart::load(&session).await?;
    let tree = layout::tree_for_layout(&state).await;

    Ok(CartShowTemplate {
        nav: NavView::new(tree.as_deref(), cart.item_count()),
        cart: CartView::from(&cart),
    })
}

/// Add a product to the cart.
///
/// The product must exist and be available; its current price is
/// snapshotted into a new line. Adding a product already in the cart
/// increments its quantity.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AddToCartForm>,
) -> Result<Json<AddResponse>> {
    let quantity = form.quantity.unwrap_or(1);
    if quantity < 1 {
        return Err(CartError::InvalidQuantity(quantity).into());
    }

    let product_id = ProductId::new(form.product_id);
    let product = ProductRepository::new(state.pool())
        .get_available_by_id(product_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {product_id}")))?;

    let mut cart = cart::load(&session).await?;
    cart.add(product.snapshot(), quantity)?;
    cart::save(&session, &cart).await?;

    add_breadcrumb(
        "cart",
        "Added to cart",
        Some(&[("product_id", &product_id.to_string())]),
    );

    Ok(Json(AddResponse {
        qty: cart.item_count(),
        product: product.name,
    }))
}

/// Set the quantity of a cart line; zero or less removes it.
#[instrument(skip(session))]
pub async fn update(session: Session, Form(form): Form<UpdateCartForm>) -> Result<Json<CartSummary>> {
    let mut cart = cart::load(&session).await?;
    cart.update(ProductId::new(form.product_id), form.quantity)?;
    cart::save(&session, &cart).await?;

    Ok(Json(CartSummary::from(&cart)))
}

/// Remove a product from the cart. Removing an absent product succeeds.
#[instrument(skip(session))]
pub async fn delete(
    session: Session,
    Form(form): Form<DeleteFromCartForm>,
) -> Result<Json<CartSummary>> {
    let mut cart = cart::load(&session).await?;
    if cart.remove(ProductId::new(form.product_id)).is_some() {
        cart::save(&session, &cart).await?;
    }

    Ok(Json(CartSummary::from(&cart)))
}

/// Current cart item count for the header badge.
#[instrument(skip(session))]
pub async fn count(session: Session) -> Result<Json<CountResponse>> {
    let cart = cart::load(&session).await?;
    Ok(Json(CountResponse {
        qty: cart.item_count(),
    }))
}
