//! Router tests for the cart endpoints.
//!
//! Sessions live in a `MemoryStore` and the pool connects lazily to an
//! address nothing listens on, so only handlers that never touch the
//! catalog are exercised here. Catalog-backed routes are covered by the
//! integration-tests crate.

#![allow(clippy::unwrap_used)]

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use secrecy::SecretString;
use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;
use tower_sessions::{MemoryStore, Session};

use corner_shop_core::{Cart, CategoryId, CategoryNode, CategoryTree, Price, ProductId, ProductSnapshot, Slug};
use corner_shop_storefront::config::StorefrontConfig;
use corner_shop_storefront::middleware::session::SESSION_COOKIE_NAME;
use corner_shop_storefront::models::session_keys;
use corner_shop_storefront::state::AppState;

const UNREACHABLE_DATABASE: &str = "postgres://shop@127.0.0.1:1/corner_shop";

fn test_config() -> StorefrontConfig {
    StorefrontConfig {
        database_url: SecretString::from(UNREACHABLE_DATABASE),
        host: "127.0.0.1".parse().unwrap(),
        port: 3000,
        base_url: "http://localhost:3000".to_string(),
        static_dir: PathBuf::from("static"),
        media_dir: PathBuf::from("media"),
        category_cache_ttl: Duration::from_secs(60),
        trust_proxy_headers: false,
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
    }
}

struct TestApp {
    router: Router,
    store: MemoryStore,
    state: AppState,
}

impl TestApp {
    fn new() -> Self {
        let pool = PgPoolOptions::new()
            .acquire_timeout(Duration::from_millis(200))
            .connect_lazy(UNREACHABLE_DATABASE)
            .unwrap();
        let state = AppState::new(test_config(), pool);
        let store = MemoryStore::default();
        let router = corner_shop_storefront::app(state.clone(), store.clone(), false);

        Self {
            router,
            store,
            state,
        }
    }

    /// Create a session holding `cart` and return its cookie header value.
    async fn session_with(&self, cart: &Cart) -> String {
        let session = Session::new(None, Arc::new(self.store.clone()), None);
        session.insert(session_keys::CART, cart).await.unwrap();
        session.save().await.unwrap();
        format!("{SESSION_COOKIE_NAME}={}", session.id().unwrap())
    }

    /// Read back the cart stored under a session cookie.
    async fn stored_cart(&self, cookie: &str) -> Cart {
        let id = cookie
            .strip_prefix(&format!("{SESSION_COOKIE_NAME}="))
            .unwrap()
            .parse()
            .unwrap();
        let session = Session::new(Some(id), Arc::new(self.store.clone()), None);
        session
            .get::<Cart>(session_keys::CART)
            .await
            .unwrap()
            .unwrap_or_default()
    }

    async fn get(&self, uri: &str, cookie: Option<&str>) -> (StatusCode, String) {
        let mut request = Request::get(uri);
        if let Some(cookie) = cookie {
            request = request.header(header::COOKIE, cookie);
        }
        self.send(request.body(Body::empty()).unwrap()).await
    }

    async fn post_form(&self, uri: &str, form: &str, cookie: &str) -> (StatusCode, String) {
        let request = Request::post(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .header(header::COOKIE, cookie)
            .body(Body::from(form.to_owned()))
            .unwrap();
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, String) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }
}

fn product(id: i32, name: &str, cents: i64) -> ProductSnapshot {
    ProductSnapshot {
        product_id: ProductId::new(id),
        name: name.to_string(),
        slug: Slug::from_name(name).unwrap(),
        price: Price::from_cents(cents),
    }
}

/// Two teas at 4.50 and one book at 25.00.
fn sample_cart() -> Cart {
    let mut cart = Cart::new();
    cart.add(product(1, "Green Tea", 450), 2).unwrap();
    cart.add(product(2, "Django Book", 2500), 1).unwrap();
    cart
}

fn json(body: &str) -> Value {
    serde_json::from_str(body).unwrap()
}

#[tokio::test]
async fn test_count_without_session_is_zero() {
    let app = TestApp::new();
    let (status, body) = app.get("/cart/count", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json(&body)["qty"], 0);
}

#[tokio::test]
async fn test_count_reflects_session_cart() {
    let app = TestApp::new();
    let cookie = app.session_with(&sample_cart()).await;

    let (status, body) = app.get("/cart/count", Some(&cookie)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json(&body)["qty"], 3);
}

#[tokio::test]
async fn test_update_sets_quantity_and_total() {
    let app = TestApp::new();
    let cookie = app.session_with(&sample_cart()).await;

    let (status, body) = app
        .post_form("/cart/ajax/update", "product_id=1&quantity=5", &cookie)
        .await;

    assert_eq!(status, StatusCode::OK);
    let body = json(&body);
    assert_eq!(body["qty"], 6);
    // 5 × 4.50 + 25.00
    assert_eq!(body["total"], "47.50");

    let cart = app.stored_cart(&cookie).await;
    assert_eq!(cart.get(ProductId::new(1)).unwrap().quantity, 5);
}

#[tokio::test]
async fn test_update_to_zero_removes_line() {
    let app = TestApp::new();
    let cookie = app.session_with(&sample_cart()).await;

    let (status, body) = app
        .post_form("/cart/ajax/update", "product_id=2&quantity=0", &cookie)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json(&body)["total"], "9.00");
    assert!(app.stored_cart(&cookie).await.get(ProductId::new(2)).is_none());
}

#[tokio::test]
async fn test_update_absent_product_is_noop() {
    let app = TestApp::new();
    let cookie = app.session_with(&sample_cart()).await;

    let (status, body) = app
        .post_form("/cart/ajax/update", "product_id=99&quantity=4", &cookie)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json(&body)["qty"], 3);
    assert_eq!(app.stored_cart(&cookie).await, sample_cart());
}

#[tokio::test]
async fn test_update_rejects_oversized_quantity() {
    let app = TestApp::new();
    let cookie = app.session_with(&sample_cart()).await;

    let (status, _) = app
        .post_form(
            "/cart/ajax/update",
            "product_id=1&quantity=99999999999",
            &cookie,
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(app.stored_cart(&cookie).await, sample_cart());
}

#[tokio::test]
async fn test_add_rejects_non_positive_quantity() {
    let app = TestApp::new();
    let cookie = app.session_with(&sample_cart()).await;

    for form in ["product_id=1&quantity=0", "product_id=1&quantity=-3"] {
        let (status, _) = app.post_form("/cart/ajax/add", form, &cookie).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{form}");
    }

    assert_eq!(app.stored_cart(&cookie).await, sample_cart());
}

#[tokio::test]
async fn test_delete_is_idempotent() {
    let app = TestApp::new();
    let cookie = app.session_with(&sample_cart()).await;

    for _ in 0..2 {
        let (status, body) = app
            .post_form("/cart/ajax/delete", "product_id=1", &cookie)
            .await;
        assert_eq!(status, StatusCode::OK);
        let body = json(&body);
        assert_eq!(body["qty"], 1);
        assert_eq!(body["total"], "25.00");
    }

    let cart = app.stored_cart(&cookie).await;
    assert_eq!(cart.len(), 1);
    assert!(cart.get(ProductId::new(2)).is_some());
}

#[tokio::test]
async fn test_delete_last_line_empties_cart() {
    let app = TestApp::new();
    let mut cart = Cart::new();
    cart.add(product(7, "Teapot", 3000), 1).unwrap();
    let cookie = app.session_with(&cart).await;

    let (_, body) = app
        .post_form("/cart/ajax/delete", "product_id=7", &cookie)
        .await;

    let body = json(&body);
    assert_eq!(body["qty"], 0);
    assert_eq!(body["total"], "0.00");
}

#[tokio::test]
async fn test_cart_page_renders_lines_and_nav() {
    let app = TestApp::new();
    app.state
        .categories()
        .prime(CategoryTree::new([CategoryNode {
            id: CategoryId::new(1),
            name: "Books".to_string(),
            slug: Slug::parse("books").unwrap(),
            parent_id: None,
        }]))
        .await;
    let cookie = app.session_with(&sample_cart()).await;

    let (status, body) = app.get("/cart", Some(&cookie)).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Green Tea"));
    assert!(body.contains("/products/django-book"));
    assert!(body.contains("$34.00"));
    assert!(body.contains("/categories/books"));
}

#[tokio::test]
async fn test_empty_cart_page() {
    let app = TestApp::new();
    app.state.categories().prime(CategoryTree::default()).await;

    let (status, body) = app.get("/cart", None).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Your cart is empty"));
}

#[tokio::test]
async fn test_health_and_security_headers() {
    let app = TestApp::new();
    let response = app
        .router
        .clone()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-frame-options"], "DENY");
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn test_invalid_product_slug_is_not_found() {
    let app = TestApp::new();
    let (status, _) = app.get("/products/not%20a%20slug", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
