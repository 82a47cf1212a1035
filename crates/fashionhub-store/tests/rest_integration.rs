//! Integration tests against an in-process store
//!
//! These tests spin up a small axum server that speaks the same REST and
//! auth dialect as the hosted backend, and drive it through the real
//! `reqwest` transport.

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use fashionhub_core::validation::{validate_category, validate_product};
use fashionhub_core::{CategoryForm, ProductForm, ProductQuery};
use fashionhub_store::{
    AuthClient, AuthError, DashboardConfig, GoTrueAuth, SessionFile, SharedConfig, Store,
    StoreError,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

const USER_ID: &str = "8f14e45f-ceea-467e-9a3b-6c1b2d7e6f10";
const EMAIL: &str = "ada@fashionhub.test";
const PASSWORD: &str = "correct-horse";

// =============================================================================
// Fake Store
// =============================================================================

struct FakeStore {
    api_key: String,
    products: Vec<Value>,
    categories: Vec<Value>,
    next_id: i64,
}

type Shared = Arc<Mutex<FakeStore>>;
type Params = Query<HashMap<String, String>>;

fn authorized(store: &Shared, headers: &HeaderMap) -> bool {
    let key = store.lock().unwrap().api_key.clone();
    headers.get("apikey").and_then(|v| v.to_str().ok()) == Some(key.as_str())
}

fn unauthorized() -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({"message": "Invalid API key"}))).into_response()
}

fn ilike(value: &Value, pattern: Option<&String>) -> bool {
    let Some(pattern) = pattern else { return true };
    let needle = pattern
        .trim_start_matches("ilike.*")
        .trim_end_matches('*')
        .to_lowercase();
    value
        .as_str()
        .map(|v| v.to_lowercase().contains(&needle))
        .unwrap_or(false)
}

fn id_filter(params: &HashMap<String, String>) -> Option<i64> {
    params.get("id")?.strip_prefix("eq.")?.parse().ok()
}

async fn list_products(State(store): State<Shared>, headers: HeaderMap, Query(params): Params) -> Response {
    if !authorized(&store, &headers) {
        return unauthorized();
    }
    let state = store.lock().unwrap();

    if let Some(id) = id_filter(&params) {
        let rows: Vec<Value> = state
            .products
            .iter()
            .filter(|p| p["id"] == json!(id))
            .cloned()
            .collect();
        return Json(rows).into_response();
    }

    let mut rows: Vec<Value> = state
        .products
        .iter()
        .filter(|p| ilike(&p["name"], params.get("name")))
        .filter(|p| ilike(&p["category"], params.get("category")))
        .cloned()
        .collect();
    // created_at follows insertion order
    rows.reverse();

    let total = rows.len();
    let offset: usize = params.get("offset").and_then(|v| v.parse().ok()).unwrap_or(0);
    let limit: usize = params.get("limit").and_then(|v| v.parse().ok()).unwrap_or(total);
    let page: Vec<Value> = rows.into_iter().skip(offset).take(limit).collect();

    let mut response = Json(&page).into_response();
    let wants_count = headers
        .get("prefer")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("count=exact"));
    if wants_count {
        let range = if page.is_empty() {
            format!("*/{}", total)
        } else {
            format!("{}-{}/{}", offset, offset + page.len() - 1, total)
        };
        response
            .headers_mut()
            .insert("content-range", range.parse().unwrap());
    }
    response
}

async fn create_product(State(store): State<Shared>, headers: HeaderMap, Json(mut body): Json<Value>) -> Response {
    if !authorized(&store, &headers) {
        return unauthorized();
    }
    let mut state = store.lock().unwrap();
    body["id"] = json!(state.next_id);
    body["created_at"] = json!("2024-03-01T10:00:00+00:00");
    state.next_id += 1;
    state.products.push(body.clone());
    (StatusCode::CREATED, Json(vec![body])).into_response()
}

async fn update_product(
    State(store): State<Shared>,
    headers: HeaderMap,
    Query(params): Params,
    Json(body): Json<Value>,
) -> Response {
    if !authorized(&store, &headers) {
        return unauthorized();
    }
    let mut state = store.lock().unwrap();
    let id = id_filter(&params);
    let mut updated = Vec::new();
    for product in state.products.iter_mut().filter(|p| Some(p["id"].as_i64().unwrap()) == id) {
        for (key, value) in body.as_object().unwrap() {
            product[key] = value.clone();
        }
        updated.push(product.clone());
    }
    Json(updated).into_response()
}

async fn delete_product(State(store): State<Shared>, headers: HeaderMap, Query(params): Params) -> Response {
    if !authorized(&store, &headers) {
        return unauthorized();
    }
    let mut state = store.lock().unwrap();
    let id = id_filter(&params);
    let (removed, kept): (Vec<Value>, Vec<Value>) = state
        .products
        .drain(..)
        .partition(|p| p["id"].as_i64() == id);
    state.products = kept;
    Json(removed).into_response()
}

async fn list_categories(State(store): State<Shared>, headers: HeaderMap) -> Response {
    if !authorized(&store, &headers) {
        return unauthorized();
    }
    Json(store.lock().unwrap().categories.clone()).into_response()
}

async fn create_category(State(store): State<Shared>, headers: HeaderMap, Json(mut body): Json<Value>) -> Response {
    if !authorized(&store, &headers) {
        return unauthorized();
    }
    let mut state = store.lock().unwrap();
    body["id"] = json!(state.next_id);
    state.next_id += 1;
    state.categories.push(body.clone());
    (StatusCode::CREATED, Json(vec![body])).into_response()
}

async fn token(Query(params): Params, Json(body): Json<Value>) -> Response {
    let accepted = match params.get("grant_type").map(String::as_str) {
        Some("password") => body["email"] == json!(EMAIL) && body["password"] == json!(PASSWORD),
        Some("refresh_token") => body["refresh_token"] == json!("refresh-1"),
        _ => false,
    };
    if !accepted {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "invalid_grant", "error_description": "Invalid login credentials"})),
        )
            .into_response();
    }
    Json(json!({
        "access_token": "access-1",
        "token_type": "bearer",
        "expires_in": 3600,
        "refresh_token": "refresh-1",
        "user": {"id": USER_ID, "email": EMAIL, "role": "authenticated"}
    }))
    .into_response()
}

async fn logout(headers: HeaderMap) -> StatusCode {
    match headers.get("authorization").and_then(|v| v.to_str().ok()) {
        Some("Bearer access-1") => StatusCode::NO_CONTENT,
        _ => StatusCode::UNAUTHORIZED,
    }
}

/// Helper: start a fake store and return (address, state)
async fn start_fake_store() -> (SocketAddr, Shared) {
    let state: Shared = Arc::new(Mutex::new(FakeStore {
        api_key: "anon-key".to_string(),
        products: Vec::new(),
        categories: Vec::new(),
        next_id: 1,
    }));

    let app = Router::new()
        .route(
            "/rest/v1/products",
            get(list_products)
                .post(create_product)
                .patch(update_product)
                .delete(delete_product),
        )
        .route("/rest/v1/categories", get(list_categories).post(create_category))
        .route("/auth/v1/token", post(token))
        .route("/auth/v1/logout", post(logout))
        .with_state(state.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    // Small delay to let the server start
    tokio::time::sleep(Duration::from_millis(50)).await;

    (addr, state)
}

fn connect(addr: SocketAddr) -> (Store, SharedConfig) {
    let config = SharedConfig::new(DashboardConfig::new(format!("http://{}", addr), "anon-key"));
    let store = Store::new(config.clone()).unwrap();
    (store, config)
}

fn product_form(name: &str, category: &str, price: &str) -> ProductForm {
    ProductForm {
        name: name.to_string(),
        description: format!("{} for testing", name),
        price: price.to_string(),
        category: category.to_string(),
        stock: "5".to_string(),
        ..ProductForm::default()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn test_product_lifecycle() {
    let (addr, _) = start_fake_store().await;
    let (store, _) = connect(addr);
    let products = store.products();

    let draft = validate_product(&product_form("Linen Shirt", "mens-wear", "49.99")).unwrap();
    let created = products.create(&draft).await.unwrap();
    assert_eq!(created.name, "Linen Shirt");
    assert_eq!(created.price.cents(), 4999);

    let fetched = products.get_by_id(created.id).await.unwrap();
    assert_eq!(fetched, created);

    let mut form = ProductForm::from_product(&fetched);
    form.stock = "0".to_string();
    let updated = products
        .update(created.id, &validate_product(&form).unwrap())
        .await
        .unwrap();
    assert_eq!(updated.stock, 0);
    assert!(!updated.in_stock());

    products.delete(created.id).await.unwrap();
    let err = products.get_by_id(created.id).await.unwrap_err();
    assert!(err.is_not_found());
    assert!(products.delete(created.id).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_search_category_and_pagination() {
    let (addr, _) = start_fake_store().await;
    let (store, _) = connect(addr);
    let products = store.products();

    for i in 0..5 {
        let form = product_form(&format!("Shirt {}", i), "mens-wear", "20");
        products.create(&validate_product(&form).unwrap()).await.unwrap();
    }
    let dress = product_form("Wrap Dress", "womens-wear", "80");
    products.create(&validate_product(&dress).unwrap()).await.unwrap();

    let shirts = products.list(&ProductQuery::new().search("SHIRT")).await.unwrap();
    assert_eq!(shirts.total, 5);
    assert_eq!(shirts.data[0].name, "Shirt 4");

    let womens = products
        .list(&ProductQuery::new().category("womens"))
        .await
        .unwrap();
    assert_eq!(womens.data.len(), 1);

    let page = products
        .list(&ProductQuery::new().search("shirt").page(2, 2))
        .await
        .unwrap();
    assert_eq!(page.total, 5);
    assert_eq!(page.total_pages, 3);
    assert_eq!(page.data.len(), 2);
    assert_eq!(page.data[0].name, "Shirt 2");
    assert!(page.has_next());
    assert!(page.has_previous());

    let past_end = products
        .list(&ProductQuery::new().search("shirt").page(9, 2))
        .await
        .unwrap();
    assert!(past_end.is_empty());
    assert_eq!(past_end.total, 5);
}

#[tokio::test]
async fn test_categories_round_trip() {
    let (addr, _) = start_fake_store().await;
    let (store, _) = connect(addr);

    let draft = validate_category(&CategoryForm::from_name("Men's Wear")).unwrap();
    let created = store.categories().create(&draft).await.unwrap();
    assert_eq!(created.slug.as_deref(), Some("men-s-wear"));
    assert_eq!(created.status.as_deref(), Some("active"));

    let categories = store.categories().list().await.unwrap();
    assert_eq!(categories, vec![created]);
}

#[tokio::test]
async fn test_rotated_key_is_used_by_next_request() {
    let (addr, fake) = start_fake_store().await;
    let (store, config) = connect(addr);

    store.categories().list().await.unwrap();

    fake.lock().unwrap().api_key = "rotated-key".to_string();
    let err = store.categories().list().await.unwrap_err();
    assert!(matches!(err, StoreError::Http { status: 401, .. }));
    assert_eq!(err.to_string(), "Failed to fetch categories");

    config.rotate_credentials("rotated-key", None).unwrap();
    assert!(store.categories().list().await.is_ok());
}

#[tokio::test]
async fn test_unreachable_store_is_network_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let (store, _) = connect(addr);
    let err = store.categories().list().await.unwrap_err();
    assert!(matches!(err, StoreError::Network { .. }));
}

#[tokio::test]
async fn test_sign_in_and_out() {
    let (addr, _) = start_fake_store().await;
    let (store, _) = connect(addr);
    let dir = tempfile::tempdir().unwrap();
    let session = SessionFile::new(dir.path().join("session.json"));

    let auth = AuthClient::new(
        Arc::new(GoTrueAuth::new(store.rest().clone())),
        Some(session.clone()),
    );

    let err = auth.sign_in(EMAIL, "wrong").await.unwrap_err();
    assert!(matches!(err, AuthError::InvalidCredentials));
    assert_eq!(session.load().unwrap(), None);

    let user = auth.sign_in(EMAIL, PASSWORD).await.unwrap();
    assert_eq!(user.email, EMAIL);
    assert_eq!(user.id.to_string(), USER_ID);
    assert!(session.load().unwrap().is_some());

    // A second client restores the saved session
    let restored = AuthClient::new(
        Arc::new(GoTrueAuth::new(store.rest().clone())),
        Some(session.clone()),
    );
    assert_eq!(restored.restore().await.unwrap(), Some(user));

    auth.sign_out().await.unwrap();
    assert_eq!(session.load().unwrap(), None);
    assert_eq!(restored.restore().await.unwrap(), None);
}
