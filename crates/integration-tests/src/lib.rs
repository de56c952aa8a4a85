//! Integration tests for the multi-vendor storefront.
//!
//! [`FakeBackend`] stands in for the auth, catalog and shopping services.
//! Each service is an axum server on an ephemeral port; the three share one
//! in-memory state and log every request they receive, so a test can assert
//! on what the storefront rendered and on what it sent.
//!
//! [`TestApp`] runs the storefront itself against a fake backend, keeping
//! its client storage in a temporary directory.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p multivendor-integration-tests
//! ```

#![allow(clippy::missing_panics_doc, clippy::expect_used)]

use std::collections::HashMap;
use std::path::Path as FsPath;
use std::sync::{Arc, Mutex, MutexGuard};

use axum::extract::{Path, Request, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use multivendor_storefront::config::StorefrontConfig;
use multivendor_storefront::session::token::unsigned_token;
use multivendor_storefront::state::AppState;
use serde_json::{Value, json};
use tempfile::TempDir;
use tokio::net::TcpListener;

pub const BUYER_EMAIL: &str = "buyer@example.com";
pub const SELLER_EMAIL: &str = "seller@example.com";
pub const PASSWORD: &str = "correct-horse";

// =============================================================================
// Fake backend
// =============================================================================

type Shared = Arc<Mutex<BackendState>>;

#[derive(Default)]
struct BackendState {
    /// email -> (password, role)
    users: HashMap<String, (String, String)>,
    /// token -> email
    tokens: HashMap<String, String>,
    products: Vec<Value>,
    wishlist: Vec<String>,
    /// (product id, units)
    cart: Vec<(String, u32)>,
    orders: Vec<Value>,
    profile: Value,
    addresses: Vec<Value>,
    requests: Vec<String>,
    reject_tokens: bool,
    failure: Option<(StatusCode, Value)>,
    next_id: u32,
}

impl BackendState {
    fn seeded() -> Self {
        let mut users = HashMap::new();
        users.insert(BUYER_EMAIL.to_string(), (PASSWORD.to_string(), "buyer".to_string()));
        users.insert(SELLER_EMAIL.to_string(), (PASSWORD.to_string(), "seller".to_string()));

        Self {
            users,
            products: vec![
                product("p1", "Wireless Mouse", "Electronics", 10, 19.99),
                product("p2", "Denim Jacket", "Fashion", 0, 59.0),
                product("p3", "Chef Knife", "Home and Kitchen", 4, 24.5),
            ],
            profile: json!({
                "name": "Sam Shopper",
                "gender": "",
                "street": "1 Market St",
                "postalCode": "94105",
                "city": "San Francisco",
                "country": "USA",
            }),
            ..Self::default()
        }
    }

    fn issue_token(&mut self, email: &str, role: &str) -> String {
        self.next_id += 1;
        let token = unsigned_token(&json!({
            "email": email,
            "role": role,
            "jti": self.next_id,
        }));
        self.tokens.insert(token.clone(), email.to_string());
        token
    }

    fn authorize(&self, headers: &HeaderMap) -> Result<String, Response> {
        let token = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "));

        match token.and_then(|t| self.tokens.get(t)) {
            Some(email) if !self.reject_tokens => Ok(email.clone()),
            _ => Err(error(StatusCode::UNAUTHORIZED, "Invalid or expired token")),
        }
    }

    fn product(&self, id: &str) -> Option<&Value> {
        self.products.iter().find(|p| p["_id"] == id)
    }

    fn wishlist_json(&self) -> Value {
        self.wishlist
            .iter()
            .filter_map(|id| self.product(id).cloned())
            .collect()
    }

    fn cart_json(&self) -> Value {
        let items: Vec<Value> = self
            .cart
            .iter()
            .filter_map(|(id, unit)| {
                self.product(id).map(|product| {
                    json!({
                        "_id": format!("item-{id}"),
                        "product": product,
                        "unit": unit,
                    })
                })
            })
            .collect();
        json!([{ "_id": "cart-1", "items": items }])
    }
}

fn product(id: &str, name: &str, category: &str, stock: u32, price: f64) -> Value {
    json!({
        "_id": id,
        "name": name,
        "desc": format!("A fine {}", name.to_lowercase()),
        "img": "",
        "type": category,
        "stock": stock,
        "price": price,
        "available": stock > 0,
        "seller": "Acme Goods",
    })
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "message": message }))).into_response()
}

fn lock(shared: &Shared) -> MutexGuard<'_, BackendState> {
    shared.lock().expect("fake backend state poisoned")
}

/// In-memory stand-in for the three backend services.
#[derive(Clone)]
pub struct FakeBackend {
    shared: Shared,
    pub auth_url: String,
    pub catalog_url: String,
    pub shopping_url: String,
}

impl FakeBackend {
    /// Start the three services with two users (a buyer and a seller, both
    /// with [`PASSWORD`]) and three products `p1`..`p3`.
    pub async fn start() -> Self {
        let shared: Shared = Arc::new(Mutex::new(BackendState::seeded()));

        let auth = Router::new()
            .route("/login", post(login))
            .route("/register", post(register))
            .route("/profile", get(get_profile).put(update_profile))
            .route("/address", post(add_address));

        let catalog = Router::new()
            .route("/", get(list_products))
            .route("/category/{category}", get(products_by_category))
            .route("/{id}", get(get_product))
            .route("/product/create", post(create_product))
            .route("/product/{id}", put(update_product))
            .route("/wishlist", get(get_wishlist).put(add_to_wishlist))
            .route("/wishlist/{id}", delete(remove_from_wishlist));

        let shopping = Router::new()
            .route("/cart", get(get_cart).put(add_to_cart))
            .route("/cart/{id}", delete(remove_from_cart))
            .route("/order", post(create_order));

        Self {
            auth_url: serve(service(auth, &shared)).await,
            catalog_url: serve(service(catalog, &shared)).await,
            shopping_url: serve(service(shopping, &shared)).await,
            shared,
        }
    }

    /// Storefront configuration pointing at these services.
    #[must_use]
    pub fn config(&self, data_dir: &FsPath) -> StorefrontConfig {
        let vars = [
            ("AUTH_SERVICE_URL", self.auth_url.clone()),
            ("CATALOG_SERVICE_URL", self.catalog_url.clone()),
            ("SHOPPING_SERVICE_URL", self.shopping_url.clone()),
            ("STOREFRONT_DATA_DIR", data_dir.display().to_string()),
            ("API_TIMEOUT_SECS", "5".to_string()),
        ];
        StorefrontConfig::from_lookup(|key| {
            vars.iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| value.clone())
        })
        .expect("valid test configuration")
    }

    /// Every request received so far, as `"METHOD /path"`.
    #[must_use]
    pub fn requests(&self) -> Vec<String> {
        lock(&self.shared).requests.clone()
    }

    #[must_use]
    pub fn request_count(&self) -> usize {
        lock(&self.shared).requests.len()
    }

    pub fn clear_requests(&self) {
        lock(&self.shared).requests.clear();
    }

    /// Product ids in the server-side wishlist.
    #[must_use]
    pub fn wishlist(&self) -> Vec<String> {
        lock(&self.shared).wishlist.clone()
    }

    /// Server-side cart lines as (product id, units).
    #[must_use]
    pub fn cart(&self) -> Vec<(String, u32)> {
        lock(&self.shared).cart.clone()
    }

    /// Put `units` of a product straight into the server-side cart.
    pub fn seed_cart(&self, id: &str, units: u32) {
        lock(&self.shared).cart.push((id.to_string(), units));
    }

    /// Order bodies received, oldest first.
    #[must_use]
    pub fn orders(&self) -> Vec<Value> {
        lock(&self.shared).orders.clone()
    }

    #[must_use]
    pub fn addresses(&self) -> Vec<Value> {
        lock(&self.shared).addresses.clone()
    }

    #[must_use]
    pub fn product(&self, id: &str) -> Option<Value> {
        lock(&self.shared).product(id).cloned()
    }

    #[must_use]
    pub fn products(&self) -> Vec<Value> {
        lock(&self.shared).products.clone()
    }

    /// Answer 401 to every token from now on.
    pub fn reject_tokens(&self) {
        lock(&self.shared).reject_tokens = true;
    }

    /// Answer every request with `status`, carrying `message` when given.
    pub fn fail_with(&self, status: u16, message: Option<&str>) {
        let status = StatusCode::from_u16(status).expect("valid status code");
        let body = message.map_or_else(|| json!({}), |m| json!({ "message": m }));
        lock(&self.shared).failure = Some((status, body));
    }

    /// Stop failing requests.
    pub fn recover(&self) {
        lock(&self.shared).failure = None;
    }
}

/// Wrap a service router with the request log and failure injection.
fn service(router: Router<Shared>, shared: &Shared) -> Router {
    router
        .layer(middleware::from_fn_with_state(Arc::clone(shared), record))
        .with_state(Arc::clone(shared))
}

async fn record(State(shared): State<Shared>, request: Request, next: Next) -> Response {
    let failure = {
        let mut state = lock(&shared);
        state
            .requests
            .push(format!("{} {}", request.method(), request.uri().path()));
        state.failure.clone()
    };

    match failure {
        Some((status, body)) => (status, Json(body)).into_response(),
        None => next.run(request).await,
    }
}

/// Serve `router` on an ephemeral local port and return its base URL.
async fn serve(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("test listener address");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("test server");
    });
    format!("http://{addr}/")
}

// -----------------------------------------------------------------------------
// Auth service
// -----------------------------------------------------------------------------

async fn login(State(shared): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut state = lock(&shared);
    let email = body["email"].as_str().unwrap_or_default();
    let password = body["password"].as_str().unwrap_or_default();

    match state.users.get(email).cloned() {
        Some((expected, role)) if expected == password => {
            let token = state.issue_token(email, &role);
            Json(json!({ "token": token })).into_response()
        }
        _ => error(StatusCode::BAD_REQUEST, "Invalid credentials"),
    }
}

async fn register(State(shared): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut state = lock(&shared);
    let email = body["email"].as_str().unwrap_or_default().to_string();
    if state.users.contains_key(&email) {
        return error(StatusCode::BAD_REQUEST, "User already exists");
    }

    let password = body["password"].as_str().unwrap_or_default().to_string();
    let role = body["role"].as_str().unwrap_or("buyer").to_string();
    state.users.insert(email, (password, role));
    (
        StatusCode::CREATED,
        Json(json!({ "message": "User registered successfully" })),
    )
        .into_response()
}

async fn get_profile(State(shared): State<Shared>, headers: HeaderMap) -> Response {
    let state = lock(&shared);
    match state.authorize(&headers) {
        Ok(_) => Json(state.profile.clone()).into_response(),
        Err(response) => response,
    }
}

async fn update_profile(
    State(shared): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut state = lock(&shared);
    if let Err(response) = state.authorize(&headers) {
        return response;
    }
    state.profile = body;
    Json(state.profile.clone()).into_response()
}

async fn add_address(
    State(shared): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut state = lock(&shared);
    if let Err(response) = state.authorize(&headers) {
        return response;
    }
    state.addresses.push(body);
    (StatusCode::CREATED, Json(json!({ "message": "Address added" }))).into_response()
}

// -----------------------------------------------------------------------------
// Catalog service
// -----------------------------------------------------------------------------

async fn list_products(State(shared): State<Shared>) -> Json<Value> {
    Json(json!({ "products": lock(&shared).products }))
}

async fn products_by_category(
    State(shared): State<Shared>,
    Path(category): Path<String>,
) -> Json<Value> {
    let state = lock(&shared);
    Json(
        state
            .products
            .iter()
            .filter(|p| p["type"] == category.as_str())
            .cloned()
            .collect(),
    )
}

async fn get_product(State(shared): State<Shared>, Path(id): Path<String>) -> Response {
    match lock(&shared).product(&id) {
        Some(product) => Json(product.clone()).into_response(),
        None => error(StatusCode::NOT_FOUND, "Product not found"),
    }
}

async fn create_product(
    State(shared): State<Shared>,
    headers: HeaderMap,
    Json(mut body): Json<Value>,
) -> Response {
    let mut state = lock(&shared);
    if let Err(response) = state.authorize(&headers) {
        return response;
    }

    state.next_id += 1;
    body["_id"] = json!(format!("p{}", 100 + state.next_id));
    state.products.push(body.clone());
    (StatusCode::CREATED, Json(body)).into_response()
}

async fn update_product(
    State(shared): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let mut state = lock(&shared);
    if let Err(response) = state.authorize(&headers) {
        return response;
    }

    let Some(product) = state.products.iter_mut().find(|p| p["_id"] == id.as_str()) else {
        return error(StatusCode::NOT_FOUND, "Product not found");
    };
    if let Some(fields) = body.as_object() {
        for (key, value) in fields {
            product[key] = value.clone();
        }
    }
    Json(product.clone()).into_response()
}

async fn get_wishlist(State(shared): State<Shared>, headers: HeaderMap) -> Response {
    let state = lock(&shared);
    match state.authorize(&headers) {
        Ok(_) => Json(state.wishlist_json()).into_response(),
        Err(response) => response,
    }
}

async fn add_to_wishlist(
    State(shared): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut state = lock(&shared);
    if let Err(response) = state.authorize(&headers) {
        return response;
    }

    let id = body["_id"].as_str().unwrap_or_default().to_string();
    if state.product(&id).is_none() {
        return error(StatusCode::NOT_FOUND, "Product not found");
    }
    if !state.wishlist.contains(&id) {
        state.wishlist.push(id);
    }
    Json(state.wishlist_json()).into_response()
}

async fn remove_from_wishlist(
    State(shared): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    let mut state = lock(&shared);
    if let Err(response) = state.authorize(&headers) {
        return response;
    }
    state.wishlist.retain(|existing| *existing != id);
    Json(state.wishlist_json()).into_response()
}

// -----------------------------------------------------------------------------
// Shopping service
// -----------------------------------------------------------------------------

async fn get_cart(State(shared): State<Shared>, headers: HeaderMap) -> Response {
    let state = lock(&shared);
    match state.authorize(&headers) {
        Ok(_) => Json(state.cart_json()).into_response(),
        Err(response) => response,
    }
}

async fn add_to_cart(
    State(shared): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut state = lock(&shared);
    if let Err(response) = state.authorize(&headers) {
        return response;
    }

    let id = body["product"]["_id"].as_str().unwrap_or_default().to_string();
    let amount = body["amount"]
        .as_u64()
        .and_then(|a| u32::try_from(a).ok())
        .unwrap_or(0);
    if state.product(&id).is_none() {
        return error(StatusCode::NOT_FOUND, "Product not found");
    }

    match state.cart.iter_mut().find(|(existing, _)| *existing == id) {
        Some((_, units)) => *units += amount,
        None => state.cart.push((id, amount)),
    }
    Json(state.cart_json()).into_response()
}

async fn remove_from_cart(
    State(shared): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    let mut state = lock(&shared);
    if let Err(response) = state.authorize(&headers) {
        return response;
    }
    state.cart.retain(|(existing, _)| *existing != id);
    Json(state.cart_json()).into_response()
}

async fn create_order(
    State(shared): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut state = lock(&shared);
    if let Err(response) = state.authorize(&headers) {
        return response;
    }
    if body["items"].as_array().is_none_or(Vec::is_empty) {
        return error(StatusCode::BAD_REQUEST, "Order has no items");
    }

    state.orders.push(body.clone());
    state.cart.clear();
    (
        StatusCode::CREATED,
        Json(json!({ "message": "Order created", "order": body })),
    )
        .into_response()
}

// =============================================================================
// Storefront under test
// =============================================================================

/// A rendered storefront response.
#[derive(Debug)]
pub struct Page {
    pub status: reqwest::StatusCode,
    pub location: Option<String>,
    pub body: String,
}

impl Page {
    async fn read(response: reqwest::Response) -> Self {
        let status = response.status();
        let location = response
            .headers()
            .get(reqwest::header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        let body = response.text().await.expect("read storefront body");
        Self {
            status,
            location,
            body,
        }
    }
}

/// The storefront running over a [`FakeBackend`].
pub struct TestApp {
    pub backend: FakeBackend,
    pub state: AppState,
    pub base_url: String,
    client: reqwest::Client,
    data_dir: TempDir,
}

impl TestApp {
    /// Start a backend and a signed-out storefront with empty storage.
    pub async fn start() -> Self {
        let backend = FakeBackend::start().await;
        let data_dir = tempfile::tempdir().expect("create storage dir");
        Self::launch(backend, data_dir).await
    }

    async fn launch(backend: FakeBackend, data_dir: TempDir) -> Self {
        let state = AppState::new(backend.config(data_dir.path())).expect("storefront state");
        let base_url = serve(multivendor_storefront::app(state.clone())).await;
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .expect("build HTTP client");

        Self {
            backend,
            state,
            base_url,
            client,
            data_dir,
        }
    }

    /// Start a fresh storefront over the same backend and storage directory,
    /// as after a process restart.
    pub async fn restart(self) -> Self {
        Self::launch(self.backend, self.data_dir).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path.trim_start_matches('/'))
    }

    pub async fn get(&self, path: &str) -> Page {
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("storefront GET");
        Page::read(response).await
    }

    pub async fn post(&self, path: &str, form: &[(&str, &str)]) -> Page {
        let response = self
            .client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .expect("storefront POST");
        Page::read(response).await
    }

    /// Sign in through the login form.
    pub async fn sign_in(&self, email: &str) {
        let page = self
            .post("/login", &[("email", email), ("password", PASSWORD)])
            .await;
        assert_eq!(page.status, reqwest::StatusCode::SEE_OTHER, "{}", page.body);
        assert!(self.is_signed_in());
    }

    #[must_use]
    pub fn is_signed_in(&self) -> bool {
        self.state.session().is_authenticated()
    }

    /// Product ids in the local wishlist snapshot.
    #[must_use]
    pub fn wishlist_snapshot(&self) -> Vec<String> {
        ids(self.state.view_context().wishlist_snapshot().ids())
    }

    /// Product ids in the local cart snapshot.
    #[must_use]
    pub fn cart_snapshot(&self) -> Vec<String> {
        ids(self.state.view_context().cart_snapshot().ids())
    }
}

fn ids(
    snapshot: Result<Vec<multivendor_core::ProductId>, multivendor_storefront::storage::StorageError>,
) -> Vec<String> {
    snapshot
        .expect("read snapshot")
        .into_iter()
        .map(|id| id.as_str().to_string())
        .collect()
}
