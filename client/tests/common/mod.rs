//! In-process mock of the inventory service for client tests

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use serde_json::{json, Value};

use inventory_console_client::config::ApiConfig;
use inventory_console_client::{ApiClient, MemoryTokenStore, Session};

/// One request as the mock received it
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub query: HashMap<String, String>,
    pub authorization: Option<String>,
    pub body: Option<Value>,
}

type Responder = Arc<dyn Fn(&Recorded) -> (StatusCode, Value) + Send + Sync>;

#[derive(Default)]
struct MockState {
    routes: HashMap<(Method, String), Responder>,
    requests: Vec<Recorded>,
}

#[derive(Clone)]
pub struct MockService {
    pub base_url: String,
    state: Arc<Mutex<MockState>>,
}

impl MockService {
    pub async fn start() -> Self {
        let state = Arc::new(Mutex::new(MockState::default()));
        let app = Router::new().fallback(handle).with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            state,
        }
    }

    /// Answer `method path` (path below `/api/v1`) with a fixed response
    pub fn on(&self, method: Method, path: &str, status: StatusCode, body: Value) {
        self.on_fn(method, path, move |_| (status, body.clone()));
    }

    /// Answer `method path` with a response computed from the request
    pub fn on_fn(
        &self,
        method: Method,
        path: &str,
        responder: impl Fn(&Recorded) -> (StatusCode, Value) + Send + Sync + 'static,
    ) {
        let key = (method, format!("/api/v1{}", path));
        self.state
            .lock()
            .unwrap()
            .routes
            .insert(key, Arc::new(responder));
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn requests_to(&self, method: Method, path: &str) -> Vec<Recorded> {
        let full = format!("/api/v1{}", path);
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && r.path == full)
            .collect()
    }

    pub fn request_count(&self) -> usize {
        self.state.lock().unwrap().requests.len()
    }

    pub fn client(&self, session: Arc<Session>) -> ApiClient {
        let config = ApiConfig {
            base_url: self.base_url.clone(),
            ..ApiConfig::default()
        };
        ApiClient::new(&config, session).unwrap()
    }

    /// Client whose session already holds `token`
    pub fn authenticated_client(&self, token: &str) -> ApiClient {
        let session = Session::open(Box::new(MemoryTokenStore::with_token(token))).unwrap();
        self.client(Arc::new(session))
    }
}

async fn handle(
    State(state): State<Arc<Mutex<MockState>>>,
    method: Method,
    uri: Uri,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let recorded = Recorded {
        method: method.clone(),
        path: uri.path().to_string(),
        query,
        authorization: headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body: serde_json::from_slice(&body).ok(),
    };

    let responder = {
        let mut state = state.lock().unwrap();
        state.requests.push(recorded.clone());
        state
            .routes
            .get(&(method, recorded.path.clone()))
            .cloned()
    };

    match responder {
        Some(responder) => {
            let (status, body) = responder(&recorded);
            (status, Json(body)).into_response()
        }
        None => (StatusCode::NOT_FOUND, Json(json!({ "detail": "Not Found" }))).into_response(),
    }
}

// ============================================================================
// Payload builders
// ============================================================================

pub const TIMESTAMP: &str = "2024-05-01T10:00:00Z";

pub fn product_json(id: i64, stock_current: i64, stock_min: i64) -> Value {
    json!({
        "id": id,
        "sku": format!("SKU-{:03}", id),
        "name": format!("Product {}", id),
        "description": null,
        "category_id": null,
        "supplier_id": null,
        "stock_current": stock_current,
        "stock_min": stock_min,
        "cost": "10.00",
        "price": "15.00",
        "is_active": true,
        "created_at": TIMESTAMP,
        "updated_at": TIMESTAMP,
    })
}

pub fn page_json(items: Vec<Value>, page: u32, page_size: u32, total: u64) -> Value {
    let pages = ((total + page_size as u64 - 1) / page_size as u64) as u32;
    json!({
        "items": items,
        "total": total,
        "page": page,
        "page_size": page_size,
        "pages": pages,
    })
}

pub fn movement_json(
    id: i64,
    product_id: i64,
    movement_type: &str,
    reason: &str,
    quantity: i64,
    stock_before: i64,
    stock_after: i64,
) -> Value {
    json!({
        "id": id,
        "product_id": product_id,
        "movement_type": movement_type,
        "reason": reason,
        "quantity": quantity,
        "stock_before": stock_before,
        "stock_after": stock_after,
        "user_id": 1,
        "reference": null,
        "notes": null,
        "created_at": TIMESTAMP,
    })
}

pub fn stats_json(low_stock_count: u64) -> Value {
    json!({
        "total_products": 3,
        "total_value": "450.00",
        "low_stock_count": low_stock_count,
        "out_of_stock_count": 0,
        "movements_today": 1,
        "movements_week": 4,
        "movements_month": 9,
    })
}

pub fn alert_json(products: Vec<(i64, i64, i64)>) -> Value {
    let rows: Vec<Value> = products
        .iter()
        .map(|(id, stock, min)| {
            json!({
                "product_id": id,
                "sku": format!("SKU-{:03}", id),
                "name": format!("Product {}", id),
                "stock_current": stock,
                "stock_min": min,
                "deficit": (min - stock).max(0),
            })
        })
        .collect();
    json!({
        "critical_count": 0,
        "warning_count": 0,
        "products": rows,
    })
}

pub fn user_json(id: i64, email: &str) -> Value {
    json!({
        "id": id,
        "email": email,
        "full_name": "Warehouse Keeper",
        "role": "warehouse_keeper",
        "is_active": true,
        "created_at": TIMESTAMP,
    })
}
