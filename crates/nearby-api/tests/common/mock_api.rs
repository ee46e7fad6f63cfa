//! Mock discovery service for integration tests.
//!
//! Serves `/categories` and `/markets/category/{id}` from in-memory JSON,
//! records every request path, and can be switched into failure modes.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::sync::{oneshot, Mutex};

#[derive(Default)]
struct MockState {
    categories: Mutex<Value>,
    places: Mutex<HashMap<String, Value>>,
    requests: Mutex<Vec<String>>,
    forced_status: Mutex<Option<(u16, String)>>,
    raw_body: Mutex<Option<String>>,
}

/// A mock HTTP+JSON discovery service bound to an ephemeral port.
pub struct MockApiServer {
    addr: SocketAddr,
    state: Arc<MockState>,
    shutdown_tx: oneshot::Sender<()>,
}

impl MockApiServer {
    /// Start a new mock server on an available port.
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let state = Arc::new(MockState {
            categories: Mutex::new(Value::Array(Vec::new())),
            ..Default::default()
        });
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let router = Router::new()
            .route("/categories", get(categories))
            .route("/markets/category/{id}", get(places))
            .with_state(state.clone());

        tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            state,
            shutdown_tx,
        }
    }

    /// Base URL of the server (no trailing slash).
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub async fn set_categories(&self, categories: Value) {
        *self.state.categories.lock().await = categories;
    }

    pub async fn set_places(&self, category_id: &str, places: Value) {
        self.state
            .places
            .lock()
            .await
            .insert(category_id.to_string(), places);
    }

    /// Answer every request with this status and an error body.
    pub async fn fail_with(&self, status: u16) {
        self.fail_with_body(status, r#"{"message":"forced failure"}"#)
            .await;
    }

    /// Answer every request with this status and body.
    pub async fn fail_with_body(&self, status: u16, body: &str) {
        *self.state.forced_status.lock().await = Some((status, body.to_string()));
    }

    /// Answer every request with this body and status 200.
    pub async fn respond_raw(&self, body: &str) {
        *self.state.raw_body.lock().await = Some(body.to_string());
    }

    /// Paths received so far, in arrival order.
    pub async fn requests(&self) -> Vec<String> {
        self.state.requests.lock().await.clone()
    }

    pub fn shutdown(self) {
        let _ = self.shutdown_tx.send(());
    }
}

async fn respond(state: &MockState, path: String, value: Value) -> impl IntoResponse {
    state.requests.lock().await.push(path);

    let json = [(header::CONTENT_TYPE, "application/json")];
    if let Some((code, body)) = state.forced_status.lock().await.clone() {
        let status = StatusCode::from_u16(code).unwrap();
        return (status, json, body);
    }
    if let Some(body) = state.raw_body.lock().await.clone() {
        return (StatusCode::OK, json, body);
    }
    (StatusCode::OK, json, value.to_string())
}

async fn categories(State(state): State<Arc<MockState>>) -> impl IntoResponse {
    let value = state.categories.lock().await.clone();
    respond(&state, "/categories".to_string(), value).await
}

async fn places(
    State(state): State<Arc<MockState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let value = state
        .places
        .lock()
        .await
        .get(&id)
        .cloned()
        .unwrap_or_else(|| Value::Array(Vec::new()));
    respond(&state, format!("/markets/category/{id}"), value).await
}
