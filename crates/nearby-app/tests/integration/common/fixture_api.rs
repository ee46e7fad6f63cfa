//! Fixture discovery service.
//!
//! Serves a fixed catalogue: `food` with two markets (one unplottable),
//! `bars` with one, `empty` with none. Selected categories can be made to
//! fail with HTTP 500.

use std::collections::HashSet;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use parking_lot::Mutex;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

#[derive(Default)]
struct FixtureState {
    failing: Mutex<HashSet<String>>,
    categories_down: Mutex<bool>,
}

pub struct FixtureApi {
    addr: SocketAddr,
    state: Arc<FixtureState>,
    shutdown_tx: oneshot::Sender<()>,
}

impl FixtureApi {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let state = Arc::new(FixtureState::default());
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let router = Router::new()
            .route("/categories", get(categories))
            .route("/markets/category/{id}", get(markets))
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

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Make `/markets/category/{id}` answer 500.
    pub fn fail_places(&self, category_id: &str) {
        self.state.failing.lock().insert(category_id.to_string());
    }

    /// Make `/categories` answer 500.
    pub fn fail_categories(&self) {
        *self.state.categories_down.lock() = true;
    }

    pub fn shutdown(self) {
        let _ = self.shutdown_tx.send(());
    }
}

async fn categories(State(state): State<Arc<FixtureState>>) -> (StatusCode, Json<Value>) {
    if *state.categories_down.lock() {
        return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"error": "down"})));
    }
    (
        StatusCode::OK,
        Json(json!([
            {"id": "food", "name": "Food", "icon": "food.svg"},
            {"id": "bars", "name": "Bars", "icon": "bars.svg"},
            {"id": "empty", "name": "Nothing here"}
        ])),
    )
}

async fn markets(
    State(state): State<Arc<FixtureState>>,
    Path(id): Path<String>,
) -> (StatusCode, Json<Value>) {
    if state.failing.lock().contains(&id) {
        return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"error": "boom"})));
    }
    let body = match id.as_str() {
        "food" => json!([
            {
                "id": "m-1",
                "name": "Sabor Grill",
                "address": "Av. Paulista, 2079",
                "latitude": -23.559457,
                "longitude": -46.658115
            },
            {"id": "m-2", "name": "Food truck", "address": "Somewhere"}
        ]),
        "bars" => json!([
            {
                "id": "b-1",
                "name": "Bar do Zé",
                "address": "Rua Augusta, 500",
                "latitude": -23.553,
                "longitude": -46.652
            }
        ]),
        _ => json!([]),
    };
    (StatusCode::OK, Json(body))
}
