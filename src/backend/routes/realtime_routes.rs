//! Realtime routes: the websocket handshake and a health check.

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};

use crate::backend::realtime::{ws_handler, Hub};
use crate::backend::server::state::AppState;

pub fn configure_realtime_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/ws", get(ws_handler))
        .route("/health", get(health))
}

/// `GET /health`
async fn health(State(hub): State<Arc<Hub>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "connections": hub.connection_count(),
    }))
}
