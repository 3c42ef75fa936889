//! Liveness routes.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use crate::state::AppState;

pub fn root_routes() -> Router<Arc<AppState>> {
    Router::new().route("/", get(banner))
}

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(health))
}

/// GET / — plain-text banner.
async fn banner() -> &'static str {
    "PaperSage backend is running"
}

/// GET /api/health
async fn health(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "subjects": state.analyzer.dictionary().subjects().len(),
        "topics": state.analyzer.dictionary().topic_count(),
        "cached_sessions": state.results.len(),
    }))
}
