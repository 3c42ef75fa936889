//! Keyword dictionary inspection.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/dictionary", get(get_dictionary))
}

/// GET /api/dictionary — subjects, topics and normalized keywords in use.
async fn get_dictionary(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let dictionary = state.analyzer.dictionary();
    Json(serde_json::json!({
        "subjects": dictionary.to_specs(),
        "total_topics": dictionary.topic_count(),
    }))
}
