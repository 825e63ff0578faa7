//! Server status handler.

use axum::extract::State;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;

use crate::server::AppState;

/// `GET /api/status` - health, uptime, and edit-pool statistics.
pub async fn api_status(State(state): State<AppState>) -> Response {
    let edit_pool = state.orchestrator.pool_stats().await.ok();

    Json(json!({
        "status": "healthy",
        "uptime_secs": state.server_started_at.elapsed().as_secs(),
        "library_root": state.library.root().display().to_string(),
        "edit_pool": edit_pool,
    }))
    .into_response()
}
