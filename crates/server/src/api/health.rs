use axum::Json;
use axum::extract::State;
use axum::response::IntoResponse;

use super::AppState;

/// `GET /health` -- returns service status and the number of active groups.
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "groups": state.gateway.group_count(),
    }))
}
