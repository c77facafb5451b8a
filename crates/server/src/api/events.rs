use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use tracing::debug;

use autoreact_core::InboundMessage;

use super::AppState;

/// `POST /v1/events` -- hand an inbound message to the pipeline.
///
/// Always answers `202 Accepted`: filtering, overflow and processing
/// failures are never reported to the caller.
pub async fn ingest(
    State(state): State<AppState>,
    Json(message): Json<InboundMessage>,
) -> impl IntoResponse {
    let admission = state.gateway.on_event(message).await;
    debug!(?admission, "event admitted");
    StatusCode::ACCEPTED
}
