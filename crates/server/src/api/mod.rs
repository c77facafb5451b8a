pub mod events;
pub mod groups;
pub mod health;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

use autoreact_gateway::ReactionGateway;

use crate::commands::CommandOptions;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// The gateway instance.
    pub gateway: Arc<ReactionGateway>,
    /// Policy for admin commands.
    pub commands: CommandOptions,
}

/// Build the Axum router with all API routes and middleware.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        // Ingress
        .route("/v1/events", post(events::ingest))
        // Per-group administration
        .route(
            "/v1/groups/{group_id}/diagnostics",
            get(groups::diagnostics),
        )
        .route(
            "/v1/groups/{group_id}/settings",
            get(groups::get_settings).patch(groups::patch_settings),
        )
        .route("/v1/groups/{group_id}/commands", post(groups::command))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
