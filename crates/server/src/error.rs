use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::commands::CommandError;

/// Errors that can occur when running the AutoReact server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// A configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// An I/O error (e.g. binding the listener).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A gateway-level error surfaced through the API.
    #[error("gateway error: {0}")]
    Gateway(#[from] autoreact_gateway::GatewayError),

    /// The settings store failed.
    #[error("state error: {0}")]
    State(#[from] autoreact_state::StateError),

    /// The request was well-formed JSON but carried an invalid value.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// An admin command was refused or failed.
    #[error("command error: {0}")]
    Command(#[from] CommandError),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Command(e) if e.is_user_error() => {
                return (StatusCode::BAD_REQUEST, Json(e.reply())).into_response();
            }
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            other => (StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
        };

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}
