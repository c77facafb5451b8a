use thiserror::Error;

/// Errors that can occur while building or querying the gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// An error occurred in the settings store.
    #[error("state error: {0}")]
    State(#[from] autoreact_state::StateError),

    /// The gateway was misconfigured (e.g. missing required components).
    #[error("configuration error: {0}")]
    Configuration(String),
}
