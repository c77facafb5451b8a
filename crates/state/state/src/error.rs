use thiserror::Error;

/// Errors from settings store operations.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("backend error: {0}")]
    Backend(String),
}

impl From<serde_json::Error> for StateError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

impl From<std::io::Error> for StateError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}
