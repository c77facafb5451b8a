use std::time::Duration;

use thiserror::Error;

/// Errors that can occur while talking to the chat platform.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The target (message, channel) no longer exists.
    #[error("not found: {0}")]
    NotFound(String),

    /// The bot lacks a permission needed for the request.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// The platform rejected the request due to rate limiting.
    #[error("rate limited")]
    RateLimited { retry_after: Option<Duration> },

    /// The platform failed with a server-side (5xx) status.
    #[error("server error {status}: {message}")]
    Server { status: u16, message: String },

    /// Any other non-success HTTP status.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// The platform did not respond within the allowed duration.
    #[error("timeout after {0:?}")]
    Timeout(Duration),

    /// A network or transport-level error occurred.
    #[error("connection error: {0}")]
    Connection(String),

    /// The provider was given invalid configuration.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// A serialization or deserialization error occurred.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// How the reaction pipeline should treat a failed call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureClass {
    /// The target disappeared. Terminal, not counted.
    Vanished,
    /// Missing permissions. Terminal, counted, triggers the permission handler.
    PermissionDenied,
    /// May succeed later. Counted and retried with backoff.
    Transient,
    /// Any other failure. Terminal and counted.
    Rejected,
}

impl ProviderError {
    /// Classify this error for the reaction pipeline.
    pub fn class(&self) -> FailureClass {
        match self {
            Self::NotFound(_) => FailureClass::Vanished,
            Self::PermissionDenied(_) => FailureClass::PermissionDenied,
            Self::RateLimited { .. } | Self::Server { .. } | Self::Timeout(_) | Self::Connection(_) => {
                FailureClass::Transient
            }
            Self::Http { .. } | Self::Configuration(_) | Self::Serialization(_) => {
                FailureClass::Rejected
            }
        }
    }

    /// Returns `true` if the error is transient and the operation may succeed
    /// on retry.
    pub fn is_retryable(&self) -> bool {
        self.class() == FailureClass::Transient
    }

    /// Build an error from a non-success HTTP status code.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            403 => Self::PermissionDenied(message),
            404 => Self::NotFound(message),
            429 => Self::RateLimited { retry_after: None },
            500..=599 => Self::Server { status, message },
            _ => Self::Http { status, message },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification() {
        assert_eq!(
            ProviderError::NotFound("msg".into()).class(),
            FailureClass::Vanished
        );
        assert_eq!(
            ProviderError::PermissionDenied("x".into()).class(),
            FailureClass::PermissionDenied
        );
        assert_eq!(
            ProviderError::RateLimited { retry_after: None }.class(),
            FailureClass::Transient
        );
        assert_eq!(
            ProviderError::Timeout(Duration::from_secs(5)).class(),
            FailureClass::Transient
        );
        assert_eq!(
            ProviderError::Http {
                status: 400,
                message: "bad".into()
            }
            .class(),
            FailureClass::Rejected
        );
    }

    #[test]
    fn retryable_errors() {
        assert!(ProviderError::Connection("reset".into()).is_retryable());
        assert!(
            ProviderError::Server {
                status: 502,
                message: String::new()
            }
            .is_retryable()
        );
        assert!(!ProviderError::PermissionDenied("x".into()).is_retryable());
        assert!(!ProviderError::Configuration("x".into()).is_retryable());
    }

    #[test]
    fn from_status_maps_codes() {
        assert!(matches!(
            ProviderError::from_status(403, "no"),
            ProviderError::PermissionDenied(_)
        ));
        assert!(matches!(
            ProviderError::from_status(404, "gone"),
            ProviderError::NotFound(_)
        ));
        assert!(matches!(
            ProviderError::from_status(429, ""),
            ProviderError::RateLimited { .. }
        ));
        assert!(matches!(
            ProviderError::from_status(503, ""),
            ProviderError::Server { status: 503, .. }
        ));
        assert!(matches!(
            ProviderError::from_status(400, ""),
            ProviderError::Http { status: 400, .. }
        ));
    }

    #[test]
    fn error_display() {
        let err = ProviderError::Timeout(Duration::from_millis(500));
        assert_eq!(err.to_string(), "timeout after 500ms");

        let err = ProviderError::Server {
            status: 500,
            message: "oops".into(),
        };
        assert_eq!(err.to_string(), "server error 500: oops");
    }
}
