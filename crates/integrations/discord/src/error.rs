use std::time::Duration;

use autoreact_provider::ProviderError;
use thiserror::Error;

/// Errors specific to the Discord client.
///
/// These are internal errors that get converted into [`ProviderError`] at the
/// public API boundary.
#[derive(Debug, Error)]
pub enum DiscordError {
    /// An HTTP-level transport error occurred.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The Discord API returned an error response.
    #[error("Discord API error {status} (code {code:?}): {message}")]
    Api {
        status: u16,
        code: Option<u64>,
        message: String,
    },

    /// The client received an HTTP 429 (Too Many Requests) response.
    #[error("rate limited by Discord")]
    RateLimited { retry_after: Option<Duration> },

    /// A response body could not be decoded.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl From<DiscordError> for ProviderError {
    fn from(err: DiscordError) -> Self {
        match err {
            DiscordError::Http(e) if e.is_builder() => ProviderError::Configuration(e.to_string()),
            DiscordError::Http(e) => ProviderError::Connection(e.to_string()),
            DiscordError::Api {
                status, message, ..
            } => ProviderError::from_status(status, message),
            DiscordError::RateLimited { retry_after } => ProviderError::RateLimited { retry_after },
            DiscordError::InvalidResponse(msg) => ProviderError::Serialization(msg),
        }
    }
}
