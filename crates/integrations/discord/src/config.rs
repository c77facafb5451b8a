use std::time::Duration;

/// Default base URL of the Discord REST API.
pub const DEFAULT_API_BASE: &str = "https://discord.com/api/v10";

/// Configuration for the Discord client.
#[derive(Clone)]
pub struct DiscordConfig {
    /// Bot token, sent as `Authorization: Bot <token>`.
    pub token: String,

    /// Base URL of the REST API, without a trailing slash.
    pub api_base: String,

    /// Timeout applied to every HTTP request.
    pub request_timeout: Duration,
}

impl std::fmt::Debug for DiscordConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscordConfig")
            .field("token", &"[REDACTED]")
            .field("api_base", &self.api_base)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl DiscordConfig {
    /// Create a new configuration with the given bot token.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            api_base: DEFAULT_API_BASE.to_owned(),
            request_timeout: Duration::from_secs(15),
        }
    }

    /// Point the client at a different API base (e.g. a test server).
    #[must_use]
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_owned();
        self
    }

    /// Set the per-request timeout.
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = DiscordConfig::new("abc");
        assert_eq!(config.api_base, "https://discord.com/api/v10");
        assert_eq!(config.request_timeout, Duration::from_secs(15));
    }

    #[test]
    fn api_base_trailing_slash_is_trimmed() {
        let config = DiscordConfig::new("abc").with_api_base("http://127.0.0.1:9000/");
        assert_eq!(config.api_base, "http://127.0.0.1:9000");
    }

    #[test]
    fn debug_redacts_token() {
        let config = DiscordConfig::new("test-placeholder-token");
        let debug = format!("{config:?}");
        assert!(debug.contains("[REDACTED]"), "token must be redacted");
        assert!(
            !debug.contains("test-placeholder-token"),
            "token must not appear in debug output"
        );
    }
}
