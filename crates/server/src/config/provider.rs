use serde::Deserialize;

/// Reaction provider configuration.
///
/// The bot token is never read from the file; `token_env` names the
/// environment variable that holds it.
#[derive(Debug, Deserialize)]
pub struct ProviderConfig {
    /// Which provider to use: `"discord"` or `"log"`.
    #[serde(rename = "type", default = "default_provider_type")]
    pub provider_type: String,
    /// Base URL of the Discord REST API.
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Environment variable holding the bot token.
    #[serde(default = "default_token_env")]
    pub token_env: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            provider_type: default_provider_type(),
            api_base: default_api_base(),
            token_env: default_token_env(),
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

fn default_provider_type() -> String {
    "log".to_owned()
}

fn default_api_base() -> String {
    autoreact_discord::config::DEFAULT_API_BASE.to_owned()
}

fn default_token_env() -> String {
    "DISCORD_BOT_TOKEN".to_owned()
}

fn default_request_timeout() -> u64 {
    15
}
