use std::sync::Arc;
use std::time::Duration;

use autoreact_discord::{DiscordClient, DiscordConfig};
use autoreact_provider::{DynNotifier, DynReactionProvider, LogProvider};
use tracing::info;

use crate::config::ProviderConfig;
use crate::error::ServerError;

/// The platform client, seen both as reaction provider and notifier.
pub struct ProviderPair {
    pub provider: Arc<dyn DynReactionProvider>,
    pub notifier: Arc<dyn DynNotifier>,
}

/// Construct the provider and notifier from configuration.
///
/// For `discord`, the bot token is read from the environment variable named
/// by `token_env`.
pub fn create_provider(config: &ProviderConfig) -> Result<ProviderPair, ServerError> {
    match config.provider_type.as_str() {
        "log" => {
            let client = Arc::new(LogProvider::new("log"));
            Ok(ProviderPair {
                provider: Arc::clone(&client) as Arc<dyn DynReactionProvider>,
                notifier: client,
            })
        }
        "discord" => {
            let token = std::env::var(&config.token_env).map_err(|_| {
                ServerError::Config(format!(
                    "environment variable {} must hold the Discord bot token",
                    config.token_env
                ))
            })?;
            create_discord(config, token)
        }
        other => Err(ServerError::Config(format!(
            "unsupported provider type: {other}"
        ))),
    }
}

fn create_discord(config: &ProviderConfig, token: String) -> Result<ProviderPair, ServerError> {
    let discord_config = DiscordConfig::new(token)
        .with_api_base(&config.api_base)
        .with_request_timeout(Duration::from_secs(config.request_timeout_seconds));
    let client = DiscordClient::new(discord_config)
        .map_err(|e| ServerError::Config(format!("failed to build Discord client: {e}")))?;
    info!(api_base = %config.api_base, "Discord provider configured");

    let client = Arc::new(client);
    Ok(ProviderPair {
        provider: Arc::clone(&client) as Arc<dyn DynReactionProvider>,
        notifier: client,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(provider_type: &str, token_env: &str) -> ProviderConfig {
        ProviderConfig {
            provider_type: provider_type.to_owned(),
            token_env: token_env.to_owned(),
            ..ProviderConfig::default()
        }
    }

    #[test]
    fn log_provider() {
        let pair = create_provider(&config("log", "UNUSED")).unwrap();
        assert_eq!(pair.provider.name(), "log");
    }

    #[test]
    fn discord_requires_token_variable() {
        let err = create_provider(&config("discord", "AUTOREACT_TEST_TOKEN_THAT_IS_NEVER_SET"))
            .err()
            .unwrap();
        assert!(err.to_string().contains("AUTOREACT_TEST_TOKEN_THAT_IS_NEVER_SET"));
    }

    #[test]
    fn discord_with_token() {
        let pair = create_discord(&config("discord", "UNUSED"), "secret".into()).unwrap();
        assert_eq!(pair.provider.name(), "discord");
    }

    #[test]
    fn unknown_provider_is_rejected() {
        let err = create_provider(&config("slack", "UNUSED")).err().unwrap();
        assert!(matches!(err, ServerError::Config(_)));
    }
}
