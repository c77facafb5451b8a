use std::time::Duration;

use dashmap::DashMap;
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::{Client, Response, StatusCode};
use tracing::{debug, instrument, warn};

use autoreact_core::{ChannelId, EmojiId, GroupId, MessageRef, ReactionEmoji};
use autoreact_provider::{Notifier, ProviderError, ReactionProvider};

use crate::config::DiscordConfig;
use crate::error::DiscordError;
use crate::types::{AllowedMentions, CreateMessageRequest, DiscordEmoji, DiscordErrorBody};

/// Discord REST client acting as the reaction provider and notifier.
///
/// Custom emoji lookups are cached per emoji id for the life of the client;
/// an emoji's animation flag never changes once uploaded.
pub struct DiscordClient {
    config: DiscordConfig,
    client: Client,
    emoji_cache: DashMap<EmojiId, ReactionEmoji>,
}

impl DiscordClient {
    /// Create a new Discord client with the given configuration.
    pub fn new(config: DiscordConfig) -> Result<Self, DiscordError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self::with_client(config, client))
    }

    /// Create a new Discord client with a custom HTTP client.
    pub fn with_client(config: DiscordConfig, client: Client) -> Self {
        Self {
            config,
            client,
            emoji_cache: DashMap::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.api_base)
    }

    fn authorization(&self) -> String {
        format!("Bot {}", self.config.token)
    }

    /// Turn a non-success response into a [`DiscordError`].
    async fn check(response: Response) -> Result<Response, DiscordError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let header_retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<f64>().ok());
        let text = response.text().await.unwrap_or_default();
        let body: DiscordErrorBody = serde_json::from_str(&text).unwrap_or_default();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = body
                .retry_after
                .or(header_retry_after)
                .filter(|secs| secs.is_finite() && *secs >= 0.0)
                .map(Duration::from_secs_f64);
            warn!(?retry_after, "Discord API rate limit hit");
            return Err(DiscordError::RateLimited { retry_after });
        }

        Err(DiscordError::Api {
            status: status.as_u16(),
            code: body.code,
            message: body.message.unwrap_or(text),
        })
    }
}

/// Path segment identifying an emoji in reaction endpoints.
///
/// Unicode emojis are sent as-is, custom emojis as `name:id`; both
/// percent-encoded.
pub fn reaction_path_segment(emoji: &ReactionEmoji) -> String {
    let raw = match emoji {
        ReactionEmoji::Unicode { name } => name.clone(),
        ReactionEmoji::Custom { name, id, .. } => format!("{name}:{id}"),
    };
    utf8_percent_encode(&raw, NON_ALPHANUMERIC).to_string()
}

impl ReactionProvider for DiscordClient {
    #[allow(clippy::unnecessary_literal_bound)]
    fn name(&self) -> &str {
        "discord"
    }

    #[instrument(
        skip(self, message, emoji),
        fields(channel_id = %message.channel_id, message_id = %message.message_id, provider = "discord")
    )]
    async fn add_reaction(
        &self,
        message: &MessageRef,
        emoji: &ReactionEmoji,
    ) -> Result<(), ProviderError> {
        let url = self.url(&format!(
            "/channels/{}/messages/{}/reactions/{}/@me",
            message.channel_id,
            message.message_id,
            reaction_path_segment(emoji)
        ));
        debug!(emoji = %emoji, "adding reaction");

        let response = self
            .client
            .put(&url)
            .header(reqwest::header::AUTHORIZATION, self.authorization())
            .header(reqwest::header::CONTENT_LENGTH, 0)
            .send()
            .await
            .map_err(DiscordError::Http)?;
        Self::check(response).await?;
        Ok(())
    }

    #[instrument(skip(self), fields(provider = "discord"))]
    async fn resolve_custom_emoji(
        &self,
        group: GroupId,
        id: EmojiId,
    ) -> Result<Option<ReactionEmoji>, ProviderError> {
        if let Some(cached) = self.emoji_cache.get(&id) {
            return Ok(Some(cached.clone()));
        }

        let response = self
            .client
            .get(self.url(&format!("/guilds/{group}/emojis/{id}")))
            .header(reqwest::header::AUTHORIZATION, self.authorization())
            .send()
            .await
            .map_err(DiscordError::Http)?;
        if response.status() == StatusCode::NOT_FOUND {
            debug!("custom emoji not found in guild");
            return Ok(None);
        }
        let emoji: DiscordEmoji = Self::check(response)
            .await?
            .json()
            .await
            .map_err(|e| DiscordError::InvalidResponse(e.to_string()))?;

        let Some(name) = emoji.name.filter(|n| !n.is_empty()) else {
            return Ok(None);
        };
        let resolved = ReactionEmoji::Custom {
            name,
            id,
            animated: emoji.animated,
        };
        self.emoji_cache.insert(id, resolved.clone());
        Ok(Some(resolved))
    }

    #[instrument(skip(self), fields(provider = "discord"))]
    async fn health_check(&self) -> Result<(), ProviderError> {
        debug!("performing Discord health check via GET /users/@me");
        let response = self
            .client
            .get(self.url("/users/@me"))
            .header(reqwest::header::AUTHORIZATION, self.authorization())
            .send()
            .await
            .map_err(DiscordError::Http)?;
        Self::check(response).await?;
        Ok(())
    }
}

impl Notifier for DiscordClient {
    #[instrument(skip(self, text), fields(provider = "discord"))]
    async fn send_text(&self, channel: ChannelId, text: &str) -> Result<(), ProviderError> {
        let request = CreateMessageRequest {
            content: text.to_owned(),
            allowed_mentions: AllowedMentions::default(),
        };
        let response = self
            .client
            .post(self.url(&format!("/channels/{channel}/messages")))
            .header(reqwest::header::AUTHORIZATION, self.authorization())
            .json(&request)
            .send()
            .await
            .map_err(DiscordError::Http)?;
        Self::check(response).await?;
        debug!("notice sent");
        Ok(())
    }
}
