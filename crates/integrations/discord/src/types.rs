use serde::{Deserialize, Serialize};

/// Request body for `POST /channels/{channel.id}/messages`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateMessageRequest {
    /// Message text content.
    pub content: String,

    /// Which mentions in `content` may ping.
    pub allowed_mentions: AllowedMentions,
}

/// Mention policy attached to outgoing messages.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AllowedMentions {
    /// Mention types to parse. Empty means nothing pings.
    pub parse: Vec<String>,
}

/// The subset of a Discord emoji object the client reads.
#[derive(Debug, Clone, Deserialize)]
pub struct DiscordEmoji {
    /// Emoji id. Snowflakes are transmitted as strings.
    pub id: Option<String>,

    /// Emoji name. May be null for deleted emojis.
    pub name: Option<String>,

    /// Whether the emoji is animated.
    #[serde(default)]
    pub animated: bool,
}

/// JSON error body returned by the Discord API.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DiscordErrorBody {
    /// Discord-specific error code (e.g. `10008` Unknown Message).
    pub code: Option<u64>,

    /// Human-readable error message.
    pub message: Option<String>,

    /// Seconds to wait before retrying, on 429 responses.
    pub retry_after: Option<f64>,
}
