use serde::{Deserialize, Serialize};

use crate::emoji::{EmojiKey, ReactionEmoji};
use crate::types::{ChannelId, GroupId, MessageId};

/// An inbound chat message, as delivered by the platform client.
///
/// Immutable once enqueued. `existing_reactions` is captured at delivery
/// time and may be stale by the time the message is processed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundMessage {
    pub id: MessageId,
    pub group_id: GroupId,
    pub channel_id: ChannelId,
    #[serde(default)]
    pub author_is_bot: bool,
    #[serde(default)]
    pub author_is_webhook: bool,
    #[serde(default)]
    pub existing_reactions: Vec<ReactionEmoji>,
}

impl InboundMessage {
    /// Create a message with no author flags and no reactions.
    pub fn new(id: MessageId, group_id: GroupId, channel_id: ChannelId) -> Self {
        Self {
            id,
            group_id,
            channel_id,
            author_is_bot: false,
            author_is_webhook: false,
            existing_reactions: Vec::new(),
        }
    }

    /// Mark the author as a bot account.
    #[must_use]
    pub fn with_bot_author(mut self, is_bot: bool) -> Self {
        self.author_is_bot = is_bot;
        self
    }

    /// Mark the message as sent through a webhook.
    #[must_use]
    pub fn with_webhook_author(mut self, is_webhook: bool) -> Self {
        self.author_is_webhook = is_webhook;
        self
    }

    /// Add a reaction already present on the message.
    #[must_use]
    pub fn with_reaction(mut self, emoji: ReactionEmoji) -> Self {
        self.existing_reactions.push(emoji);
        self
    }

    /// Address of this message for platform API calls.
    #[must_use]
    pub fn reference(&self) -> MessageRef {
        MessageRef {
            group_id: self.group_id,
            channel_id: self.channel_id,
            message_id: self.id,
        }
    }

    /// Whether a reaction with the given identity is already on the message.
    #[must_use]
    pub fn has_reaction(&self, key: &EmojiKey) -> bool {
        self.existing_reactions.iter().any(|r| &r.key() == key)
    }
}

/// Platform address of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageRef {
    pub group_id: GroupId,
    pub channel_id: ChannelId,
    pub message_id: MessageId,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message() -> InboundMessage {
        InboundMessage::new(MessageId::new(1), GroupId::new(2), ChannelId::new(3))
    }

    #[test]
    fn has_reaction_compares_normalized_keys() {
        let msg = message().with_reaction(ReactionEmoji::custom("renamed", 55, false));
        assert!(msg.has_reaction(&ReactionEmoji::custom("original", 55, false).key()));
        assert!(!msg.has_reaction(&ReactionEmoji::custom("original", 55, true).key()));
        assert!(!msg.has_reaction(&ReactionEmoji::unicode("✅").key()));
    }

    #[test]
    fn deserialize_defaults_optional_fields() {
        let msg: InboundMessage =
            serde_json::from_str(r#"{"id": 1, "group_id": 2, "channel_id": 3}"#).unwrap();
        assert_eq!(msg, message());
    }

    #[test]
    fn reference_carries_all_ids() {
        let r = message().reference();
        assert_eq!(r.message_id, MessageId::new(1));
        assert_eq!(r.group_id, GroupId::new(2));
        assert_eq!(r.channel_id, ChannelId::new(3));
    }
}
