use autoreact_core::{ChannelId, MessageRef, ReactionEmoji};
use tracing::info;

use crate::error::ProviderError;
use crate::notifier::Notifier;
use crate::provider::ReactionProvider;

/// A provider that logs reactions and notifications and returns success
/// without performing any external I/O.
///
/// Useful for local development and dry runs where no platform token is
/// available.
pub struct LogProvider {
    name: String,
}

impl LogProvider {
    /// Create a new `LogProvider` with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl ReactionProvider for LogProvider {
    fn name(&self) -> &str {
        &self.name
    }

    #[allow(clippy::unused_async)]
    async fn add_reaction(
        &self,
        message: &MessageRef,
        emoji: &ReactionEmoji,
    ) -> Result<(), ProviderError> {
        info!(
            provider = %self.name,
            group_id = %message.group_id,
            channel_id = %message.channel_id,
            message_id = %message.message_id,
            emoji = %emoji,
            "log provider added reaction"
        );
        Ok(())
    }
}

impl Notifier for LogProvider {
    #[allow(clippy::unused_async)]
    async fn send_text(&self, channel: ChannelId, text: &str) -> Result<(), ProviderError> {
        info!(provider = %self.name, channel_id = %channel, text, "log provider sent notice");
        Ok(())
    }
}
