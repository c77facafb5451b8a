use async_trait::async_trait;

use autoreact_core::ChannelId;

use crate::error::ProviderError;

/// Sends plain-text notices to a channel.
///
/// Delivery is best-effort from the pipeline's point of view: callers log and
/// drop errors.
pub trait Notifier: Send + Sync {
    /// Post `text` to `channel`.
    fn send_text(
        &self,
        channel: ChannelId,
        text: &str,
    ) -> impl std::future::Future<Output = Result<(), ProviderError>> + Send;
}

/// Object-safe counterpart of [`Notifier`].
#[async_trait]
pub trait DynNotifier: Send + Sync {
    /// Post `text` to `channel`.
    async fn send_text(&self, channel: ChannelId, text: &str) -> Result<(), ProviderError>;
}

#[async_trait]
impl<T: Notifier + Sync> DynNotifier for T {
    async fn send_text(&self, channel: ChannelId, text: &str) -> Result<(), ProviderError> {
        Notifier::send_text(self, channel, text).await
    }
}
