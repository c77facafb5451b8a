use async_trait::async_trait;

use autoreact_core::{EmojiId, GroupId, MessageRef, ReactionEmoji};

use crate::error::ProviderError;

/// Strongly-typed reaction provider with native `async fn`.
///
/// This trait is **not** object-safe because it uses native `async fn` methods.
/// If you need dynamic dispatch, use [`DynReactionProvider`] instead; every
/// `ReactionProvider` automatically implements it via a blanket implementation.
pub trait ReactionProvider: Send + Sync {
    /// Returns the unique name of this provider.
    fn name(&self) -> &str;

    /// Attach `emoji` to the referenced message as the bot user.
    fn add_reaction(
        &self,
        message: &MessageRef,
        emoji: &ReactionEmoji,
    ) -> impl std::future::Future<Output = Result<(), ProviderError>> + Send;

    /// Look up the platform's current record for a custom emoji.
    ///
    /// Returns `Ok(None)` when the platform does not know the emoji (or the
    /// provider cannot look emojis up); callers then fall back to the parsed
    /// spec.
    fn resolve_custom_emoji(
        &self,
        _group: GroupId,
        _id: EmojiId,
    ) -> impl std::future::Future<Output = Result<Option<ReactionEmoji>, ProviderError>> + Send
    {
        async { Ok(None) }
    }

    /// Perform a health check to verify the provider is operational.
    fn health_check(&self) -> impl std::future::Future<Output = Result<(), ProviderError>> + Send {
        async { Ok(()) }
    }
}

/// Object-safe reaction provider for use behind `Arc<dyn DynReactionProvider>`.
///
/// You generally should not implement this trait directly; implement
/// [`ReactionProvider`] and rely on the blanket implementation.
#[async_trait]
pub trait DynReactionProvider: Send + Sync {
    /// Returns the unique name of this provider.
    fn name(&self) -> &str;

    /// Attach `emoji` to the referenced message.
    async fn add_reaction(
        &self,
        message: &MessageRef,
        emoji: &ReactionEmoji,
    ) -> Result<(), ProviderError>;

    /// Look up the platform's current record for a custom emoji.
    async fn resolve_custom_emoji(
        &self,
        group: GroupId,
        id: EmojiId,
    ) -> Result<Option<ReactionEmoji>, ProviderError>;

    /// Perform a health check to verify the provider is operational.
    async fn health_check(&self) -> Result<(), ProviderError>;
}

#[async_trait]
impl<T: ReactionProvider + Sync> DynReactionProvider for T {
    fn name(&self) -> &str {
        ReactionProvider::name(self)
    }

    async fn add_reaction(
        &self,
        message: &MessageRef,
        emoji: &ReactionEmoji,
    ) -> Result<(), ProviderError> {
        ReactionProvider::add_reaction(self, message, emoji).await
    }

    async fn resolve_custom_emoji(
        &self,
        group: GroupId,
        id: EmojiId,
    ) -> Result<Option<ReactionEmoji>, ProviderError> {
        ReactionProvider::resolve_custom_emoji(self, group, id).await
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        ReactionProvider::health_check(self).await
    }
}
