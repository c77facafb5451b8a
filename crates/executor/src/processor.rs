use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};

use autoreact_core::{GroupSettings, InboundMessage, ReactionEmoji};
use autoreact_provider::{DynReactionProvider, FailureClass};
use autoreact_state::SettingsStore;

use crate::config::ExecutorConfig;
use crate::counters::GroupCounters;
use crate::error::ProcessError;
use crate::notify::Notifications;
use crate::permission::PermissionHandler;

/// What happened to a single message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessOutcome {
    /// Settings no longer target this message. Not paced.
    Discarded,
    /// The configured emoji spec could not be resolved. Counted, not paced.
    Unresolvable,
    /// The reaction was already on the message.
    AlreadyReacted,
    /// The reaction was added.
    Reacted { attempts: u32 },
    /// The message disappeared before the reaction landed.
    Vanished,
    /// The bot lacks permissions in the channel.
    PermissionDenied,
    /// The platform rejected the request outright.
    Rejected,
    /// Transient failures exhausted the retry budget.
    RetriesExhausted { attempts: u32 },
}

/// Runs the per-message reaction pipeline.
///
/// For each message: re-read settings, resolve the emoji, skip if already
/// present, react with bounded retry, classify failures, then pace. Reaction
/// attempts and sleeps observe the cancellation token; the caller is expected
/// to race the whole future against it as well.
pub struct ReactionProcessor {
    config: ExecutorConfig,
    store: Arc<dyn SettingsStore>,
    provider: Arc<dyn DynReactionProvider>,
    notifications: Notifications,
}

impl ReactionProcessor {
    pub fn new(
        config: ExecutorConfig,
        store: Arc<dyn SettingsStore>,
        provider: Arc<dyn DynReactionProvider>,
        notifications: Notifications,
    ) -> Self {
        Self {
            config,
            store,
            provider,
            notifications,
        }
    }

    /// Return a reference to the processor configuration.
    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Process one message from a group's queue.
    #[instrument(
        skip(self, message, counters, cancel),
        fields(group_id = %message.group_id, message_id = %message.id)
    )]
    pub async fn process(
        &self,
        message: &InboundMessage,
        counters: &GroupCounters,
        cancel: &CancellationToken,
    ) -> Result<ProcessOutcome, ProcessError> {
        let settings = self.store.get_group_settings(message.group_id).await?;
        let Some((_, spec)) = settings
            .active_target()
            .filter(|(channel, _)| *channel == message.channel_id)
        else {
            debug!("settings no longer target this message, discarding");
            return Ok(ProcessOutcome::Discarded);
        };

        let emoji = match ReactionEmoji::parse_spec(spec) {
            Ok(parsed) => self.refresh_custom(message, parsed).await,
            Err(e) => {
                warn!(spec, error = %e, "configured emoji cannot be resolved");
                counters.record_failure();
                return Ok(ProcessOutcome::Unresolvable);
            }
        };

        let outcome = if message.has_reaction(&emoji.key()) {
            debug!(emoji = %emoji, "already reacted");
            ProcessOutcome::AlreadyReacted
        } else {
            self.react(message, &emoji, &settings, counters, cancel)
                .await?
        };

        let pace = settings.item_delay();
        debug!(delay_ms = %pace.as_millis(), "pacing");
        sleep_or_cancel(pace, cancel).await?;
        Ok(outcome)
    }

    /// Replace the parsed name and animation flag of a custom emoji with the
    /// platform's current record, when it has one.
    async fn refresh_custom(&self, message: &InboundMessage, parsed: ReactionEmoji) -> ReactionEmoji {
        let Some(id) = parsed.custom_id() else {
            return parsed;
        };
        match self
            .provider
            .resolve_custom_emoji(message.group_id, id)
            .await
        {
            Ok(Some(ReactionEmoji::Custom { name, animated, .. })) => {
                ReactionEmoji::Custom { name, id, animated }
            }
            Ok(_) => parsed,
            Err(e) => {
                debug!(emoji_id = %id, error = %e, "custom emoji lookup failed, using parsed spec");
                parsed
            }
        }
    }

    async fn react(
        &self,
        message: &InboundMessage,
        emoji: &ReactionEmoji,
        settings: &GroupSettings,
        counters: &GroupCounters,
        cancel: &CancellationToken,
    ) -> Result<ProcessOutcome, ProcessError> {
        let reference = message.reference();
        let mut attempt: u32 = 0;

        loop {
            let result = tokio::select! {
                biased;
                () = cancel.cancelled() => return Err(ProcessError::Cancelled),
                result = self.provider.add_reaction(&reference, emoji) => result,
            };

            let err = match result {
                Ok(()) => {
                    debug!(emoji = %emoji, attempt, "reacted");
                    return Ok(ProcessOutcome::Reacted {
                        attempts: attempt + 1,
                    });
                }
                Err(err) => err,
            };

            match err.class() {
                FailureClass::Vanished => {
                    debug!(error = %err, "message vanished before reacting");
                    return Ok(ProcessOutcome::Vanished);
                }
                FailureClass::PermissionDenied => {
                    counters.record_failure();
                    let handler = PermissionHandler {
                        store: self.store.as_ref(),
                        notifications: &self.notifications,
                        cooldown: self.config.permission_warn_cooldown,
                    };
                    handler
                        .handle(message.group_id, message.channel_id, settings, counters)
                        .await;
                    return Ok(ProcessOutcome::PermissionDenied);
                }
                FailureClass::Rejected => {
                    warn!(error = %err, "reaction rejected");
                    counters.record_failure();
                    return Ok(ProcessOutcome::Rejected);
                }
                FailureClass::Transient if attempt < settings.max_retry => {
                    let delay = self.config.retry_strategy.delay_for(attempt);
                    warn!(
                        attempt,
                        error = %err,
                        delay_ms = %delay.as_millis(),
                        "transient error, will retry"
                    );
                    sleep_or_cancel(delay, cancel).await?;
                    attempt += 1;
                }
                FailureClass::Transient => {
                    warn!(attempt, error = %err, "transient error, no retries left");
                    counters.record_failure();
                    return Ok(ProcessOutcome::RetriesExhausted {
                        attempts: attempt + 1,
                    });
                }
            }
        }
    }
}

/// Sleep for `duration` unless `cancel` fires first.
pub async fn sleep_or_cancel(
    duration: Duration,
    cancel: &CancellationToken,
) -> Result<(), ProcessError> {
    tokio::select! {
        biased;
        () = cancel.cancelled() => Err(ProcessError::Cancelled),
        () = tokio::time::sleep(duration) => Ok(()),
    }
}
