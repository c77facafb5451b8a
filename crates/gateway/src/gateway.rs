use std::sync::Arc;

use dashmap::DashMap;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, info, instrument, warn};

use autoreact_core::{GroupDiagnostics, GroupId, GroupSettings, InboundMessage};
use autoreact_executor::notify::overflow_text;
use autoreact_executor::{ExecutorConfig, Notifications, ReactionProcessor};
use autoreact_state::SettingsStore;

use crate::error::GatewayError;
use crate::lane::GroupLane;
use crate::worker::Worker;

/// What [`ReactionGateway::on_event`] did with a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// The group's settings do not target this message.
    Filtered,
    /// The message was queued for its group's worker.
    Queued,
    /// The group's queue was full; the message was dropped.
    Dropped,
    /// The gateway is shutting down.
    Closed,
}

/// Entry point of the reaction pipeline.
///
/// Filters inbound messages against their group's settings and routes them
/// into a bounded per-group queue drained by one worker per group. Lanes
/// are created on a group's first qualifying message and live until
/// [`shutdown`](Self::shutdown).
pub struct ReactionGateway {
    pub(crate) config: ExecutorConfig,
    pub(crate) store: Arc<dyn SettingsStore>,
    pub(crate) processor: Arc<ReactionProcessor>,
    pub(crate) notifications: Notifications,
    pub(crate) lanes: DashMap<GroupId, Arc<GroupLane>>,
    pub(crate) cancel: CancellationToken,
    pub(crate) tracker: TaskTracker,
}

impl ReactionGateway {
    /// Admit an inbound message.
    ///
    /// Never blocks on the queue and never fails: store errors are logged
    /// and the message is filtered. The returned [`Admission`] is purely
    /// informational.
    #[instrument(
        skip(self, message),
        fields(group_id = %message.group_id, channel_id = %message.channel_id, message_id = %message.id)
    )]
    pub async fn on_event(&self, message: InboundMessage) -> Admission {
        if self.cancel.is_cancelled() {
            return Admission::Closed;
        }

        let settings = match self.store.get_group_settings(message.group_id).await {
            Ok(settings) => settings,
            Err(e) => {
                warn!(error = %e, "cannot read settings, ignoring message");
                return Admission::Filtered;
            }
        };
        if !admits(&settings, &message) {
            return Admission::Filtered;
        }

        let group = message.group_id;
        let lane = self.lane(group);
        self.ensure_worker(&lane);

        match lane.try_enqueue(message) {
            Ok(()) => {
                debug!(queue_length = lane.queue_length(), "queued");
                Admission::Queued
            }
            Err(_dropped) => {
                lane.counters().record_drop();
                warn!(capacity = lane.capacity(), "queue full, dropping message");
                if settings.notify_enabled {
                    let notifications = self.notifications.clone();
                    let text = overflow_text(lane.capacity());
                    self.tracker.spawn(async move {
                        notifications.send(group, &text).await;
                    });
                }
                Admission::Dropped
            }
        }
    }

    /// Read-only snapshot of a group's queue and counters.
    ///
    /// Groups that never queued a message report zeros.
    pub fn diagnostics(&self, group: GroupId) -> GroupDiagnostics {
        self.lanes
            .get(&group)
            .map(|lane| lane.counters().snapshot(lane.queue_length()))
            .unwrap_or_default()
    }

    /// Current settings for a group, straight from the store.
    pub async fn group_settings(&self, group: GroupId) -> Result<GroupSettings, GatewayError> {
        Ok(self.store.get_group_settings(group).await?)
    }

    /// The settings store shared with the workers.
    pub fn store(&self) -> &Arc<dyn SettingsStore> {
        &self.store
    }

    /// Notification sender shared with the workers.
    pub fn notifications(&self) -> &Notifications {
        &self.notifications
    }

    /// Process-wide executor configuration.
    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Number of groups with a live lane.
    pub fn group_count(&self) -> usize {
        self.lanes.len()
    }

    /// Stop every worker and wait for them and any in-flight notices.
    ///
    /// Queued messages are discarded.
    pub async fn shutdown(&self) {
        self.cancel.cancel();
        self.tracker.close();
        self.tracker.wait().await;
        self.lanes.clear();
        info!("gateway shutdown complete");
    }

    fn lane(&self, group: GroupId) -> Arc<GroupLane> {
        if let Some(lane) = self.lanes.get(&group) {
            return Arc::clone(lane.value());
        }
        let capacity = self.config.queue_capacity;
        Arc::clone(
            self.lanes
                .entry(group)
                .or_insert_with(|| Arc::new(GroupLane::new(group, capacity)))
                .value(),
        )
    }

    fn ensure_worker(&self, lane: &GroupLane) {
        lane.ensure_worker(|| {
            let worker = Worker {
                group: lane.group(),
                receiver: lane.receiver(),
                counters: Arc::clone(lane.counters()),
                processor: Arc::clone(&self.processor),
                cancel: self.cancel.clone(),
                fault_pause: self.config.fault_pause,
            };
            self.tracker.spawn(worker.run())
        });
    }
}

/// Cheap dispatch-time filter. The processor re-checks the target later.
fn admits(settings: &GroupSettings, message: &InboundMessage) -> bool {
    if !settings.targets(message.channel_id) {
        return false;
    }
    if settings.ignore_bot_authors && message.author_is_bot {
        return false;
    }
    if settings.ignore_webhook_authors && message.author_is_webhook {
        return false;
    }
    true
}
