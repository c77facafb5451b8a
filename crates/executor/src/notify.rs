use std::sync::Arc;

use tracing::{debug, warn};

use autoreact_core::{ChannelId, GroupId};
use autoreact_provider::DynNotifier;
use autoreact_state::SettingsStore;

/// Sent after the group was switched off because of permission errors.
pub const AUTO_DISABLED_TEXT: &str =
    "AutoReact has been automatically disabled due to permission errors.";

/// Text sent when a group's queue overflows.
pub fn overflow_text(capacity: usize) -> String {
    format!("AutoReact queue is full ({capacity}); new messages are being dropped.")
}

/// Text sent when reacting in `channel` failed for lack of permissions.
pub fn missing_permissions_text(channel: ChannelId) -> String {
    format!(
        "AutoReact missing permissions in {} (need View Channel / Read Message History / Add Reactions).",
        channel.mention()
    )
}

/// Best-effort notices to a group's notification channel.
///
/// Every send re-reads the group's settings and is a no-op unless
/// notifications are enabled and a channel is set. Failures are logged and
/// dropped; callers never see them.
#[derive(Clone)]
pub struct Notifications {
    store: Arc<dyn SettingsStore>,
    notifier: Arc<dyn DynNotifier>,
}

impl Notifications {
    pub fn new(store: Arc<dyn SettingsStore>, notifier: Arc<dyn DynNotifier>) -> Self {
        Self { store, notifier }
    }

    /// Send `text` to the group's notification channel, if any.
    ///
    /// Returns whether a message was delivered.
    pub async fn send(&self, group: GroupId, text: &str) -> bool {
        let settings = match self.store.get_group_settings(group).await {
            Ok(settings) => settings,
            Err(e) => {
                warn!(group_id = %group, error = %e, "cannot read settings for notification");
                return false;
            }
        };
        let Some(channel) = settings.notification_channel() else {
            debug!(group_id = %group, "notifications disabled, dropping notice");
            return false;
        };
        match self.notifier.send_text(channel, text).await {
            Ok(()) => true,
            Err(e) => {
                warn!(
                    group_id = %group,
                    channel_id = %channel,
                    error = %e,
                    "failed to deliver notification"
                );
                false
            }
        }
    }
}
