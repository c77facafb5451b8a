use std::time::Duration;

use tracing::{info, warn};

use autoreact_core::{ChannelId, GroupId, GroupSettings, SettingsUpdate};
use autoreact_state::SettingsStore;

use crate::counters::GroupCounters;
use crate::notify::{AUTO_DISABLED_TEXT, Notifications, missing_permissions_text};

/// Reacts to a permission-denied failure for a (group, channel) pair.
///
/// The warning is rate limited per channel by the cooldown. Auto-disable is
/// independent of the cooldown. Never fails; every error is logged.
pub struct PermissionHandler<'a> {
    pub store: &'a dyn SettingsStore,
    pub notifications: &'a Notifications,
    pub cooldown: Duration,
}

impl PermissionHandler<'_> {
    pub async fn handle(
        &self,
        group: GroupId,
        channel: ChannelId,
        settings: &GroupSettings,
        counters: &GroupCounters,
    ) {
        if counters.try_begin_warning(channel, self.cooldown) {
            warn!(
                group_id = %group,
                channel_id = %channel,
                "missing permissions to react"
            );
            self.notifications
                .send(group, &missing_permissions_text(channel))
                .await;
        }

        if settings.auto_disable_on_permission_error && settings.enabled {
            match self
                .store
                .set_group_settings_field(group, SettingsUpdate::Enabled(false))
                .await
            {
                Ok(()) => {
                    info!(group_id = %group, "auto-disabled after permission error");
                    self.notifications.send(group, AUTO_DISABLED_TEXT).await;
                }
                Err(e) => {
                    warn!(group_id = %group, error = %e, "failed to auto-disable group");
                }
            }
        }
    }
}
