use async_trait::async_trait;

use autoreact_core::{GroupId, GroupSettings, SettingsUpdate};

use crate::error::StateError;

/// Trait for persisting per-group settings.
///
/// Implementations must be `Send + Sync` and safe for concurrent access from
/// many groups' workers at once. Every read returns a fresh snapshot; callers
/// must not assume two reads agree.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Get the settings for a group. Groups that were never configured get
    /// [`GroupSettings::default`].
    async fn get_group_settings(&self, group: GroupId) -> Result<GroupSettings, StateError>;

    /// Atomically set a single field of a group's settings.
    async fn set_group_settings_field(
        &self,
        group: GroupId,
        update: SettingsUpdate,
    ) -> Result<(), StateError>;

    /// Apply several field updates in order and return the resulting settings.
    ///
    /// Each update is individually atomic; the batch as a whole is not.
    async fn apply_updates(
        &self,
        group: GroupId,
        updates: Vec<SettingsUpdate>,
    ) -> Result<GroupSettings, StateError> {
        for update in updates {
            self.set_group_settings_field(group, update).await?;
        }
        self.get_group_settings(group).await
    }
}
