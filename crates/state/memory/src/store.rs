use async_trait::async_trait;
use dashmap::DashMap;

use autoreact_core::{GroupId, GroupSettings, SettingsUpdate};
use autoreact_state::error::StateError;
use autoreact_state::store::SettingsStore;

/// In-memory [`SettingsStore`] backed by a [`DashMap`].
///
/// Groups are only inserted on their first write; reads of unknown groups
/// return defaults without allocating an entry.
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    data: DashMap<GroupId, GroupSettings>,
}

impl MemorySettingsStore {
    /// Create a new, empty in-memory settings store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with the given settings.
    pub fn with_groups(groups: impl IntoIterator<Item = (GroupId, GroupSettings)>) -> Self {
        Self {
            data: groups.into_iter().collect(),
        }
    }

    /// Replace a group's settings wholesale.
    pub fn insert(&self, group: GroupId, settings: GroupSettings) {
        self.data.insert(group, settings);
    }

    /// Number of groups with stored settings.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether no group has stored settings.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[async_trait]
impl SettingsStore for MemorySettingsStore {
    async fn get_group_settings(&self, group: GroupId) -> Result<GroupSettings, StateError> {
        Ok(self
            .data
            .get(&group)
            .map(|entry| entry.value().clone())
            .unwrap_or_default())
    }

    async fn set_group_settings_field(
        &self,
        group: GroupId,
        update: SettingsUpdate,
    ) -> Result<(), StateError> {
        // The entry guard holds the shard lock, so read-modify-write is atomic.
        update.apply(&mut self.data.entry(group).or_default());
        Ok(())
    }
}
