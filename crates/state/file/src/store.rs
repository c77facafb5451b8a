use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info};

use autoreact_core::{GroupId, GroupSettings, SettingsUpdate};
use autoreact_state::error::StateError;
use autoreact_state::store::SettingsStore;

/// On-disk document layout.
#[derive(Debug, Default, Serialize, Deserialize)]
struct SettingsDocument {
    #[serde(default)]
    groups: BTreeMap<GroupId, GroupSettings>,
}

/// [`SettingsStore`] persisted as a single JSON document.
///
/// The whole document is held in memory and rewritten on every mutation
/// (temp file + rename), so readers of the file never see a partial write.
/// Writes are serialized through one mutex; reads only clone from memory.
#[derive(Debug)]
pub struct FileSettingsStore {
    path: PathBuf,
    groups: Mutex<BTreeMap<GroupId, GroupSettings>>,
}

impl FileSettingsStore {
    /// Open the store at `path`, loading any existing document.
    ///
    /// A missing file is treated as an empty store and is created on the
    /// first write.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StateError> {
        let path = path.into();
        let document = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice::<SettingsDocument>(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => SettingsDocument::default(),
            Err(e) => return Err(e.into()),
        };
        info!(
            path = %path.display(),
            groups = document.groups.len(),
            "loaded settings store"
        );
        Ok(Self {
            path,
            groups: Mutex::new(document.groups),
        })
    }

    /// Path of the backing document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, groups: &BTreeMap<GroupId, GroupSettings>) -> Result<(), StateError> {
        let body = serde_json::to_vec_pretty(&SettingsDocumentRef { groups })?;

        let parent = self
            .path
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        tokio::fs::create_dir_all(parent).await?;

        let file_name = self
            .path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("settings.json");
        let temp_path = parent.join(format!(".{file_name}.tmp-{}", std::process::id()));
        tokio::fs::write(&temp_path, body).await?;
        tokio::fs::rename(&temp_path, &self.path).await?;
        debug!(path = %self.path.display(), "settings persisted");
        Ok(())
    }
}

#[derive(Serialize)]
struct SettingsDocumentRef<'a> {
    groups: &'a BTreeMap<GroupId, GroupSettings>,
}

#[async_trait]
impl SettingsStore for FileSettingsStore {
    async fn get_group_settings(&self, group: GroupId) -> Result<GroupSettings, StateError> {
        Ok(self
            .groups
            .lock()
            .await
            .get(&group)
            .cloned()
            .unwrap_or_default())
    }

    async fn set_group_settings_field(
        &self,
        group: GroupId,
        update: SettingsUpdate,
    ) -> Result<(), StateError> {
        let mut groups = self.groups.lock().await;
        let previous = groups.get(&group).cloned();
        update.apply(groups.entry(group).or_default());

        if let Err(e) = self.persist(&groups).await {
            // Keep memory consistent with what is on disk.
            match previous {
                Some(settings) => groups.insert(group, settings),
                None => groups.remove(&group),
            };
            return Err(e);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use autoreact_core::ChannelId;
    use autoreact_state::testing::run_store_conformance_tests;

    use super::*;

    #[tokio::test]
    async fn conformance() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSettingsStore::open(dir.path().join("settings.json"))
            .await
            .unwrap();
        run_store_conformance_tests(&store).await.unwrap();
    }

    #[tokio::test]
    async fn missing_file_opens_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let store = FileSettingsStore::open(&path).await.unwrap();
        assert_eq!(
            store.get_group_settings(GroupId::new(1)).await.unwrap(),
            GroupSettings::default()
        );
        assert!(!path.exists(), "reads must not create the file");
    }

    #[tokio::test]
    async fn writes_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        {
            let store = FileSettingsStore::open(&path).await.unwrap();
            store
                .set_group_settings_field(
                    GroupId::new(42),
                    SettingsUpdate::TargetChannel(Some(ChannelId::new(7))),
                )
                .await
                .unwrap();
            store
                .set_group_settings_field(GroupId::new(42), SettingsUpdate::Enabled(true))
                .await
                .unwrap();
        }

        let reopened = FileSettingsStore::open(&path).await.unwrap();
        let settings = reopened.get_group_settings(GroupId::new(42)).await.unwrap();
        assert!(settings.enabled);
        assert_eq!(settings.target_channel, Some(ChannelId::new(7)));
    }

    #[tokio::test]
    async fn document_is_keyed_by_group_id() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let store = FileSettingsStore::open(&path).await.unwrap();
        store
            .set_group_settings_field(GroupId::new(5), SettingsUpdate::MaxRetry(4))
            .await
            .unwrap();

        let raw: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(raw["groups"]["5"]["max_retry"], 4);
    }

    #[tokio::test]
    async fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, b"not json").unwrap();
        let err = FileSettingsStore::open(&path).await.unwrap_err();
        assert!(matches!(err, StateError::Serialization(_)));
    }
}
