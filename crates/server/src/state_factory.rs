use std::sync::Arc;

use autoreact_state::SettingsStore;
use autoreact_state_file::FileSettingsStore;
use autoreact_state_memory::MemorySettingsStore;
use tracing::info;

use crate::config::StateConfig;
use crate::error::ServerError;

/// Construct a `SettingsStore` from configuration.
pub async fn create_store(config: &StateConfig) -> Result<Arc<dyn SettingsStore>, ServerError> {
    match config.backend.as_str() {
        "memory" => Ok(Arc::new(MemorySettingsStore::new())),
        "file" => create_file(config).await,
        other => Err(ServerError::Config(format!(
            "unsupported state backend: {other}"
        ))),
    }
}

async fn create_file(config: &StateConfig) -> Result<Arc<dyn SettingsStore>, ServerError> {
    let path = config
        .path
        .as_deref()
        .ok_or_else(|| ServerError::Config("state.path is required for the file backend".into()))?;
    let store = FileSettingsStore::open(path).await?;
    info!(path = %store.path().display(), "file settings store opened");
    Ok(Arc::new(store))
}

#[cfg(test)]
mod tests {
    use autoreact_core::{GroupId, SettingsUpdate};

    use super::*;

    fn config(backend: &str, path: Option<String>) -> StateConfig {
        StateConfig {
            backend: backend.to_owned(),
            path,
        }
    }

    #[tokio::test]
    async fn memory_backend() {
        let store = create_store(&config("memory", None)).await.unwrap();
        let settings = store.get_group_settings(GroupId::new(1)).await.unwrap();
        assert!(!settings.enabled);
    }

    #[tokio::test]
    async fn file_backend_requires_path() {
        let err = create_store(&config("file", None)).await.err().unwrap();
        assert!(matches!(err, ServerError::Config(_)));
    }

    #[tokio::test]
    async fn file_backend_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let path_str = path.to_string_lossy().into_owned();

        let store = create_store(&config("file", Some(path_str))).await.unwrap();
        store
            .set_group_settings_field(GroupId::new(3), SettingsUpdate::MaxRetry(4))
            .await
            .unwrap();
        assert!(path.exists());
    }

    #[tokio::test]
    async fn unknown_backend_is_rejected() {
        let err = create_store(&config("redis", None)).await.err().unwrap();
        assert!(err.to_string().contains("unsupported state backend: redis"));
    }
}
