use autoreact_core::{ChannelId, GroupId, GroupSettings, SettingsUpdate};

use crate::error::StateError;
use crate::store::SettingsStore;

/// Run the full settings store conformance test suite.
///
/// Call this from your backend's test module with a fresh store instance.
///
/// # Errors
///
/// Returns an error if the store fails an operation.
pub async fn run_store_conformance_tests(store: &dyn SettingsStore) -> Result<(), StateError> {
    test_missing_group_has_defaults(store).await?;
    test_set_and_get_field(store).await?;
    test_clear_optional_field(store).await?;
    test_groups_are_isolated(store).await?;
    test_apply_updates(store).await?;
    Ok(())
}

async fn test_missing_group_has_defaults(store: &dyn SettingsStore) -> Result<(), StateError> {
    let settings = store.get_group_settings(GroupId::new(1)).await?;
    assert_eq!(
        settings,
        GroupSettings::default(),
        "unknown group should read as defaults"
    );
    Ok(())
}

async fn test_set_and_get_field(store: &dyn SettingsStore) -> Result<(), StateError> {
    let group = GroupId::new(2);
    store
        .set_group_settings_field(group, SettingsUpdate::Enabled(true))
        .await?;
    store
        .set_group_settings_field(group, SettingsUpdate::ActionSpec(Some("✅".into())))
        .await?;
    let settings = store.get_group_settings(group).await?;
    assert!(settings.enabled);
    assert_eq!(settings.action_spec.as_deref(), Some("✅"));
    assert_eq!(
        settings.max_retry,
        GroupSettings::default().max_retry,
        "untouched fields keep their defaults"
    );
    Ok(())
}

async fn test_clear_optional_field(store: &dyn SettingsStore) -> Result<(), StateError> {
    let group = GroupId::new(3);
    store
        .set_group_settings_field(group, SettingsUpdate::TargetChannel(Some(ChannelId::new(9))))
        .await?;
    store
        .set_group_settings_field(group, SettingsUpdate::TargetChannel(None))
        .await?;
    let settings = store.get_group_settings(group).await?;
    assert_eq!(settings.target_channel, None);
    Ok(())
}

async fn test_groups_are_isolated(store: &dyn SettingsStore) -> Result<(), StateError> {
    let a = GroupId::new(4);
    let b = GroupId::new(5);
    store
        .set_group_settings_field(a, SettingsUpdate::PerItemDelayMs(1500))
        .await?;
    let other = store.get_group_settings(b).await?;
    assert_eq!(
        other.per_item_delay_ms,
        GroupSettings::default().per_item_delay_ms,
        "writes to one group must not leak into another"
    );
    Ok(())
}

async fn test_apply_updates(store: &dyn SettingsStore) -> Result<(), StateError> {
    let group = GroupId::new(6);
    let settings = store
        .apply_updates(
            group,
            vec![
                SettingsUpdate::NotifyEnabled(true),
                SettingsUpdate::NotifyChannel(Some(ChannelId::new(77))),
                SettingsUpdate::MaxRetry(3),
            ],
        )
        .await?;
    assert_eq!(settings.notification_channel(), Some(ChannelId::new(77)));
    assert_eq!(settings.max_retry, 3);
    Ok(())
}
