use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::types::ChannelId;

/// Lower bound for the per-item pacing delay.
pub const MIN_ITEM_DELAY_MS: u64 = 100;
/// Upper bound for the per-item pacing delay.
pub const MAX_ITEM_DELAY_MS: u64 = 2000;
/// Pacing delay used when a group never configured one.
pub const DEFAULT_ITEM_DELAY_MS: u64 = 350;
/// Retry budget used when a group never configured one.
pub const DEFAULT_MAX_RETRY: u32 = 1;

/// Snapshot of one group's configuration.
///
/// Settings are read fresh from the store on every access, so a snapshot
/// only describes the group at the moment it was fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
#[allow(clippy::struct_excessive_bools)]
pub struct GroupSettings {
    pub enabled: bool,
    pub target_channel: Option<ChannelId>,
    /// Raw emoji spec, see [`crate::emoji`].
    pub action_spec: Option<String>,
    pub ignore_bot_authors: bool,
    pub ignore_webhook_authors: bool,
    pub per_item_delay_ms: u64,
    pub max_retry: u32,
    pub auto_disable_on_permission_error: bool,
    pub notify_enabled: bool,
    pub notify_channel: Option<ChannelId>,
}

impl Default for GroupSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            target_channel: None,
            action_spec: None,
            ignore_bot_authors: false,
            ignore_webhook_authors: false,
            per_item_delay_ms: DEFAULT_ITEM_DELAY_MS,
            max_retry: DEFAULT_MAX_RETRY,
            auto_disable_on_permission_error: false,
            notify_enabled: false,
            notify_channel: None,
        }
    }
}

impl GroupSettings {
    /// The reaction target, if the group is enabled and fully configured.
    ///
    /// `enabled` alone means nothing until both the channel and the emoji
    /// spec are set.
    #[must_use]
    pub fn active_target(&self) -> Option<(ChannelId, &str)> {
        if !self.enabled {
            return None;
        }
        match (self.target_channel, self.action_spec.as_deref()) {
            (Some(channel), Some(spec)) => Some((channel, spec)),
            _ => None,
        }
    }

    /// Whether messages in `channel` should be reacted to right now.
    #[must_use]
    pub fn targets(&self, channel: ChannelId) -> bool {
        self.active_target()
            .is_some_and(|(target, _)| target == channel)
    }

    /// Pacing delay applied after each processed item, clamped to
    /// [`MIN_ITEM_DELAY_MS`]..=[`MAX_ITEM_DELAY_MS`].
    #[must_use]
    pub fn item_delay(&self) -> Duration {
        Duration::from_millis(
            self.per_item_delay_ms
                .clamp(MIN_ITEM_DELAY_MS, MAX_ITEM_DELAY_MS),
        )
    }

    /// The notification channel, if notifications are switched on.
    #[must_use]
    pub fn notification_channel(&self) -> Option<ChannelId> {
        if self.notify_enabled {
            self.notify_channel
        } else {
            None
        }
    }

    /// Names of the settings that must be set before the group can be enabled.
    #[must_use]
    pub fn missing_requirements(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.target_channel.is_none() {
            missing.push("channel");
        }
        if self.action_spec.is_none() {
            missing.push("emoji");
        }
        missing
    }
}

/// A single-field mutation of [`GroupSettings`].
///
/// Serialized as `{"field": "<name>", "value": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum SettingsUpdate {
    Enabled(bool),
    TargetChannel(Option<ChannelId>),
    ActionSpec(Option<String>),
    IgnoreBotAuthors(bool),
    IgnoreWebhookAuthors(bool),
    PerItemDelayMs(u64),
    MaxRetry(u32),
    AutoDisableOnPermissionError(bool),
    NotifyEnabled(bool),
    NotifyChannel(Option<ChannelId>),
}

impl SettingsUpdate {
    /// Apply this mutation to a settings value.
    pub fn apply(self, settings: &mut GroupSettings) {
        match self {
            Self::Enabled(v) => settings.enabled = v,
            Self::TargetChannel(v) => settings.target_channel = v,
            Self::ActionSpec(v) => settings.action_spec = v,
            Self::IgnoreBotAuthors(v) => settings.ignore_bot_authors = v,
            Self::IgnoreWebhookAuthors(v) => settings.ignore_webhook_authors = v,
            Self::PerItemDelayMs(v) => settings.per_item_delay_ms = v,
            Self::MaxRetry(v) => settings.max_retry = v,
            Self::AutoDisableOnPermissionError(v) => settings.auto_disable_on_permission_error = v,
            Self::NotifyEnabled(v) => settings.notify_enabled = v,
            Self::NotifyChannel(v) => settings.notify_channel = v,
        }
    }

    /// Name of the field this update touches.
    #[must_use]
    pub fn field_name(&self) -> &'static str {
        match self {
            Self::Enabled(_) => "enabled",
            Self::TargetChannel(_) => "target_channel",
            Self::ActionSpec(_) => "action_spec",
            Self::IgnoreBotAuthors(_) => "ignore_bot_authors",
            Self::IgnoreWebhookAuthors(_) => "ignore_webhook_authors",
            Self::PerItemDelayMs(_) => "per_item_delay_ms",
            Self::MaxRetry(_) => "max_retry",
            Self::AutoDisableOnPermissionError(_) => "auto_disable_on_permission_error",
            Self::NotifyEnabled(_) => "notify_enabled",
            Self::NotifyChannel(_) => "notify_channel",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured() -> GroupSettings {
        GroupSettings {
            enabled: true,
            target_channel: Some(ChannelId::new(10)),
            action_spec: Some("✅".into()),
            ..GroupSettings::default()
        }
    }

    #[test]
    fn defaults() {
        let s = GroupSettings::default();
        assert!(!s.enabled);
        assert_eq!(s.per_item_delay_ms, 350);
        assert_eq!(s.max_retry, 1);
        assert!(s.active_target().is_none());
    }

    #[test]
    fn enabled_without_target_is_inactive() {
        let mut s = configured();
        s.action_spec = None;
        assert!(s.active_target().is_none());
        assert!(!s.targets(ChannelId::new(10)));

        let mut s = configured();
        s.target_channel = None;
        assert!(s.active_target().is_none());
    }

    #[test]
    fn targets_only_configured_channel() {
        let s = configured();
        assert!(s.targets(ChannelId::new(10)));
        assert!(!s.targets(ChannelId::new(11)));

        let disabled = GroupSettings {
            enabled: false,
            ..configured()
        };
        assert!(!disabled.targets(ChannelId::new(10)));
    }

    #[test]
    fn item_delay_is_clamped() {
        let mut s = GroupSettings::default();
        s.per_item_delay_ms = 5;
        assert_eq!(s.item_delay(), Duration::from_millis(100));
        s.per_item_delay_ms = 60_000;
        assert_eq!(s.item_delay(), Duration::from_millis(2000));
        s.per_item_delay_ms = 750;
        assert_eq!(s.item_delay(), Duration::from_millis(750));
    }

    #[test]
    fn notification_channel_requires_flag() {
        let mut s = GroupSettings {
            notify_channel: Some(ChannelId::new(99)),
            ..GroupSettings::default()
        };
        assert_eq!(s.notification_channel(), None);
        s.notify_enabled = true;
        assert_eq!(s.notification_channel(), Some(ChannelId::new(99)));
    }

    #[test]
    fn missing_requirements_lists_channel_and_emoji() {
        assert_eq!(
            GroupSettings::default().missing_requirements(),
            vec!["channel", "emoji"]
        );
        assert!(configured().missing_requirements().is_empty());
    }

    #[test]
    fn update_applies_and_names_field() {
        let mut s = GroupSettings::default();
        let update = SettingsUpdate::NotifyChannel(Some(ChannelId::new(4)));
        assert_eq!(update.field_name(), "notify_channel");
        update.apply(&mut s);
        assert_eq!(s.notify_channel, Some(ChannelId::new(4)));
    }

    #[test]
    fn update_serde_shape() {
        let update: SettingsUpdate =
            serde_json::from_value(serde_json::json!({"field": "max_retry", "value": 3})).unwrap();
        assert_eq!(update, SettingsUpdate::MaxRetry(3));
        let cleared: SettingsUpdate =
            serde_json::from_value(serde_json::json!({"field": "target_channel", "value": null}))
                .unwrap();
        assert_eq!(cleared, SettingsUpdate::TargetChannel(None));
    }

    #[test]
    fn settings_deserialize_with_missing_fields() {
        let s: GroupSettings = serde_json::from_str(r#"{"enabled": true}"#).unwrap();
        assert!(s.enabled);
        assert_eq!(s.per_item_delay_ms, DEFAULT_ITEM_DELAY_MS);
    }
}
