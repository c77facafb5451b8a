//! Text admin commands addressed to one group.
//!
//! Commands are parsed from a single line (`enable`, `set ignorebots on`,
//! `setchannel <#123>`, ...), optionally prefixed with `autoreact`. Every
//! command answers with a [`CommandReply`]; refusals caused by the input are
//! [`CommandError`]s whose [`CommandError::reply`] renders the same shape.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use autoreact_core::{
    ChannelId, EmojiParseError, GroupId, GroupSettings, MAX_ITEM_DELAY_MS, MIN_ITEM_DELAY_MS,
    SettingsUpdate, validate_emoji_input,
};
use autoreact_gateway::ReactionGateway;
use autoreact_state::StateError;

const USAGE: &[&str] = &[
    "`autoreact setchannel <#channel|none>`",
    "`autoreact setemoji <emoji>`",
    "`autoreact enable` / `autoreact disable`",
    "`autoreact status`",
    "`autoreact set ignorebots <on|off>`",
    "`autoreact set ignorewebhooks <on|off>`",
    "`autoreact set ratelimit <ms>`",
    "`autoreact set autodisableforbidden <on|off>`",
    "`autoreact set logging <on|off>`",
    "`autoreact set logchannel <#channel|none>`",
];

/// Titled answer to a command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandReply {
    pub title: String,
    #[serde(default)]
    pub lines: Vec<String>,
}

impl CommandReply {
    fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            lines: Vec::new(),
        }
    }

    fn line(mut self, line: impl Into<String>) -> Self {
        self.lines.push(line.into());
        self
    }
}

/// Errors produced while parsing or running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("unknown command: {0}")]
    Unknown(String),

    #[error("missing argument: {0}")]
    MissingArgument(&'static str),

    #[error("expected on or off, got {0:?}")]
    InvalidToggle(String),

    #[error("invalid channel: {0:?}")]
    InvalidChannel(String),

    #[error("invalid emoji: {0}")]
    InvalidEmoji(#[from] EmojiParseError),

    #[error("invalid number: {0:?}")]
    InvalidNumber(String),

    #[error("missing settings: {}", .0.join(", "))]
    MissingRequirements(Vec<&'static str>),

    #[error("rate limit tuning is locked")]
    RateLimitLocked,

    #[error("rate limit must be between {min} and {max} ms, got {0}", min = MIN_ITEM_DELAY_MS, max = MAX_ITEM_DELAY_MS)]
    RateLimitOutOfRange(u64),

    #[error(transparent)]
    State(#[from] StateError),
}

impl CommandError {
    /// Whether the error was caused by the command's input rather than the
    /// system.
    pub fn is_user_error(&self) -> bool {
        !matches!(self, Self::State(_))
    }

    /// Render the error as a reply for the caller.
    pub fn reply(&self) -> CommandReply {
        match self {
            Self::Unknown(_) => {
                let mut reply = CommandReply::new("Unknown command");
                reply.lines.extend(USAGE.iter().map(|s| (*s).to_owned()));
                reply
            }
            Self::MissingArgument(_) | Self::InvalidNumber(_) => {
                CommandReply::new("Input error").line(self.to_string())
            }
            Self::InvalidToggle(_) => CommandReply::new("Input error").line("Use `on` or `off`."),
            Self::InvalidChannel(_) => CommandReply::new("Channel input error")
                .line("Use a channel mention such as `<#123>`, a channel id, or `none`."),
            Self::InvalidEmoji(_) => CommandReply::new("Emoji input error")
                .line("Examples: `✅`, `<:name:id>`, `<a:name:id>`, `name:id`"),
            Self::MissingRequirements(missing) => CommandReply::new("Enable failed")
                .line(format!("Missing settings: {}", missing.join(", "))),
            Self::RateLimitLocked => CommandReply::new("Change refused")
                .line("Rate limit tuning is locked (OFF) by default."),
            Self::RateLimitOutOfRange(_) => CommandReply::new("Input error").line(format!(
                "The rate limit must be between {MIN_ITEM_DELAY_MS} and {MAX_ITEM_DELAY_MS} ms."
            )),
            Self::State(e) => CommandReply::new("Internal error").line(e.to_string()),
        }
    }
}

/// Boolean settings reachable through `set <name> <on|off>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    IgnoreBots,
    IgnoreWebhooks,
    AutoDisableForbidden,
    Logging,
}

impl Toggle {
    fn update(self, value: bool) -> SettingsUpdate {
        match self {
            Self::IgnoreBots => SettingsUpdate::IgnoreBotAuthors(value),
            Self::IgnoreWebhooks => SettingsUpdate::IgnoreWebhookAuthors(value),
            Self::AutoDisableForbidden => SettingsUpdate::AutoDisableOnPermissionError(value),
            Self::Logging => SettingsUpdate::NotifyEnabled(value),
        }
    }
}

/// A parsed admin command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Enable,
    Disable,
    SetChannel(Option<ChannelId>),
    SetEmoji(String),
    SetToggle(Toggle, bool),
    SetRateLimit(u64),
    SetLogChannel(Option<ChannelId>),
    Status,
}

/// Parse `on/true/yes/y/1` and `off/false/no/n/0`, case-insensitively.
pub fn parse_on_off(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" | "y" | "1" => Some(true),
        "off" | "false" | "no" | "n" | "0" => Some(false),
        _ => None,
    }
}

/// Parse a channel argument. Empty input and `none` clear the channel.
fn parse_channel_arg(value: &str) -> Result<Option<ChannelId>, CommandError> {
    let value = value.trim();
    if value.is_empty() || value.eq_ignore_ascii_case("none") {
        return Ok(None);
    }
    ChannelId::parse_reference(value)
        .map(Some)
        .ok_or_else(|| CommandError::InvalidChannel(value.to_owned()))
}

/// Split off the first whitespace-delimited word.
fn split_word(input: &str) -> (&str, &str) {
    let input = input.trim_start();
    match input.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (input, ""),
    }
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let (mut word, mut rest) = split_word(input);
        if word.eq_ignore_ascii_case("autoreact") {
            (word, rest) = split_word(rest);
        }

        match word.to_ascii_lowercase().as_str() {
            "" | "help" => Ok(Self::Help),
            "enable" => Ok(Self::Enable),
            "disable" => Ok(Self::Disable),
            "status" => Ok(Self::Status),
            "setchannel" => parse_channel_arg(rest).map(Self::SetChannel),
            "setemoji" => {
                if rest.is_empty() {
                    return Err(CommandError::MissingArgument("emoji"));
                }
                Ok(Self::SetEmoji(rest.to_owned()))
            }
            "set" => parse_set(rest),
            _ => Err(CommandError::Unknown(input.trim().to_owned())),
        }
    }
}

fn parse_set(input: &str) -> Result<Command, CommandError> {
    let (name, value) = split_word(input);
    let toggle = match name.to_ascii_lowercase().as_str() {
        "" => return Ok(Command::Help),
        "ignorebots" => Toggle::IgnoreBots,
        "ignorewebhooks" => Toggle::IgnoreWebhooks,
        "autodisableforbidden" => Toggle::AutoDisableForbidden,
        "logging" => Toggle::Logging,
        "ratelimit" => {
            if value.is_empty() {
                return Err(CommandError::MissingArgument("ms"));
            }
            return value
                .parse()
                .map(Command::SetRateLimit)
                .map_err(|_| CommandError::InvalidNumber(value.to_owned()));
        }
        "logchannel" => return parse_channel_arg(value).map(Command::SetLogChannel),
        _ => return Err(CommandError::Unknown(format!("set {input}"))),
    };
    parse_on_off(value)
        .map(|on| Command::SetToggle(toggle, on))
        .ok_or_else(|| CommandError::InvalidToggle(value.to_owned()))
}

/// Process-wide command policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommandOptions {
    pub allow_ratelimit_tuning: bool,
}

impl CommandOptions {
    /// Refuse a pacing change unless tuning is unlocked and `ms` is in range.
    pub fn check_item_delay(self, ms: u64) -> Result<(), CommandError> {
        if !self.allow_ratelimit_tuning {
            return Err(CommandError::RateLimitLocked);
        }
        if !(MIN_ITEM_DELAY_MS..=MAX_ITEM_DELAY_MS).contains(&ms) {
            return Err(CommandError::RateLimitOutOfRange(ms));
        }
        Ok(())
    }
}

/// Runs admin commands against a gateway's store and diagnostics.
pub struct CommandRunner<'a> {
    gateway: &'a ReactionGateway,
    options: CommandOptions,
}

impl<'a> CommandRunner<'a> {
    pub fn new(gateway: &'a ReactionGateway, options: CommandOptions) -> Self {
        Self { gateway, options }
    }

    /// Parse and run one command line on behalf of `actor`.
    pub async fn run_line(
        &self,
        group: GroupId,
        actor: &str,
        line: &str,
    ) -> Result<CommandReply, CommandError> {
        let command = line.parse()?;
        self.run(group, actor, command).await
    }

    /// Run a parsed command.
    pub async fn run(
        &self,
        group: GroupId,
        actor: &str,
        command: Command,
    ) -> Result<CommandReply, CommandError> {
        match command {
            Command::Help => {
                let mut reply = CommandReply::new("AutoReact commands");
                reply.lines.extend(USAGE.iter().map(|s| (*s).to_owned()));
                Ok(reply)
            }
            Command::Enable => self.enable(group, actor).await,
            Command::Disable => {
                self.update(group, SettingsUpdate::Enabled(false)).await?;
                self.audit(group, &format!("{actor} disabled AutoReact.")).await;
                Ok(CommandReply::new("AutoReact disabled"))
            }
            Command::SetChannel(None) => {
                self.update(group, SettingsUpdate::TargetChannel(None)).await?;
                self.update(group, SettingsUpdate::Enabled(false)).await?;
                self.audit(
                    group,
                    &format!("{actor} cleared the AutoReact target channel; AutoReact has been disabled."),
                )
                .await;
                Ok(CommandReply::new("Target channel cleared")
                    .line("AutoReact was disabled as well to avoid reacting in the wrong place."))
            }
            Command::SetChannel(Some(channel)) => {
                self.update(group, SettingsUpdate::TargetChannel(Some(channel)))
                    .await?;
                self.audit(
                    group,
                    &format!("{actor} set the AutoReact target channel to {}.", channel.mention()),
                )
                .await;
                Ok(CommandReply::new("Target channel set").line(channel.mention()))
            }
            Command::SetEmoji(raw) => {
                let spec = validate_emoji_input(&raw)?;
                self.update(group, SettingsUpdate::ActionSpec(Some(spec.clone())))
                    .await?;
                self.audit(group, &format!("{actor} changed the AutoReact emoji to `{spec}`."))
                    .await;
                Ok(CommandReply::new("Reaction emoji set").line(format!("`{spec}`")))
            }
            Command::SetToggle(toggle, value) => {
                let update = toggle.update(value);
                let field = update.field_name();
                self.update(group, update).await?;
                Ok(CommandReply::new("Setting updated").line(format!("`{field}` = `{value}`")))
            }
            Command::SetRateLimit(ms) => {
                self.options.check_item_delay(ms)?;
                self.update(group, SettingsUpdate::PerItemDelayMs(ms)).await?;
                Ok(CommandReply::new("Setting updated").line(format!("`per_item_delay_ms` = `{ms}`")))
            }
            Command::SetLogChannel(channel) => {
                self.update(group, SettingsUpdate::NotifyChannel(channel)).await?;
                let line = match channel {
                    Some(channel) => format!("`notify_channel` = {}", channel.mention()),
                    None => "`notify_channel` cleared.".to_owned(),
                };
                Ok(CommandReply::new("Setting updated").line(line))
            }
            Command::Status => self.status(group).await,
        }
    }

    async fn enable(&self, group: GroupId, actor: &str) -> Result<CommandReply, CommandError> {
        let settings = self.gateway.store().get_group_settings(group).await?;
        let missing = settings.missing_requirements();
        if !missing.is_empty() {
            return Err(CommandError::MissingRequirements(missing));
        }
        self.update(group, SettingsUpdate::Enabled(true)).await?;
        self.audit(group, &format!("{actor} enabled AutoReact.")).await;
        Ok(CommandReply::new("AutoReact enabled"))
    }

    async fn status(&self, group: GroupId) -> Result<CommandReply, CommandError> {
        let settings = self.gateway.store().get_group_settings(group).await?;
        let diagnostics = self.gateway.diagnostics(group);

        let mut reply = CommandReply::new("AutoReact status");
        reply.lines = status_lines(&settings);
        reply.lines.extend([
            format!("queue_length: {}", diagnostics.queue_length),
            format!("dropped_count: {}", diagnostics.dropped_count),
            format!("failure_count: {}", diagnostics.failure_count),
        ]);
        Ok(reply)
    }

    async fn update(&self, group: GroupId, update: SettingsUpdate) -> Result<(), CommandError> {
        info!(group_id = %group, field = update.field_name(), "settings changed by command");
        self.gateway
            .store()
            .set_group_settings_field(group, update)
            .await?;
        Ok(())
    }

    async fn audit(&self, group: GroupId, text: &str) {
        self.gateway.notifications().send(group, text).await;
    }
}

fn status_lines(settings: &GroupSettings) -> Vec<String> {
    let channel = |c: Option<ChannelId>| c.map_or_else(|| "not set".to_owned(), ChannelId::mention);
    vec![
        format!("enabled: {}", settings.enabled),
        format!("target_channel: {}", channel(settings.target_channel)),
        format!(
            "action_spec: {}",
            settings.action_spec.as_deref().unwrap_or("not set")
        ),
        format!("ignore_bot_authors: {}", settings.ignore_bot_authors),
        format!("ignore_webhook_authors: {}", settings.ignore_webhook_authors),
        format!("per_item_delay_ms: {}", settings.per_item_delay_ms),
        format!("max_retry: {}", settings.max_retry),
        format!(
            "auto_disable_on_permission_error: {}",
            settings.auto_disable_on_permission_error
        ),
        format!("notify_enabled: {}", settings.notify_enabled),
        format!("notify_channel: {}", channel(settings.notify_channel)),
    ]
}
