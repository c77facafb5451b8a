//! Reaction emoji parsing, validation, and identity.
//!
//! A group's configured reaction is stored as a raw string (the emoji
//! spec). Specs come in two shapes:
//!
//! - unicode: any single whitespace-free token, e.g. `✅`
//! - custom: `<:name:id>`, `<a:name:id>`, `name:id`, or `a:name:id`
//!
//! Two emojis are considered the same reaction iff their [`EmojiKey`]s are
//! equal. Custom emojis are identified by id and animation flag only; names
//! can be renamed or collide across groups.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::EmojiParseError;
use crate::types::EmojiId;

/// Strict grammar accepted when an administrator sets a custom emoji.
static CUSTOM_EMOJI_INPUT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^<?a?:[A-Za-z0-9_]{2,32}:\d{2,}>?$").expect("custom emoji input regex is valid")
});

/// Lenient grammar used when turning a stored spec back into an emoji.
static CUSTOM_EMOJI_SPEC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^<?(?:(?P<animated>a)?:)?(?P<name>[A-Za-z0-9_]+):(?P<id>[0-9]{2,20})>?$")
        .expect("custom emoji spec regex is valid")
});

/// A concrete reaction that can be attached to a message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReactionEmoji {
    /// A standard unicode emoji, identified by its text.
    Unicode { name: String },
    /// A custom emoji uploaded to a group.
    Custom {
        name: String,
        id: EmojiId,
        #[serde(default)]
        animated: bool,
    },
}

impl ReactionEmoji {
    /// Create a unicode reaction.
    pub fn unicode(name: impl Into<String>) -> Self {
        Self::Unicode { name: name.into() }
    }

    /// Create a custom reaction.
    pub fn custom(name: impl Into<String>, id: u64, animated: bool) -> Self {
        Self::Custom {
            name: name.into(),
            id: EmojiId::new(id),
            animated,
        }
    }

    /// Resolve a stored emoji spec into a concrete reaction.
    ///
    /// Anything that does not look like a custom emoji is taken verbatim as
    /// a unicode name. An empty spec (or a custom id that does not fit in 64
    /// bits) cannot be resolved.
    pub fn parse_spec(spec: &str) -> Result<Self, EmojiParseError> {
        if let Some(caps) = CUSTOM_EMOJI_SPEC.captures(spec) {
            let id = caps["id"]
                .parse::<u64>()
                .map_err(|_| EmojiParseError::InvalidId(caps["id"].to_owned()))?;
            return Ok(Self::Custom {
                name: caps["name"].to_owned(),
                id: EmojiId::new(id),
                animated: caps.name("animated").is_some(),
            });
        }
        if spec.is_empty() {
            return Err(EmojiParseError::Empty);
        }
        Ok(Self::unicode(spec))
    }

    /// The identity used to detect that this reaction is already present.
    #[must_use]
    pub fn key(&self) -> EmojiKey {
        match self {
            Self::Unicode { name } => EmojiKey(format!("u:{name}")),
            Self::Custom { id, animated, .. } => {
                let variant = if *animated { "a" } else { "s" };
                EmojiKey(format!("c:{variant}:{id}"))
            }
        }
    }

    /// Return the custom emoji id, if this is a custom emoji.
    #[must_use]
    pub fn custom_id(&self) -> Option<EmojiId> {
        match self {
            Self::Unicode { .. } => None,
            Self::Custom { id, .. } => Some(*id),
        }
    }

    /// Return the display name of the emoji.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Unicode { name } | Self::Custom { name, .. } => name,
        }
    }
}

impl fmt::Display for ReactionEmoji {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unicode { name } => f.write_str(name),
            Self::Custom { name, id, animated } => {
                let prefix = if *animated { "a" } else { "" };
                write!(f, "<{prefix}:{name}:{id}>")
            }
        }
    }
}

/// Normalized reaction identity: `u:<name>` or `c:<a|s>:<id>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmojiKey(String);

impl EmojiKey {
    /// Return the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmojiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Validate an emoji spec typed by an administrator.
///
/// Returns the trimmed spec to store. Accepted input is a custom emoji in
/// one of the documented shapes, or a single non-ASCII token without
/// whitespace (a unicode emoji candidate).
pub fn validate_emoji_input(raw: &str) -> Result<String, EmojiParseError> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(EmojiParseError::Empty);
    }

    if CUSTOM_EMOJI_INPUT.is_match(value) {
        return Ok(value.to_owned());
    }

    if !value.is_ascii() && !value.chars().any(char::is_whitespace) {
        return Ok(value.to_owned());
    }

    if let Ok(ReactionEmoji::Custom { name, .. }) = ReactionEmoji::parse_spec(value)
        && !name.is_empty()
    {
        return Ok(value.to_owned());
    }

    Err(EmojiParseError::Unrecognized(value.to_owned()))
}
