use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

macro_rules! newtype_snowflake {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            /// Create a new identifier from its numeric value.
            #[must_use]
            pub const fn new(value: u64) -> Self {
                Self(value)
            }

            /// Return the raw numeric value.
            #[must_use]
            pub const fn get(self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }

        impl FromStr for $name {
            type Err = ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse().map(Self)
            }
        }
    };
}

newtype_snowflake!(GroupId, "Identifies a group (guild): the isolation unit for queues and settings.");
newtype_snowflake!(ChannelId, "Identifies a text channel inside a group.");
newtype_snowflake!(MessageId, "Identifies a single chat message.");
newtype_snowflake!(EmojiId, "Identifies a custom (group-uploaded) emoji.");

impl ChannelId {
    /// Parse a channel reference as typed by a user: either a bare id
    /// (`123`) or a channel mention (`<#123>`).
    pub fn parse_reference(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        let inner = trimmed
            .strip_prefix("<#")
            .and_then(|rest| rest.strip_suffix('>'))
            .unwrap_or(trimmed);
        inner.parse().ok()
    }

    /// Render the channel as a mention (`<#id>`).
    #[must_use]
    pub fn mention(self) -> String {
        format!("<#{}>", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snowflake_from_str() {
        let id: GroupId = " 42 ".parse().unwrap();
        assert_eq!(id.get(), 42);
        assert!("abc".parse::<GroupId>().is_err());
    }

    #[test]
    fn snowflake_serde_is_transparent() {
        let id = MessageId::new(9_001);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "9001");
        let back: MessageId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn channel_reference_accepts_mention_and_bare_id() {
        assert_eq!(
            ChannelId::parse_reference("<#123456>"),
            Some(ChannelId::new(123_456))
        );
        assert_eq!(
            ChannelId::parse_reference("  789 "),
            Some(ChannelId::new(789))
        );
        assert_eq!(ChannelId::parse_reference("#general"), None);
        assert_eq!(ChannelId::parse_reference("<#abc>"), None);
    }

    #[test]
    fn channel_mention() {
        assert_eq!(ChannelId::new(5).mention(), "<#5>");
    }
}
