pub mod diagnostics;
pub mod emoji;
pub mod error;
pub mod message;
pub mod settings;
pub mod types;

pub use diagnostics::GroupDiagnostics;
pub use emoji::{EmojiKey, ReactionEmoji, validate_emoji_input};
pub use error::EmojiParseError;
pub use message::{InboundMessage, MessageRef};
pub use settings::{
    DEFAULT_ITEM_DELAY_MS, DEFAULT_MAX_RETRY, GroupSettings, MAX_ITEM_DELAY_MS, MIN_ITEM_DELAY_MS,
    SettingsUpdate,
};
pub use types::{ChannelId, EmojiId, GroupId, MessageId};
