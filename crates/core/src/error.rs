use thiserror::Error;

/// Errors produced while parsing or validating an emoji spec.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EmojiParseError {
    /// The spec was empty (or only whitespace).
    #[error("emoji spec is empty")]
    Empty,

    /// The custom emoji id is not a valid 64-bit identifier.
    #[error("invalid custom emoji id: {0}")]
    InvalidId(String),

    /// The input is neither a custom emoji nor a unicode emoji candidate.
    #[error("unrecognized emoji: {0}")]
    Unrecognized(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        assert_eq!(EmojiParseError::Empty.to_string(), "emoji spec is empty");
        assert_eq!(
            EmojiParseError::Unrecognized("hello".into()).to_string(),
            "unrecognized emoji: hello"
        );
    }
}
