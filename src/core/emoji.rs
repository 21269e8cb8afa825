//! # Emoji Limit
//!
//! The maximum number of emoji the instruction asks the model for.
//! It only changes the instruction text; the model's output is never counted.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Maximum number of emoji a user may ask for.
pub const MAX_EMOJI_LIMIT: u8 = 10;
/// Smallest accepted limit.
pub const MIN_EMOJI_LIMIT: u8 = 1;
/// Limit used until the user picks one.
pub const DEFAULT_EMOJI_LIMIT: u8 = 4;

/// An emoji count in `1..=10`.
///
/// Construction always clamps, so a held value never leaves the range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "u8")]
pub struct EmojiLimit(u8);

impl EmojiLimit {
    /// Clamps any integer into the accepted range.
    pub fn clamped(value: i64) -> Self {
        let clamped = value.clamp(i64::from(MIN_EMOJI_LIMIT), i64::from(MAX_EMOJI_LIMIT));
        Self(clamped as u8)
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for EmojiLimit {
    fn default() -> Self {
        Self(DEFAULT_EMOJI_LIMIT)
    }
}

impl From<i64> for EmojiLimit {
    fn from(value: i64) -> Self {
        Self::clamped(value)
    }
}

impl From<EmojiLimit> for u8 {
    fn from(limit: EmojiLimit) -> Self {
        limit.0
    }
}

impl fmt::Display for EmojiLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Raised when the typed limit is not a whole number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseEmojiLimitError {
    pub input: String,
}

impl fmt::Display for ParseEmojiLimitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "not a whole number: {:?}", self.input)
    }
}

impl std::error::Error for ParseEmojiLimitError {}

impl FromStr for EmojiLimit {
    type Err = ParseEmojiLimitError;

    /// Parses user input such as `"15"` (clamped to 10) or `" 4 "`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(value) = trimmed.parse::<i64>() {
            return Ok(Self::clamped(value));
        }
        // Anything with only digits but too large for i64 is still "a lot".
        if !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_digit()) {
            return Ok(Self(MAX_EMOJI_LIMIT));
        }
        Err(ParseEmojiLimitError {
            input: s.to_string(),
        })
    }
}
