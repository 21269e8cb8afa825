//! # Conversation State
//!
//! Core business state for eeon. Domain data only, no TUI-specific types.
//! Presentation state lives in the `tui` module.
//!
//! ```text
//! ConversationState
//! ├── messages: Vec<Message>   // ordered, append-only
//! ├── loading: bool            // waiting for a reply
//! ├── input: String            // mirror of the editor buffer
//! └── emoji_limit: EmojiLimit  // 1..=10, passed to the composer per request
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.

use chrono::Utc;
use serde::Serialize;

use crate::core::emoji::EmojiLimit;
use crate::core::reply::{self, RenderedBlock};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Bot,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    /// Millisecond timestamp, strictly increasing within a conversation.
    pub id: i64,
    pub role: Role,
    /// Raw text for user messages, rendered HTML for bot messages.
    pub content: String,
    /// Parsed reply blocks; empty for user messages.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub blocks: Vec<RenderedBlock>,
}

impl Message {
    pub fn user(id: i64, text: impl Into<String>) -> Self {
        Self {
            id,
            role: Role::User,
            content: text.into(),
            blocks: Vec::new(),
        }
    }

    /// Renders the raw reply into HTML content and keeps the parsed blocks.
    pub fn bot(id: i64, raw: &str) -> Self {
        let blocks = reply::parse(raw);
        Self {
            id,
            role: Role::Bot,
            content: reply::to_html(&blocks),
            blocks,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ConversationState {
    pub messages: Vec<Message>,
    pub loading: bool,
    pub input: String,
    pub emoji_limit: EmojiLimit,
    /// Number of the latest accepted submit. Only its reply clears `loading`.
    pub request_seq: u64,
}

impl ConversationState {
    pub fn new(emoji_limit: EmojiLimit) -> Self {
        Self {
            emoji_limit,
            ..Default::default()
        }
    }

    /// Next message id: the current time in ms, bumped past the last id if the
    /// clock has not moved (or moved backwards).
    pub fn next_message_id(&self) -> i64 {
        let now = Utc::now().timestamp_millis();
        match self.messages.last() {
            Some(last) => now.max(last.id + 1),
            None => now,
        }
    }

    pub fn has_messages(&self) -> bool {
        !self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_defaults() {
        let state = ConversationState::new(EmojiLimit::clamped(7));
        assert!(state.messages.is_empty());
        assert!(!state.loading);
        assert_eq!(state.input, "");
        assert_eq!(state.emoji_limit.get(), 7);
    }

    #[test]
    fn test_message_ids_strictly_increase() {
        let mut state = ConversationState::default();
        for i in 0..50 {
            let id = state.next_message_id();
            state.messages.push(Message::user(id, format!("m{i}")));
        }
        assert!(state.messages.windows(2).all(|w| w[0].id < w[1].id));
    }

    #[test]
    fn test_id_bumps_past_future_timestamp() {
        let mut state = ConversationState::default();
        let far = Utc::now().timestamp_millis() + 60_000;
        state.messages.push(Message::user(far, "x"));
        assert_eq!(state.next_message_id(), far + 1);
    }

    #[test]
    fn test_bot_message_renders_html_and_blocks() {
        let msg = Message::bot(1, "# Title\nBody");
        assert_eq!(msg.role, Role::Bot);
        assert_eq!(msg.blocks.len(), 2);
        assert_eq!(msg.content, reply::render("# Title\nBody"));
    }
}
