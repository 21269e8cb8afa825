//! # Actions
//!
//! Everything that can happen to a conversation becomes an `Action`.
//! User presses Enter? That's `Action::Submit(text)`.
//! The composer finishes? That's `Action::ReplyReady { request, raw }`.
//!
//! The `update()` function applies an action to the state and returns an
//! `Effect` describing the I/O the caller should perform. No side effects here.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```

use log::debug;

use crate::core::emoji::EmojiLimit;
use crate::core::state::{ConversationState, Message};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// The editor buffer changed.
    InputChanged(String),
    /// The user asked to send `text`.
    Submit(String),
    /// Stop waiting for the pending reply. The request itself keeps running.
    Stop,
    /// The composer call started for submit number `request` finished.
    ReplyReady { request: u64, raw: String },
    SetEmojiLimit(EmojiLimit),
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    /// Start a composer call for `text`; its reply must carry `request` back.
    Compose {
        text: String,
        emoji_limit: EmojiLimit,
        request: u64,
    },
    Quit,
}

pub fn update(state: &mut ConversationState, action: Action) -> Effect {
    match action {
        Action::InputChanged(text) => {
            state.input = text;
            Effect::None
        }
        Action::Submit(text) => {
            if text.trim().is_empty() || state.loading {
                debug!(
                    "Submit ignored (empty={}, loading={})",
                    text.trim().is_empty(),
                    state.loading
                );
                return Effect::None;
            }
            let id = state.next_message_id();
            state.messages.push(Message::user(id, text.clone()));
            state.input.clear();
            state.loading = true;
            state.request_seq += 1;
            Effect::Compose {
                text,
                emoji_limit: state.emoji_limit,
                request: state.request_seq,
            }
        }
        Action::Stop => {
            if state.loading {
                state.loading = false;
            }
            Effect::None
        }
        Action::ReplyReady { request, raw } => {
            let id = state.next_message_id();
            state.messages.push(Message::bot(id, &raw));
            // Only the latest submit ends the wait; replies to stopped ones just land.
            if request == state.request_seq {
                state.loading = false;
            } else {
                debug!("Stale reply for request {} (latest {})", request, state.request_seq);
            }
            Effect::None
        }
        Action::SetEmojiLimit(limit) => {
            state.emoji_limit = limit;
            Effect::None
        }
        Action::Quit => Effect::Quit,
    }
}
