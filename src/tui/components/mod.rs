//! # TUI Components
//!
//! Components follow two patterns:
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! Receive everything they draw as struct fields:
//! - `TitleBar`: model, emoji limit and status line
//! - `ChatBubble`: one user or bot message
//! - `LandingPage`: greeting shown before the first message
//!
//! ### Stateful Components (Event-Driven)
//!
//! Own local state and report events back to the loop:
//! - `InputBox`: multi-line prompt editor
//! - `MessageList`: scrollable conversation with layout caching
//! - `EmojiDialog`: popup for editing the emoji limit
//!
//! Each file keeps its state, event type, rendering and tests together.
//!
//! ```text
//! components/
//! ├── mod.rs
//! ├── title_bar.rs
//! ├── landing.rs
//! ├── message.rs       (ChatBubble)
//! ├── message_list.rs
//! ├── input_box.rs
//! └── emoji_dialog.rs
//! ```

mod title_bar;
pub use title_bar::TitleBar;

pub mod emoji_dialog;
pub mod input_box;
pub mod landing;
pub mod message;
pub mod message_list;

pub use emoji_dialog::{DialogEvent, EmojiDialog};
pub use input_box::{InputBox, InputEvent};
pub use landing::LandingPage;
pub use message_list::{MessageList, MessageListState};
