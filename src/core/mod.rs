//! # Core Application Logic
//!
//! This module contains eeon's business logic.
//! It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • State (messages)     │
//!                    │  • Action (events)      │
//!                    │  • update() (reducer)   │
//!                    │  • render() (replies)   │
//!                    └───────────┬─────────────┘
//!                                │
//!            ┌───────────────────┼───────────────────┐
//!            ▼                   ▼                   ▼
//!     ┌────────────┐      ┌────────────┐      ┌────────────┐
//!     │    TUI     │      │  One-shot  │      │    HTTP    │
//!     │  Adapter   │      │   `ask`    │      │  `serve`   │
//!     │ (ratatui)  │      │            │      │  (axum)    │
//!     └────────────┘      └────────────┘      └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: `ConversationState` and `Message`
//! - [`action`]: the `Action` enum and the `update()` reducer
//! - [`controller`]: owns the state, spawns composer calls, notifies subscribers
//! - [`reply`]: raw reply text → `RenderedBlock`s → HTML
//! - [`prompt`]: the instruction template
//! - [`emoji`]: the clamped emoji limit
//! - [`config`]: config file, env vars, CLI overrides

pub mod action;
pub mod config;
pub mod controller;
pub mod emoji;
pub mod prompt;
pub mod reply;
pub mod state;

pub use controller::ConversationController;
pub use state::{ConversationState, Message, Role};
