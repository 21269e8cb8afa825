//! # TitleBar Component
//!
//! Top status bar: model name, the active emoji limit, a transient status and
//! a "↓ New" marker when content sits below the viewport.
//!
//! TitleBar is purely presentational. Every field is a prop handed in by the
//! UI layer each frame:
//!
//! ```rust,ignore
//! let mut title_bar = TitleBar::new(model, state.emoji_limit, status, unseen);
//! title_bar.render(frame, area);
//! ```

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::Span;

use crate::core::emoji::EmojiLimit;
use crate::tui::component::Component;

pub struct TitleBar {
    pub model_name: String,
    pub emoji_limit: EmojiLimit,
    /// Transient status such as "Thinking..." (empty for none)
    pub status_message: String,
    pub has_unseen_content: bool,
}

impl TitleBar {
    pub fn new(
        model_name: impl Into<String>,
        emoji_limit: EmojiLimit,
        status_message: impl Into<String>,
        has_unseen_content: bool,
    ) -> Self {
        Self {
            model_name: model_name.into(),
            emoji_limit,
            status_message: status_message.into(),
            has_unseen_content,
        }
    }

    pub fn text(&self) -> String {
        let mut title = format!(
            "eeon (model: {}) | emojis: {}",
            self.model_name,
            self.emoji_limit.get()
        );
        if !self.status_message.is_empty() {
            title.push_str(" | ");
            title.push_str(&self.status_message);
        }
        if self.has_unseen_content {
            title.push_str(" | ↓ New");
        }
        title
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(Span::raw(self.text()), area);
    }
}
