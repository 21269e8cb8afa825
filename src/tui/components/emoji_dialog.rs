//! # Emoji Dialog
//!
//! Small popup (Ctrl+E) for typing a new emoji limit. The dialog only collects
//! text; parsing and clamping happen in the controller, which hands back an
//! error message for the dialog to show when the input is rejected.

use ratatui::Frame;
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Clear, Padding, Paragraph};

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

pub const TITLE: &str = " Edit emojis number ";
pub const LABEL: &str = "Emojis number";
pub const PLACEHOLDER: &str = "Maximum 10 emojis (default: 4)";

const WIDTH: u16 = 44;
const HEIGHT: u16 = 7;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogEvent {
    /// Enter pressed; carries the raw text.
    Apply(String),
    Cancel,
}

#[derive(Debug, Default)]
pub struct EmojiDialog {
    buffer: String,
    error: Option<String>,
}

impl EmojiDialog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.buffer
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }
}

impl EventHandler for EmojiDialog {
    type Event = DialogEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<DialogEvent> {
        match event {
            TuiEvent::Submit => Some(DialogEvent::Apply(self.buffer.clone())),
            TuiEvent::Escape => Some(DialogEvent::Cancel),
            TuiEvent::InputChar(c) if !c.is_control() => {
                self.buffer.push(*c);
                self.error = None;
                None
            }
            TuiEvent::Paste(data) => {
                self.buffer.extend(data.chars().filter(|c| !c.is_control()));
                self.error = None;
                None
            }
            TuiEvent::Backspace => {
                self.buffer.pop();
                self.error = None;
                None
            }
            _ => None,
        }
    }
}

/// Centered rect of at most `width` x `height` inside `area`.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height.min(area.height))])
        .flex(Flex::Center)
        .areas(area);
    let [cell] = Layout::horizontal([Constraint::Length(width.min(area.width))])
        .flex(Flex::Center)
        .areas(row);
    cell
}

impl Component for EmojiDialog {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let popup = centered(area, WIDTH, HEIGHT);

        let block = Block::bordered()
            .title(TITLE)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Yellow))
            .padding(Padding::horizontal(1));

        let value = if self.buffer.is_empty() {
            Span::styled(PLACEHOLDER, Style::default().fg(Color::DarkGray))
        } else {
            Span::raw(self.buffer.as_str())
        };

        let mut lines = vec![
            Line::from(Span::styled(LABEL, Style::default().add_modifier(Modifier::BOLD))),
            Line::from(vec![Span::raw("> "), value]),
        ];
        match &self.error {
            Some(message) => lines.push(Line::from(Span::styled(
                message.as_str(),
                Style::default().fg(Color::Red),
            ))),
            None => lines.push(Line::default()),
        }
        lines.push(Line::from(Span::styled(
            "Enter to apply, Esc to cancel",
            Style::default().fg(Color::DarkGray),
        )));

        frame.render_widget(Clear, popup);
        frame.render_widget(Paragraph::new(lines).block(block), popup);
    }
}
