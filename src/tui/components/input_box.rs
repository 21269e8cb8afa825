//! # InputBox Component
//!
//! Multi-line prompt editor.
//!
//! ## Responsibilities
//!
//! - Capture text input and paste
//! - Handle editing (backspace, delete, cursor movement)
//! - Emit `Submit` on Enter when the text is not blank
//! - Grow with its content up to `MAX_VISIBLE_LINES`, then scroll internally
//!
//! The buffer is internal state. Whether a submit was accepted is decided by
//! the controller, so the parent calls [`InputBox::clear`] afterwards instead
//! of the box clearing itself.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Paragraph};
use unicode_width::UnicodeWidthChar;

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

/// Left + right border
const HORIZONTAL_OVERHEAD: u16 = 2;
/// Top + bottom border
const VERTICAL_OVERHEAD: u16 = 2;
/// Content rows shown before the box starts scrolling
pub const MAX_VISIBLE_LINES: u16 = 5;

pub const PLACEHOLDER: &str = "Type or paste your prompt here ...";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// Enter pressed on non-blank text
    Submit(String),
    /// Buffer or cursor changed
    Changed,
}

/// Text laid out into screen rows at a fixed width.
struct WrappedText {
    rows: Vec<String>,
    cursor_row: u16,
    cursor_col: u16,
}

/// Hard-wraps `text` at `width` display columns, honouring `\n`, and
/// locates the cursor (a byte offset) in the result.
fn wrap_text(text: &str, cursor: usize, width: u16) -> WrappedText {
    let width = width.max(1);
    let mut rows = vec![String::new()];
    let mut col: u16 = 0;
    let mut cursor_at = None;

    for (i, ch) in text.char_indices() {
        let w = ch.width().unwrap_or(0) as u16;
        if ch != '\n' && col > 0 && col + w > width {
            rows.push(String::new());
            col = 0;
        }
        if i == cursor {
            cursor_at = Some((rows.len() as u16 - 1, col));
        }
        if ch == '\n' {
            rows.push(String::new());
            col = 0;
        } else if let Some(row) = rows.last_mut() {
            row.push(ch);
            col += w;
        }
    }

    let (cursor_row, cursor_col) = cursor_at.unwrap_or_else(|| {
        // Cursor at the end of a full row sits at the start of the next one
        if col >= width {
            rows.push(String::new());
            (rows.len() as u16 - 1, 0)
        } else {
            (rows.len() as u16 - 1, col)
        }
    });

    WrappedText {
        rows,
        cursor_row,
        cursor_col,
    }
}

fn prev_char_boundary(text: &str, pos: usize) -> usize {
    text[..pos].char_indices().next_back().map_or(0, |(i, _)| i)
}

fn next_char_boundary(text: &str, pos: usize) -> usize {
    text[pos..]
        .chars()
        .next()
        .map_or(text.len(), |c| pos + c.len_utf8())
}

pub struct InputBox {
    buffer: String,
    /// Byte offset into `buffer`
    cursor: usize,
    /// First visible row when the content is taller than the box
    scroll: u16,
    /// Prop: a reply is pending (changes the hint in the title)
    pub loading: bool,
}

impl Default for InputBox {
    fn default() -> Self {
        Self::new()
    }
}

impl InputBox {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            cursor: 0,
            scroll: 0,
            loading: false,
        }
    }

    pub fn text(&self) -> &str {
        &self.buffer
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.cursor = 0;
        self.scroll = 0;
    }

    /// Height for the given outer width, borders included.
    pub fn calculate_height(&self, width: u16) -> u16 {
        let inner = width.saturating_sub(HORIZONTAL_OVERHEAD);
        let wrapped = wrap_text(&self.buffer, self.cursor, inner);
        (wrapped.rows.len() as u16).clamp(1, MAX_VISIBLE_LINES) + VERTICAL_OVERHEAD
    }

    fn insert_str(&mut self, text: &str) {
        self.buffer.insert_str(self.cursor, text);
        self.cursor += text.len();
    }

    fn current_line_bounds(&self) -> (usize, usize) {
        let start = self.buffer[..self.cursor].rfind('\n').map_or(0, |i| i + 1);
        let end = self.buffer[self.cursor..]
            .find('\n')
            .map_or(self.buffer.len(), |i| self.cursor + i);
        (start, end)
    }
}

impl Component for InputBox {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let inner_width = area.width.saturating_sub(HORIZONTAL_OVERHEAD);
        let visible = area.height.saturating_sub(VERTICAL_OVERHEAD).max(1);
        let wrapped = wrap_text(&self.buffer, self.cursor, inner_width);

        // Keep the cursor row on screen
        if wrapped.cursor_row < self.scroll {
            self.scroll = wrapped.cursor_row;
        } else if wrapped.cursor_row >= self.scroll + visible {
            self.scroll = wrapped.cursor_row + 1 - visible;
        }

        let title = if self.loading {
            " Prompt (Esc to stop) "
        } else {
            " Prompt (Enter to send, Ctrl+E emojis) "
        };
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .title(title)
            .border_style(Style::default().fg(Color::DarkGray));

        let paragraph = if self.buffer.is_empty() {
            Paragraph::new(Span::styled(
                PLACEHOLDER,
                Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
            ))
        } else {
            let lines: Vec<Line> = wrapped
                .rows
                .iter()
                .skip(self.scroll as usize)
                .take(visible as usize)
                .map(|row| Line::from(row.as_str()))
                .collect();
            Paragraph::new(lines)
        };

        frame.render_widget(paragraph.block(block), area);

        let x = area.x + 1 + wrapped.cursor_col.min(inner_width.saturating_sub(1));
        let y = area.y + 1 + wrapped.cursor_row.saturating_sub(self.scroll);
        frame.set_cursor_position((x, y));
    }
}

impl EventHandler for InputBox {
    type Event = InputEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::InputChar(c) => {
                let mut tmp = [0u8; 4];
                self.insert_str(c.encode_utf8(&mut tmp));
                Some(InputEvent::Changed)
            }
            TuiEvent::Paste(text) => {
                // Terminals send CR for newlines in pasted text
                let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
                self.insert_str(&normalized);
                Some(InputEvent::Changed)
            }
            TuiEvent::Backspace if self.cursor > 0 => {
                let prev = prev_char_boundary(&self.buffer, self.cursor);
                self.buffer.drain(prev..self.cursor);
                self.cursor = prev;
                Some(InputEvent::Changed)
            }
            TuiEvent::Delete if self.cursor < self.buffer.len() => {
                let next = next_char_boundary(&self.buffer, self.cursor);
                self.buffer.drain(self.cursor..next);
                Some(InputEvent::Changed)
            }
            TuiEvent::CursorLeft if self.cursor > 0 => {
                self.cursor = prev_char_boundary(&self.buffer, self.cursor);
                Some(InputEvent::Changed)
            }
            TuiEvent::CursorRight if self.cursor < self.buffer.len() => {
                self.cursor = next_char_boundary(&self.buffer, self.cursor);
                Some(InputEvent::Changed)
            }
            TuiEvent::CursorHome => {
                let (start, _) = self.current_line_bounds();
                (self.cursor != start).then(|| {
                    self.cursor = start;
                    InputEvent::Changed
                })
            }
            TuiEvent::CursorEnd => {
                let (_, end) = self.current_line_bounds();
                (self.cursor != end).then(|| {
                    self.cursor = end;
                    InputEvent::Changed
                })
            }
            TuiEvent::Submit => {
                (!self.buffer.trim().is_empty()).then(|| InputEvent::Submit(self.buffer.clone()))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn typed(text: &str) -> InputBox {
        let mut input = InputBox::new();
        input.handle_event(&TuiEvent::Paste(text.to_string()));
        input
    }

    fn rendered_text(input: &mut InputBox, width: u16, height: u16) -> String {
        let backend = TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| input.render(f, f.area())).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_typing_and_backspace() {
        let mut input = InputBox::new();
        assert_eq!(input.handle_event(&TuiEvent::InputChar('a')), Some(InputEvent::Changed));
        input.handle_event(&TuiEvent::InputChar('é'));
        assert_eq!(input.text(), "aé");
        input.handle_event(&TuiEvent::Backspace);
        assert_eq!(input.text(), "a");
        input.handle_event(&TuiEvent::Backspace);
        assert_eq!(input.handle_event(&TuiEvent::Backspace), None);
    }

    #[test]
    fn test_cursor_movement_inserts_mid_text() {
        let mut input = typed("ac");
        input.handle_event(&TuiEvent::CursorLeft);
        input.handle_event(&TuiEvent::InputChar('b'));
        assert_eq!(input.text(), "abc");
        input.handle_event(&TuiEvent::CursorHome);
        input.handle_event(&TuiEvent::Delete);
        assert_eq!(input.text(), "bc");
    }

    #[test]
    fn test_home_end_stay_on_current_line() {
        let mut input = typed("first\nsecond");
        input.handle_event(&TuiEvent::CursorHome);
        input.handle_event(&TuiEvent::InputChar('>'));
        assert_eq!(input.text(), "first\n>second");
        input.handle_event(&TuiEvent::CursorEnd);
        input.handle_event(&TuiEvent::InputChar('!'));
        assert_eq!(input.text(), "first\n>second!");
    }

    #[test]
    fn test_submit_does_not_clear_buffer() {
        let mut input = typed("hello");
        assert_eq!(
            input.handle_event(&TuiEvent::Submit),
            Some(InputEvent::Submit("hello".to_string()))
        );
        assert_eq!(input.text(), "hello");
        input.clear();
        assert_eq!(input.text(), "");
    }

    #[test]
    fn test_blank_submit_emits_nothing() {
        let mut input = typed("  \n ");
        assert_eq!(input.handle_event(&TuiEvent::Submit), None);
    }

    #[test]
    fn test_paste_normalizes_carriage_returns() {
        let input = typed("a\r\nb\rc");
        assert_eq!(input.text(), "a\nb\nc");
    }

    #[test]
    fn test_wrap_text_breaks_long_rows() {
        let wrapped = wrap_text("abcdefgh", 8, 3);
        assert_eq!(wrapped.rows, vec!["abc", "def", "gh"]);
        assert_eq!((wrapped.cursor_row, wrapped.cursor_col), (2, 2));
    }

    #[test]
    fn test_wrap_text_cursor_after_full_row_moves_down() {
        let wrapped = wrap_text("abc", 3, 3);
        assert_eq!(wrapped.rows.len(), 2);
        assert_eq!((wrapped.cursor_row, wrapped.cursor_col), (1, 0));
    }

    #[test]
    fn test_wrap_text_counts_wide_chars() {
        let wrapped = wrap_text("🚀🚀🚀", 0, 4);
        assert_eq!(wrapped.rows, vec!["🚀🚀", "🚀"]);
    }

    #[test]
    fn test_height_grows_then_caps() {
        assert_eq!(InputBox::new().calculate_height(20), 3);
        assert_eq!(typed("a\nb\nc").calculate_height(20), 5);
        assert_eq!(typed("1\n2\n3\n4\n5\n6\n7\n8").calculate_height(20), MAX_VISIBLE_LINES + 2);
    }

    #[test]
    fn test_render_shows_placeholder_when_empty() {
        let text = rendered_text(&mut InputBox::new(), 60, 3);
        assert!(text.contains("Type or paste your prompt here"));
    }

    #[test]
    fn test_render_scrolls_to_cursor() {
        let mut input = typed("1\n2\n3\n4\n5\n6\n7\nlast");
        let text = rendered_text(&mut input, 20, 7);
        assert!(text.contains("last"));
        assert!(!text.contains('1'));
    }

    #[test]
    fn test_loading_title_hint() {
        let mut input = InputBox::new();
        input.loading = true;
        let text = rendered_text(&mut input, 60, 3);
        assert!(text.contains("Esc to stop"));
    }
}
