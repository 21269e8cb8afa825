use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph, Widget, Wrap};

use crate::core::reply::RenderedBlock;
use crate::core::state::{Message, Role};
use crate::tui::component::Component;

/// Horizontal padding (per side) between the border and text content.
const CONTENT_PAD_H: u16 = 1;
/// Total horizontal space consumed by borders (1 left + 1 right) and padding.
const HORIZONTAL_OVERHEAD: u16 = 2 + CONTENT_PAD_H * 2;
/// Total vertical space consumed by borders (1 top + 1 bottom).
const VERTICAL_OVERHEAD: u16 = 2;

/// Caption shown above every bot answer.
pub const BOT_CAPTION: &str = "Finding the best emojis for you...";

fn heading_style() -> Style {
    Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
}

fn emoji_row_style() -> Style {
    Style::default().bg(Color::Rgb(0x3a, 0x3a, 0x3a))
}

/// One line per rendered block, styled the way the HTML renders them.
fn block_line(block: &RenderedBlock) -> Line<'_> {
    match block {
        RenderedBlock::Heading(text) => Line::from(Span::styled(text.as_str(), heading_style())),
        RenderedBlock::EmojiRow(text) => {
            Line::from(Span::styled(format!(" {text} "), emoji_row_style()))
        }
        RenderedBlock::Paragraph(text) => Line::from(text.as_str()),
    }
}

/// A single chat bubble. Created fresh each frame; holds no state.
///
/// User messages show their raw text. Bot messages show a dim caption and
/// then their rendered blocks: the heading bold, the emoji row on a grey
/// background, everything else plain.
#[derive(Clone, Copy)]
pub struct ChatBubble<'a> {
    pub message: &'a Message,
}

impl<'a> ChatBubble<'a> {
    pub fn new(message: &'a Message) -> Self {
        Self { message }
    }

    fn lines(&self) -> Vec<Line<'a>> {
        match self.message.role {
            Role::User => self
                .message
                .content
                .split('\n')
                .map(|l| Line::from(l.to_string()))
                .collect(),
            Role::Bot => {
                let caption = Line::from(Span::styled(
                    BOT_CAPTION,
                    Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
                ));
                std::iter::once(caption)
                    .chain(self.message.blocks.iter().map(block_line))
                    .collect()
            }
        }
    }

    fn paragraph(&self) -> Paragraph<'a> {
        Paragraph::new(self.lines()).wrap(Wrap { trim: false })
    }

    /// Rendered height at the given outer width, borders included.
    ///
    /// Uses the same `Paragraph` that `render` draws, so the measured and
    /// drawn line counts always agree.
    pub fn calculate_height(message: &Message, width: u16) -> u16 {
        let content_width = width.saturating_sub(HORIZONTAL_OVERHEAD);
        if content_width == 0 {
            return 1;
        }
        let lines = ChatBubble::new(message).paragraph().line_count(content_width) as u16;
        lines.max(1) + VERTICAL_OVERHEAD
    }
}

impl<'a> Widget for ChatBubble<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (title, color) = match self.message.role {
            Role::User => ("you", Color::Cyan),
            Role::Bot => ("eeon", Color::Green),
        };
        let border_style = Style::default().fg(color).add_modifier(Modifier::DIM);

        let block = Block::bordered()
            .title(title)
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title_style(Style::default().fg(color))
            .padding(Padding::horizontal(CONTENT_PAD_H));

        let inner_area = block.inner(area);
        block.render(area, buf);
        self.paragraph().render(inner_area, buf);
    }
}

impl<'a> Component for ChatBubble<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(*self, area);
    }
}
