//! # Landing Page Component
//!
//! Shown while the conversation is empty: a greeting, a short description and
//! the kinds of text worth pasting in.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::component::Component;

pub const GREETING: &str = "Talk data to me";
pub const DESCRIPTION: &str =
    "Write your own \"detailed\" prompt or select from the template and start chatting with eeon";
pub const TOPICS: [&str; 5] = [
    "Dev.to comments",
    "Ask",
    "Reaction for Reddit",
    "GitHub discussion",
    "Long stories",
];

/// Widest the description is allowed to get, even on very wide terminals.
const MAX_TEXT_WIDTH: usize = 60;

fn wrap_options(width: usize) -> textwrap::Options<'static> {
    textwrap::Options::new(width.max(1))
        .break_words(true)
        .word_separator(textwrap::WordSeparator::AsciiSpace)
}

/// Lay the topic tags out in rows no wider than `width`.
fn tag_rows(width: usize) -> Vec<Line<'static>> {
    let tag_style = Style::default().fg(Color::Black).bg(Color::Cyan);
    let mut rows = Vec::new();
    let mut current: Vec<Span<'static>> = Vec::new();
    let mut used = 0;

    for topic in TOPICS {
        let tag_width = topic.chars().count() + 2;
        let gap = if current.is_empty() { 0 } else { 1 };
        if !current.is_empty() && used + gap + tag_width > width {
            rows.push(Line::from(std::mem::take(&mut current)));
            used = 0;
        }
        if !current.is_empty() {
            current.push(Span::raw(" "));
            used += 1;
        }
        current.push(Span::styled(format!(" {topic} "), tag_style));
        used += tag_width;
    }
    if !current.is_empty() {
        rows.push(Line::from(current));
    }
    rows
}

#[derive(Default)]
pub struct LandingPage;

impl LandingPage {
    pub fn new() -> Self {
        Self
    }

    fn lines(width: u16) -> Vec<Line<'static>> {
        let text_width = (width as usize).min(MAX_TEXT_WIDTH);

        let mut lines = vec![
            Line::from(Span::styled(
                GREETING,
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            )),
            Line::default(),
        ];
        lines.extend(
            textwrap::wrap(DESCRIPTION, wrap_options(text_width))
                .into_iter()
                .map(|l| Line::from(Span::styled(l.into_owned(), Style::default().fg(Color::Gray)))),
        );
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            "Ask about:",
            Style::default().fg(Color::DarkGray),
        )));
        lines.extend(tag_rows(text_width));
        lines
    }
}

impl Component for LandingPage {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let lines = Self::lines(area.width);
        let [text_area] = Layout::vertical([Constraint::Length(lines.len() as u16)])
            .flex(Flex::Center)
            .areas(area);

        frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), text_area);
    }
}
