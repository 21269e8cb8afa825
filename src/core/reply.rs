//! # Reply Renderer
//!
//! Turns the model's raw reply into presentational blocks, one per line:
//!
//! ```text
//! "# Title"      →  Heading("Title")
//! "> 🚀  🌟"     →  EmojiRow("🚀  🌟")
//! "Body"         →  Paragraph("Body")
//! ""             →  Paragraph("")
//! ```
//!
//! Only the leading marker character is stripped. The reply text itself is
//! not escaped: the generation endpoint's output is treated as trusted markup.

use serde::{Deserialize, Serialize};

const HEADING_OPEN: &str = r#"<p style="font-size: 26px;"><b>"#;
const HEADING_CLOSE: &str = "</b></p>";
const EMOJI_ROW_OPEN: &str = r#"<p style="background-color: #f7f7f7; padding: 8px; border-radius: 6px; font-size: 22px; text-align: left; margin: 5px 0; display: flex; line-break: anywhere; white-space: pre;">"#;
const PARAGRAPH_OPEN: &str = "<p>";
const PARAGRAPH_CLOSE: &str = "</p>";

/// One rendered line of a reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum RenderedBlock {
    Heading(String),
    EmojiRow(String),
    Paragraph(String),
}

impl RenderedBlock {
    /// Classifies a single line by its first character.
    pub fn from_line(line: &str) -> Self {
        if let Some(rest) = line.strip_prefix('#') {
            RenderedBlock::Heading(rest.trim().to_string())
        } else if let Some(rest) = line.strip_prefix('>') {
            RenderedBlock::EmojiRow(rest.trim().to_string())
        } else {
            RenderedBlock::Paragraph(line.trim().to_string())
        }
    }

    pub fn text(&self) -> &str {
        match self {
            RenderedBlock::Heading(t) | RenderedBlock::EmojiRow(t) | RenderedBlock::Paragraph(t) => t,
        }
    }

    pub fn to_html(&self) -> String {
        match self {
            RenderedBlock::Heading(t) => format!("{HEADING_OPEN}{t}{HEADING_CLOSE}"),
            RenderedBlock::EmojiRow(t) => format!("{EMOJI_ROW_OPEN}{t}{PARAGRAPH_CLOSE}"),
            RenderedBlock::Paragraph(t) => format!("{PARAGRAPH_OPEN}{t}{PARAGRAPH_CLOSE}"),
        }
    }

    /// Plain-text form with the marker restored (used by `eeon ask`).
    pub fn to_plain(&self) -> String {
        match self {
            RenderedBlock::Heading(t) => format!("# {t}"),
            RenderedBlock::EmojiRow(t) => format!("> {t}"),
            RenderedBlock::Paragraph(t) => t.clone(),
        }
    }
}

/// Splits a raw reply on `\n` into blocks, in order. Never returns an empty list.
pub fn parse(raw: &str) -> Vec<RenderedBlock> {
    raw.split('\n').map(RenderedBlock::from_line).collect()
}

/// Joins rendered blocks into one HTML fragment with no separators.
pub fn to_html(blocks: &[RenderedBlock]) -> String {
    blocks.iter().map(RenderedBlock::to_html).collect()
}

/// Raw reply → HTML fragment.
pub fn render(raw: &str) -> String {
    to_html(&parse(raw))
}
