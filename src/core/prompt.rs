//! # Instruction Template
//!
//! The preamble sent in front of every user prompt. The emoji limit appears
//! twice in the text; both places are filled from the same value.

use crate::core::emoji::EmojiLimit;

/// Placeholder replaced by the emoji limit in every template, built-in or custom.
pub const EMOJI_LIMIT_PLACEHOLDER: &str = "{emoji_limit}";

pub const DEFAULT_INSTRUCTION_TEMPLATE: &str = "\
Analyze the given prompt below according to these points and generate the most relevant emojis for context representation. Follow these strict guidelines:

1. Validation:
Answer every detailed and long question no matter what it asks.
The emojis must be contextually relevant and align with the original prompt's intent only.

2. Response Structure:
A short, meaningful heading starting with # (summarizes the prompt in 2-5 words).
A concise explanation (max 30 words) explaining why the selected emojis are relevant. No emojis in this explanation.
A list of best-suited emojis for the context starting with >, on one line and separated by EXACTLY 2 SPACES. Maximum {emoji_limit} emojis allowed, not more than that.
GIVE A MAXIMUM OF {emoji_limit} EMOJIS, NOT MORE THAN THAT.

3. Example Output:
# HEADING

DESCRIPTION ABOUT THE PROMPT

> 🚀  🌟  🔥

4. Language: Strictly English.

5. Important:
If no suitable emojis exist, do not force irrelevant ones or ones of a different color theme.
Ensure clear line breaks and correct formatting.

6. Very important validation:
Ask the user to type the prompt again if the question is very invalid.

Prompt:
";

/// Instruction template with the emoji limit still unresolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstructionTemplate {
    text: String,
}

impl Default for InstructionTemplate {
    fn default() -> Self {
        Self::new(DEFAULT_INSTRUCTION_TEMPLATE)
    }
}

impl InstructionTemplate {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Raw template text, placeholders included.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Fills every placeholder with `limit`.
    pub fn instruction(&self, limit: EmojiLimit) -> String {
        self.text.replace(EMOJI_LIMIT_PLACEHOLDER, &limit.to_string())
    }

    /// The full text sent to the model: instruction followed by the user's prompt.
    pub fn build(&self, user_text: &str, limit: EmojiLimit) -> String {
        let mut prompt = self.instruction(limit);
        prompt.push_str(user_text);
        prompt
    }
}
