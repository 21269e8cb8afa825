//! # Prompt Composer
//!
//! Glues the instruction template to the user's text, makes exactly one
//! provider call, and always resolves to a displayable string:
//!
//! ```text
//! Ok(Some(text))  →  text
//! Ok(None)        →  "No response."
//! Err(e)          →  "Error occurred. <e>"
//! ```

use std::sync::Arc;

use log::{info, warn};

use crate::core::emoji::EmojiLimit;
use crate::core::prompt::InstructionTemplate;
use crate::inference::{GenerationProvider, GenerationRequest};

pub const NO_RESPONSE: &str = "No response.";
pub const ERROR_PREFIX: &str = "Error occurred.";

pub struct PromptComposer {
    provider: Arc<dyn GenerationProvider>,
    template: InstructionTemplate,
}

impl PromptComposer {
    pub fn new(provider: Arc<dyn GenerationProvider>, template: InstructionTemplate) -> Self {
        Self { provider, template }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn template(&self) -> &InstructionTemplate {
        &self.template
    }

    /// Sends `instruction(limit) + user_text` and returns the reply text.
    ///
    /// Never fails: provider errors come back as a string starting with
    /// [`ERROR_PREFIX`].
    pub async fn compose(&self, user_text: &str, emoji_limit: EmojiLimit) -> String {
        let prompt = self.template.build(user_text, emoji_limit);
        info!(
            "Composing via {} (emoji_limit={}, user_len={})",
            self.provider.name(),
            emoji_limit,
            user_text.len()
        );

        match self.provider.generate(GenerationRequest { prompt: &prompt }).await {
            Ok(Some(text)) => text,
            Ok(None) => NO_RESPONSE.to_string(),
            Err(e) => {
                warn!("Generation failed: {}", e);
                format!("{ERROR_PREFIX} {e}")
            }
        }
    }
}
