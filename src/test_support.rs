//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::core::controller::ConversationController;
use crate::core::emoji::EmojiLimit;
use crate::core::prompt::InstructionTemplate;
use crate::inference::{GenerationProvider, GenerationRequest, PromptComposer, ProviderError};
use crate::visitors::{ClientInfo, VisitorError, VisitorLog, VisitorStats};

/// Replies with a fixed value (or no candidate at all).
pub struct StubProvider {
    reply: Option<String>,
}

impl StubProvider {
    pub fn replying(text: &str) -> Self {
        Self {
            reply: Some(text.to_string()),
        }
    }

    pub fn empty() -> Self {
        Self { reply: None }
    }
}

#[async_trait]
impl GenerationProvider for StubProvider {
    fn name(&self) -> &str {
        "stub"
    }

    async fn generate(&self, _request: GenerationRequest<'_>) -> Result<Option<String>, ProviderError> {
        Ok(self.reply.clone())
    }
}

/// Always fails with a network error.
pub struct FailingProvider {
    message: String,
}

impl FailingProvider {
    pub fn network(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

#[async_trait]
impl GenerationProvider for FailingProvider {
    fn name(&self) -> &str {
        "failing"
    }

    async fn generate(&self, _request: GenerationRequest<'_>) -> Result<Option<String>, ProviderError> {
        Err(ProviderError::Network(self.message.clone()))
    }
}

/// Records every prompt it receives and echoes it back.
#[derive(Default)]
pub struct RecordingProvider {
    prompts: Mutex<Vec<String>>,
}

impl RecordingProvider {
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerationProvider for RecordingProvider {
    fn name(&self) -> &str {
        "recording"
    }

    async fn generate(&self, request: GenerationRequest<'_>) -> Result<Option<String>, ProviderError> {
        self.prompts.lock().unwrap().push(request.prompt.to_string());
        Ok(Some(request.prompt.to_string()))
    }
}

/// Holds each prompt's reply until that prompt's own gate is opened.
/// Replies echo the prompt as `re: <prompt>`.
#[derive(Default)]
pub struct PromptGatedProvider {
    gates: Mutex<HashMap<String, Arc<Notify>>>,
}

impl PromptGatedProvider {
    /// The gate for the full prompt text (instruction included).
    pub fn gate(&self, prompt: &str) -> Arc<Notify> {
        self.gates
            .lock()
            .unwrap()
            .entry(prompt.to_string())
            .or_default()
            .clone()
    }
}

#[async_trait]
impl GenerationProvider for PromptGatedProvider {
    fn name(&self) -> &str {
        "prompt-gated"
    }

    async fn generate(&self, request: GenerationRequest<'_>) -> Result<Option<String>, ProviderError> {
        self.gate(request.prompt).notified().await;
        Ok(Some(format!("re: {}", request.prompt)))
    }
}

/// Holds every reply until the returned gate's `notify_one()` is called once per pending request.
pub struct GatedProvider {
    gate: Arc<Notify>,
    reply: String,
}

impl GatedProvider {
    pub fn new(reply: &str) -> (Self, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        (
            Self {
                gate: gate.clone(),
                reply: reply.to_string(),
            },
            gate,
        )
    }
}

#[async_trait]
impl GenerationProvider for GatedProvider {
    fn name(&self) -> &str {
        "gated"
    }

    async fn generate(&self, _request: GenerationRequest<'_>) -> Result<Option<String>, ProviderError> {
        self.gate.notified().await;
        Ok(Some(self.reply.clone()))
    }
}

/// Visitor log that only counts calls.
#[derive(Default)]
pub struct CountingVisitorLog {
    pub visits: Mutex<Vec<ClientInfo>>,
    pub clicks: Mutex<usize>,
    pub page_views: Mutex<usize>,
    pub fail: bool,
}

impl CountingVisitorLog {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn clicks(&self) -> usize {
        *self.clicks.lock().unwrap()
    }
}

#[async_trait]
impl VisitorLog for CountingVisitorLog {
    async fn log_visitor(&self, client: &ClientInfo) -> Result<(), VisitorError> {
        if self.fail {
            return Err(VisitorError::Database("database is unreachable".to_string()));
        }
        self.visits.lock().unwrap().push(client.clone());
        Ok(())
    }

    async fn log_click(&self, _client: &ClientInfo) -> Result<(), VisitorError> {
        *self.clicks.lock().unwrap() += 1;
        Ok(())
    }

    async fn increment_page_view(&self) -> Result<(), VisitorError> {
        *self.page_views.lock().unwrap() += 1;
        Ok(())
    }

    async fn visitor_stats(&self) -> VisitorStats {
        VisitorStats {
            total_visits: *self.page_views.lock().unwrap() as i64,
            unique_visitors: self.visits.lock().unwrap().len() as i64,
        }
    }
}

/// Creates a controller backed by the given provider with a one-line template.
pub fn test_controller(provider: Arc<dyn GenerationProvider>) -> ConversationController {
    let composer = PromptComposer::new(provider, InstructionTemplate::new("[{emoji_limit}] "));
    ConversationController::new(Arc::new(composer), EmojiLimit::default())
}
