//! Wiring shared by the front-ends: builds the composer and the visitor log
//! from a [`ResolvedConfig`], and runs one-shot questions for `eeon ask`.

use std::sync::Arc;

use log::{info, warn};

use crate::core::config::ResolvedConfig;
use crate::core::controller::ConversationController;
use crate::core::state::Role;
use crate::inference::{GeminiProvider, PromptComposer};
use crate::visitors::{GeoLookup, SqlVisitorLog, VisitorError, VisitorLog};

pub fn build_composer(config: &ResolvedConfig) -> Arc<PromptComposer> {
    let provider = GeminiProvider::new(
        config.gemini_api_key.clone(),
        Some(config.gemini_base_url.clone()),
        Some(config.gemini_model.clone()),
    );
    if config.gemini_api_key.is_none() {
        warn!("GEMINI_API_KEY is not set; every reply will be an error message");
    }
    Arc::new(PromptComposer::new(
        Arc::new(provider),
        config.instruction_template.clone(),
    ))
}

pub async fn connect_visitor_log(
    config: &ResolvedConfig,
    database_url: &str,
) -> Result<Arc<dyn VisitorLog>, VisitorError> {
    let geo = GeoLookup::new(config.geo_base_url.clone());
    let log = SqlVisitorLog::connect(database_url, geo).await?;
    Ok(Arc::new(log))
}

/// Visitor log for the chat front-ends, or `None` when no database is
/// configured or it cannot be opened.
pub async fn optional_visitor_log(config: &ResolvedConfig) -> Option<Arc<dyn VisitorLog>> {
    let url = config.database_url.as_deref()?;
    match connect_visitor_log(config, url).await {
        Ok(log) => Some(log),
        Err(e) => {
            warn!("Visitor logging disabled: {}", e);
            None
        }
    }
}

/// How `eeon ask` prints the reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AskFormat {
    /// Markers restored, one block per line.
    Plain,
    /// The rendered HTML fragment.
    Html,
}

/// Runs one prompt through the controller and returns the formatted reply.
/// Returns `None` when the prompt is blank.
pub async fn ask(
    composer: Arc<PromptComposer>,
    config: &ResolvedConfig,
    prompt: &str,
    format: AskFormat,
) -> Option<String> {
    let mut controller = ConversationController::new(composer, config.emoji_limit);
    if !controller.submit(prompt) {
        return None;
    }
    controller.next_reply().await;

    let reply = controller
        .state()
        .messages
        .iter()
        .rev()
        .find(|m| m.role == Role::Bot)?;
    info!("Reply received ({} blocks)", reply.blocks.len());

    Some(match format {
        AskFormat::Html => reply.content.clone(),
        AskFormat::Plain => reply
            .blocks
            .iter()
            .map(|b| b.to_plain())
            .collect::<Vec<_>>()
            .join("\n"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{CliOverrides, EeonConfig, resolve_with_env};
    use crate::core::prompt::InstructionTemplate;
    use crate::test_support::StubProvider;

    fn config() -> ResolvedConfig {
        resolve_with_env(&EeonConfig::default(), &CliOverrides::default(), |_| None)
    }

    fn stub_composer(reply: &str) -> Arc<PromptComposer> {
        Arc::new(PromptComposer::new(
            Arc::new(StubProvider::replying(reply)),
            InstructionTemplate::new(""),
        ))
    }

    #[tokio::test]
    async fn test_ask_blank_prompt_is_none() {
        let reply = ask(stub_composer("x"), &config(), "   ", AskFormat::Plain).await;
        assert_eq!(reply, None);
    }

    #[tokio::test]
    async fn test_ask_plain_restores_markers() {
        let reply = ask(stub_composer("# Sky\n>  ☀️  🌈 \nBlue light"), &config(), "why", AskFormat::Plain)
            .await
            .unwrap();
        assert_eq!(reply, "# Sky\n> ☀️  🌈\nBlue light");
    }

    #[tokio::test]
    async fn test_ask_html_is_rendered_fragment() {
        let reply = ask(stub_composer("# Sky\nBlue"), &config(), "why", AskFormat::Html)
            .await
            .unwrap();
        assert!(reply.starts_with("<p style=\"font-size: 26px;\"><b>Sky</b></p>"));
        assert!(reply.ends_with("<p>Blue</p>"));
    }

    #[test]
    fn test_no_database_means_no_visitor_log() {
        let mut config = config();
        config.database_url = None;
        let log = tokio_test::block_on(optional_visitor_log(&config));
        assert!(log.is_none());
    }
}
