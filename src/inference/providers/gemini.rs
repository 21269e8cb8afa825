//! Gemini provider using the `generateContent` endpoint (API-key auth).
//!
//! One POST per prompt, no streaming:
//! `{base_url}/models/{model}:generateContent?key={api_key}`

use async_trait::async_trait;
use log::{debug, info, warn};

use crate::inference::types::{GenerateRequest, GenerateResponse};
use crate::inference::{GenerationProvider, GenerationRequest, ProviderError};

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-pro";

/// Gemini API provider.
pub struct GeminiProvider {
    api_key: Option<String>,
    base_url: String,
    model: String,
    client: reqwest::Client,
}

impl GeminiProvider {
    /// A missing key is not an error here: it surfaces on the first call, like any other failure.
    pub fn new(api_key: Option<String>, base_url: Option<String>, model: Option<String>) -> Self {
        let base_url = base_url
            .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        Self {
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            base_url,
            model: model.unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            client: reqwest::Client::new(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl GenerationProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate(&self, request: GenerationRequest<'_>) -> Result<Option<String>, ProviderError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| ProviderError::Config("Missing Gemini API Key".to_string()))?;

        let body = GenerateRequest::user(request.prompt);

        info!(
            "Gemini request: model={}, prompt_len={}",
            self.model,
            request.prompt.len()
        );

        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", api_key)])
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let status = response.status();
        debug!("Gemini response status: {}", status);

        if !status.is_success() {
            let err_body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            warn!("Gemini API error: {} - {}", status.as_u16(), err_body);
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message: err_body,
            });
        }

        let text = response
            .text()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;
        let parsed: GenerateResponse =
            serde_json::from_str(&text).map_err(|e| ProviderError::Parse(e.to_string()))?;

        let reply = parsed.first_text().map(str::to_string);
        match &reply {
            Some(t) => info!("Gemini reply received: {} bytes", t.len()),
            None => info!("Gemini reply carried no candidate text"),
        }
        Ok(reply)
    }
}
