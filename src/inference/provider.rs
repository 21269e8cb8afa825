use std::fmt;

use async_trait::async_trait;

/// Errors that can occur during provider operations.
/// None of them are retried; the composer folds every variant into its fallback reply.
#[derive(Debug)]
pub enum ProviderError {
    /// Provider misconfigured (missing API key, bad URL).
    Config(String),
    /// Network-level failure (timeout, DNS, connection refused).
    Network(String),
    /// API returned a non-success status.
    Api { status: u16, message: String },
    /// Failed to parse the provider's response.
    Parse(String),
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderError::Config(msg) => write!(f, "config error: {msg}"),
            ProviderError::Network(msg) => write!(f, "network error: {msg}"),
            ProviderError::Api { status, message } => {
                write!(f, "API error (HTTP {status}): {message}")
            }
            ProviderError::Parse(msg) => write!(f, "parse error: {msg}"),
        }
    }
}

impl std::error::Error for ProviderError {}

/// Everything a provider needs to fulfill a single generation call.
pub struct GenerationRequest<'a> {
    /// Instruction and user prompt, already concatenated.
    pub prompt: &'a str,
}

#[async_trait]
pub trait GenerationProvider: Send + Sync {
    /// Returns the name of the provider.
    fn name(&self) -> &str;

    /// Performs one request/response call.
    ///
    /// `Ok(None)` means the endpoint answered but carried no candidate text.
    async fn generate(&self, request: GenerationRequest<'_>) -> Result<Option<String>, ProviderError>;
}
