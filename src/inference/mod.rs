pub mod composer;
pub mod provider;
pub mod providers;
pub mod types;

pub use composer::PromptComposer;
pub use provider::{GenerationProvider, GenerationRequest, ProviderError};
pub use providers::GeminiProvider;
