mod mock;
pub mod models;
mod openai;
pub mod parse;

pub use mock::{classify, derive_title, KeywordExtractor, FALLBACK_TITLE, MOCK_DESCRIPTION};
pub use models::{Command, Intent};
pub use openai::OpenAiExtractor;

use crate::config::{Config, Mode};
use crate::error::{usage_error, AgentResult};
use async_trait::async_trait;
use tracing::info;

/// Turns a free-text request into a structured command
#[async_trait]
pub trait IntentExtractor: Send + Sync {
    /// Short name for logging
    fn name(&self) -> &'static str;

    /// Classify and extract fields from one utterance
    async fn extract(&self, utterance: &str) -> AgentResult<Command>;
}

/// Pick the live or mock extractor based on configured credentials
pub fn extractor_for(config: &Config) -> AgentResult<Box<dyn IntentExtractor>> {
    let extractor: Box<dyn IntentExtractor> = match config.language_model_mode() {
        Mode::Live => Box::new(OpenAiExtractor::new(config)?),
        Mode::Mock => Box::new(KeywordExtractor::new(config.timezone)),
    };
    info!("Using {} intent extractor", extractor.name());
    Ok(extractor)
}

/// Reject blank input before any extractor sees it
pub fn validate_utterance(utterance: &str) -> AgentResult<&str> {
    let trimmed = utterance.trim();
    if trimmed.is_empty() {
        return Err(usage_error("The request text is empty"));
    }
    Ok(trimmed)
}
