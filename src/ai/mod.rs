//! Model-backed collaborators.
//!
//! Provides the [`Categorizer`] and [`PromptGenerator`] traits consumed by the
//! stores, and an OpenAI-compatible implementation of both created via
//! [`create_client`] from configuration.

pub mod openai;
pub mod prompts;

use anyhow::Result;
use async_trait::async_trait;

use crate::journal::types::Categorization;

/// Classifies free text into the fixed category vocabulary.
#[async_trait]
pub trait Categorizer: Send + Sync {
    async fn categorize(&self, text: &str) -> Result<Categorization>;
}

/// Produces open-ended reflection questions from recent journal context.
#[async_trait]
pub trait PromptGenerator: Send + Sync {
    /// `context` is `None` when there is nothing written yet.
    async fn generate_prompts(&self, context: Option<&str>) -> Result<Vec<String>>;
}

/// Create the model client from config.
///
/// Currently only `"openai"` (any OpenAI-compatible `/chat/completions` endpoint)
/// is supported. Fails if the configured API key variable is unset.
pub fn create_client(config: &crate::config::AiConfig) -> Result<openai::ApiClient> {
    match config.provider.as_str() {
        "openai" => openai::ApiClient::from_config(config),
        other => anyhow::bail!("unknown ai provider: {other}. Supported: openai"),
    }
}
