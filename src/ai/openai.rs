//! OpenAI-compatible chat-completions client.
//!
//! Implements both [`Categorizer`] and [`PromptGenerator`]. Each call is a single
//! request with a JSON-schema `response_format` derived from the expected reply
//! type; there is no retry.

use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{json, Value};

use super::prompts::{self, CATEGORIZE_INSTRUCTIONS, REFLECTION_INSTRUCTIONS};
use super::{Categorizer, PromptGenerator};
use crate::config::AiConfig;
use crate::journal::types::{Categorization, Category};

/// Reply shape requested from the model when categorizing.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct CategorizerReply {
    /// One of Work, Personal, Health, Social, Travel, Learning, Errands, Philosophy, Other.
    pub category: String,
    /// Finer classification, expected when the category is Learning.
    #[serde(default)]
    pub subcategory: Option<String>,
    /// Confidence between 0 and 1.
    pub confidence: f64,
}

/// Reply shape requested from the model for reflection questions.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct PromptReply {
    #[serde(rename = "promptQuestions")]
    pub prompt_questions: Vec<String>,
}

#[derive(Debug)]
pub struct ApiClient {
    base_url: String,
    api_key: String,
    model: String,
    client: reqwest::Client,
}

impl ApiClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
            client: builder.build().context("failed to build HTTP client")?,
        })
    }

    /// Build from config, reading the API key from the configured env var.
    pub fn from_config(config: &AiConfig) -> Result<Self> {
        let api_key = std::env::var(&config.api_key_env).with_context(|| {
            format!("API key not set: export {} first", config.api_key_env)
        })?;
        anyhow::ensure!(!config.model.trim().is_empty(), "ai.model must not be empty");
        Self::new(
            &config.base_url,
            api_key,
            &config.model,
            config.timeout_secs.map(Duration::from_secs),
        )
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn run_chat_completion<T: JsonSchema>(
        &self,
        schema_name: &str,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String> {
        let schema = schemars::schema_for!(T);
        let url = format!("{}/chat/completions", self.base_url);

        tracing::debug!(model = %self.model, schema = schema_name, "sending chat completion");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&json!({
                "model": self.model,
                "messages": [
                    {"role": "system", "content": system_prompt},
                    {"role": "user", "content": user_prompt}
                ],
                "response_format": {
                    "type": "json_schema",
                    "json_schema": {"name": schema_name, "schema": schema}
                },
                "temperature": 0.2
            }))
            .send()
            .await
            .with_context(|| format!("chat completion request failed for model {}", self.model))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .context("failed to read chat completion response body")?;

        if !status.is_success() {
            bail!(
                "chat completion failed for model {}: status {status}, body {body}",
                self.model
            );
        }

        parse_completion_content(&body)
    }
}

#[async_trait]
impl Categorizer for ApiClient {
    async fn categorize(&self, text: &str) -> Result<Categorization> {
        let content = self
            .run_chat_completion::<CategorizerReply>(
                "log_categorization",
                CATEGORIZE_INSTRUCTIONS,
                &format!("Log entry: {text}"),
            )
            .await?;
        parse_categorization(&content)
    }
}

#[async_trait]
impl PromptGenerator for ApiClient {
    async fn generate_prompts(&self, context: Option<&str>) -> Result<Vec<String>> {
        let content = self
            .run_chat_completion::<PromptReply>(
                "reflection_prompts",
                REFLECTION_INSTRUCTIONS,
                &prompts::reflection_request(context),
            )
            .await?;
        parse_prompt_questions(&content)
    }
}

/// Extract `choices[0].message.content` from a chat-completions body.
pub fn parse_completion_content(body: &str) -> Result<String> {
    let value: Value =
        serde_json::from_str(body).context("failed to parse completion response JSON")?;

    value
        .pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| anyhow!("completion response missing choices[0].message.content"))
}

/// Models sometimes wrap JSON in a markdown fence; peel it off.
fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

pub fn parse_categorization(content: &str) -> Result<Categorization> {
    let reply: CategorizerReply = serde_json::from_str(strip_code_fence(content))
        .with_context(|| format!("categorizer reply is not valid JSON: {content}"))?;

    let category = Category::from_model_output(&reply.category);
    if !reply.category.trim().eq_ignore_ascii_case(category.as_str()) {
        tracing::warn!(raw = %reply.category, "categorizer returned unknown category, using Other");
    }

    Ok(Categorization::new(
        category,
        reply.subcategory,
        reply.confidence,
    ))
}

/// Accepts `{"promptQuestions": [...]}` or a bare JSON array.
pub fn parse_prompt_questions(content: &str) -> Result<Vec<String>> {
    let raw = strip_code_fence(content);
    let questions = match serde_json::from_str::<PromptReply>(raw) {
        Ok(reply) => reply.prompt_questions,
        Err(_) => serde_json::from_str::<Vec<String>>(raw)
            .with_context(|| format!("prompt generator reply is not valid JSON: {content}"))?,
    };

    let questions = prompts::normalize_questions(questions);
    if questions.is_empty() {
        bail!("prompt generator returned no questions");
    }
    Ok(questions)
}
