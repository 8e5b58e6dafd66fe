//! Log store: the categorize-then-write path for journal entries.
//!
//! Every write awaits the categorizer before touching the repository, so a
//! stored entry's classification always matches its text. A categorizer failure
//! leaves the collection exactly as it was.

use std::sync::Arc;

use chrono::Utc;

use crate::ai::{prompts, Categorizer, PromptGenerator};
use crate::config::JournalConfig;
use crate::error::{JournalError, JournalResult};

use super::repository::LogRepository;
use super::types::LogEntry;

pub struct LogStore {
    repo: Arc<dyn LogRepository>,
    categorizer: Arc<dyn Categorizer>,
    prompt_generator: Arc<dyn PromptGenerator>,
    config: JournalConfig,
}

impl LogStore {
    pub fn new(
        repo: Arc<dyn LogRepository>,
        categorizer: Arc<dyn Categorizer>,
        prompt_generator: Arc<dyn PromptGenerator>,
        config: JournalConfig,
    ) -> Self {
        Self {
            repo,
            categorizer,
            prompt_generator,
            config,
        }
    }

    /// Categorize `text` and store it as a new entry at the head of the collection.
    ///
    /// Rejecting empty text is the caller's job.
    pub async fn add_log_entry(&self, text: &str) -> JournalResult<LogEntry> {
        let verdict = self.categorizer.categorize(text).await.map_err(|e| {
            tracing::error!(error = %e, "categorizer failed, log entry not saved");
            JournalError::Categorization(e)
        })?;

        let entry = LogEntry {
            id: uuid::Uuid::now_v7().to_string(),
            timestamp: Utc::now(),
            text: text.to_string(),
            category: Some(verdict.category),
            subcategory: verdict.subcategory,
            confidence: Some(verdict.confidence),
        };

        self.repo
            .insert(entry.clone())
            .map_err(JournalError::Storage)?;

        tracing::info!(
            id = %entry.id,
            category = %verdict.category,
            confidence = verdict.confidence,
            "log entry added"
        );

        Ok(entry)
    }

    /// Replace an entry's text and re-derive its classification.
    ///
    /// Returns `Ok(None)` if no entry has `id`; the categorizer is not called then.
    pub async fn update_log_entry(
        &self,
        id: &str,
        new_text: &str,
    ) -> JournalResult<Option<LogEntry>> {
        let Some(mut entry) = self.repo.get(id).map_err(JournalError::Storage)? else {
            tracing::debug!(id, "update_log_entry: no such entry");
            return Ok(None);
        };

        let verdict = self.categorizer.categorize(new_text).await.map_err(|e| {
            tracing::error!(id, error = %e, "categorizer failed, log entry left unchanged");
            JournalError::Categorization(e)
        })?;

        entry.apply_text(new_text.to_string(), verdict);

        if !self
            .repo
            .replace(entry.clone())
            .map_err(JournalError::Storage)?
        {
            return Ok(None);
        }

        tracing::info!(id, category = ?entry.category, "log entry updated");
        Ok(Some(entry))
    }

    /// Snapshot of all entries, newest timestamp first.
    pub fn get_logs(&self) -> JournalResult<Vec<LogEntry>> {
        let mut logs = self.repo.list().map_err(JournalError::Storage)?;
        logs.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(logs)
    }

    /// Ask the prompt generator for reflection questions about the newest entries.
    ///
    /// Errors never reach the caller: on failure the configured fallback question
    /// is returned instead.
    pub async fn reflection_prompts(&self) -> Vec<String> {
        match self.try_reflection_prompts().await {
            Ok(questions) => questions,
            Err(e) => {
                tracing::error!(error = ?e, "could not fetch reflection prompts");
                vec![self.config.fallback_prompt.clone()]
            }
        }
    }

    async fn try_reflection_prompts(&self) -> JournalResult<Vec<String>> {
        let logs = self.get_logs()?;
        let context = prompts::build_context(&logs, self.config.prompt_context_entries);

        self.prompt_generator
            .generate_prompts(context.as_deref())
            .await
            .map_err(JournalError::PromptGeneration)
    }
}
