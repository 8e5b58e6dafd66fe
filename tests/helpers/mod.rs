#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{bail, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use daybook::ai::{Categorizer, PromptGenerator};
use daybook::config::JournalConfig;
use daybook::journal::goals::GoalStore;
use daybook::journal::grouping::CategoryLabels;
use daybook::journal::logs::LogStore;
use daybook::journal::repository::{InMemoryGoals, InMemoryLogs, LogRepository};
use daybook::journal::types::{Categorization, Category, LogEntry};
use daybook::server::AppState;

/// Deterministic keyword categorizer. Can be switched into a failing mode.
#[derive(Default)]
pub struct StubCategorizer {
    failing: AtomicBool,
    calls: AtomicUsize,
}

impl StubCategorizer {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Categorizer for StubCategorizer {
    async fn categorize(&self, text: &str) -> Result<Categorization> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            bail!("model unavailable");
        }
        let lower = text.to_lowercase();
        let verdict = if lower.contains("budget") || lower.contains("report") {
            Categorization::new(Category::Work, None, 0.9)
        } else if lower.contains("run") || lower.contains("gym") {
            Categorization::new(Category::Health, None, 0.8)
        } else if lower.contains("study") {
            Categorization::new(Category::Learning, Some("Anatomy".into()), 0.75)
        } else {
            Categorization::new(Category::Other, None, 0.3)
        };
        Ok(verdict)
    }
}

/// Prompt generator returning fixed questions and recording the context it saw.
#[derive(Default)]
pub struct StubPrompts {
    failing: AtomicBool,
    contexts: Mutex<Vec<Option<String>>>,
}

impl StubPrompts {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn contexts(&self) -> Vec<Option<String>> {
        self.contexts.lock().unwrap().clone()
    }
}

#[async_trait]
impl PromptGenerator for StubPrompts {
    async fn generate_prompts(&self, context: Option<&str>) -> Result<Vec<String>> {
        self.contexts.lock().unwrap().push(context.map(String::from));
        if self.failing.load(Ordering::SeqCst) {
            bail!("model unavailable");
        }
        Ok(vec![
            "What did you learn today?".into(),
            "Who did you spend time with?".into(),
            "How did you take care of yourself?".into(),
        ])
    }
}

/// Everything a store test needs, with handles on the stubs and repository.
pub struct Harness {
    pub repo: Arc<InMemoryLogs>,
    pub categorizer: Arc<StubCategorizer>,
    pub prompts: Arc<StubPrompts>,
    pub logs: Arc<LogStore>,
    pub goals: Arc<GoalStore>,
}

pub fn harness() -> Harness {
    let repo = Arc::new(InMemoryLogs::new());
    let categorizer = StubCategorizer::new();
    let prompts = StubPrompts::new();
    let logs = LogStore::new(
        repo.clone(),
        categorizer.clone(),
        prompts.clone(),
        JournalConfig::default(),
    );
    Harness {
        repo,
        categorizer,
        prompts,
        logs: Arc::new(logs),
        goals: Arc::new(GoalStore::new(Arc::new(InMemoryGoals::new()))),
    }
}

impl Harness {
    pub fn app_state(&self) -> AppState {
        AppState {
            logs: self.logs.clone(),
            goals: self.goals.clone(),
            labels: Arc::new(CategoryLabels::new()),
        }
    }

    /// Insert a record directly into the repository, bypassing the categorizer.
    pub fn seed_log(&self, text: &str, timestamp: DateTime<Utc>, category: Option<Category>) -> String {
        let id = uuid::Uuid::now_v7().to_string();
        self.repo
            .insert(LogEntry {
                id: id.clone(),
                timestamp,
                text: text.into(),
                category,
                subcategory: None,
                confidence: category.map(|_| 0.5),
            })
            .unwrap();
        id
    }
}
