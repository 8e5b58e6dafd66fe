//! Category buckets for display.
//!
//! [`group_by_category`] partitions entries into buckets in [`BUCKET_ORDER`];
//! [`CategoryLabels`] holds optional display names keyed by bucket name.
//! Labels never touch the stored `category` of an entry.

use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use anyhow::anyhow;
use serde::Serialize;

use crate::error::{JournalError, JournalResult};

use super::types::{Category, LogEntry};

/// Bucket for entries that carry no category.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Display order of buckets.
pub const BUCKET_ORDER: [&str; 10] = [
    "Learning",
    "Work",
    "Personal",
    "Health",
    "Social",
    "Travel",
    "Errands",
    "Philosophy",
    "Other",
    UNCATEGORIZED,
];

#[derive(Debug, Clone, Serialize)]
pub struct CategoryGroup {
    /// Canonical bucket name (a [`Category`] name or `Uncategorized`).
    pub category: String,
    /// Display label: the override if one is set, otherwise `category`.
    pub label: String,
    pub entries: Vec<LogEntry>,
}

pub fn bucket_name(category: Option<Category>) -> &'static str {
    category.map(|c| c.as_str()).unwrap_or(UNCATEGORIZED)
}

/// Whether `name` is a canonical bucket name.
pub fn is_bucket(name: &str) -> bool {
    BUCKET_ORDER.iter().any(|b| *b == name)
}

/// Partition `logs` into non-empty buckets in [`BUCKET_ORDER`]. Entries keep
/// their relative input order inside a bucket.
pub fn group_by_category(logs: &[LogEntry], labels: &HashMap<String, String>) -> Vec<CategoryGroup> {
    let mut buckets: HashMap<&'static str, Vec<LogEntry>> = HashMap::new();
    for entry in logs {
        buckets
            .entry(bucket_name(entry.category))
            .or_default()
            .push(entry.clone());
    }

    BUCKET_ORDER
        .iter()
        .filter_map(|name| {
            let entries = buckets.remove(name)?;
            Some(CategoryGroup {
                category: name.to_string(),
                label: labels.get(*name).cloned().unwrap_or_else(|| name.to_string()),
                entries,
            })
        })
        .collect()
}

/// Display-name overrides for category buckets.
#[derive(Debug, Default)]
pub struct CategoryLabels {
    labels: RwLock<HashMap<String, String>>,
}

impl CategoryLabels {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override for `category`, if any.
    pub fn get(&self, category: &str) -> JournalResult<Option<String>> {
        let labels = self.labels.read().map_err(lock_err)?;
        Ok(labels.get(category).cloned())
    }

    /// Set the display name for a bucket. An empty label removes the override.
    pub fn set(&self, category: &str, label: &str) -> JournalResult<()> {
        if !is_bucket(category) {
            return Err(JournalError::Validation(format!(
                "unknown category: {category}"
            )));
        }
        let mut labels = self.labels.write().map_err(lock_err)?;
        let label = label.trim();
        if label.is_empty() {
            labels.remove(category);
        } else {
            labels.insert(category.to_string(), label.to_string());
        }
        Ok(())
    }

    /// All overrides, sorted by bucket name.
    pub fn all(&self) -> JournalResult<BTreeMap<String, String>> {
        let labels = self.labels.read().map_err(lock_err)?;
        Ok(labels.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
    }

    pub fn snapshot(&self) -> JournalResult<HashMap<String, String>> {
        Ok(self.labels.read().map_err(lock_err)?.clone())
    }
}

fn lock_err<E: std::fmt::Display>(e: E) -> JournalError {
    JournalError::Storage(anyhow!("category labels lock poisoned: {e}"))
}
