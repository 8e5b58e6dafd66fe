//! Storage seam for the stores.
//!
//! [`LogRepository`] and [`GoalRepository`] describe the collection operations the
//! stores need; [`InMemoryLogs`] and [`InMemoryGoals`] hold the process-lifetime
//! collections. A persistent backend only has to implement the traits.

use std::sync::RwLock;

use anyhow::{anyhow, Result};

use super::types::{Goal, LogEntry};

/// Insertion-ordered log collection, newest first.
pub trait LogRepository: Send + Sync {
    /// Insert at the head of the collection.
    fn insert(&self, entry: LogEntry) -> Result<()>;
    fn get(&self, id: &str) -> Result<Option<LogEntry>>;
    /// Replace the record with the same id. Returns `false` if no such record exists.
    fn replace(&self, entry: LogEntry) -> Result<bool>;
    /// Snapshot in insertion order (newest first).
    fn list(&self) -> Result<Vec<LogEntry>>;
}

/// Goal collection, newest first.
pub trait GoalRepository: Send + Sync {
    fn insert(&self, goal: Goal) -> Result<()>;
    fn get(&self, id: &str) -> Result<Option<Goal>>;
    fn replace(&self, goal: Goal) -> Result<bool>;
    /// Returns `true` if a record was removed.
    fn remove(&self, id: &str) -> Result<bool>;
    fn list(&self) -> Result<Vec<Goal>>;
}

fn poisoned<E: std::fmt::Display>(e: E) -> anyhow::Error {
    anyhow!("repository lock poisoned: {e}")
}

#[derive(Debug, Default)]
pub struct InMemoryLogs {
    entries: RwLock<Vec<LogEntry>>,
}

impl InMemoryLogs {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LogRepository for InMemoryLogs {
    fn insert(&self, entry: LogEntry) -> Result<()> {
        self.entries.write().map_err(poisoned)?.insert(0, entry);
        Ok(())
    }

    fn get(&self, id: &str) -> Result<Option<LogEntry>> {
        let entries = self.entries.read().map_err(poisoned)?;
        Ok(entries.iter().find(|e| e.id == id).cloned())
    }

    fn replace(&self, entry: LogEntry) -> Result<bool> {
        let mut entries = self.entries.write().map_err(poisoned)?;
        match entries.iter_mut().find(|e| e.id == entry.id) {
            Some(slot) => {
                *slot = entry;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn list(&self) -> Result<Vec<LogEntry>> {
        Ok(self.entries.read().map_err(poisoned)?.clone())
    }
}

#[derive(Debug, Default)]
pub struct InMemoryGoals {
    goals: RwLock<Vec<Goal>>,
}

impl InMemoryGoals {
    pub fn new() -> Self {
        Self::default()
    }
}

impl GoalRepository for InMemoryGoals {
    fn insert(&self, goal: Goal) -> Result<()> {
        self.goals.write().map_err(poisoned)?.insert(0, goal);
        Ok(())
    }

    fn get(&self, id: &str) -> Result<Option<Goal>> {
        let goals = self.goals.read().map_err(poisoned)?;
        Ok(goals.iter().find(|g| g.id == id).cloned())
    }

    fn replace(&self, goal: Goal) -> Result<bool> {
        let mut goals = self.goals.write().map_err(poisoned)?;
        match goals.iter_mut().find(|g| g.id == goal.id) {
            Some(slot) => {
                *slot = goal;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn remove(&self, id: &str) -> Result<bool> {
        let mut goals = self.goals.write().map_err(poisoned)?;
        let before = goals.len();
        goals.retain(|g| g.id != id);
        Ok(goals.len() != before)
    }

    fn list(&self) -> Result<Vec<Goal>> {
        Ok(self.goals.read().map_err(poisoned)?.clone())
    }
}
