//! Goal store: validation, status ordering and patch semantics for goals.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::error::{JournalError, JournalResult};

use super::repository::GoalRepository;
use super::types::{Goal, GoalStatus, GoalUpdate};

/// Longest goal description accepted.
pub const MAX_GOAL_CHARS: usize = 280;

pub struct GoalStore {
    repo: Arc<dyn GoalRepository>,
}

/// Reject blank or over-long goal text. Returns the text unchanged when valid.
pub fn validate_goal_text(text: &str) -> JournalResult<&str> {
    if text.trim().is_empty() {
        return Err(JournalError::Validation(
            "goal description cannot be empty".into(),
        ));
    }
    if text.chars().count() > MAX_GOAL_CHARS {
        return Err(JournalError::Validation(format!(
            "goal description is too long (max {MAX_GOAL_CHARS} chars)"
        )));
    }
    Ok(text)
}

/// Active first, then completed, then archived; most recently updated first within a status.
fn sort_goals(goals: &mut [Goal]) {
    goals.sort_by(|a, b| {
        a.status
            .rank()
            .cmp(&b.status.rank())
            .then_with(|| b.updated_at.cmp(&a.updated_at))
    });
}

impl GoalStore {
    pub fn new(repo: Arc<dyn GoalRepository>) -> Self {
        Self { repo }
    }

    pub fn add_goal(&self, text: &str, target_date: Option<DateTime<Utc>>) -> JournalResult<Goal> {
        let text = validate_goal_text(text)?;
        let now = Utc::now();
        let goal = Goal {
            id: uuid::Uuid::now_v7().to_string(),
            text: text.to_string(),
            created_at: now,
            updated_at: now,
            target_date,
            status: GoalStatus::Active,
        };

        self.repo
            .insert(goal.clone())
            .map_err(JournalError::Storage)?;

        tracing::info!(id = %goal.id, target_date = ?goal.target_date, "goal added");
        Ok(goal)
    }

    pub fn get_goals(&self) -> JournalResult<Vec<Goal>> {
        let mut goals = self.repo.list().map_err(JournalError::Storage)?;
        sort_goals(&mut goals);
        Ok(goals)
    }

    /// Goals in one status, in listing order.
    pub fn goals_by_status(&self, status: GoalStatus) -> JournalResult<Vec<Goal>> {
        let mut goals = self.get_goals()?;
        goals.retain(|g| g.status == status);
        Ok(goals)
    }

    /// Number of goals per status. Every status is present, possibly with 0.
    pub fn status_counts(&self) -> JournalResult<HashMap<GoalStatus, usize>> {
        let goals = self.repo.list().map_err(JournalError::Storage)?;
        let mut counts: HashMap<GoalStatus, usize> =
            GoalStatus::ALL.into_iter().map(|s| (s, 0)).collect();
        for goal in &goals {
            *counts.entry(goal.status).or_default() += 1;
        }
        Ok(counts)
    }

    /// Apply `update` to the goal with `id`. Returns `Ok(None)` if it does not exist.
    ///
    /// `updated_at` moves to now on every successful call, even an empty patch,
    /// and never moves backwards.
    pub fn update_goal(&self, id: &str, update: GoalUpdate) -> JournalResult<Option<Goal>> {
        if let Some(text) = update.text.as_deref() {
            validate_goal_text(text)?;
        }

        let Some(mut goal) = self.repo.get(id).map_err(JournalError::Storage)? else {
            tracing::debug!(id, "update_goal: no such goal");
            return Ok(None);
        };

        if let Some(text) = update.text {
            goal.text = text;
        }
        if let Some(status) = update.status {
            goal.status = status;
        }
        let target_date_changed = !update.target_date.is_unchanged();
        goal.target_date = update.target_date.apply(goal.target_date);
        goal.updated_at = Utc::now().max(goal.updated_at);

        if !self
            .repo
            .replace(goal.clone())
            .map_err(JournalError::Storage)?
        {
            return Ok(None);
        }

        tracing::info!(id, status = %goal.status, target_date_changed, "goal updated");
        Ok(Some(goal))
    }

    /// Remove the goal if present. Deleting an unknown id is not an error.
    pub fn delete_goal(&self, id: &str) -> JournalResult<()> {
        let removed = self.repo.remove(id).map_err(JournalError::Storage)?;
        tracing::info!(id, removed, "delete_goal");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_rejects_blank_and_long() {
        assert!(validate_goal_text("").is_err());
        assert!(validate_goal_text(" \t\n").is_err());
        assert!(validate_goal_text(&"x".repeat(MAX_GOAL_CHARS + 1)).is_err());
        assert!(validate_goal_text(&"x".repeat(MAX_GOAL_CHARS)).is_ok());
    }

    #[test]
    fn sort_orders_by_status_then_recency() {
        let base = Utc::now();
        let mk = |id: &str, status, mins: i64| Goal {
            id: id.into(),
            text: id.into(),
            created_at: base,
            updated_at: base + chrono::Duration::minutes(mins),
            target_date: None,
            status,
        };
        let mut goals = vec![
            mk("archived-new", GoalStatus::Archived, 50),
            mk("completed-old", GoalStatus::Completed, 1),
            mk("active-old", GoalStatus::Active, 0),
            mk("completed-new", GoalStatus::Completed, 40),
            mk("active-new", GoalStatus::Active, 30),
        ];
        sort_goals(&mut goals);
        let ids: Vec<&str> = goals.iter().map(|g| g.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["active-new", "active-old", "completed-new", "completed-old", "archived-new"]
        );
    }

    #[test]
    fn updated_at_never_moves_backwards() {
        use crate::journal::repository::InMemoryGoals;

        let repo = Arc::new(InMemoryGoals::new());
        let now = Utc::now();
        let ahead = now + chrono::Duration::hours(1);
        repo.insert(Goal {
            id: "skewed".into(),
            text: "Run a 10k".into(),
            created_at: now,
            updated_at: ahead,
            target_date: None,
            status: GoalStatus::Active,
        })
        .unwrap();

        let store = GoalStore::new(repo);
        let goal = store
            .update_goal("skewed", GoalUpdate::default())
            .unwrap()
            .unwrap();
        assert!(goal.updated_at >= ahead);
        assert!(goal.updated_at >= goal.created_at);
    }
}
