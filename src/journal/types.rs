//! Core journal type definitions.
//!
//! Defines [`Category`] (the fixed categorizer vocabulary), [`LogEntry`],
//! [`Goal`] with its [`GoalStatus`], and the [`GoalUpdate`] patch whose
//! `target_date` uses the tri-state [`FieldUpdate`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Categories a log entry can be assigned by the categorizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Work,
    Personal,
    Health,
    Social,
    Travel,
    /// Study and skill building; usually carries a subcategory.
    Learning,
    Errands,
    Philosophy,
    Other,
}

impl Category {
    pub const ALL: [Category; 9] = [
        Self::Work,
        Self::Personal,
        Self::Health,
        Self::Social,
        Self::Travel,
        Self::Learning,
        Self::Errands,
        Self::Philosophy,
        Self::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Work => "Work",
            Self::Personal => "Personal",
            Self::Health => "Health",
            Self::Social => "Social",
            Self::Travel => "Travel",
            Self::Learning => "Learning",
            Self::Errands => "Errands",
            Self::Philosophy => "Philosophy",
            Self::Other => "Other",
        }
    }

    /// Map free-form model output onto the vocabulary. Anything unrecognized is `Other`.
    pub fn from_model_output(raw: &str) -> Self {
        raw.trim().parse().unwrap_or(Self::Other)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown category: {s}"))
    }
}

/// Categorizer verdict for a piece of text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Categorization {
    pub category: Category,
    pub subcategory: Option<String>,
    /// Always within `[0.0, 1.0]`.
    pub confidence: f64,
}

impl Categorization {
    /// Build a verdict, clamping confidence into `[0.0, 1.0]` (NaN becomes 0).
    pub fn new(category: Category, subcategory: Option<String>, confidence: f64) -> Self {
        let confidence = if confidence.is_nan() {
            0.0
        } else {
            confidence.clamp(0.0, 1.0)
        };
        let subcategory = subcategory
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        Self {
            category,
            subcategory,
            confidence,
        }
    }
}

/// A single timestamped journal record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// UUID v7 identifier, fixed at creation.
    pub id: String,
    /// Creation instant, fixed at creation.
    pub timestamp: DateTime<Utc>,
    pub text: String,
    /// `None` only for records that never went through the categorizer.
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub subcategory: Option<String>,
    #[serde(default)]
    pub confidence: Option<f64>,
}

impl LogEntry {
    /// Overwrite the text together with its derived classification.
    pub fn apply_text(&mut self, text: String, verdict: Categorization) {
        self.text = text;
        self.category = Some(verdict.category);
        self.subcategory = verdict.subcategory;
        self.confidence = Some(verdict.confidence);
    }
}

/// Lifecycle state of a goal. Any state may move to any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalStatus {
    Active,
    Completed,
    Archived,
}

impl GoalStatus {
    pub const ALL: [GoalStatus; 3] = [Self::Active, Self::Completed, Self::Archived];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Archived => "archived",
        }
    }

    /// Listing rank: active first, archived last.
    pub fn rank(&self) -> u8 {
        match self {
            Self::Active => 0,
            Self::Completed => 1,
            Self::Archived => 2,
        }
    }
}

impl std::fmt::Display for GoalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for GoalStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            "archived" => Ok(Self::Archived),
            _ => Err(format!("unknown goal status: {s}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub id: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
    /// Bumped on every successful update; never earlier than `created_at`.
    pub updated_at: DateTime<Utc>,
    pub target_date: Option<DateTime<Utc>>,
    pub status: GoalStatus,
}

/// Patch for an optional field that can also be explicitly cleared.
///
/// When deserialized with `#[serde(default)]`, an omitted field is
/// `Unchanged`, JSON `null` is `Clear`, and any value is `Set`.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldUpdate<T> {
    Unchanged,
    Set(T),
    Clear,
}

impl<T> Default for FieldUpdate<T> {
    fn default() -> Self {
        Self::Unchanged
    }
}

impl<T> FieldUpdate<T> {
    /// Resolve the patch against the current value.
    pub fn apply(self, current: Option<T>) -> Option<T> {
        match self {
            Self::Unchanged => current,
            Self::Set(value) => Some(value),
            Self::Clear => None,
        }
    }

    pub fn is_unchanged(&self) -> bool {
        matches!(self, Self::Unchanged)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for FieldUpdate<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(value) => Self::Set(value),
            None => Self::Clear,
        })
    }
}

/// Fields to change on a goal. Everything defaults to "leave as is".
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GoalUpdate {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub status: Option<GoalStatus>,
    #[serde(default)]
    pub target_date: FieldUpdate<DateTime<Utc>>,
}
