//! Domain error type shared by the log and goal stores.

/// Failure of a store operation.
///
/// "Not found" is deliberately absent: stores report a missing id as `Ok(None)`
/// so callers can tell "nothing happened" apart from a failure.
#[derive(Debug, thiserror::Error)]
pub enum JournalError {
    /// Input rejected before touching the collection.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The categorizer call failed; nothing was persisted or modified.
    #[error("failed to categorize log entry")]
    Categorization(#[source] anyhow::Error),

    /// The prompt generator call failed.
    #[error("failed to generate reflection prompts")]
    PromptGeneration(#[source] anyhow::Error),

    /// The backing repository failed.
    #[error("storage error")]
    Storage(#[source] anyhow::Error),
}

pub type JournalResult<T> = Result<T, JournalError>;
