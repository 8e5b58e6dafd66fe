pub mod goals;
pub mod grouping;
pub mod logs;
pub mod repository;
pub mod types;

/// Longest log entry accepted at the request boundary.
pub const MAX_LOG_CHARS: usize = 1000;
