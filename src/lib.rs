//! Daybook — a journaling service with model-assisted categorization.
//!
//! Users record free-text daily log entries and goals. Every log entry is
//! classified by a hosted language model into a fixed category vocabulary
//! before it is stored, and the same model writes reflection questions from the
//! most recent entries.
//!
//! | Category | Typical entries |
//! |----------|-----------------|
//! | **Work** | meetings, projects, deadlines |
//! | **Learning** | study sessions (with a subcategory naming the subject) |
//! | **Health** | exercise, sleep, meals |
//! | **Personal**, **Social**, **Travel**, **Errands**, **Philosophy**, **Other** | the rest |
//!
//! # Architecture
//!
//! - **Storage**: in-memory repositories behind the [`journal::repository`] traits
//! - **Model**: any OpenAI-compatible chat-completions endpoint, with JSON-schema replies
//! - **Transport**: JSON over HTTP via axum
//!
//! # Modules
//!
//! - [`config`] — Configuration loading from TOML files and environment variables
//! - [`ai`] — Categorizer and prompt-generator traits plus the HTTP model client
//! - [`journal`] — Log and goal stores, repositories, and category grouping
//! - [`server`] — HTTP routes and the serve loop
//! - [`error`] — Domain error type

pub mod ai;
pub mod config;
pub mod error;
pub mod journal;
pub mod server;
