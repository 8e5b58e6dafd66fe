//! HTTP server: shared state, JSON routes over the stores, and the serve loop.
//!
//! [`build_state`] wires the repositories and the model client into the stores,
//! [`router`] mounts the routes, and [`serve`] binds and runs until ctrl-c.

use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::Result;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch, put};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::ai;
use crate::config::DaybookConfig;
use crate::error::JournalError;
use crate::journal::goals::GoalStore;
use crate::journal::grouping::{self, CategoryGroup, CategoryLabels};
use crate::journal::logs::LogStore;
use crate::journal::repository::{InMemoryGoals, InMemoryLogs};
use crate::journal::types::{Goal, GoalStatus, GoalUpdate, LogEntry};
use crate::journal::MAX_LOG_CHARS;

/// Shared state handed to every handler. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub logs: Arc<LogStore>,
    pub goals: Arc<GoalStore>,
    pub labels: Arc<CategoryLabels>,
}

/// Error returned by handlers; renders as `{"error": ..., "code": ...}`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Journal(#[from] JournalError),

    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: String },

    #[error("bad request: {0}")]
    BadRequest(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Journal(err) => match err {
                JournalError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                JournalError::Categorization(source) => {
                    tracing::error!(error = ?source, "categorization failed");
                    (
                        StatusCode::BAD_GATEWAY,
                        "CATEGORIZATION_FAILED",
                        "failed to save and categorize log entry".to_string(),
                    )
                }
                JournalError::PromptGeneration(source) | JournalError::Storage(source) => {
                    tracing::error!(error = ?source, "internal error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "an internal error occurred".to_string(),
                    )
                }
            },
            AppError::NotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND", self.to_string()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
        };

        (status, Json(json!({ "error": message, "code": code }))).into_response()
    }
}

#[derive(Debug, Deserialize)]
pub struct LogTextBody {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct NewGoalBody {
    pub text: String,
    #[serde(default)]
    pub target_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct GoalListParams {
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LabelBody {
    pub label: String,
}

#[derive(Debug, Serialize)]
pub struct PromptsResponse {
    pub prompts: Vec<String>,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

fn validate_log_text(text: &str) -> AppResult<()> {
    if text.trim().is_empty() {
        return Err(AppError::BadRequest("log entry cannot be empty".into()));
    }
    if text.chars().count() > MAX_LOG_CHARS {
        return Err(AppError::BadRequest(format!(
            "log entry is too long (max {MAX_LOG_CHARS} chars)"
        )));
    }
    Ok(())
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

// --- logs ---

async fn list_logs(State(state): State<AppState>) -> AppResult<Json<Vec<LogEntry>>> {
    Ok(Json(state.logs.get_logs()?))
}

async fn grouped_logs(State(state): State<AppState>) -> AppResult<Json<Vec<CategoryGroup>>> {
    let logs = state.logs.get_logs()?;
    let labels = state.labels.snapshot()?;
    Ok(Json(grouping::group_by_category(&logs, &labels)))
}

async fn add_log(
    State(state): State<AppState>,
    body: Result<Json<LogTextBody>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(body) = body?;
    validate_log_text(&body.text)?;
    let entry = state.logs.add_log_entry(&body.text).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

async fn update_log(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<LogTextBody>, JsonRejection>,
) -> AppResult<Json<LogEntry>> {
    let Json(body) = body?;
    validate_log_text(&body.text)?;
    let updated = state.logs.update_log_entry(&id, &body.text).await?;
    updated
        .map(Json)
        .ok_or(AppError::NotFound {
            entity: "log entry",
            id,
        })
}

async fn reflection_prompts(State(state): State<AppState>) -> Json<PromptsResponse> {
    Json(PromptsResponse {
        prompts: state.logs.reflection_prompts().await,
    })
}

// --- goals ---

async fn list_goals(
    State(state): State<AppState>,
    Query(params): Query<GoalListParams>,
) -> AppResult<Json<Vec<Goal>>> {
    let goals = match params.status.as_deref() {
        Some(raw) => {
            let status: GoalStatus = raw.parse().map_err(AppError::BadRequest)?;
            state.goals.goals_by_status(status)?
        }
        None => state.goals.get_goals()?,
    };
    Ok(Json(goals))
}

async fn goal_counts(State(state): State<AppState>) -> AppResult<Json<BTreeMap<String, usize>>> {
    let counts = state.goals.status_counts()?;
    Ok(Json(
        counts
            .into_iter()
            .map(|(status, n)| (status.as_str().to_string(), n))
            .collect(),
    ))
}

async fn add_goal(
    State(state): State<AppState>,
    body: Result<Json<NewGoalBody>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(body) = body?;
    let goal = state.goals.add_goal(&body.text, body.target_date)?;
    Ok((StatusCode::CREATED, Json(goal)))
}

async fn update_goal(
    State(state): State<AppState>,
    Path(id): Path<String>,
    update: Result<Json<GoalUpdate>, JsonRejection>,
) -> AppResult<Json<Goal>> {
    let Json(update) = update?;
    let updated = state.goals.update_goal(&id, update)?;
    updated
        .map(Json)
        .ok_or(AppError::NotFound {
            entity: "goal",
            id,
        })
}

async fn delete_goal(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state.goals.delete_goal(&id)?;
    Ok(StatusCode::NO_CONTENT)
}

// --- category labels ---

async fn list_labels(
    State(state): State<AppState>,
) -> AppResult<Json<BTreeMap<String, String>>> {
    Ok(Json(state.labels.all()?))
}

async fn set_label(
    State(state): State<AppState>,
    Path(category): Path<String>,
    body: Result<Json<LabelBody>, JsonRejection>,
) -> AppResult<Json<BTreeMap<String, String>>> {
    let Json(body) = body?;
    state.labels.set(&category, &body.label)?;
    tracing::info!(category = %category, label = %body.label, "category label set");
    Ok(Json(state.labels.all()?))
}

/// Mount all routes on `state`.
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/logs", get(list_logs).post(add_log))
        .route("/logs/grouped", get(grouped_logs))
        .route("/logs/{id}", put(update_log))
        .route("/prompts", get(reflection_prompts))
        .route("/goals", get(list_goals).post(add_goal))
        .route("/goals/counts", get(goal_counts))
        .route("/goals/{id}", patch(update_goal).delete(delete_goal))
        .route("/categories/labels", get(list_labels))
        .route("/categories/labels/{category}", put(set_label));

    Router::new()
        .route("/health", get(health))
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Shared setup: in-memory repositories plus the model client from config.
pub fn build_state(config: &DaybookConfig) -> Result<AppState> {
    let client = Arc::new(ai::create_client(&config.ai)?);
    tracing::info!(model = %client.model(), base_url = %config.ai.base_url, "model client ready");

    let logs = LogStore::new(
        Arc::new(InMemoryLogs::new()),
        client.clone(),
        client,
        config.journal.clone(),
    );
    let goals = GoalStore::new(Arc::new(InMemoryGoals::new()));

    Ok(AppState {
        logs: Arc::new(logs),
        goals: Arc::new(goals),
        labels: Arc::new(CategoryLabels::new()),
    })
}

/// Start the HTTP server and run until ctrl-c.
pub async fn serve(config: DaybookConfig) -> Result<()> {
    let bind_addr = config.bind_addr();
    let state = build_state(&config)?;
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "daybook listening at http://{bind_addr}/api");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for ctrl-c");
            }
            tracing::info!("shutting down");
        })
        .await?;

    Ok(())
}
