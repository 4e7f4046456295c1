use axum::extract::State;
use axum::Json;
use serde_json::Value;

use super::ok;
use crate::advisor::{self, Advice};
use crate::error::AppError;
use crate::state::AppState;
use crate::validate::{Checks, JsonBody};

async fn advise(app: &AppState, advice: &Advice, body: &Value) -> Result<Json<Value>, AppError> {
    let data = advisor::ask(app, advice, body).await?;
    Ok(ok(data))
}

/// POST /api/ai/breakdown-task
pub async fn breakdown_task(
    State(app): State<AppState>,
    JsonBody(body): JsonBody,
) -> Result<Json<Value>, AppError> {
    Checks::new(&body)
        .string("taskDescription", 5, 500)
        .string("projectContext", 0, 2000)
        .finish()?;
    advise(&app, &advisor::BREAKDOWN_TASK, &body).await
}

/// POST /api/ai/analyze-timeline
pub async fn analyze_timeline(
    State(app): State<AppState>,
    JsonBody(body): JsonBody,
) -> Result<Json<Value>, AppError> {
    Checks::new(&body).object("projectData").finish()?;
    advise(&app, &advisor::ANALYZE_TIMELINE, &body).await
}

/// POST /api/ai/analyze-scope-change
pub async fn analyze_scope_change(
    State(app): State<AppState>,
    JsonBody(body): JsonBody,
) -> Result<Json<Value>, AppError> {
    Checks::new(&body)
        .string("originalScope", 5, 1000)
        .string("proposedChange", 5, 1000)
        .object("projectData")
        .finish()?;
    advise(&app, &advisor::ANALYZE_SCOPE_CHANGE, &body).await
}

/// POST /api/ai/analyze-communications
pub async fn analyze_communications(
    State(app): State<AppState>,
    JsonBody(body): JsonBody,
) -> Result<Json<Value>, AppError> {
    Checks::new(&body).array("communications").finish()?;
    advise(&app, &advisor::ANALYZE_COMMUNICATIONS, &body).await
}

/// POST /api/ai/optimize-resources
pub async fn optimize_resources(
    State(app): State<AppState>,
    JsonBody(body): JsonBody,
) -> Result<Json<Value>, AppError> {
    Checks::new(&body)
        .object("teamData")
        .object("projectRequirements")
        .finish()?;
    advise(&app, &advisor::OPTIMIZE_ALLOCATION, &body).await
}

/// POST /api/ai/query: free-form question, answered as plain text.
pub async fn query(
    State(app): State<AppState>,
    JsonBody(body): JsonBody,
) -> Result<Json<Value>, AppError> {
    Checks::new(&body)
        .string("query", 2, 1000)
        .object("projectContext")
        .finish()?;
    advise(&app, &advisor::PROJECT_QUERY, &body).await
}
