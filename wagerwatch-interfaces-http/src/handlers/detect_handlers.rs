use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;

use wagerwatch_application::commands::analysis_commands;
use wagerwatch_application::queries::report_queries;
use wagerwatch_application::{AppState, RunSummary, RunTrigger};

use crate::error::HttpError;
use crate::middleware::authorize;

pub async fn get_report(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<RunSummary>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    report_queries::latest_report(&state)
        .await
        .map(Json)
        .ok_or(HttpError::NotFound)
}

/// Runs a full analysis and answers once the report is written.
pub async fn trigger_run(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<RunSummary>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let summary = analysis_commands::run_analysis(&state, RunTrigger::Manual).await?;
    Ok(Json(summary))
}
