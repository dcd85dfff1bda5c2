use super::{explanation::REQUIRED_ISSUE_FIELDS, extract::ApiJson, missing_fields};
use crate::models::{IssueExplanationRequest, LearningContent};
use crate::services::learning;
use crate::startup::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use service_core::error::AppError;
use validator::Validate;

const AI_LEARNING_FAILED: &str = "AI learning mode failed";

/// Static lesson for a scanner code.
///
/// GET /api/v1/learning/:code
pub async fn get_learning_content(
    Path(code): Path<String>,
) -> Result<Json<LearningContent>, AppError> {
    learning::lookup(&code).map(Json).ok_or_else(|| {
        AppError::NotFound(anyhow::anyhow!(
            "No learning content available for issue code: {}",
            code
        ))
        .titled("Learning content not found")
    })
}

/// AI lesson for a full issue, with links.
///
/// POST /api/v1/learning
pub async fn generate_learning_content(
    State(state): State<AppState>,
    body: Result<ApiJson<IssueExplanationRequest>, AppError>,
) -> Result<Json<LearningContent>, AppError> {
    let ApiJson(request) = body.map_err(|e| e.titled(AI_LEARNING_FAILED))?;
    request
        .validate()
        .map_err(|_| missing_fields(REQUIRED_ISSUE_FIELDS))?;

    let issue = request.into();
    let content = state
        .learning
        .generate(&issue)
        .await
        .map_err(|e| e.titled(AI_LEARNING_FAILED))?;

    Ok(Json(content))
}
