use super::{extract::ApiJson, missing_fields};
use crate::models::{IssueExplanationRequest, IssueExplanationResponse};
use crate::startup::AppState;
use axum::{extract::State, Json};
use service_core::error::AppError;
use validator::Validate;

const EXPLANATION_FAILED: &str = "Issue explanation failed";

pub(crate) const REQUIRED_ISSUE_FIELDS: &str = "code, message, and selector are required";

/// POST /api/v1/explain-issue
pub async fn explain_issue(
    State(state): State<AppState>,
    body: Result<ApiJson<IssueExplanationRequest>, AppError>,
) -> Result<Json<IssueExplanationResponse>, AppError> {
    let ApiJson(request) = body.map_err(|e| e.titled(EXPLANATION_FAILED))?;
    request
        .validate()
        .map_err(|_| missing_fields(REQUIRED_ISSUE_FIELDS))?;

    let issue = request.into();
    let explanation = state
        .explanations
        .explain(&issue)
        .await
        .map_err(|e| e.titled(EXPLANATION_FAILED))?;

    Ok(Json(explanation))
}
