use super::extract::ApiJson;
use crate::models::{AnalysisRequest, AnalysisResponse};
use crate::startup::AppState;
use axum::{extract::State, Json};
use service_core::error::AppError;

/// Scan a page and summarize its accessibility issues.
///
/// POST /api/v1/analyse
pub async fn analyse(
    State(state): State<AppState>,
    body: Result<ApiJson<AnalysisRequest>, AppError>,
) -> Result<Json<AnalysisResponse>, AppError> {
    let ApiJson(request) = body.map_err(|e| e.titled("Accessibility analysis failed"))?;

    tracing::info!(url = %request.url, "Analyzing accessibility");

    let response = state.analysis.analyze(&request).await?;
    Ok(Json(response))
}
