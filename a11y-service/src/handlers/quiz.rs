use super::{extract::ApiJson, missing_fields};
use crate::models::{Issue, Quiz, QuizResult, QuizSubmission};
use crate::startup::AppState;
use axum::{extract::State, Json};
use serde::Deserialize;
use service_core::error::AppError;

const QUIZ_GENERATION_FAILED: &str = "Quiz generation failed";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct GenerateQuizRequest {
    pub issues: Option<Vec<Issue>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct EvaluateQuizRequest {
    pub quiz: Option<Quiz>,
    pub submissions: Option<Vec<QuizSubmission>>,
}

/// POST /api/v1/quiz/generate
pub async fn generate_quiz(
    State(state): State<AppState>,
    body: Result<ApiJson<GenerateQuizRequest>, AppError>,
) -> Result<Json<Quiz>, AppError> {
    let ApiJson(request) = body.map_err(|e| e.titled(QUIZ_GENERATION_FAILED))?;
    let issues = match request.issues {
        Some(issues) if !issues.is_empty() => issues,
        _ => return Err(missing_fields("issues array is required and must not be empty")),
    };

    let quiz = state
        .quizzes
        .generate(&issues)
        .await
        .map_err(|e| e.titled(QUIZ_GENERATION_FAILED))?;

    Ok(Json(quiz))
}

/// POST /api/v1/quiz/evaluate
pub async fn evaluate_quiz(
    State(state): State<AppState>,
    body: Result<ApiJson<EvaluateQuizRequest>, AppError>,
) -> Result<Json<QuizResult>, AppError> {
    let ApiJson(request) = body.map_err(|e| e.titled("Quiz evaluation failed"))?;
    let (Some(quiz), Some(submissions)) = (request.quiz, request.submissions) else {
        return Err(missing_fields("quiz and submissions array are required"));
    };

    tracing::info!(
        quiz_id = %quiz.id,
        submissions = submissions.len(),
        "Evaluating quiz"
    );

    Ok(Json(state.quizzes.evaluate(&quiz, &submissions).await))
}
