//! Quizzes built from scan findings, and their grading.

pub mod evaluation;
pub mod generation;

use crate::models::{Issue, Quiz, QuizResult, QuizSubmission};
use crate::services::providers::{complete_json, ChatProvider, ChatRequest, ProviderError};
use service_core::error::AppError;
use std::sync::Arc;

#[derive(Clone)]
pub struct QuizService {
    provider: Arc<dyn ChatProvider>,
}

impl QuizService {
    pub fn new(provider: Arc<dyn ChatProvider>) -> Self {
        Self { provider }
    }

    pub async fn generate(&self, issues: &[Issue]) -> Result<Quiz, AppError> {
        if !self.provider.is_configured() {
            return Err(AppError::InternalError(ProviderError::NotConfigured.into()));
        }

        let topics = generation::extract_topics(issues);
        let request = ChatRequest::json(
            generation::SYSTEM_PROMPT,
            generation::build_prompt(issues, &topics),
            generation::TEMPERATURE,
            generation::MAX_TOKENS,
        );

        let parsed = complete_json(self.provider.as_ref(), "quiz_generation", &request)
            .await
            .map_err(|e| {
                tracing::error!(issues = issues.len(), error = %e, "Quiz generation error");
                AppError::InternalError(anyhow::anyhow!("Failed to generate quiz: {}", e))
            })?;

        let quiz = generation::parse_reply(&parsed, topics);
        tracing::info!(
            quiz_id = %quiz.id,
            questions = quiz.questions.len(),
            total_points = quiz.total_points,
            "Quiz generated"
        );
        Ok(quiz)
    }

    /// Grade `submissions`. Uses the model when available and falls back to
    /// exact-match grading on any provider failure, so it never errors.
    pub async fn evaluate(&self, quiz: &Quiz, submissions: &[QuizSubmission]) -> QuizResult {
        if !self.provider.is_configured() {
            return evaluation::grade_basic(quiz, submissions);
        }

        let request = ChatRequest::json(
            evaluation::SYSTEM_PROMPT,
            evaluation::build_prompt(quiz, submissions),
            evaluation::TEMPERATURE,
            evaluation::MAX_TOKENS,
        );

        match complete_json(self.provider.as_ref(), "quiz_evaluation", &request).await {
            Ok(parsed) => evaluation::parse_reply(quiz, submissions, &parsed),
            Err(e) => {
                tracing::warn!(quiz_id = %quiz.id, error = %e, "AI evaluation failed, using basic grading");
                evaluation::grade_basic(quiz, submissions)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CorrectAnswer, QuizQuestion};
    use crate::services::providers::mock::MockChatProvider;

    fn issues() -> Vec<Issue> {
        vec![Issue {
            code: "WCAG2AA.Principle1.Guideline1_1.1_1_1.H37".into(),
            message: "Img element missing an alt attribute.".into(),
            selector: "img".into(),
            ..Issue::default()
        }]
    }

    fn quiz() -> Quiz {
        Quiz {
            id: "quiz-1".into(),
            questions: vec![QuizQuestion {
                id: "q1".into(),
                question: "What attribute describes an image?".into(),
                correct_answer: CorrectAnswer::One("alt".into()),
                explanation: "alt provides a text alternative.".into(),
                topic: "Missing alt text".into(),
                points: 10,
                ..QuizQuestion::default()
            }],
            total_points: 10,
            ..Quiz::default()
        }
    }

    fn submissions() -> Vec<QuizSubmission> {
        vec![QuizSubmission {
            question_id: "q1".into(),
            answer: "ALT".into(),
        }]
    }

    #[tokio::test]
    async fn generate_requires_a_key() {
        let service = QuizService::new(Arc::new(MockChatProvider::new(false)));
        let err = service.generate(&issues()).await.unwrap_err();
        assert!(err.to_string().contains("OpenAI API key is not configured"));
    }

    #[tokio::test]
    async fn generate_wraps_provider_failures() {
        let provider = Arc::new(MockChatProvider::new(true));
        provider.push_reply("[1, 2]");
        let service = QuizService::new(provider);

        let err = service.generate(&issues()).await.unwrap_err();
        assert!(err.to_string().contains("Failed to generate quiz:"));
    }

    #[tokio::test]
    async fn generate_uses_extracted_topics() {
        let provider = Arc::new(MockChatProvider::new(true));
        provider.push_reply(r#"{"questions": [{"type": "mcq", "question": "Why alt?", "correctAnswer": "A"}]}"#);
        let service = QuizService::new(provider.clone());

        let quiz = service.generate(&issues()).await.unwrap();

        assert_eq!(quiz.topics, vec!["Missing alt text"]);
        assert_eq!(quiz.questions[0].topic, "Missing alt text");
        let request = &provider.requests()[0];
        assert_eq!(request.max_tokens, 4000);
        assert!(request.user_prompt.contains("(Code: WCAG2AA.Principle1.Guideline1_1.1_1_1.H37)"));
    }

    #[tokio::test]
    async fn evaluate_without_key_grades_locally() {
        let service = QuizService::new(Arc::new(MockChatProvider::new(false)));
        let result = service.evaluate(&quiz(), &submissions()).await;
        assert_eq!(result.percentage, 100);
        assert_eq!(result.recommendations.len(), 1);
    }

    #[tokio::test]
    async fn evaluate_falls_back_when_model_fails() {
        let provider = Arc::new(MockChatProvider::new(true));
        provider.push_error(ProviderError::RateLimited);
        let service = QuizService::new(provider);

        let result = service.evaluate(&quiz(), &submissions()).await;
        assert_eq!(result.score, 10.0);
        assert_eq!(result.answers[0].explanation, "Correct! alt provides a text alternative.");
    }

    #[tokio::test]
    async fn evaluate_uses_model_verdicts() {
        let provider = Arc::new(MockChatProvider::new(true));
        provider.push_reply(
            r#"{"answers": [{"questionId": "q1", "isCorrect": true, "pointsEarned": 7.5, "explanation": "Close enough."}]}"#,
        );
        let service = QuizService::new(provider);

        let result = service.evaluate(&quiz(), &submissions()).await;
        assert_eq!(result.score, 7.5);
        assert_eq!(result.percentage, 75);
        assert_eq!(result.answers[0].explanation, "Close enough.");
        assert_eq!(result.recommendations.len(), 2);
    }
}
