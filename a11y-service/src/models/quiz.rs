use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionType {
    #[default]
    Mcq,
    Code,
    TrueFalse,
    Scenario,
}

impl QuestionType {
    /// Parse a model-supplied type; anything unknown becomes `Mcq`.
    pub fn parse_lenient(raw: Option<&str>) -> Self {
        match raw {
            Some("code") => QuestionType::Code,
            Some("true-false") => QuestionType::TrueFalse,
            Some("scenario") => QuestionType::Scenario,
            _ => QuestionType::Mcq,
        }
    }
}

/// One accepted answer, or several equally valid ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CorrectAnswer {
    One(String),
    Many(Vec<String>),
}

impl Default for CorrectAnswer {
    fn default() -> Self {
        CorrectAnswer::One(String::new())
    }
}

impl CorrectAnswer {
    pub fn accepted(&self) -> &[String] {
        match self {
            CorrectAnswer::One(answer) => std::slice::from_ref(answer),
            CorrectAnswer::Many(answers) => answers,
        }
    }
}

fn default_points() -> u32 {
    10
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type", default)]
    pub question_type: QuestionType,
    #[serde(default)]
    pub question: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(default)]
    pub correct_answer: CorrectAnswer,
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub topic: String,
    #[serde(default = "default_points")]
    pub points: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_snippet: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scenario: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Quiz {
    pub id: String,
    pub title: String,
    pub description: String,
    pub questions: Vec<QuizQuestion>,
    pub topics: Vec<String>,
    pub total_points: u32,
    /// Minutes.
    pub estimated_time: u32,
    pub created_at: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizSubmission {
    #[serde(default)]
    pub question_id: String,
    #[serde(default)]
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GradedAnswer {
    pub question_id: String,
    pub question: String,
    pub user_answer: String,
    pub correct_answer: CorrectAnswer,
    pub is_correct: bool,
    pub points_earned: f64,
    pub points_possible: u32,
    pub explanation: String,
    pub topic: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResult {
    pub score: f64,
    pub total_points: u32,
    pub percentage: u32,
    pub answers: Vec<GradedAnswer>,
    pub topics_to_review: Vec<String>,
    pub recommendations: Vec<String>,
}
