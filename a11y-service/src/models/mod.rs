pub mod accessibility;
pub mod explanation;
pub mod learning;
pub mod quiz;

pub use accessibility::{
    AnalysisRequest, AnalysisResponse, Issue, IssueType, Standard, StandardSummary,
};
pub use explanation::{
    CodeFix, IssueDetails, IssueExplanationRequest, IssueExplanationResponse, Priority, Severity,
    Suggestion,
};
pub use learning::{LearningContent, ManualTestSteps, ResourceLink};
pub use quiz::{
    CorrectAnswer, GradedAnswer, QuestionType, Quiz, QuizQuestion, QuizResult, QuizSubmission,
};
