pub mod analysis;
pub mod explanation;
pub mod learning;
pub mod metrics;
pub mod providers;
pub mod quiz;
pub mod reply;
pub mod scanner;

pub use analysis::AnalysisService;
pub use explanation::ExplanationService;
pub use learning::LearningService;
pub use quiz::QuizService;
