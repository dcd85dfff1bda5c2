//! Quiz prompt construction and reply shaping.

use crate::models::{CorrectAnswer, Issue, QuestionType, Quiz, QuizQuestion};
use crate::services::reply::{array, text, text_or_empty};
use chrono::{SecondsFormat, Utc};
use serde_json::Value;

pub const SYSTEM_PROMPT: &str = "You are an expert accessibility educator. Generate comprehensive, educational quiz questions based on accessibility issues. Create questions that test understanding, not just memorization. Include a mix of question types: multiple choice, code fixes, true/false, and scenario-based questions.";

pub const TEMPERATURE: f32 = 0.8;
pub const MAX_TOKENS: u32 = 4000;

const SAMPLE_ISSUES: usize = 10;
const DEFAULT_POINTS: u32 = 10;
const MINUTES_PER_QUESTION: u32 = 2;

/// Keyword to topic, first hit wins. Matched against message and code.
const TOPIC_KEYWORDS: &[(&str, &str)] = &[
    ("contrast", "Color contrast"),
    ("heading", "Heading hierarchy"),
    ("link", "Link accessibility"),
    ("form", "Form accessibility"),
    ("aria", "ARIA attributes"),
    ("keyboard", "Keyboard navigation"),
    ("focus", "Focus management"),
    ("label", "Form labels"),
    ("semantic", "Semantic HTML"),
];

pub fn topic_for(issue: &Issue) -> String {
    let message = issue.message.to_lowercase();
    let code = issue.code.to_lowercase();

    if message.contains("alt") || code.contains("image") {
        return "Missing alt text".to_string();
    }

    if let Some((_, topic)) = TOPIC_KEYWORDS
        .iter()
        .find(|(keyword, _)| message.contains(keyword) || code.contains(keyword))
    {
        return topic.to_string();
    }

    if !issue.code.is_empty() {
        return issue.code.clone();
    }

    match message.split('.').next() {
        Some(first) if !first.is_empty() => first.to_string(),
        _ => "Accessibility issue".to_string(),
    }
}

/// Unique topics in first-seen order.
pub fn extract_topics(issues: &[Issue]) -> Vec<String> {
    let mut topics: Vec<String> = Vec::new();
    for topic in issues.iter().map(topic_for) {
        if !topics.contains(&topic) {
            topics.push(topic);
        }
    }
    topics
}

pub fn build_prompt(issues: &[Issue], topics: &[String]) -> String {
    let topic_lines = topics
        .iter()
        .map(|topic| format!("- {topic}"))
        .collect::<Vec<_>>()
        .join("\n");

    let sample_lines = issues
        .iter()
        .take(SAMPLE_ISSUES)
        .map(|issue| format!("- {} (Code: {})", issue.message, issue.code))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"Generate a comprehensive accessibility quiz based on the following detected issues:

Topics to cover:
{topic_lines}

Sample issues:
{sample_lines}

Create exactly 5 quiz questions with the following distribution:
- 3 Multiple Choice Questions (MCQ)
- 1 Code-based question (ask user to fix code)
- 1 Scenario-based question

For each question, provide:
1. Clear, educational question text
2. Correct answer(s)
3. Detailed explanation
4. Topic it covers
5. Points (10 points each)

For MCQ questions, provide 4 options with only one correct answer.
For code questions, provide the broken code snippet and expected fix.
For scenario questions, describe a real-world accessibility problem.

Return the response in the following JSON format:
{{
  "title": "Accessibility Quiz: [Topics]",
  "description": "Test your understanding of accessibility issues found on your website",
  "questions": [
    {{
      "type": "mcq|code|true-false|scenario",
      "question": "Question text",
      "options": ["Option 1", "Option 2", "Option 3", "Option 4"],
      "correctAnswer": "Correct answer",
      "explanation": "Detailed explanation of why this is correct",
      "topic": "Topic name",
      "points": 10,
      "codeSnippet": "Code here if type is 'code'",
      "scenario": "Scenario description if type is 'scenario'"
    }}
  ]
}}

Only include "options" for MCQ questions."#
    )
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

fn correct_answer_from(value: Option<&Value>) -> CorrectAnswer {
    match value {
        Some(Value::Array(items)) => {
            CorrectAnswer::Many(items.iter().filter_map(scalar_text).collect())
        }
        Some(value) => CorrectAnswer::One(scalar_text(value).unwrap_or_default()),
        None => CorrectAnswer::default(),
    }
}

fn points_from(value: Option<&Value>) -> u32 {
    value
        .and_then(Value::as_u64)
        .filter(|points| *points > 0)
        .and_then(|points| u32::try_from(points).ok())
        .unwrap_or(DEFAULT_POINTS)
}

fn question_from(index: usize, raw: &Value, topics: &[String]) -> QuizQuestion {
    let question_type = QuestionType::parse_lenient(raw.get("type").and_then(Value::as_str));

    let options = match (question_type, raw.get("options")) {
        (QuestionType::Mcq, Some(Value::Array(items))) => {
            Some(items.iter().filter_map(scalar_text).collect())
        }
        _ => None,
    };

    QuizQuestion {
        id: format!("q{}", index + 1),
        question_type,
        question: text_or_empty(raw, "question"),
        options,
        correct_answer: correct_answer_from(raw.get("correctAnswer")),
        explanation: text_or_empty(raw, "explanation"),
        topic: text(raw, "topic")
            .or_else(|| topics.first().cloned())
            .unwrap_or_else(|| "Accessibility".to_string()),
        points: points_from(raw.get("points")),
        code_snippet: (question_type == QuestionType::Code)
            .then(|| text(raw, "codeSnippet"))
            .flatten(),
        scenario: (question_type == QuestionType::Scenario)
            .then(|| text(raw, "scenario"))
            .flatten(),
    }
}

/// Build a [`Quiz`] from the model reply. Questions are renumbered.
pub fn parse_reply(parsed: &Value, topics: Vec<String>) -> Quiz {
    let questions: Vec<QuizQuestion> = array(parsed, "questions")
        .iter()
        .enumerate()
        .map(|(index, raw)| question_from(index, raw, &topics))
        .collect();

    let total_points = questions.iter().map(|q| q.points).sum();
    let estimated_time = questions.len() as u32 * MINUTES_PER_QUESTION;
    let now = Utc::now();

    Quiz {
        id: format!("quiz-{}", now.timestamp_millis()),
        title: text(parsed, "title").unwrap_or_else(|| "Accessibility Quiz".to_string()),
        description: text(parsed, "description")
            .unwrap_or_else(|| "Test your understanding of accessibility issues".to_string()),
        questions,
        topics,
        total_points,
        estimated_time,
        created_at: now.to_rfc3339_opts(SecondsFormat::Millis, true),
    }
}
