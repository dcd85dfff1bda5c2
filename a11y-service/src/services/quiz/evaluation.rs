//! Quiz grading: exact-match scoring and AI-assisted partial credit.

use crate::models::{GradedAnswer, Quiz, QuizQuestion, QuizResult, QuizSubmission};
use crate::services::reply::{array, string_list, text};
use serde_json::{json, Value};

pub const SYSTEM_PROMPT: &str = "You are an expert accessibility educator evaluating quiz answers. Provide partial credit for partially correct answers, especially for code questions. Give constructive feedback and link answers back to training concepts.";

pub const TEMPERATURE: f32 = 0.3;
pub const MAX_TOKENS: u32 = 3000;

const PASS_PERCENTAGE: u32 = 70;

/// Trimmed, case-insensitive match against any accepted answer.
pub fn is_answer_correct(question: &QuizQuestion, answer: &str) -> bool {
    if answer.is_empty() {
        return false;
    }
    let answer = answer.trim().to_lowercase();
    question
        .correct_answer
        .accepted()
        .iter()
        .any(|accepted| accepted.trim().to_lowercase() == answer)
}

fn submitted_answer<'a>(submissions: &'a [QuizSubmission], question_id: &str) -> &'a str {
    submissions
        .iter()
        .find(|submission| submission.question_id == question_id)
        .map(|submission| submission.answer.as_str())
        .unwrap_or("")
}

fn default_explanation(question: &QuizQuestion, is_correct: bool) -> String {
    if is_correct {
        format!("Correct! {}", question.explanation)
    } else {
        format!("Incorrect. {}", question.explanation)
    }
}

pub fn percentage(score: f64, total_points: u32) -> u32 {
    if total_points == 0 {
        return 0;
    }
    (score / f64::from(total_points) * 100.0).round().max(0.0) as u32
}

fn topics_of_misses(answers: &[GradedAnswer]) -> Vec<String> {
    let mut topics: Vec<String> = Vec::new();
    for answer in answers.iter().filter(|answer| !answer.is_correct) {
        if !topics.contains(&answer.topic) {
            topics.push(answer.topic.clone());
        }
    }
    topics
}

fn basic_recommendations(percentage: u32) -> Vec<String> {
    let lines: &[&str] = if percentage < PASS_PERCENTAGE {
        &[
            "Review the accessibility topics where you scored lower",
            "Practice with more code examples",
        ]
    } else {
        &["Great job! Continue practicing to maintain your knowledge"]
    };
    lines.iter().map(|line| line.to_string()).collect()
}

fn extended_recommendations(percentage: u32) -> Vec<String> {
    let lines: &[&str] = if percentage < PASS_PERCENTAGE {
        &[
            "Review the accessibility topics where you scored lower",
            "Practice with more code examples",
            "Read the WCAG guidelines for the topics you missed",
        ]
    } else {
        &[
            "Great job! Continue practicing to maintain your knowledge",
            "Consider exploring advanced accessibility topics",
        ]
    };
    lines.iter().map(|line| line.to_string()).collect()
}

fn graded(
    question: &QuizQuestion,
    user_answer: &str,
    is_correct: bool,
    points: f64,
    explanation: String,
) -> GradedAnswer {
    GradedAnswer {
        question_id: question.id.clone(),
        question: question.question.clone(),
        user_answer: user_answer.to_string(),
        correct_answer: question.correct_answer.clone(),
        is_correct,
        points_earned: points,
        points_possible: question.points,
        explanation,
        topic: question.topic.clone(),
    }
}

/// All-or-nothing grading without the model.
pub fn grade_basic(quiz: &Quiz, submissions: &[QuizSubmission]) -> QuizResult {
    let answers: Vec<GradedAnswer> = quiz
        .questions
        .iter()
        .map(|question| {
            let user_answer = submitted_answer(submissions, &question.id);
            let is_correct = is_answer_correct(question, user_answer);
            let points = if is_correct { f64::from(question.points) } else { 0.0 };
            graded(
                question,
                user_answer,
                is_correct,
                points,
                default_explanation(question, is_correct),
            )
        })
        .collect();

    let score: f64 = answers.iter().map(|answer| answer.points_earned).sum();
    let percentage = percentage(score, quiz.total_points);

    QuizResult {
        score,
        total_points: quiz.total_points,
        percentage,
        topics_to_review: topics_of_misses(&answers),
        recommendations: basic_recommendations(percentage),
        answers,
    }
}

pub fn build_prompt(quiz: &Quiz, submissions: &[QuizSubmission]) -> String {
    let questions_with_answers: Vec<Value> = quiz
        .questions
        .iter()
        .map(|question| {
            json!({
                "questionId": question.id,
                "question": question.question,
                "type": question.question_type,
                "correctAnswer": question.correct_answer,
                "userAnswer": submitted_answer(submissions, &question.id),
                "topic": question.topic,
                "points": question.points,
                "codeSnippet": question.code_snippet,
                "scenario": question.scenario,
            })
        })
        .collect();

    let pretty = serde_json::to_string_pretty(&questions_with_answers).unwrap_or_default();

    format!(
        r#"Evaluate the following quiz answers. Provide partial credit for code questions if the answer is partially correct.

Quiz Questions and Answers:
{pretty}

For each answer, provide:
1. isCorrect: boolean (true if fully correct, false otherwise)
2. pointsEarned: number (0 to points, can be partial for code questions)
3. explanation: string (explain why the answer is correct/incorrect, provide learning feedback)
4. If incorrect, suggest what training module to review

Return in JSON format:
{{
  "answers": [
    {{
      "questionId": "q1",
      "isCorrect": true,
      "pointsEarned": 10,
      "explanation": "Explanation here"
    }}
  ],
  "topicsToReview": ["topic1", "topic2"],
  "recommendations": ["Recommendation 1", "Recommendation 2"]
}}"#
    )
}

/// Merge the model's verdicts into a result. Anything the reply omits falls
/// back to exact-match grading for that question.
pub fn parse_reply(quiz: &Quiz, submissions: &[QuizSubmission], parsed: &Value) -> QuizResult {
    let verdicts = array(parsed, "answers");

    let answers: Vec<GradedAnswer> = quiz
        .questions
        .iter()
        .map(|question| {
            let user_answer = submitted_answer(submissions, &question.id);
            let verdict = verdicts.iter().find(|verdict| {
                verdict.get("questionId").and_then(Value::as_str) == Some(question.id.as_str())
            });

            let is_correct = verdict
                .and_then(|v| v.get("isCorrect"))
                .and_then(Value::as_bool)
                .unwrap_or_else(|| is_answer_correct(question, user_answer));

            let possible = f64::from(question.points);
            let points = verdict
                .and_then(|v| v.get("pointsEarned"))
                .and_then(Value::as_f64)
                .map(|points| points.clamp(0.0, possible))
                .unwrap_or(if is_correct { possible } else { 0.0 });

            let explanation = verdict
                .and_then(|v| text(v, "explanation"))
                .unwrap_or_else(|| default_explanation(question, is_correct));

            graded(question, user_answer, is_correct, points, explanation)
        })
        .collect();

    let score: f64 = answers.iter().map(|answer| answer.points_earned).sum();
    let percentage = percentage(score, quiz.total_points);

    QuizResult {
        score,
        total_points: quiz.total_points,
        percentage,
        topics_to_review: string_list(parsed, "topicsToReview")
            .unwrap_or_else(|| topics_of_misses(&answers)),
        recommendations: string_list(parsed, "recommendations")
            .unwrap_or_else(|| extended_recommendations(percentage)),
        answers,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CorrectAnswer, QuestionType};

    fn question(id: &str, answer: CorrectAnswer, topic: &str) -> QuizQuestion {
        QuizQuestion {
            id: id.into(),
            question_type: QuestionType::Mcq,
            question: format!("Question {id}"),
            correct_answer: answer,
            explanation: "Because.".into(),
            topic: topic.into(),
            points: 10,
            ..QuizQuestion::default()
        }
    }

    fn quiz() -> Quiz {
        Quiz {
            id: "quiz-1".into(),
            questions: vec![
                question("q1", CorrectAnswer::One("Alt text".into()), "Missing alt text"),
                question(
                    "q2",
                    CorrectAnswer::Many(vec!["4.5:1".into(), "4.5 to 1".into()]),
                    "Color contrast",
                ),
                question("q3", CorrectAnswer::One("true".into()), "Color contrast"),
            ],
            total_points: 30,
            ..Quiz::default()
        }
    }

    fn submit(question_id: &str, answer: &str) -> QuizSubmission {
        QuizSubmission {
            question_id: question_id.into(),
            answer: answer.into(),
        }
    }

    #[test]
    fn answers_match_case_and_whitespace_insensitively() {
        let q = question("q1", CorrectAnswer::One(" Alt Text ".into()), "t");
        assert!(is_answer_correct(&q, "  alt text"));
        assert!(!is_answer_correct(&q, ""));
        assert!(!is_answer_correct(&q, "alt"));

        let many = question("q2", CorrectAnswer::Many(vec!["a".into(), "B".into()]), "t");
        assert!(is_answer_correct(&many, "b"));
    }

    #[test]
    fn basic_grading() {
        let result = grade_basic(
            &quiz(),
            &[submit("q1", "alt text"), submit("q2", "3:1"), submit("q9", "x")],
        );

        assert_eq!(result.score, 10.0);
        assert_eq!(result.percentage, 33);
        assert_eq!(result.topics_to_review, vec!["Color contrast"]);
        assert_eq!(result.recommendations.len(), 2);
        assert_eq!(result.answers[0].explanation, "Correct! Because.");
        assert_eq!(result.answers[2].user_answer, "");
        assert_eq!(result.answers[2].explanation, "Incorrect. Because.");
    }

    #[test]
    fn passing_score_gets_single_recommendation() {
        let result = grade_basic(
            &quiz(),
            &[submit("q1", "alt text"), submit("q2", "4.5 to 1"), submit("q3", "TRUE")],
        );
        assert_eq!(result.percentage, 100);
        assert!(result.topics_to_review.is_empty());
        assert_eq!(
            result.recommendations,
            vec!["Great job! Continue practicing to maintain your knowledge"]
        );
    }

    #[test]
    fn zero_total_points_gives_zero_percentage() {
        let result = grade_basic(&Quiz::default(), &[]);
        assert_eq!(result.percentage, 0);
        assert!(result.answers.is_empty());
    }

    #[test]
    fn ai_verdicts_override_and_clamp() {
        let reply = serde_json::json!({
            "answers": [
                { "questionId": "q1", "isCorrect": false, "pointsEarned": 5, "explanation": "Partly." },
                { "questionId": "q2", "isCorrect": true, "pointsEarned": 50 }
            ]
        });

        let result = parse_reply(
            &quiz(),
            &[submit("q1", "alt"), submit("q2", "four and a half"), submit("q3", "true")],
            &reply,
        );

        assert_eq!(result.answers[0].points_earned, 5.0);
        assert_eq!(result.answers[0].explanation, "Partly.");
        assert_eq!(result.answers[1].points_earned, 10.0);
        assert_eq!(result.answers[1].explanation, "Correct! Because.");
        // No verdict for q3: exact-match grading applies.
        assert!(result.answers[2].is_correct);
        assert_eq!(result.score, 25.0);
        assert_eq!(result.percentage, 83);
        assert_eq!(result.topics_to_review, vec!["Missing alt text"]);
        assert_eq!(result.recommendations.len(), 2);
    }

    #[test]
    fn ai_lists_win_when_present() {
        let reply = serde_json::json!({
            "answers": [],
            "topicsToReview": ["Focus management"],
            "recommendations": []
        });

        let result = parse_reply(&quiz(), &[], &reply);

        assert_eq!(result.topics_to_review, vec!["Focus management"]);
        assert!(result.recommendations.is_empty());
        assert_eq!(result.percentage, 0);
    }

    #[test]
    fn failing_ai_grade_uses_extended_defaults() {
        let result = parse_reply(&quiz(), &[], &serde_json::json!({}));
        assert_eq!(result.recommendations.len(), 3);
        assert_eq!(
            result.topics_to_review,
            vec!["Missing alt text", "Color contrast"]
        );
    }

    #[test]
    fn prompt_embeds_user_answers() {
        let prompt = build_prompt(&quiz(), &[submit("q2", "3:1")]);
        assert!(prompt.contains(r#""userAnswer": "3:1""#));
        assert!(prompt.contains(r#""type": "mcq""#));
    }
}
