//! AI explanation of a single scanner finding.

use crate::models::{
    CodeFix, Issue, IssueDetails, IssueExplanationResponse, Priority, Severity, Suggestion,
};
use crate::services::providers::{complete_json, ChatProvider, ChatRequest, ProviderError};
use crate::services::reply::{array, flag, string_list, text, text_or_empty};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use service_core::error::AppError;
use std::sync::Arc;

const SYSTEM_PROMPT: &str = "You are an expert WCAG 2.1 / 2.2 accessibility auditor.

You analyze accessibility issues detected by automated tools (Pa11y, axe, Lighthouse).
You clearly classify findings as Pass, Warning, or Fail.
You explain issues in simple language for frontend developers.
You always prefer semantic HTML and avoid unnecessary ARIA.
You provide minimal, standards-compliant fixes only when required.";

const TEMPERATURE: f32 = 0.7;
const MAX_TOKENS: u32 = 2000;
const NO_ACTION_REQUIRED: &str = "No action required";

static VISIBLE_TEXT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r">([^<]+)<").expect("valid visible-text pattern"));
static EMPTY_ALT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"alt\s*=\s*["']\s*["']"#).expect("valid empty-alt pattern"));

#[derive(Clone)]
pub struct ExplanationService {
    provider: Arc<dyn ChatProvider>,
}

impl ExplanationService {
    pub fn new(provider: Arc<dyn ChatProvider>) -> Self {
        Self { provider }
    }

    pub async fn explain(&self, issue: &Issue) -> Result<IssueExplanationResponse, AppError> {
        if !self.provider.is_configured() {
            return Err(AppError::InternalError(ProviderError::NotConfigured.into()));
        }

        let request = ChatRequest::json(SYSTEM_PROMPT, build_prompt(issue), TEMPERATURE, MAX_TOKENS);
        let parsed = complete_json(self.provider.as_ref(), "explanation", &request)
            .await
            .map_err(|e| {
                tracing::error!(code = %issue.code, error = %e, "AI explanation error");
                AppError::InternalError(anyhow::anyhow!("Failed to generate explanation: {}", e))
            })?;

        Ok(parse_reply(&parsed, issue))
    }
}

/// Hints about the snippet that help the model judge whether the finding is real.
pub fn context_hints(html: &str) -> Vec<&'static str> {
    let mut hints = Vec::new();

    if html.contains("<a") || html.contains("</a>") {
        hints.push("The element is inside a clickable link (<a>)");
    }
    if html.contains("<button") || html.contains("</button>") {
        hints.push("The element is inside or is a button");
    }
    if VISIBLE_TEXT
        .captures(html)
        .and_then(|caps| caps.get(1))
        .is_some_and(|text| !text.as_str().trim().is_empty())
    {
        hints.push("The link also contains visible text");
    }
    if EMPTY_ALT.is_match(html) {
        hints.push("The image uses an empty alt attribute");
    }

    hints
}

pub fn build_prompt(issue: &Issue) -> String {
    let html = if issue.context.is_empty() {
        "N/A"
    } else {
        issue.context.as_str()
    };

    let hints = context_hints(html);
    let context = if hints.is_empty() {
        "- No additional context provided".to_string()
    } else {
        hints
            .iter()
            .map(|hint| format!("- {}", hint))
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        r#"Analyze the following accessibility issue and generate a solution for the end user.

Issue message:
"{message}"

HTML snippet:
```html
{html}
```

Context:
{context}

Provide the response in the following structured format ONLY as valid JSON:

{{
  "title": "Short, clear issue title",
  "verdict": "Pass | Warning | Fail",
  "wcag": {{
    "criterion": "Include success criterion number (e.g., '1.1.1')",
    "name": "Include success criterion name (e.g., 'Non-text Content')"
  }},
  "explanation": "Explain in simple terms why this happens (1-2 sentences)",
  "isProblem": true | false,
  "problemReasoning": "One-line reasoning if isProblem is true, otherwise explain why it's not a problem",
  "solution": {{
    "required": true | false,
    "code": "If required is true, show the corrected HTML code. If false, say 'No action required'"
  }},
  "developerNote": "One short tip or best practice"
}}

IMPORTANT:
- Analyze the SPECIFIC HTML code provided above
- Reference actual attributes, content, and context
- If the image/element is decorative and already has accessible text nearby, verdict should be "Pass" and isProblem should be false
- Prefer semantic HTML over ARIA when possible
- Only provide fixes when actually needed
- Ensure all JSON is valid and properly escaped"#,
        message = issue.message,
    )
}

/// Dispatch on reply shape: the verdict format, or the older flat format.
pub fn parse_reply(parsed: &Value, issue: &Issue) -> IssueExplanationResponse {
    let is_verdict_format = text(parsed, "title").is_some()
        && text(parsed, "verdict").is_some()
        && parsed.get("wcag").is_some_and(Value::is_object);

    if is_verdict_format {
        parse_verdict_reply(parsed, issue)
    } else {
        parse_flat_reply(parsed, issue)
    }
}

fn severity_for_verdict(verdict: &str) -> Severity {
    match verdict {
        "fail" => Severity::High,
        "warning" => Severity::Medium,
        "pass" => Severity::Low,
        _ => Severity::Medium,
    }
}

fn parse_verdict_reply(parsed: &Value, issue: &Issue) -> IssueExplanationResponse {
    let verdict = text_or_empty(parsed, "verdict").to_lowercase();
    let severity = severity_for_verdict(&verdict);
    let is_problem = flag(parsed, "isProblem");

    let solution = parsed.get("solution").unwrap_or(&Value::Null);
    let solution_code = if flag(solution, "required") {
        text(solution, "code").filter(|code| code != NO_ACTION_REQUIRED)
    } else {
        None
    };

    let title = text_or_empty(parsed, "title");
    let explanation_text = text_or_empty(parsed, "explanation");
    let reasoning = text(parsed, "problemReasoning");
    let developer_note = text(parsed, "developerNote");

    let explanation = if !title.is_empty() && !explanation_text.is_empty() {
        let mut full = format!("{}\n\n{}", title, explanation_text);
        if let Some(reasoning) = &reasoning {
            full.push_str(&format!("\n\nIs this a problem? {}", reasoning));
        }
        if let Some(note) = &developer_note {
            full.push_str(&format!("\n\nDeveloper note: {}", note));
        }
        full
    } else if !explanation_text.is_empty() {
        explanation_text.clone()
    } else {
        title
    };

    let wcag = &parsed["wcag"];
    let wcag_guideline = match (text(wcag, "criterion"), text(wcag, "name")) {
        (Some(criterion), Some(name)) => format!("WCAG 2.1 – {} {}", criterion, name),
        (Some(criterion), None) => format!("WCAG 2.1 – {}", criterion),
        _ => String::new(),
    };

    let impact = match &reasoning {
        Some(reasoning) => format!(
            "This is {}a problem. {}",
            if is_problem { "" } else { "not " },
            reasoning
        ),
        None => explanation_text,
    };

    let mut suggestions = Vec::new();
    if let Some(note) = &developer_note {
        suggestions.push(Suggestion {
            title: "Best Practice".to_string(),
            description: note.clone(),
            priority: if severity == Severity::High {
                Priority::High
            } else {
                Priority::Medium
            },
            example: None,
        });
    }
    suggestions.extend(array(parsed, "suggestions").iter().filter_map(suggestion_from));

    let mut code_fixes = Vec::new();
    if let Some(code) = &solution_code {
        code_fixes.push(CodeFix {
            description: text(solution, "description")
                .unwrap_or_else(|| "Recommended fix".to_string()),
            before_code: issue.context.clone(),
            after_code: code.clone(),
            explanation: developer_note.clone().unwrap_or_default(),
        });
    }
    code_fixes.extend(array(parsed, "codeFixes").iter().filter_map(code_fix_from));

    IssueExplanationResponse {
        explanation,
        fix: solution_code.unwrap_or_else(|| issue.context.clone()),
        details: IssueDetails {
            impact,
            wcag_guideline,
            affected_users: string_list(parsed, "affectedUsers").unwrap_or_default(),
            severity,
        },
        suggestions,
        code_fixes,
    }
}

fn parse_flat_reply(parsed: &Value, issue: &Issue) -> IssueExplanationResponse {
    let details = match parsed.get("details") {
        Some(details) if details.is_object() => IssueDetails {
            impact: text_or_empty(details, "impact"),
            wcag_guideline: text_or_empty(details, "wcagGuideline"),
            affected_users: string_list(details, "affectedUsers").unwrap_or_default(),
            severity: details
                .get("severity")
                .and_then(|s| serde_json::from_value(s.clone()).ok())
                .unwrap_or_default(),
        },
        _ => IssueDetails::default(),
    };

    IssueExplanationResponse {
        explanation: text_or_empty(parsed, "explanation"),
        fix: text(parsed, "fix").unwrap_or_else(|| issue.context.clone()),
        details,
        suggestions: array(parsed, "suggestions")
            .iter()
            .filter_map(suggestion_from)
            .collect(),
        code_fixes: array(parsed, "codeFixes")
            .iter()
            .filter_map(code_fix_from)
            .collect(),
    }
}

/// Suggestions need a title, a description and a known priority.
fn suggestion_from(value: &Value) -> Option<Suggestion> {
    Some(Suggestion {
        title: text(value, "title")?,
        description: text(value, "description")?,
        priority: serde_json::from_value(value.get("priority")?.clone()).ok()?,
        example: text(value, "example"),
    })
}

fn code_fix_from(value: &Value) -> Option<CodeFix> {
    Some(CodeFix {
        description: text(value, "description")?,
        before_code: text(value, "beforeCode")?,
        after_code: text(value, "afterCode")?,
        explanation: text_or_empty(value, "explanation"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::providers::mock::MockChatProvider;
    use serde_json::json;

    fn issue(context: &str) -> Issue {
        Issue {
            code: "WCAG2AA.Principle1.Guideline1_1.1_1_1.H37".into(),
            context: context.into(),
            message: "Img element missing an alt attribute.".into(),
            selector: "img".into(),
            ..Issue::default()
        }
    }

    #[test]
    fn hints_describe_the_snippet() {
        let hints = context_hints(r#"<a href="/"><img src="logo.png" alt=""> Home</a>"#);
        assert_eq!(
            hints,
            vec![
                "The element is inside a clickable link (<a>)",
                "The link also contains visible text",
                "The image uses an empty alt attribute",
            ]
        );

        assert!(context_hints("<button>  </button>")
            .contains(&"The element is inside or is a button"));
        assert!(context_hints("N/A").is_empty());
    }

    #[test]
    fn prompt_falls_back_for_missing_snippet() {
        let prompt = build_prompt(&issue(""));
        assert!(prompt.contains("```html\nN/A\n```"));
        assert!(prompt.contains("- No additional context provided"));
        assert!(prompt.contains("\"Img element missing an alt attribute.\""));
    }

    #[test]
    fn verdict_reply_is_reshaped() {
        let reply = json!({
            "title": "Image missing alt text",
            "verdict": "Fail",
            "wcag": { "criterion": "1.1.1", "name": "Non-text Content" },
            "explanation": "Screen readers cannot describe the image.",
            "isProblem": true,
            "problemReasoning": "The image conveys information.",
            "solution": { "required": true, "code": "<img src=\"a.png\" alt=\"Logo\">" },
            "developerNote": "Describe purpose, not appearance.",
            "suggestions": [
                { "title": "Audit", "description": "Check all images", "priority": "low" },
                { "title": "Broken", "description": "No priority" }
            ]
        });

        let response = parse_reply(&reply, &issue("<img src=\"a.png\">"));

        assert_eq!(
            response.explanation,
            "Image missing alt text\n\nScreen readers cannot describe the image.\n\n\
             Is this a problem? The image conveys information.\n\n\
             Developer note: Describe purpose, not appearance."
        );
        assert_eq!(response.fix, "<img src=\"a.png\" alt=\"Logo\">");
        assert_eq!(response.details.severity, Severity::High);
        assert_eq!(response.details.wcag_guideline, "WCAG 2.1 – 1.1.1 Non-text Content");
        assert_eq!(
            response.details.impact,
            "This is a problem. The image conveys information."
        );
        assert_eq!(response.suggestions.len(), 2);
        assert_eq!(response.suggestions[0].title, "Best Practice");
        assert_eq!(response.suggestions[0].priority, Priority::High);
        assert_eq!(response.code_fixes.len(), 1);
        assert_eq!(response.code_fixes[0].before_code, "<img src=\"a.png\">");
        assert_eq!(response.code_fixes[0].description, "Recommended fix");
    }

    #[test]
    fn passing_verdict_keeps_submitted_markup() {
        let reply = json!({
            "title": "Decorative image",
            "verdict": "Pass",
            "wcag": { "criterion": "1.1.1" },
            "explanation": "The link text already names the target.",
            "isProblem": false,
            "problemReasoning": "Adjacent text labels the link.",
            "solution": { "required": false, "code": "No action required" }
        });

        let response = parse_reply(&reply, &issue("<a><img alt=\"\"> Home</a>"));

        assert_eq!(response.details.severity, Severity::Low);
        assert_eq!(response.details.wcag_guideline, "WCAG 2.1 – 1.1.1");
        assert!(response.details.impact.starts_with("This is not a problem."));
        assert_eq!(response.fix, "<a><img alt=\"\"> Home</a>");
        assert!(response.code_fixes.is_empty());
        assert!(response.suggestions.is_empty());
    }

    #[test]
    fn flat_reply_validates_severity_and_filters_entries() {
        let reply = json!({
            "explanation": "Missing alt.",
            "details": { "impact": "Blind users", "severity": "catastrophic" },
            "codeFixes": [
                { "description": "Add alt", "beforeCode": "<img>", "afterCode": "<img alt=\"x\">" },
                { "description": "Incomplete", "beforeCode": "<img>" }
            ]
        });

        let response = parse_reply(&reply, &issue("<img>"));

        assert_eq!(response.explanation, "Missing alt.");
        assert_eq!(response.fix, "<img>");
        assert_eq!(response.details.severity, Severity::Medium);
        assert_eq!(response.details.impact, "Blind users");
        assert_eq!(response.code_fixes.len(), 1);
        assert_eq!(response.code_fixes[0].explanation, "");
    }

    #[tokio::test]
    async fn missing_key_is_reported() {
        let service = ExplanationService::new(Arc::new(MockChatProvider::new(false)));
        let err = service.explain(&issue("<img>")).await.unwrap_err();
        assert!(err.to_string().contains("OpenAI API key is not configured"));
    }

    #[tokio::test]
    async fn provider_failures_are_wrapped() {
        let provider = Arc::new(MockChatProvider::new(true));
        provider.push_error(ProviderError::ApiError("500 Internal Server Error - {}".into()));
        let service = ExplanationService::new(provider.clone());

        let err = service.explain(&issue("<img>")).await.unwrap_err();
        assert!(err
            .to_string()
            .contains("Failed to generate explanation: OpenAI API error: 500"));

        let sent = provider.requests();
        assert_eq!(sent[0].temperature, 0.7);
        assert_eq!(sent[0].max_tokens, 2000);
        assert!(sent[0].json_mode);
    }
}
