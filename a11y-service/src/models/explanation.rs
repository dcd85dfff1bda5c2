use super::accessibility::{Issue, IssueType};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Body shared by `/explain-issue` and `POST /learning`.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct IssueExplanationRequest {
    #[serde(default)]
    #[validate(length(min = 1))]
    pub code: String,
    #[serde(default)]
    pub context: String,
    #[serde(default)]
    #[validate(length(min = 1))]
    pub message: String,
    #[serde(default)]
    #[validate(length(min = 1))]
    pub selector: String,
    #[serde(rename = "type", default)]
    pub issue_type: IssueType,
}

impl From<IssueExplanationRequest> for Issue {
    fn from(request: IssueExplanationRequest) -> Self {
        Issue {
            code: request.code,
            context: request.context,
            message: request.message,
            selector: request.selector,
            issue_type: request.issue_type,
            ..Issue::default()
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    #[default]
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeFix {
    pub description: String,
    pub before_code: String,
    pub after_code: String,
    pub explanation: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueDetails {
    pub impact: String,
    pub wcag_guideline: String,
    pub affected_users: Vec<String>,
    pub severity: Severity,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueExplanationResponse {
    pub explanation: String,
    pub fix: String,
    pub details: IssueDetails,
    pub suggestions: Vec<Suggestion>,
    pub code_fixes: Vec<CodeFix>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_required_fields_fail_validation() {
        let request: IssueExplanationRequest =
            serde_json::from_value(json!({ "code": "x", "message": "" })).unwrap();
        assert!(request.validate().is_err());

        let request: IssueExplanationRequest = serde_json::from_value(json!({
            "code": "x", "message": "m", "selector": "img"
        }))
        .unwrap();
        assert!(request.validate().is_ok());
        assert_eq!(request.issue_type, IssueType::Error);
    }
}
