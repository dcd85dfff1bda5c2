use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueType {
    #[default]
    Error,
    Warning,
    Notice,
}

impl IssueType {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueType::Error => "error",
            IssueType::Warning => "warning",
            IssueType::Notice => "notice",
        }
    }
}

/// A single finding reported by the scanner.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub context: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub selector: String,
    #[serde(rename = "type", default)]
    pub issue_type: IssueType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runner_extras: Option<serde_json::Map<String, serde_json::Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fix: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Standard {
    #[serde(rename = "WCAG2A")]
    Wcag2A,
    #[default]
    #[serde(rename = "WCAG2AA")]
    Wcag2AA,
    #[serde(rename = "WCAG2AAA")]
    Wcag2AAA,
    Section508,
}

impl Standard {
    pub fn as_str(&self) -> &'static str {
        match self {
            Standard::Wcag2A => "WCAG2A",
            Standard::Wcag2AA => "WCAG2AA",
            Standard::Wcag2AAA => "WCAG2AAA",
            Standard::Section508 => "Section508",
        }
    }
}

/// Accepted for compatibility; the server always picks the browser and flags.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChromeLaunchConfig {
    pub args: Option<Vec<String>>,
    pub executable_path: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    #[serde(default)]
    pub url: String,
    pub standard: Option<Standard>,
    pub include_warnings: Option<bool>,
    pub include_notices: Option<bool>,
    pub actions: Option<Vec<String>>,
    pub wait: Option<u64>,
    pub timeout: Option<u64>,
    pub hide_elements: Option<String>,
    pub chrome_launch_config: Option<ChromeLaunchConfig>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StandardSummary {
    pub errors: usize,
    pub warnings: usize,
    pub notices: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResponse {
    pub document_title: String,
    pub page_url: String,
    pub issues: Vec<Issue>,
    pub standards: BTreeMap<String, StandardSummary>,
    pub aim_score: f64,
    pub timestamp: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn issue_reads_camel_case_and_defaults_type() {
        let issue: Issue = serde_json::from_value(json!({
            "code": "WCAG2AA.Principle1.Guideline1_1.1_1_1.H37",
            "message": "Img element missing an alt attribute.",
            "selector": "img",
            "runnerExtras": {"impact": "serious"}
        }))
        .unwrap();

        assert_eq!(issue.issue_type, IssueType::Error);
        assert_eq!(issue.context, "");
        assert!(issue.runner_extras.is_some());
    }

    #[test]
    fn standard_uses_wire_names() {
        let standard: Standard = serde_json::from_value(json!("Section508")).unwrap();
        assert_eq!(standard, Standard::Section508);
        assert_eq!(serde_json::to_value(Standard::Wcag2AAA).unwrap(), json!("WCAG2AAA"));
        assert!(serde_json::from_value::<Standard>(json!("WCAG3")).is_err());
    }
}
