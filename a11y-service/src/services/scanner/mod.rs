//! Headless-browser accessibility scanning.
//!
//! [`AccessibilityRunner`] hides how the page is audited. The production
//! runner drives pa11y through Node.js; tests use [`mock::MockRunner`].

pub mod chrome;
pub mod mock;
pub mod pa11y;

use crate::models::{AnalysisRequest, Issue, Standard};
use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

const DEFAULT_TIMEOUT_MS: u64 = 30_000;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Failed to start scanner: {0}")]
    Spawn(String),

    #[error("Scan timed out after {0} seconds")]
    Timeout(u64),

    #[error("{0}")]
    Failed(String),

    #[error("Scanner returned invalid output: {0}")]
    InvalidOutput(String),
}

/// Audit settings after request defaults are applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanOptions {
    pub standard: Standard,
    pub include_warnings: bool,
    pub include_notices: bool,
    pub actions: Vec<String>,
    /// Milliseconds to wait after load.
    pub wait: u64,
    /// Page timeout in milliseconds.
    pub timeout: u64,
    pub hide_elements: String,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            standard: Standard::default(),
            include_warnings: true,
            include_notices: true,
            actions: Vec::new(),
            wait: 0,
            timeout: DEFAULT_TIMEOUT_MS,
            hide_elements: String::new(),
        }
    }
}

impl From<&AnalysisRequest> for ScanOptions {
    fn from(request: &AnalysisRequest) -> Self {
        let defaults = ScanOptions::default();
        Self {
            standard: request.standard.unwrap_or(defaults.standard),
            include_warnings: request.include_warnings.unwrap_or(defaults.include_warnings),
            include_notices: request.include_notices.unwrap_or(defaults.include_notices),
            actions: request.actions.clone().unwrap_or_default(),
            wait: request.wait.unwrap_or(defaults.wait),
            // Zero means "not set".
            timeout: request
                .timeout
                .filter(|timeout| *timeout > 0)
                .unwrap_or(defaults.timeout),
            hide_elements: request.hide_elements.clone().unwrap_or_default(),
        }
    }
}

/// Page-level output of one audit run.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawScanResult {
    #[serde(default)]
    pub document_title: String,
    #[serde(default)]
    pub page_url: String,
    #[serde(default)]
    pub issues: Vec<Issue>,
}

#[async_trait]
pub trait AccessibilityRunner: Send + Sync {
    async fn run(&self, url: &str, options: &ScanOptions) -> Result<RawScanResult, ScanError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_fill_defaults() {
        let options = ScanOptions::from(&AnalysisRequest {
            url: "https://example.com".into(),
            timeout: Some(0),
            ..AnalysisRequest::default()
        });

        assert_eq!(options, ScanOptions::default());
        assert_eq!(options.standard, Standard::Wcag2AA);
        assert_eq!(options.timeout, 30_000);
    }

    #[test]
    fn options_keep_caller_values() {
        let options = ScanOptions::from(&AnalysisRequest {
            url: "https://example.com".into(),
            standard: Some(Standard::Wcag2AAA),
            include_notices: Some(false),
            actions: Some(vec!["click element #accept".into()]),
            wait: Some(500),
            timeout: Some(10_000),
            ..AnalysisRequest::default()
        });

        assert_eq!(options.standard, Standard::Wcag2AAA);
        assert!(options.include_warnings);
        assert!(!options.include_notices);
        assert_eq!(options.actions.len(), 1);
        assert_eq!(options.wait, 500);
        assert_eq!(options.timeout, 10_000);
    }
}
