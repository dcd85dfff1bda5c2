//! URL analysis: request validation, scanning, issue summary and AIM score.

use crate::models::{AnalysisRequest, AnalysisResponse, Issue, IssueType, StandardSummary};
use crate::services::metrics;
use crate::services::scanner::{AccessibilityRunner, ScanError, ScanOptions};
use chrono::{SecondsFormat, Utc};
use service_core::error::AppError;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("{0}")]
    InvalidRequest(&'static str),

    #[error("Failed to analyze accessibility: {0}")]
    Scan(#[from] ScanError),
}

impl From<AnalysisError> for AppError {
    fn from(err: AnalysisError) -> Self {
        AppError::BadRequest(anyhow::anyhow!(err.to_string())).titled("Accessibility analysis failed")
    }
}

/// Check that `url` is present and absolute.
pub fn validate_request(request: &AnalysisRequest) -> Result<Url, AnalysisError> {
    if request.url.is_empty() {
        return Err(AnalysisError::InvalidRequest("URL is required"));
    }
    Url::parse(&request.url).map_err(|_| AnalysisError::InvalidRequest("Invalid URL format"))
}

pub fn summarize(issues: &[Issue]) -> StandardSummary {
    issues
        .iter()
        .fold(StandardSummary::default(), |mut summary, issue| {
            match issue.issue_type {
                IssueType::Error => summary.errors += 1,
                IssueType::Warning => summary.warnings += 1,
                IssueType::Notice => summary.notices += 1,
            }
            summary
        })
}

/// Accessibility Impact Metric: 10 minus weighted issue counts, clamped to
/// 0..=10 and rounded to one decimal.
pub fn aim_score(summary: &StandardSummary) -> f64 {
    let raw = 10.0
        - summary.errors as f64 * 0.4
        - summary.warnings as f64 * 0.15
        - summary.notices as f64 * 0.05;
    (raw.clamp(0.0, 10.0) * 10.0).round() / 10.0
}

#[derive(Clone)]
pub struct AnalysisService {
    runner: Arc<dyn AccessibilityRunner>,
}

impl AnalysisService {
    pub fn new(runner: Arc<dyn AccessibilityRunner>) -> Self {
        Self { runner }
    }

    pub async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResponse, AnalysisError> {
        let url = validate_request(request)?;
        let options = ScanOptions::from(request);

        if request.chrome_launch_config.is_some() {
            tracing::debug!("Ignoring caller-supplied chromeLaunchConfig");
        }

        let started = Instant::now();
        let result = self.runner.run(url.as_str(), &options).await;
        let elapsed = started.elapsed().as_secs_f64();

        let raw = match result {
            Ok(raw) => {
                metrics::record_scan("success", elapsed);
                raw
            }
            Err(e) => {
                metrics::record_scan("failure", elapsed);
                tracing::error!(url = %url, error = %e, "Accessibility analysis error");
                return Err(e.into());
            }
        };

        let issues: Vec<Issue> = raw
            .issues
            .into_iter()
            .map(|issue| Issue {
                code: issue.code,
                context: issue.context,
                message: issue.message,
                selector: issue.selector,
                issue_type: issue.issue_type,
                ..Issue::default()
            })
            .collect();

        let summary = summarize(&issues);
        let score = aim_score(&summary);

        tracing::info!(
            url = %url,
            errors = summary.errors,
            warnings = summary.warnings,
            notices = summary.notices,
            aim_score = score,
            "Accessibility analysis complete"
        );

        Ok(AnalysisResponse {
            document_title: raw.document_title,
            page_url: raw.page_url,
            issues,
            standards: BTreeMap::from([(options.standard.as_str().to_string(), summary)]),
            aim_score: score,
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        })
    }
}
