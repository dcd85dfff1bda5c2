//! Canned runner for tests.

use super::{AccessibilityRunner, RawScanResult, ScanError, ScanOptions};
use async_trait::async_trait;
use std::sync::Mutex;

pub struct MockRunner {
    outcome: Result<RawScanResult, String>,
    calls: Mutex<Vec<(String, ScanOptions)>>,
}

impl MockRunner {
    pub fn succeeding(result: RawScanResult) -> Self {
        Self {
            outcome: Ok(result),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Every run fails with `ScanError::Failed(message)`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            outcome: Err(message.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// URLs and options of every run so far.
    pub fn calls(&self) -> Vec<(String, ScanOptions)> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl AccessibilityRunner for MockRunner {
    async fn run(&self, url: &str, options: &ScanOptions) -> Result<RawScanResult, ScanError> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push((url.to_string(), options.clone()));

        self.outcome.clone().map_err(ScanError::Failed)
    }
}
