//! pa11y runner: audits a page by spawning Node.js with a small driver script.

use super::chrome::ChromeLocator;
use super::{AccessibilityRunner, RawScanResult, ScanError, ScanOptions};
use crate::config::ScannerConfig;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

/// Extra process budget on top of the page timeout and wait.
const PROCESS_SLACK: Duration = Duration::from_secs(30);

/// Flags for constrained container hosts.
pub const CHROME_ARGS: [&str; 8] = [
    "--no-sandbox",
    "--disable-setuid-sandbox",
    "--disable-dev-shm-usage",
    "--disable-accelerated-2d-canvas",
    "--no-first-run",
    "--no-zygote",
    "--disable-gpu",
    "--single-process",
];

/// Reads `<url> <options-json>` from argv and prints the pa11y result as JSON.
const DRIVER_SCRIPT: &str = r#"
const pa11y = require('pa11y');
const [url, rawOptions] = process.argv.slice(-2);
const options = JSON.parse(rawOptions);
options.log = {
  debug: () => {},
  info: () => {},
  error: (message) => process.stderr.write(String(message) + '\n'),
};
pa11y(url, options)
  .then((results) => {
    process.stdout.write(JSON.stringify({
      documentTitle: results.documentTitle,
      pageUrl: results.pageUrl,
      issues: results.issues,
    }));
  })
  .catch((error) => {
    process.stderr.write(error && error.message ? error.message : String(error));
    process.exit(1);
  });
"#;

pub struct Pa11yRunner {
    node_binary: String,
    workdir: Option<PathBuf>,
    cache_dir: PathBuf,
    process_timeout: Duration,
    chrome: ChromeLocator,
}

impl Pa11yRunner {
    pub fn new(config: &ScannerConfig) -> Self {
        Self {
            node_binary: config.node_binary.clone(),
            workdir: config.workdir.clone(),
            cache_dir: config.cache_dir.clone(),
            process_timeout: Duration::from_secs(config.process_timeout_secs),
            chrome: ChromeLocator::from_config(config),
        }
    }

    /// Page timeout plus wait plus slack, never above the configured cap.
    fn process_budget(&self, options: &ScanOptions) -> Duration {
        let page_budget = Duration::from_millis(options.timeout.saturating_add(options.wait));
        page_budget
            .saturating_add(PROCESS_SLACK)
            .min(self.process_timeout)
    }
}

/// pa11y options JSON for `options`, with the fixed Chrome launch config.
pub fn pa11y_options(options: &ScanOptions, executable: Option<&Path>) -> Value {
    let mut launch = json!({
        "args": CHROME_ARGS,
        "ignoreHTTPSErrors": true,
    });
    if let Some(path) = executable {
        launch["executablePath"] = json!(path.to_string_lossy());
    }

    json!({
        "standard": options.standard.as_str(),
        "includeWarnings": options.include_warnings,
        "includeNotices": options.include_notices,
        "actions": options.actions,
        "wait": options.wait,
        "timeout": options.timeout,
        "hideElements": options.hide_elements,
        "chromeLaunchConfig": launch,
    })
}

#[async_trait]
impl AccessibilityRunner for Pa11yRunner {
    async fn run(&self, url: &str, options: &ScanOptions) -> Result<RawScanResult, ScanError> {
        let executable = self.chrome.discover_executable().await;
        let options_json = pa11y_options(options, executable.as_deref()).to_string();
        let budget = self.process_budget(options);

        let mut cmd = Command::new(&self.node_binary);
        cmd.arg("-e")
            .arg(DRIVER_SCRIPT)
            .arg("--")
            .arg(url)
            .arg(&options_json)
            .env("PUPPETEER_CACHE_DIR", &self.cache_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        if let Some(dir) = &self.workdir {
            cmd.current_dir(dir);
        }

        tracing::debug!(
            url = %url,
            standard = options.standard.as_str(),
            timeout_secs = budget.as_secs(),
            "Starting pa11y"
        );

        let output = tokio::time::timeout(budget, cmd.output())
            .await
            .map_err(|_| ScanError::Timeout(budget.as_secs()))?
            .map_err(|e| ScanError::Spawn(format!("{}: {}", self.node_binary, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            tracing::error!(url = %url, status = %output.status, stderr = %stderr, "pa11y failed");
            return Err(ScanError::Failed(if stderr.is_empty() {
                format!("pa11y exited with {}", output.status)
            } else {
                stderr
            }));
        }

        let result: RawScanResult = serde_json::from_slice(&output.stdout)
            .map_err(|e| ScanError::InvalidOutput(e.to_string()))?;

        tracing::debug!(
            url = %url,
            issues = result.issues.len(),
            "pa11y finished"
        );

        Ok(result)
    }
}
