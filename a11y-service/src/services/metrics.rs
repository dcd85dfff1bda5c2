//! Metrics collection and Prometheus export.
//!
//! Installs the Prometheus recorder and provides helpers for the scan and
//! LLM counters. HTTP request metrics come from the shared middleware.

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;

/// Global handle to the Prometheus recorder.
pub static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the Prometheus recorder. Later calls are no-ops.
pub fn init_metrics() -> Result<(), anyhow::Error> {
    if METRICS_HANDLE.get().is_some() {
        return Ok(());
    }

    let handle = PrometheusBuilder::new().install_recorder()?;
    let _ = METRICS_HANDLE.set(handle);

    tracing::info!("Prometheus metrics initialized");
    Ok(())
}

/// Get the current metrics in Prometheus text format.
pub fn get_metrics() -> String {
    METRICS_HANDLE
        .get()
        .map(|handle| handle.render())
        .unwrap_or_else(|| "# Metrics recorder not initialized\n".to_string())
}

/// Record a finished scan. `outcome` is `success` or `failure`.
pub fn record_scan(outcome: &'static str, duration_secs: f64) {
    counter!("a11y_scans_total", "outcome" => outcome).increment(1);
    histogram!("a11y_scan_duration_seconds", "outcome" => outcome).record(duration_secs);
}

pub fn record_llm_request(feature: &'static str, outcome: &'static str) {
    counter!("llm_requests_total", "feature" => feature, "outcome" => outcome).increment(1);
}

pub fn record_llm_latency(feature: &'static str, duration_secs: f64) {
    histogram!("llm_request_duration_seconds", "feature" => feature).record(duration_secs);
}

pub fn record_llm_tokens(input_tokens: u32, output_tokens: u32) {
    counter!("llm_tokens_total", "type" => "input").increment(u64::from(input_tokens));
    counter!("llm_tokens_total", "type" => "output").increment(u64::from(output_tokens));
}
