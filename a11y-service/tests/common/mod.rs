#![allow(dead_code)]

use a11y_service::config::{
    A11yConfig, CorsConfig, OpenAiConfig, RateLimitConfig, ScannerConfig,
};
use a11y_service::models::{Issue, IssueType};
use a11y_service::services::providers::mock::MockChatProvider;
use a11y_service::services::scanner::mock::MockRunner;
use a11y_service::services::scanner::RawScanResult;
use a11y_service::{build_router, AppState};
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, Response},
    Router,
};
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;

pub const FRONTEND: &str = "https://a11y.example.com";

pub fn test_config() -> A11yConfig {
    A11yConfig {
        common: service_core::config::Config {
            port: 0,
            log_level: "error".to_string(),
        },
        openai: OpenAiConfig {
            api_key: None,
            api_url: "http://127.0.0.1:9/v1/chat/completions".to_string(),
            model: "gpt-4o-mini".to_string(),
            request_timeout_secs: 5,
        },
        scanner: ScannerConfig {
            node_binary: "node".to_string(),
            workdir: None,
            process_timeout_secs: 5,
            executable_path: None,
            cache_dir: PathBuf::from("/nonexistent/puppeteer"),
        },
        cors: CorsConfig {
            allowed_origins: vec![FRONTEND.to_string(), "http://localhost:3000".to_string()],
        },
        rate_limit: RateLimitConfig {
            analyse_per_minute: 10,
            trust_proxy_headers: false,
        },
        otlp_endpoint: None,
    }
}

pub fn issue(code: &str, message: &str, issue_type: IssueType) -> Issue {
    Issue {
        code: code.to_string(),
        context: "<img src=\"logo.png\">".to_string(),
        message: message.to_string(),
        selector: "html > body > img".to_string(),
        issue_type,
        ..Issue::default()
    }
}

pub fn sample_scan() -> RawScanResult {
    let mut extras = serde_json::Map::new();
    extras.insert("impact".to_string(), Value::from("serious"));

    RawScanResult {
        document_title: "Example Domain".to_string(),
        page_url: "https://example.com/".to_string(),
        issues: vec![
            Issue {
                runner_extras: Some(extras),
                ..issue(
                    "WCAG2AA.Principle1.Guideline1_1.1_1_1.H37",
                    "Img element missing an alt attribute.",
                    IssueType::Error,
                )
            },
            issue(
                "WCAG2AA.Principle1.Guideline1_4.1_4_3.G18.Fail",
                "This element has insufficient contrast at this conformance level.",
                IssueType::Warning,
            ),
            issue(
                "WCAG2AA.Principle1.Guideline1_3.1_3_1_A.G141",
                "The heading structure is not logically nested.",
                IssueType::Warning,
            ),
        ],
    }
}

pub struct TestApp {
    pub router: Router,
    pub runner: Arc<MockRunner>,
    pub provider: Arc<MockChatProvider>,
}

pub fn spawn_app(config: A11yConfig, runner: MockRunner, ai_enabled: bool) -> TestApp {
    let runner = Arc::new(runner);
    let provider = Arc::new(MockChatProvider::new(ai_enabled));
    let state = AppState::new(config, runner.clone(), provider.clone());

    TestApp {
        router: build_router(state),
        runner,
        provider,
    }
}

pub fn default_app(ai_enabled: bool) -> TestApp {
    spawn_app(test_config(), MockRunner::succeeding(sample_scan()), ai_enabled)
}

pub fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub async fn json_body(response: Response<Body>) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
