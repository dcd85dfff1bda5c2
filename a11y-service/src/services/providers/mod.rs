//! Chat-completion provider abstraction.
//!
//! Every AI feature talks to the model through [`ChatProvider`], so the
//! OpenAI backend can be swapped for the scripted mock in tests.

pub mod mock;
pub mod openai;

use crate::services::metrics;
use async_trait::async_trait;
use serde_json::Value;
use std::time::Instant;
use thiserror::Error;

/// Error type for provider operations.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("OpenAI API key is not configured")]
    NotConfigured,

    #[error("OpenAI API error: {0}")]
    ApiError(String),

    #[error("OpenAI API rate limit exceeded")]
    RateLimited,

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("No content in OpenAI response")]
    EmptyResponse,

    #[error("Failed to parse OpenAI response as JSON: {0}")]
    InvalidResponse(String),
}

impl ProviderError {
    fn kind(&self) -> &'static str {
        match self {
            ProviderError::NotConfigured => "not_configured",
            ProviderError::ApiError(_) => "api_error",
            ProviderError::RateLimited => "rate_limited",
            ProviderError::NetworkError(_) => "network_error",
            ProviderError::EmptyResponse => "empty_response",
            ProviderError::InvalidResponse(_) => "invalid_response",
        }
    }
}

/// Reason why generation stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishReason {
    Complete,
    Length,
    ContentFilter,
    Other,
}

impl FinishReason {
    pub fn from_api(reason: Option<&str>) -> Self {
        match reason {
            Some("stop") => FinishReason::Complete,
            Some("length") => FinishReason::Length,
            Some("content_filter") => FinishReason::ContentFilter,
            _ => FinishReason::Other,
        }
    }
}

/// A single system + user exchange.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub system_prompt: String,
    pub user_prompt: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Ask the model for a JSON object reply.
    pub json_mode: bool,
}

impl ChatRequest {
    pub fn json(
        system_prompt: impl Into<String>,
        user_prompt: impl Into<String>,
        temperature: f32,
        max_tokens: u32,
    ) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            user_prompt: user_prompt.into(),
            temperature,
            max_tokens,
            json_mode: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ChatCompletion {
    pub content: String,
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub finish_reason: FinishReason,
}

#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Short label used in logs and metrics.
    fn name(&self) -> &'static str;

    /// Whether credentials are present. AI features check this before calling.
    fn is_configured(&self) -> bool;

    async fn complete(&self, request: &ChatRequest) -> Result<ChatCompletion, ProviderError>;
}

/// Run `request` and parse the reply as a JSON object.
///
/// `feature` labels the request in metrics (`explanation`, `learning`, ...).
pub async fn complete_json(
    provider: &dyn ChatProvider,
    feature: &'static str,
    request: &ChatRequest,
) -> Result<Value, ProviderError> {
    let started = Instant::now();
    let result = provider.complete(request).await.and_then(|completion| {
        metrics::record_llm_tokens(completion.input_tokens, completion.output_tokens);
        if completion.finish_reason == FinishReason::Length {
            tracing::warn!(
                provider = provider.name(),
                feature,
                "Model reply was truncated at max_tokens"
            );
        }
        parse_object(&completion.content)
    });
    metrics::record_llm_latency(feature, started.elapsed().as_secs_f64());

    match &result {
        Ok(_) => metrics::record_llm_request(feature, "success"),
        Err(e) => {
            tracing::warn!(provider = provider.name(), feature, error = %e, "LLM request failed");
            metrics::record_llm_request(feature, e.kind());
        }
    }

    result
}

fn parse_object(content: &str) -> Result<Value, ProviderError> {
    let value: Value = serde_json::from_str(content)
        .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;
    if value.is_object() {
        Ok(value)
    } else {
        Err(ProviderError::InvalidResponse(
            "expected a JSON object".to_string(),
        ))
    }
}
