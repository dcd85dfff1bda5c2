//! Scripted provider for tests.

use super::{ChatCompletion, ChatProvider, ChatRequest, FinishReason, ProviderError};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Replays queued replies in order and records every request it receives.
pub struct MockChatProvider {
    enabled: bool,
    replies: Mutex<VecDeque<Result<String, ProviderError>>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl MockChatProvider {
    /// A disabled mock behaves like a provider with no API key.
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            replies: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn push_reply(&self, content: impl Into<String>) {
        self.replies
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push_back(Ok(content.into()));
    }

    pub fn push_error(&self, error: ProviderError) {
        self.replies
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push_back(Err(error));
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl ChatProvider for MockChatProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn is_configured(&self) -> bool {
        self.enabled
    }

    async fn complete(&self, request: &ChatRequest) -> Result<ChatCompletion, ProviderError> {
        if !self.enabled {
            return Err(ProviderError::NotConfigured);
        }

        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(request.clone());

        let reply = self
            .replies
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .pop_front()
            .unwrap_or(Err(ProviderError::EmptyResponse))?;

        Ok(ChatCompletion {
            input_tokens: (request.user_prompt.len() / 4) as u32,
            output_tokens: (reply.len() / 4) as u32,
            content: reply,
            finish_reason: FinishReason::Complete,
        })
    }
}
