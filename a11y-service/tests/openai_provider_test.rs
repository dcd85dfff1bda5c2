use a11y_service::config::OpenAiConfig;
use a11y_service::services::providers::openai::OpenAiChatProvider;
use a11y_service::services::providers::{
    complete_json, ChatProvider, ChatRequest, FinishReason, ProviderError,
};
use secrecy::Secret;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn provider(server: &MockServer, api_key: Option<&str>) -> OpenAiChatProvider {
    OpenAiChatProvider::new(&OpenAiConfig {
        api_key: api_key.map(|key| Secret::new(key.to_string())),
        api_url: format!("{}/v1/chat/completions", server.uri()),
        model: "gpt-4o-mini".to_string(),
        request_timeout_secs: 5,
    })
    .unwrap()
}

fn request() -> ChatRequest {
    ChatRequest::json("You are a tester.", "Say hello as JSON.", 0.3, 100)
}

fn completion(content: &str) -> serde_json::Value {
    json!({
        "choices": [{
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }],
        "usage": { "prompt_tokens": 12, "completion_tokens": 5, "total_tokens": 17 }
    })
}

#[tokio::test]
async fn sends_bearer_auth_and_json_mode() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({
            "model": "gpt-4o-mini",
            "max_tokens": 100,
            "response_format": { "type": "json_object" },
            "messages": [
                { "role": "system", "content": "You are a tester." },
                { "role": "user", "content": "Say hello as JSON." }
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(r#"{"hello": "world"}"#)))
        .expect(1)
        .mount(&server)
        .await;

    let provider = provider(&server, Some("sk-test"));
    let reply = provider.complete(&request()).await.unwrap();

    assert_eq!(reply.content, r#"{"hello": "world"}"#);
    assert_eq!(reply.input_tokens, 12);
    assert_eq!(reply.output_tokens, 5);
    assert_eq!(reply.finish_reason, FinishReason::Complete);
}

#[tokio::test]
async fn complete_json_parses_content() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(r#"{"title": "Quiz"}"#)))
        .mount(&server)
        .await;

    let provider = provider(&server, Some("sk-test"));
    let value = complete_json(&provider, "test", &request()).await.unwrap();
    assert_eq!(value["title"], "Quiz");
}

#[tokio::test]
async fn rate_limit_is_distinguished() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let err = provider(&server, Some("sk-test"))
        .complete(&request())
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::RateLimited));
}

#[tokio::test]
async fn api_errors_carry_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(401).set_body_string(r#"{"error":{"message":"bad key"}}"#),
        )
        .mount(&server)
        .await;

    let err = provider(&server, Some("sk-bad"))
        .complete(&request())
        .await
        .unwrap_err();

    match err {
        ProviderError::ApiError(detail) => {
            assert!(detail.starts_with("401 Unauthorized - "));
            assert!(detail.contains("bad key"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn empty_choices_are_an_empty_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .mount(&server)
        .await;

    let err = provider(&server, Some("sk-test"))
        .complete(&request())
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::EmptyResponse));
}

#[tokio::test]
async fn missing_key_never_calls_the_api() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("{}")))
        .expect(0)
        .mount(&server)
        .await;

    let provider = provider(&server, None);
    assert!(!provider.is_configured());
    let err = provider.complete(&request()).await.unwrap_err();
    assert!(matches!(err, ProviderError::NotConfigured));
}
