//! # Gemini 客户端测试（wiremock 模拟上游）

use generation_proxy::config::UpstreamConfig;
use generation_proxy::error::ProviderError;
use generation_proxy::providers::{GeminiClient, GenerateContentRequest, GenerativeModel};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer, timeout_secs: u64) -> GeminiClient {
    let config = UpstreamConfig {
        base_url: server.uri(),
        timeout_secs,
        ..UpstreamConfig::default()
    };
    GeminiClient::new(&config, "secret-key").unwrap()
}

#[tokio::test]
async fn sends_key_in_header_and_extracts_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.0-flash-exp:generateContent"))
        .and(header("x-goog-api-key", "secret-key"))
        .and(body_json(json!({
            "contents": [{ "role": "user", "parts": [{ "text": "Say hi" }] }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": "Hello " }, { "text": "world" }] },
                "finishReason": "STOP"
            }],
            "usageMetadata": { "promptTokenCount": 2, "candidatesTokenCount": 2, "totalTokenCount": 4 }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = client(&server, 5)
        .generate_content(GenerateContentRequest::single_turn("gemini-2.0-flash-exp", "Say hi"))
        .await
        .unwrap();

    assert_eq!(result.text, "Hello world");
    assert_eq!(result.usage_metadata.unwrap()["totalTokenCount"], 4);
    assert!(result.candidates.is_some());
}

#[tokio::test]
async fn upstream_error_message_is_surfaced() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": { "code": 404, "message": "models/nope is not found", "status": "NOT_FOUND" }
        })))
        .mount(&server)
        .await;

    let err = client(&server, 5)
        .generate_content(GenerateContentRequest::single_turn("nope", "hi"))
        .await
        .unwrap_err();

    match &err {
        ProviderError::ApiError { status, message } => {
            assert_eq!(*status, 404);
            assert_eq!(message, "models/nope is not found");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!err.client_message().contains("secret-key"));
}

#[tokio::test]
async fn blocked_prompt_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "promptFeedback": { "blockReason": "SAFETY" }
        })))
        .mount(&server)
        .await;

    let err = client(&server, 5)
        .generate_content(GenerateContentRequest::single_turn("gemini-1.5-pro-002", "hi"))
        .await
        .unwrap_err();

    assert!(matches!(err, ProviderError::Blocked { .. }));
}

#[tokio::test]
async fn slow_upstream_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "candidates": [] }))
                .set_delay(std::time::Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let err = client(&server, 1)
        .generate_content(GenerateContentRequest::single_turn("gemini-1.5-pro-002", "hi"))
        .await
        .unwrap_err();

    assert!(matches!(err, ProviderError::Timeout { seconds: 1 }));
}
