//! Wire-level backend tests against a mock HTTP server.

use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use reviewd_config::Provider;
use reviewd_llm::{GeminiBackend, LlmBackend, OpenAiBackend, OpenRouterBackend, backend_for};

fn chat_completion_body(content: &str) -> serde_json::Value {
    serde_json::json!({
        "id": "chatcmpl-123",
        "object": "chat.completion",
        "choices": [
            {
                "index": 0,
                "message": { "role": "assistant", "content": content },
                "finish_reason": "stop"
            }
        ]
    })
}

#[tokio::test]
async fn openai_sends_bearer_auth_and_chat_envelope() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(serde_json::json!({
            "model": "gpt-4o-mini",
            "messages": [{ "role": "user", "content": "say hi" }],
            "max_tokens": 500
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_completion_body("hi")))
        .expect(1)
        .mount(&server)
        .await;

    let backend = OpenAiBackend::new(
        "sk-test".to_string(),
        Some(format!("{}/v1/chat/completions", server.uri())),
        "gpt-4o-mini".to_string(),
    )
    .unwrap();

    let text = backend.generate("say hi").await.unwrap();
    assert_eq!(text, "hi");
}

#[tokio::test]
async fn openai_non_2xx_maps_to_api_error_with_body_snippet() {
    let server = MockServer::start().await;

    let long_body = "x".repeat(400);
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string(long_body))
        .mount(&server)
        .await;

    let backend = OpenAiBackend::new(
        "sk-test".to_string(),
        Some(server.uri()),
        "gpt-4o-mini".to_string(),
    )
    .unwrap();

    let err = backend.generate("p").await.unwrap_err();
    let msg = err.to_string();
    assert!(msg.starts_with("API error 500: "), "got: {msg}");
    // body is clipped to 200 chars
    let snippet = msg.strip_prefix("API error 500: ").unwrap();
    assert_eq!(snippet.chars().count(), 200);
}

#[tokio::test]
async fn openai_missing_content_yields_empty_string() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "choices": [] })),
        )
        .mount(&server)
        .await;

    let backend = OpenAiBackend::new(
        "sk-test".to_string(),
        Some(server.uri()),
        "gpt-4o-mini".to_string(),
    )
    .unwrap();

    assert_eq!(backend.generate("p").await.unwrap(), "");
}

#[tokio::test]
async fn openrouter_sends_referer_and_title_headers() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(header("authorization", "Bearer or-test"))
        .and(header("HTTP-Referer", "https://reviewd.dev"))
        .and(header("X-Title", "reviewd"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_completion_body("ok")))
        .expect(1)
        .mount(&server)
        .await;

    let backend = OpenRouterBackend::new(
        "or-test".to_string(),
        Some(server.uri()),
        "openai/gpt-4o-mini".to_string(),
    )
    .unwrap();

    assert_eq!(backend.generate("p").await.unwrap(), "ok");
}

#[tokio::test]
async fn gemini_posts_to_model_endpoint_with_key_query() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-1.5-flash:generateContent"))
        .and(query_param("key", "g-test"))
        .and(body_partial_json(serde_json::json!({
            "contents": [{ "parts": [{ "text": "p" }] }],
            "generationConfig": { "maxOutputTokens": 500 }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "candidates": [
                { "content": { "parts": [{ "text": "gemini says" }] } }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let backend = GeminiBackend::new(
        "g-test".to_string(),
        Some(format!("{}/v1beta/models", server.uri())),
        "gemini-1.5-flash".to_string(),
    )
    .unwrap();

    assert_eq!(backend.generate("p").await.unwrap(), "gemini says");
}

#[tokio::test]
async fn gemini_empty_candidates_yields_empty_string() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "candidates": [] })),
        )
        .mount(&server)
        .await;

    let backend = GeminiBackend::new(
        "g-test".to_string(),
        Some(server.uri()),
        "gemini-1.5-flash".to_string(),
    )
    .unwrap();

    assert_eq!(backend.generate("p").await.unwrap(), "");
}

#[test]
fn factory_selects_backend_by_provider() {
    let cases = [
        (Provider::OpenAi, "openai"),
        (Provider::Gemini, "gemini"),
        (Provider::OpenRouter, "openrouter"),
    ];
    for (provider, expected) in cases {
        let backend = backend_for(provider, "key".to_string(), "model".to_string()).unwrap();
        assert_eq!(backend.name(), expected);
    }
}
