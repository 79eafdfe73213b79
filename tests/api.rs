//! End-to-end tests over the HTTP router with a scripted LLM backend.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;

use reviewd::{AppState, build_router};
use reviewd_engine::Orchestrator;
use reviewd_llm::testing::ScriptedBackend;
use reviewd_llm::{LlmClient, LlmError};
use reviewd_store::MemoryStore;

const ACTIONS_JSON: &str =
    r#"[{"action": "Escalate to support", "priority": "high", "owner": "support"}]"#;

fn app(responses: Vec<Result<String, LlmError>>) -> Router {
    let backend = ScriptedBackend::new(responses);
    let client = LlmClient::new(Box::new(backend), "test-model");
    build_router(AppState {
        orchestrator: Arc::new(Orchestrator::new(client)),
        store: Arc::new(MemoryStore::new()),
    })
}

fn happy_responses() -> Vec<Result<String, LlmError>> {
    vec![
        Ok("Thanks for the feedback!".to_string()),
        Ok("Customer noted a billing problem.".to_string()),
        Ok(ACTIONS_JSON.to_string()),
    ]
}

async fn send_json(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = match body {
        Some(value) => Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn health_reports_ok() {
    let app = app(vec![]);
    let (status, body) = send_json(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn root_reports_service_info() {
    let app = app(vec![]);
    let (status, body) = send_json(&app, "GET", "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["health_check"], "/health");
}

#[tokio::test]
async fn submission_with_invalid_rating_is_rejected() {
    let app = app(vec![]);
    let (status, body) = send_json(
        &app,
        "POST",
        "/v1/submissions",
        Some(json!({ "rating": 9, "review_text": "fine" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn submission_with_blank_text_is_rejected() {
    let app = app(vec![]);
    let (status, body) = send_json(
        &app,
        "POST",
        "/v1/submissions",
        Some(json!({ "rating": 3, "review_text": "   " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn submission_returns_generated_fields() {
    let app = app(happy_responses());
    let (status, body) = send_json(
        &app,
        "POST",
        "/v1/submissions",
        Some(json!({ "rating": 2, "review_text": "I was double charged." })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 1);
    assert_eq!(body["rating"], 2);
    assert_eq!(body["user_response"], "Thanks for the feedback!");
    assert_eq!(body["admin_summary"], "Customer noted a billing problem.");
    assert_eq!(
        body["admin_recommended_actions"][0]["action"],
        "Escalate to support"
    );
    assert_eq!(body["admin_recommended_actions"][0]["priority"], "high");
    assert!(body["created_at"].is_string());
}

#[tokio::test]
async fn provider_failure_still_returns_a_complete_submission() {
    // an empty script makes every backend call fail
    let app = app(vec![]);
    let (status, body) = send_json(
        &app,
        "POST",
        "/v1/submissions",
        Some(json!({ "rating": 1, "review_text": "Everything broke." })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["user_response"],
        "Thank you for your feedback. Our team will review your comments and get back to you if needed."
    );
    assert_eq!(
        body["admin_summary"],
        "Review requires manual analysis - AI processing unavailable."
    );
    assert_eq!(
        body["admin_recommended_actions"][0]["action"],
        "Review manually"
    );
}

#[tokio::test]
async fn long_review_text_is_truncated_not_rejected() {
    let app = app(happy_responses());
    let long_text = "b".repeat(3000);
    let (status, body) = send_json(
        &app,
        "POST",
        "/v1/submissions",
        Some(json!({ "rating": 4, "review_text": long_text })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["review_text"].as_str().unwrap().chars().count(), 2000);
}

#[tokio::test]
async fn listing_returns_newest_first_with_total() {
    let mut responses = happy_responses();
    responses.extend(happy_responses());
    let app = app(responses);

    for text in ["first review", "second review"] {
        let (status, _) = send_json(
            &app,
            "POST",
            "/v1/submissions",
            Some(json!({ "rating": 5, "review_text": text })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = send_json(&app, "GET", "/v1/submissions", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 2);
    assert_eq!(body["submissions"][0]["review_text"], "second review");
    assert_eq!(body["submissions"][1]["review_text"], "first review");

    let (_, limited) = send_json(&app, "GET", "/v1/submissions?limit=1", None).await;
    assert_eq!(limited["total"], 1);
}

#[tokio::test]
async fn analytics_reflects_stored_submissions() {
    let mut responses = happy_responses();
    responses.extend(happy_responses());
    let app = app(responses);

    for rating in [5, 3] {
        send_json(
            &app,
            "POST",
            "/v1/submissions",
            Some(json!({ "rating": rating, "review_text": "some review" })),
        )
        .await;
    }

    let (status, body) = send_json(&app, "GET", "/v1/analytics", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_submissions"], 2);
    assert_eq!(body["average_rating"], 4.0);
    assert_eq!(body["rating_distribution"].as_array().unwrap().len(), 5);
    assert_eq!(body["rating_distribution"][4]["count"], 1);
    assert_eq!(body["rating_distribution"][4]["percentage"], 50.0);
    assert_eq!(body["daily_volume"].as_array().unwrap().len(), 7);
    assert_eq!(body["today_count"], 2);
    assert_eq!(body["this_week_count"], 2);
}

#[tokio::test]
async fn degraded_generation_records_error_metadata() {
    let app = app(vec![
        Err(LlmError::provider(503, "overloaded")),
        Ok("summary".to_string()),
        Ok(ACTIONS_JSON.to_string()),
    ]);

    let (status, body) = send_json(
        &app,
        "POST",
        "/v1/submissions",
        Some(json!({ "rating": 2, "review_text": "slow site" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    // the public response carries the fallback text, not the error detail
    assert_eq!(
        body["user_response"],
        "Thank you for your feedback. Our team will review your comments and get back to you if needed."
    );
    assert_eq!(body["admin_summary"], "summary");
    assert!(body.get("llm_error").is_none());
}
