//! Integration tests for the agent HTTP endpoint.
//!
//! These tests verify the HTTP layer wiring:
//! 1. Request bodies deserialize into turns
//! 2. Replies serialize with the echoed cursor
//! 3. Failures map to the right status codes

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use pen_sales_agent::adapters::ai::{MockAIProvider, MockError, MOCK_MODEL};
use pen_sales_agent::adapters::http::{agent_router, AgentAppState};
use pen_sales_agent::adapters::product::LuxuryPenFacts;
use pen_sales_agent::application::ProduceReplyHandler;

// =============================================================================
// Test Infrastructure
// =============================================================================

fn app(provider: &MockAIProvider) -> Router {
    let handler = ProduceReplyHandler::new(Arc::new(provider.clone()), Arc::new(LuxuryPenFacts));
    agent_router().with_state(AgentAppState::new(Arc::new(handler)))
}

async fn post_reply(app: Router, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/api/agent/reply")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn first_turn_returns_discovery_reply() {
    let provider = MockAIProvider::new()
        .with_response("Hi! What do you usually use a pen for?\nStage: Discovery; Interest: warm");

    let (status, body) = post_reply(
        app(&provider),
        json!({ "userText": "Hi", "chatModel": MOCK_MODEL }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["text"], "Hi! What do you usually use a pen for?");
    assert_eq!(body["responseId"], "resp_mock_1");
    assert_eq!(body["stage"], "discovery");
    assert_eq!(body["interest"], "warm");
    assert!(body.get("interruptedStage").is_none());
}

#[tokio::test]
async fn objection_reply_carries_interrupted_stage() {
    let provider = MockAIProvider::new().with_response(
        "I understand. It lasts a lifetime. Does that help?\nStage: Objection; Interest: cold",
    );

    let (status, body) = post_reply(
        app(&provider),
        json!({
            "userText": "Seems expensive!",
            "chatModel": MOCK_MODEL,
            "previousResponseId": "resp_prev",
            "previousStage": "presentation"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["stage"], "objection");
    assert_eq!(body["interruptedStage"], "presentation");
    assert_eq!(
        provider.last_call().unwrap().previous_response_id.as_deref(),
        Some("resp_prev")
    );
}

#[tokio::test]
async fn link_offer_is_echoed_and_accepted() {
    let provider = MockAIProvider::new()
        .with_response("Wonderful! Would you like me to send you the link?\nStage: Commitment; Interest: hot")
        .with_response("Here's your link to purchase: https://example.com/pen\nStage: Action; Interest: hot");

    let (status, offer) = post_reply(
        app(&provider),
        json!({
            "userText": "No more questions",
            "chatModel": MOCK_MODEL,
            "previousStage": "commitment"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(offer["stage"], "commitment");
    assert_eq!(offer["linkOffered"], true);

    let (status, close) = post_reply(
        app(&provider),
        json!({
            "userText": "yes",
            "chatModel": MOCK_MODEL,
            "previousResponseId": offer["responseId"],
            "previousStage": offer["stage"],
            "linkOffered": offer["linkOffered"]
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(close["stage"], "action");
    assert!(close.get("linkOffered").is_none());
}

#[tokio::test]
async fn link_offer_outside_commitment_is_bad_request() {
    let (status, body) = post_reply(
        app(&MockAIProvider::new()),
        json!({
            "userText": "yes",
            "chatModel": MOCK_MODEL,
            "previousStage": "presentation",
            "linkOffered": true
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_STAGE_CURSOR");
}

#[tokio::test]
async fn empty_text_is_bad_request() {
    let provider = MockAIProvider::new();

    let (status, body) = post_reply(
        app(&provider),
        json!({ "userText": "", "chatModel": MOCK_MODEL }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "EMPTY_USER_TEXT");
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn unknown_model_is_bad_request() {
    let (status, body) = post_reply(
        app(&MockAIProvider::new()),
        json!({ "userText": "Hi", "chatModel": "gpt-0" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_MODEL_IDENTIFIER");
}

#[tokio::test]
async fn inconsistent_cursor_is_bad_request() {
    let (status, body) = post_reply(
        app(&MockAIProvider::new()),
        json!({
            "userText": "Hi",
            "chatModel": MOCK_MODEL,
            "previousStage": "objection",
            "interruptedStage": "objection"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_STAGE_CURSOR");
}

#[tokio::test]
async fn provider_failure_is_bad_gateway() {
    let provider = MockAIProvider::new().with_error(MockError::Unavailable {
        message: "upstream down".to_string(),
    });

    let (status, body) = post_reply(
        app(&provider),
        json!({ "userText": "Hi", "chatModel": MOCK_MODEL }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["code"], "PROVIDER_UNAVAILABLE");
}

#[tokio::test]
async fn empty_output_is_bad_gateway() {
    let provider = MockAIProvider::new().with_empty_output();

    let (status, body) = post_reply(
        app(&provider),
        json!({ "userText": "Hi", "chatModel": MOCK_MODEL }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["code"], "NO_CONTENT_PRODUCED");
}

#[tokio::test]
async fn health_reports_ok() {
    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let response = app(&MockAIProvider::new()).oneshot(request).await.unwrap();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(body["status"], "ok");
}
