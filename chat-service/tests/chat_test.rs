//! Chat send/history integration tests for chat-service.

mod common;

use common::TestApp;
use service_core::genai::mock::MockTextBackend;
use service_core::genai::Outcome;
use std::sync::Arc;

#[tokio::test]
async fn send_message_replies_and_records() {
    let app = TestApp::spawn().await;

    let response = app.send_message("user-1", "this service is great!").await;

    assert_eq!(response.status().as_u16(), 201);
    let body: serde_json::Value = response.json().await.expect("invalid body");
    assert_eq!(body["reply"], "Glad to hear it!");
    assert_eq!(body["sentiment"], "POSITIVE");
    assert!(body.get("alert").is_none());

    // recorded in history
    let history = app
        .client
        .get(app.url("/api/v1/chat/history?user_id=user-1"))
        .send()
        .await
        .expect("history request failed");
    let body: serde_json::Value = history.json().await.expect("invalid body");
    let messages = body["history"].as_array().expect("missing history");
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["user_message"], "this service is great!");
    assert_eq!(messages[0]["sentiment"], "POSITIVE");

    app.cleanup().await;
}

#[tokio::test]
async fn negative_sentiment_sets_the_alert_flag() {
    let backend = Arc::new(MockTextBackend::with_response(
        "{\"reply\": \"I'm sorry to hear that.\", \"sentiment\": \"NEGATIVE\"}",
    ));
    let app = TestApp::spawn_with_backend(backend).await;

    let response = app.send_message("user-1", "everything is broken").await;

    assert_eq!(response.status().as_u16(), 201);
    let body: serde_json::Value = response.json().await.expect("invalid body");
    assert_eq!(body["sentiment"], "NEGATIVE");
    assert_eq!(body["alert"], true);

    app.cleanup().await;
}

#[tokio::test]
async fn failed_model_call_records_nothing() {
    let backend = Arc::new(MockTextBackend::with_outcomes(vec![Outcome::Error(
        "backend down".to_string(),
    )]));
    let app = TestApp::spawn_with_backend(backend).await;

    let response = app.send_message("user-1", "hello?").await;
    assert_eq!(response.status().as_u16(), 502);

    let history = app
        .client
        .get(app.url("/api/v1/chat/history?user_id=user-1"))
        .send()
        .await
        .expect("history request failed");
    let body: serde_json::Value = history.json().await.expect("invalid body");
    assert!(body["history"].as_array().expect("missing history").is_empty());

    app.cleanup().await;
}

#[tokio::test]
async fn unrecognized_label_is_a_gateway_error() {
    let backend = Arc::new(MockTextBackend::with_response(
        "{\"reply\": \"hm\", \"sentiment\": \"ANGRY\"}",
    ));
    let app = TestApp::spawn_with_backend(backend).await;

    let response = app.send_message("user-1", "meh").await;
    assert_eq!(response.status().as_u16(), 502);

    app.cleanup().await;
}

#[tokio::test]
async fn history_respects_limit_and_returns_oldest_first() {
    let app = TestApp::spawn().await;

    for i in 0..5 {
        let response = app.send_message("user-1", &format!("message {}", i)).await;
        assert_eq!(response.status().as_u16(), 201);
    }

    let history = app
        .client
        .get(app.url("/api/v1/chat/history?user_id=user-1&limit=3"))
        .send()
        .await
        .expect("history request failed");
    let body: serde_json::Value = history.json().await.expect("invalid body");
    let messages = body["history"].as_array().expect("missing history");

    assert_eq!(messages.len(), 3);
    // the three most recent, oldest of them first
    assert_eq!(messages[0]["user_message"], "message 2");
    assert_eq!(messages[2]["user_message"], "message 4");

    app.cleanup().await;
}

#[tokio::test]
async fn oversized_message_is_rejected() {
    let app = TestApp::spawn().await;

    let response = app.send_message("user-1", &"x".repeat(2001)).await;
    assert_eq!(response.status().as_u16(), 422);

    app.cleanup().await;
}

#[tokio::test]
async fn history_requires_user_id() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .get(app.url("/api/v1/chat/history"))
        .send()
        .await
        .expect("history request failed");

    // missing query parameter rejected before the handler runs
    assert_eq!(response.status().as_u16(), 400);

    app.cleanup().await;
}
