//! Sentiment analytics integration tests for chat-service.

mod common;

use chrono::Utc;
use common::TestApp;
use service_core::genai::mock::MockTextBackend;
use service_core::genai::Outcome;
use std::sync::Arc;

fn reply(sentiment: &str) -> Outcome {
    Outcome::Success(format!(
        "{{\"reply\": \"noted\", \"sentiment\": \"{}\"}}",
        sentiment
    ))
}

#[tokio::test]
async fn analytics_groups_counts_by_day_and_label() {
    let backend = Arc::new(MockTextBackend::with_outcomes(vec![
        reply("POSITIVE"),
        reply("POSITIVE"),
        reply("NEGATIVE"),
    ]));
    let app = TestApp::spawn_with_backend(backend).await;

    for message in ["love it", "still love it", "now I hate it"] {
        let response = app.send_message("user-1", message).await;
        assert_eq!(response.status().as_u16(), 201);
    }

    let today = Utc::now().date_naive();
    let response = app
        .client
        .get(app.url(&format!(
            "/api/v1/chat/analytics?start_date={}&end_date={}",
            today, today
        )))
        .send()
        .await
        .expect("analytics request failed");

    assert_eq!(response.status().as_u16(), 200);
    let body: serde_json::Value = response.json().await.expect("invalid body");

    assert_eq!(body["query_range"]["start_date"], today.to_string());
    let day = &body["daily_counts"][today.to_string()];
    assert_eq!(day["POSITIVE"], 2);
    assert_eq!(day["NEGATIVE"], 1);
    assert_eq!(day["NEUTRAL"], 0);

    app.cleanup().await;
}

#[tokio::test]
async fn empty_range_returns_no_buckets() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .get(app.url("/api/v1/chat/analytics?start_date=2001-01-01&end_date=2001-01-02"))
        .send()
        .await
        .expect("analytics request failed");

    assert_eq!(response.status().as_u16(), 200);
    let body: serde_json::Value = response.json().await.expect("invalid body");
    assert!(body["daily_counts"]
        .as_object()
        .expect("missing daily_counts")
        .is_empty());

    app.cleanup().await;
}

#[tokio::test]
async fn inverted_range_is_rejected() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .get(app.url("/api/v1/chat/analytics?start_date=2026-02-02&end_date=2026-02-01"))
        .send()
        .await
        .expect("analytics request failed");

    assert_eq!(response.status().as_u16(), 400);

    app.cleanup().await;
}
