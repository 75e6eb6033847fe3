//! User management integration tests for exam-service.

mod common;

use common::TestApp;

#[tokio::test]
async fn create_user_works() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .post(app.url("/api/v1/users"))
        .json(&serde_json::json!({ "username": "teacher_jane" }))
        .send()
        .await
        .expect("request failed");

    assert_eq!(response.status().as_u16(), 201);
    let body: serde_json::Value = response.json().await.expect("invalid body");
    assert_eq!(body["username"], "teacher_jane");
    assert!(body["user_id"].as_str().is_some());

    app.cleanup().await;
}

#[tokio::test]
async fn duplicate_username_is_a_conflict() {
    let app = TestApp::spawn().await;

    app.create_user("teacher_jane").await;

    let response = app
        .client
        .post(app.url("/api/v1/users"))
        .json(&serde_json::json!({ "username": "teacher_jane" }))
        .send()
        .await
        .expect("request failed");

    assert_eq!(response.status().as_u16(), 409);
    let body: serde_json::Value = response.json().await.expect("invalid body");
    assert!(body["error"]
        .as_str()
        .expect("missing error")
        .contains("already exists"));

    app.cleanup().await;
}

#[tokio::test]
async fn blank_username_is_rejected() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .post(app.url("/api/v1/users"))
        .json(&serde_json::json!({ "username": "" }))
        .send()
        .await
        .expect("request failed");

    assert_eq!(response.status().as_u16(), 422);

    app.cleanup().await;
}
