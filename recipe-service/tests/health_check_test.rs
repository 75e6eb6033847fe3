//! Infrastructure probe tests for recipe-service.

mod common;

use common::TestApp;

#[tokio::test]
async fn health_check_works() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .get(app.url("/health"))
        .send()
        .await
        .expect("health request failed");

    assert_eq!(response.status().as_u16(), 200);
    let body: serde_json::Value = response.json().await.expect("invalid body");
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "recipe-service");

    app.cleanup().await;
}

#[tokio::test]
async fn readiness_check_works() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .get(app.url("/ready"))
        .send()
        .await
        .expect("ready request failed");

    assert_eq!(response.status().as_u16(), 200);

    app.cleanup().await;
}
