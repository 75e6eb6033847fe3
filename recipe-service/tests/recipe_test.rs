//! Recipe recommendation integration tests for recipe-service.

mod common;

use common::{TestApp, TestBackends};
use recipe_service::services::MockRecipeSource;
use service_core::genai::mock::MockTextBackend;
use std::sync::Arc;

#[tokio::test]
async fn suitable_recipes_are_selected_and_persisted() {
    // model picks candidates 0 and 2 out of three
    let app = TestApp::spawn().await;

    let response = app
        .client
        .post(app.url("/api/v1/generate-recipes"))
        .json(&TestApp::recipe_request())
        .send()
        .await
        .expect("request failed");

    assert_eq!(response.status().as_u16(), 200);
    let body: serde_json::Value = response.json().await.expect("invalid body");
    let recipes = body["recipes"].as_array().expect("missing recipes");
    assert_eq!(recipes.len(), 2);
    assert_eq!(recipes[0]["label"], "Garlic Chicken");
    assert_eq!(recipes[1]["label"], "Steamed Broccoli Bowl");

    // the request and its matches were recorded
    let recorded = app
        .client
        .get(app.url("/api/v1/recipe-requests"))
        .send()
        .await
        .expect("request failed");
    let body: serde_json::Value = recorded.json().await.expect("invalid body");
    let records = body.as_array().expect("expected array");
    assert_eq!(records.len(), 1);
    assert_eq!(
        records[0]["matched"].as_array().expect("missing matched").len(),
        2
    );

    app.cleanup().await;
}

#[tokio::test]
async fn out_of_range_indices_from_the_model_are_dropped() {
    let app = TestApp::spawn_with(TestBackends {
        text: Arc::new(MockTextBackend::with_response("0, 2, 9, 2")),
        ..TestBackends::default()
    })
    .await;

    let response = app
        .client
        .post(app.url("/api/v1/generate-recipes"))
        .json(&TestApp::recipe_request())
        .send()
        .await
        .expect("request failed");

    assert_eq!(response.status().as_u16(), 200);
    let body: serde_json::Value = response.json().await.expect("invalid body");
    assert_eq!(body["recipes"].as_array().expect("missing recipes").len(), 2);

    app.cleanup().await;
}

#[tokio::test]
async fn no_suitable_recipes_is_not_found() {
    let app = TestApp::spawn_with(TestBackends {
        text: Arc::new(MockTextBackend::with_response("none")),
        ..TestBackends::default()
    })
    .await;

    let response = app
        .client
        .post(app.url("/api/v1/generate-recipes"))
        .json(&TestApp::recipe_request())
        .send()
        .await
        .expect("request failed");

    assert_eq!(response.status().as_u16(), 404);
    let body: serde_json::Value = response.json().await.expect("invalid body");
    assert!(body["error"]
        .as_str()
        .expect("missing error")
        .contains("none were deemed suitable"));

    app.cleanup().await;
}

#[tokio::test]
async fn empty_search_result_is_not_found() {
    let app = TestApp::spawn_with(TestBackends {
        source: Arc::new(MockRecipeSource::empty()),
        ..TestBackends::default()
    })
    .await;

    let response = app
        .client
        .post(app.url("/api/v1/generate-recipes"))
        .json(&TestApp::recipe_request())
        .send()
        .await
        .expect("request failed");

    assert_eq!(response.status().as_u16(), 404);

    app.cleanup().await;
}

#[tokio::test]
async fn upstream_search_failure_is_a_bad_gateway() {
    let app = TestApp::spawn_with(TestBackends {
        source: Arc::new(MockRecipeSource::failing("connection refused")),
        ..TestBackends::default()
    })
    .await;

    let response = app
        .client
        .post(app.url("/api/v1/generate-recipes"))
        .json(&TestApp::recipe_request())
        .send()
        .await
        .expect("request failed");

    assert_eq!(response.status().as_u16(), 502);

    app.cleanup().await;
}

#[tokio::test]
async fn empty_ingredient_list_is_rejected() {
    let app = TestApp::spawn().await;

    let mut request = TestApp::recipe_request();
    request["ingredients"] = serde_json::json!([]);

    let response = app
        .client
        .post(app.url("/api/v1/generate-recipes"))
        .json(&request)
        .send()
        .await
        .expect("request failed");

    assert_eq!(response.status().as_u16(), 422);

    app.cleanup().await;
}
