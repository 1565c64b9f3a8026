//! Plan catalog, health probes and request plumbing.

mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use common::{TestApp, TEST_USER};
use tower::util::ServiceExt;

#[tokio::test]
async fn catalog_lists_every_plan() {
    let app = TestApp::new();
    let (status, body) = app.get("/plans", TEST_USER).await;
    assert_eq!(status, StatusCode::OK);

    let plans = body.as_array().unwrap();
    let ids: Vec<_> = plans.iter().map(|p| p["id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec!["trial", "basic", "pro", "enterprise"]);

    assert_eq!(plans[1]["monthly_price"], "2900 DZD");
    assert_eq!(plans[0]["max_vehicles"], 3);
    assert_eq!(plans[3]["monthly_price"], "quote on request");
    assert!(plans[3]["max_vehicles"].is_null());
}

#[tokio::test]
async fn plan_price_resolves_per_billing_period() {
    let app = TestApp::new();

    let (status, body) = app
        .get("/plans/basic/price?billing_period=annual", TEST_USER)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["price"], "29000 DZD");
    assert_eq!(body["amount"], "29000");

    let (_, body) = app.get("/plans/enterprise/price", TEST_USER).await;
    assert_eq!(body["billing_period"], "monthly");
    assert_eq!(body["price"], "quote on request");
    assert!(body["amount"].is_null());

    let (status, _) = app.get("/plans/platinum/price", TEST_USER).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn health_follows_the_store() {
    let app = TestApp::new();

    let (status, body) = app.get("/health", TEST_USER).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    let (status, _) = app.get("/ready", TEST_USER).await;
    assert_eq!(status, StatusCode::OK);

    app.store.set_offline(true);
    let (status, body) = app.get("/health", TEST_USER).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "unhealthy");
    let (status, _) = app.get("/ready", TEST_USER).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    let (status, _) = app.get("/vehicles", TEST_USER).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn metrics_endpoint_answers_as_text() {
    let app = TestApp::new();
    let (status, _) = app.get("/metrics", TEST_USER).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn request_id_is_echoed() {
    let app = TestApp::new();
    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("x-request-id", "req-42")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-request-id"], "req-42");
}
