//! Subscription lifecycle, access guard and plan limits.

mod common;

use axum::http::{Method, StatusCode};
use common::{TestApp, ADMIN_USER, OTHER_USER, TEST_USER};
use rental_service::models::{PlanId, SubscriptionStatus};
use serde_json::json;

fn customer() -> serde_json::Value {
    json!({
        "first_name": "Karim",
        "last_name": "Haddad",
        "phone": "0661002003",
        "license_number": "DZ-1"
    })
}

#[tokio::test]
async fn subscription_close_to_expiry_is_flagged() {
    let app = TestApp::new();
    app.seed_subscription(TEST_USER, PlanId::Basic, SubscriptionStatus::Active, 6)
        .await;

    let (status, body) = app.get("/subscription", TEST_USER).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "active");
    assert_eq!(body["days_remaining"], 6);
    assert_eq!(body["classification"], "expiring_soon");
    assert_eq!(body["is_valid"], true);
    assert_eq!(body["message"], "Your subscription expires in 6 days.");
}

#[tokio::test]
async fn lapsed_subscription_reads_as_expired_and_is_denied() {
    let app = TestApp::new();
    app.seed_subscription(TEST_USER, PlanId::Pro, SubscriptionStatus::Active, -1)
        .await;

    let (_, body) = app.get("/subscription", TEST_USER).await;
    assert_eq!(body["status"], "expired");
    assert_eq!(body["stored_status"], "active");
    assert_eq!(body["classification"], "expired");
    assert_eq!(body["is_valid"], false);

    let (status, body) = app.post("/customers", TEST_USER, customer()).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(
        body["error"],
        "Your subscription has expired. Renew it to continue."
    );
}

#[tokio::test]
async fn missing_subscription_denies_writes_but_not_reads() {
    let app = TestApp::new();

    let (status, _) = app.post("/customers", TEST_USER, customer()).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app.get("/customers", TEST_USER).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().is_empty());

    let (status, _) = app.get("/subscription", TEST_USER).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn requests_without_identity_are_unauthorized() {
    let app = TestApp::new();
    let (status, _) = app.send(Method::GET, "/rentals", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .send(Method::GET, "/subscription", Some("   "), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn trial_request_grants_access_immediately() {
    let app = TestApp::new();
    let (status, body) = app
        .post("/subscription", TEST_USER, json!({"plan_id": "trial"}))
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "trial");
    assert_eq!(body["days_remaining"], 14);
    assert_eq!(body["classification"], "valid");
    assert_eq!(body["is_valid"], true);

    let (status, _) = app.post("/customers", TEST_USER, customer()).await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn paid_plan_waits_for_admin_activation() {
    let app = TestApp::new();
    let (status, body) = app
        .post(
            "/subscription",
            TEST_USER,
            json!({"plan_id": "basic", "billing_period": "annual"}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "pending");
    assert_eq!(body["is_valid"], false);
    assert_eq!(body["price"], "29000");

    let (status, _) = app.post("/customers", TEST_USER, customer()).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let uri = format!("/admin/subscriptions/{}/status", TEST_USER);
    let (status, _) = app.put(&uri, OTHER_USER, json!({"status": "active"})).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app.put(&uri, ADMIN_USER, json!({"status": "active"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "active");
    assert_eq!(body["is_valid"], true);

    let (status, _) = app.post("/customers", TEST_USER, customer()).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = app.put(&uri, ADMIN_USER, json!({"status": "suspended"})).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.post("/customers", TEST_USER, customer()).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn admin_update_of_unknown_account_is_not_found() {
    let app = TestApp::new();
    let (status, _) = app
        .put(
            "/admin/subscriptions/nobody/status",
            ADMIN_USER,
            json!({"status": "active"}),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn enterprise_plan_cannot_be_self_served() {
    let app = TestApp::new();
    let (status, _) = app
        .post("/subscription", TEST_USER, json!({"plan_id": "enterprise"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn pending_request_can_be_replaced() {
    let app = TestApp::new();
    let (status, _) = app
        .post("/subscription", TEST_USER, json!({"plan_id": "pro"}))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, body) = app
        .post("/subscription", TEST_USER, json!({"plan_id": "basic"}))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["plan_id"], "basic");

    let (_, body) = app.get("/subscription", TEST_USER).await;
    assert_eq!(body["plan_id"], "basic");
    assert_eq!(body["status"], "pending");
}

#[tokio::test]
async fn suspended_account_cannot_request_a_new_plan() {
    let app = TestApp::new();
    app.seed_subscription(TEST_USER, PlanId::Basic, SubscriptionStatus::Active, 20)
        .await;
    let uri = format!("/admin/subscriptions/{}/status", TEST_USER);
    let (status, _) = app.put(&uri, ADMIN_USER, json!({"status": "suspended"})).await;
    assert_eq!(status, StatusCode::OK);

    for plan in ["trial", "pro"] {
        let (status, _) = app
            .post("/subscription", TEST_USER, json!({"plan_id": plan}))
            .await;
        assert_eq!(status, StatusCode::CONFLICT, "plan {}", plan);
    }

    let (_, body) = app.get("/subscription", TEST_USER).await;
    assert_eq!(body["status"], "suspended");
    let (status, _) = app.post("/customers", TEST_USER, customer()).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn trial_is_granted_once_per_account() {
    let app = TestApp::new();
    app.seed_subscription(TEST_USER, PlanId::Trial, SubscriptionStatus::Trial, -2)
        .await;

    let (_, body) = app.get("/subscription", TEST_USER).await;
    assert_eq!(body["status"], "expired");

    let (status, _) = app
        .post("/subscription", TEST_USER, json!({"plan_id": "trial"}))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, body) = app.get("/subscription", TEST_USER).await;
    assert_eq!(body["status"], "expired");
    assert_eq!(body["is_valid"], false);

    // A paid plan is still open to a lapsed trial.
    let (status, body) = app
        .post("/subscription", TEST_USER, json!({"plan_id": "basic"}))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "pending");
}

#[tokio::test]
async fn running_paid_subscription_keeps_access_on_plan_change() {
    let app = TestApp::new();
    app.seed_subscription(TEST_USER, PlanId::Pro, SubscriptionStatus::Active, 300)
        .await;

    let (status, _) = app
        .post("/subscription", TEST_USER, json!({"plan_id": "basic"}))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, body) = app.get("/subscription", TEST_USER).await;
    assert_eq!(body["plan_id"], "pro");
    assert_eq!(body["status"], "active");
    let (status, _) = app.post("/customers", TEST_USER, customer()).await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn activation_starts_the_paid_term() {
    let app = TestApp::new();
    // Requested long enough ago that only a few days of the original term remain.
    app.seed_subscription(TEST_USER, PlanId::Basic, SubscriptionStatus::Pending, 3)
        .await;

    let uri = format!("/admin/subscriptions/{}/status", TEST_USER);
    let (status, body) = app.put(&uri, ADMIN_USER, json!({"status": "active"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "active");
    let days = body["days_remaining"].as_i64().unwrap();
    assert!((28..=31).contains(&days), "days remaining: {}", days);
    assert_eq!(body["classification"], "valid");
}

#[tokio::test]
async fn trial_plan_caps_the_fleet() {
    let app = TestApp::new();
    app.seed_subscription(TEST_USER, PlanId::Trial, SubscriptionStatus::Trial, 10)
        .await;

    for _ in 0..3 {
        app.create_vehicle(TEST_USER, 3000).await;
    }
    let (status, _) = app
        .post(
            "/vehicles",
            TEST_USER,
            json!({
                "brand": "Dacia",
                "model": "Logan",
                "year": 2020,
                "registration": "FOURTH-1",
                "daily_rate": 3000
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn invalid_customer_payload_is_unprocessable() {
    let app = TestApp::new();
    app.seed_active(TEST_USER).await;

    let mut body = customer();
    body["email"] = json!("not-an-email");
    let (status, body) = app.post("/customers", TEST_USER, body).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "Validation error");
}
