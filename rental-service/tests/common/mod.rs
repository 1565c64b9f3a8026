//! Test helpers for rental-service integration tests.
//!
//! The router runs against the in-memory store, so no database is needed.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use chrono::{TimeDelta, Utc};
use rental_service::config::RentalConfig;
use rental_service::models::{
    BillingPeriod, PlanId, Subscription, SubscriptionStatus, RECORD_VERSION,
};
use rental_service::services::{FleetStore, MemoryStore};
use rental_service::{build_router, AppState};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::util::ServiceExt;

pub const TEST_USER: &str = "user-1";
pub const OTHER_USER: &str = "user-2";
pub const ADMIN_USER: &str = "admin-1";

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
}

impl TestApp {
    pub fn new() -> Self {
        let mut config = RentalConfig::local();
        config.subscription.admin_user_ids = vec![ADMIN_USER.to_string()];
        Self::with_config(config)
    }

    pub fn with_config(config: RentalConfig) -> Self {
        let store = Arc::new(MemoryStore::new());
        let router = build_router(AppState::new(config, store.clone()));
        Self { router, store }
    }

    /// Send a request as `user` and decode the JSON body (`Null` when empty).
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        user: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(user) = user {
            builder = builder.header("X-User-ID", user);
        }
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        (status, value)
    }

    pub async fn get(&self, uri: &str, user: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, Some(user), None).await
    }

    pub async fn post(&self, uri: &str, user: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(user), Some(body)).await
    }

    pub async fn put(&self, uri: &str, user: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::PUT, uri, Some(user), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, user: &str) -> (StatusCode, Value) {
        self.send(Method::DELETE, uri, Some(user), None).await
    }

    /// Store a subscription ending `days_left` days from now.
    pub async fn seed_subscription(
        &self,
        user: &str,
        plan_id: PlanId,
        status: SubscriptionStatus,
        days_left: i64,
    ) {
        let end_date = Utc::now() + TimeDelta::days(days_left);
        let subscription = Subscription {
            id: format!("sub-{}", user),
            user_id: user.to_string(),
            plan_id,
            status,
            start_date: end_date - TimeDelta::days(30),
            end_date,
            price: Decimal::from(2900),
            billing_period: BillingPeriod::Monthly,
            schema_version: RECORD_VERSION,
            updated_at: Utc::now(),
        };
        self.store.save_subscription(&subscription).await.unwrap();
    }

    /// Active Pro subscription with plenty of time left.
    pub async fn seed_active(&self, user: &str) {
        self.seed_subscription(user, PlanId::Pro, SubscriptionStatus::Active, 60)
            .await;
    }

    pub async fn create_vehicle(&self, user: &str, daily_rate: i64) -> String {
        let (status, body) = self
            .post(
                "/vehicles",
                user,
                json!({
                    "brand": "Renault",
                    "model": "Clio",
                    "year": 2021,
                    "registration": format!("REG-{}", &uuid::Uuid::new_v4().simple().to_string()[..12]),
                    "daily_rate": daily_rate
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create vehicle: {}", body);
        body["id"].as_str().unwrap().to_string()
    }

    pub async fn create_customer(&self, user: &str) -> String {
        let (status, body) = self
            .post(
                "/customers",
                user,
                json!({
                    "first_name": "Amina",
                    "last_name": "Benali",
                    "phone": "0555123456",
                    "email": "amina@example.com",
                    "license_number": "DZ-778812"
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create customer: {}", body);
        body["id"].as_str().unwrap().to_string()
    }

    /// Create a rental and return its JSON.
    pub async fn create_rental(&self, user: &str, body: Value) -> Value {
        let (status, body) = self.post("/rentals", user, body).await;
        assert_eq!(status, StatusCode::CREATED, "create rental: {}", body);
        body
    }
}

/// Decimal field of a JSON response, which serializes money as strings.
pub fn money(value: &Value) -> Decimal {
    match value {
        Value::String(s) => s.parse().unwrap(),
        Value::Number(n) => n.to_string().parse().unwrap(),
        other => panic!("not a money value: {}", other),
    }
}
