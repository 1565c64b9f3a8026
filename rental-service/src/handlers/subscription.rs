use crate::domain::{subscription, DomainError};
use crate::dtos::{SubscribeRequest, SubscriptionResponse, UpdateSubscriptionStatusRequest};
use crate::middleware::UserId;
use crate::models::{StoredRecord, Subscription, SubscriptionStatus, RECORD_VERSION};
use crate::services::metrics;
use crate::startup::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use service_core::error::AppError;
use uuid::Uuid;

fn respond(state: &AppState, subscription: Subscription) -> SubscriptionResponse {
    let evaluated = subscription::evaluate(
        &subscription,
        Utc::now(),
        state.config.subscription.expiring_soon_days,
    );
    SubscriptionResponse::new(subscription, evaluated)
}

/// Current subscription, classified against the clock.
pub async fn get_subscription(
    State(state): State<AppState>,
    UserId(user_id): UserId,
) -> Result<Json<SubscriptionResponse>, AppError> {
    let stored = state
        .store
        .get_subscription(&user_id)
        .await?
        .ok_or_else(|| DomainError::not_found("subscription", user_id.as_str()))?;
    Ok(Json(respond(&state, stored)))
}

/// Pick a plan. Replaces the account's lapsed or pending subscription.
pub async fn request_subscription(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Json(req): Json<SubscribeRequest>,
) -> Result<(StatusCode, Json<SubscriptionResponse>), AppError> {
    let now = Utc::now();
    let existing = state.store.get_subscription(&user_id).await?;
    subscription::check_request(existing.as_ref(), req.plan_id, now)?;
    let terms = subscription::request_terms(req.plan_id, req.billing_period, now)?;

    let id = existing
        .map(|existing| existing.id)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let record = Subscription {
        id,
        user_id,
        plan_id: req.plan_id,
        status: terms.status,
        start_date: terms.start_date,
        end_date: terms.end_date,
        price: terms.price,
        billing_period: req.billing_period,
        schema_version: RECORD_VERSION,
        updated_at: now,
    };
    record.validate()?;
    state.store.save_subscription(&record).await?;

    metrics::record_subscription_request(req.plan_id.as_str());
    tracing::info!(
        plan = %record.plan_id,
        billing_period = %record.billing_period,
        status = %record.status,
        "Subscription requested"
    );
    Ok((StatusCode::CREATED, Json(respond(&state, record))))
}

/// Administrator status change (activate, suspend, expire).
pub async fn admin_update_status(
    State(state): State<AppState>,
    UserId(admin_id): UserId,
    Path(target_user_id): Path<String>,
    Json(req): Json<UpdateSubscriptionStatusRequest>,
) -> Result<Json<SubscriptionResponse>, AppError> {
    if !state.config.subscription.is_admin(&admin_id) {
        return Err(AppError::Forbidden(anyhow::anyhow!(
            "Only administrators can change subscription status"
        )));
    }

    let mut record = state
        .store
        .get_subscription(&target_user_id)
        .await?
        .ok_or_else(|| DomainError::not_found("subscription", target_user_id.as_str()))?;
    let now = Utc::now();
    let previous = record.status;
    if previous == SubscriptionStatus::Pending && req.status == SubscriptionStatus::Active {
        // The paid term starts on activation, not on request.
        record.start_date = now;
        record.end_date = subscription::term_end(record.plan_id, record.billing_period, now)?;
    }
    record.status = req.status;
    record.updated_at = now;
    record.validate()?;
    state.store.save_subscription(&record).await?;

    tracing::info!(
        admin_id = %admin_id,
        target_user_id = %target_user_id,
        from = %previous,
        to = %record.status,
        "Subscription status changed by administrator"
    );
    Ok(Json(respond(&state, record)))
}
