use crate::domain::{ExpiryClass, Plan, PlanPrice, SubscriptionState};
use crate::models::{BillingPeriod, PlanId, Subscription, SubscriptionStatus};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct PlanResponse {
    pub id: PlanId,
    pub name: &'static str,
    /// `null` means unlimited.
    pub max_vehicles: Option<u32>,
    pub monthly_price: PlanPrice,
    pub annual_price: PlanPrice,
    pub duration_days: u32,
    pub features: Vec<&'static str>,
}

impl From<&Plan> for PlanResponse {
    fn from(plan: &Plan) -> Self {
        Self {
            id: plan.id,
            name: plan.name,
            max_vehicles: plan.max_vehicles,
            monthly_price: plan.price(BillingPeriod::Monthly),
            annual_price: plan.price(BillingPeriod::Annual),
            duration_days: plan.duration_days,
            features: plan.features.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PriceParams {
    pub billing_period: Option<BillingPeriod>,
}

#[derive(Debug, Serialize)]
pub struct PriceResponse {
    pub plan_id: PlanId,
    pub billing_period: BillingPeriod,
    /// Display text, e.g. `2900 DZD` or `quote on request`.
    pub price: PlanPrice,
    /// `null` when quoted on request.
    pub amount: Option<Decimal>,
}

#[derive(Debug, Deserialize)]
pub struct SubscribeRequest {
    pub plan_id: PlanId,
    #[serde(default = "default_billing_period")]
    pub billing_period: BillingPeriod,
}

fn default_billing_period() -> BillingPeriod {
    BillingPeriod::Monthly
}

#[derive(Debug, Deserialize)]
pub struct UpdateSubscriptionStatusRequest {
    pub status: SubscriptionStatus,
}

#[derive(Debug, Serialize)]
pub struct SubscriptionResponse {
    pub user_id: String,
    pub plan_id: PlanId,
    pub billing_period: BillingPeriod,
    pub status: SubscriptionStatus,
    pub stored_status: SubscriptionStatus,
    pub price: Decimal,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub days_remaining: i64,
    pub is_valid: bool,
    pub classification: ExpiryClass,
    pub message: String,
}

impl SubscriptionResponse {
    pub fn new(subscription: Subscription, state: SubscriptionState) -> Self {
        Self {
            user_id: subscription.user_id,
            plan_id: state.plan_id,
            billing_period: state.billing_period,
            status: state.status,
            stored_status: state.stored_status,
            price: subscription.price,
            start_date: subscription.start_date,
            end_date: state.end_date,
            days_remaining: state.days_remaining,
            is_valid: state.is_valid,
            classification: state.classification,
            message: state.message,
        }
    }
}
