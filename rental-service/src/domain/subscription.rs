//! Subscription validity, expiry classification and request terms.
//!
//! Status changes are made by administrators or by time passing. Reading a
//! subscription only classifies it: an entitled status whose end date has
//! gone by reports as expired without the stored record being rewritten.

use super::{ceil_days, plans, DomainError};
use crate::models::{BillingPeriod, PlanId, Subscription, SubscriptionStatus};
use chrono::{DateTime, Days, Months, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

/// Days before the end date from which a warning is shown.
pub const DEFAULT_WARNING_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpiryClass {
    Expired,
    ExpiringSoon,
    Valid,
}

/// Whole days until `end`, rounded up. Zero or negative once `end` has passed.
pub fn days_remaining(end: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    ceil_days(end.signed_duration_since(now))
}

pub fn classify(days_remaining: i64, warning_days: i64) -> ExpiryClass {
    if days_remaining <= 0 {
        ExpiryClass::Expired
    } else if days_remaining <= warning_days {
        ExpiryClass::ExpiringSoon
    } else {
        ExpiryClass::Valid
    }
}

/// Read-side view of a subscription at a given instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubscriptionState {
    /// Status after time-based expiry is applied.
    pub status: SubscriptionStatus,
    pub stored_status: SubscriptionStatus,
    pub plan_id: PlanId,
    pub billing_period: BillingPeriod,
    pub end_date: DateTime<Utc>,
    pub days_remaining: i64,
    pub is_valid: bool,
    pub classification: ExpiryClass,
    pub message: String,
}

pub fn evaluate(
    subscription: &Subscription,
    now: DateTime<Utc>,
    warning_days: i64,
) -> SubscriptionState {
    let days = days_remaining(subscription.end_date, now);
    let classification = classify(days, warning_days);

    let stored_status = subscription.status;
    let status = if stored_status.is_entitled() && days <= 0 {
        SubscriptionStatus::Expired
    } else {
        stored_status
    };
    let is_valid = stored_status.is_entitled() && days > 0;

    SubscriptionState {
        status,
        stored_status,
        plan_id: subscription.plan_id,
        billing_period: subscription.billing_period,
        end_date: subscription.end_date,
        days_remaining: days,
        is_valid,
        classification,
        message: status_message(status, classification, days),
    }
}

fn status_message(status: SubscriptionStatus, classification: ExpiryClass, days: i64) -> String {
    match status {
        SubscriptionStatus::Pending => "Your subscription is awaiting activation.".to_string(),
        SubscriptionStatus::Suspended => {
            "Your subscription is suspended. Contact support to restore access.".to_string()
        }
        SubscriptionStatus::Expired => {
            "Your subscription has expired. Renew it to continue.".to_string()
        }
        SubscriptionStatus::Active | SubscriptionStatus::Trial => {
            let what = if status == SubscriptionStatus::Trial {
                "trial"
            } else {
                "subscription"
            };
            match classification {
                ExpiryClass::ExpiringSoon if days == 1 => {
                    format!("Your {} expires in 1 day.", what)
                }
                ExpiryClass::ExpiringSoon => format!("Your {} expires in {} days.", what, days),
                _ => format!("Your {} is active ({} days remaining).", what, days),
            }
        }
    }
}

/// Guard evaluated before protected operations.
pub fn can_access(state: &SubscriptionState) -> bool {
    state.is_valid
}

/// Terms of a self-service subscription request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionTerms {
    pub status: SubscriptionStatus,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub price: Decimal,
}

/// End of a term starting at `start`: the catalog duration for the trial,
/// one billing period for paid plans.
pub fn term_end(
    plan_id: PlanId,
    period: BillingPeriod,
    start: DateTime<Utc>,
) -> Result<DateTime<Utc>, DomainError> {
    let end = if plan_id == PlanId::Trial {
        let days = u64::from(plans::plan(plan_id).duration_days);
        start.checked_add_days(Days::new(days))
    } else {
        start.checked_add_months(Months::new(period.months()))
    };
    end.ok_or_else(|| DomainError::InvalidInput("subscription end date out of range".to_string()))
}

/// Whether the account may replace `existing` with a request for `plan_id`.
///
/// A suspended account waits for an administrator. The trial is granted once
/// per account. A subscription that still grants access runs to its end date.
pub fn check_request(
    existing: Option<&Subscription>,
    plan_id: PlanId,
    now: DateTime<Utc>,
) -> Result<(), DomainError> {
    let Some(existing) = existing else {
        return Ok(());
    };

    if existing.status == SubscriptionStatus::Suspended {
        return Err(DomainError::InvalidState(
            "subscription is suspended and can only be restored by an administrator".to_string(),
        ));
    }
    if plan_id == PlanId::Trial {
        return Err(DomainError::InvalidState(
            "the trial has already been used on this account".to_string(),
        ));
    }
    let days = days_remaining(existing.end_date, now);
    if existing.status.is_entitled() && days > 0 {
        return Err(DomainError::InvalidState(format!(
            "current {} subscription still runs for {} days",
            existing.plan_id, days
        )));
    }
    Ok(())
}

/// The trial runs for its catalog duration and is usable at once. Paid plans
/// run for one billing period and wait for an administrator to activate them.
pub fn request_terms(
    plan_id: PlanId,
    period: BillingPeriod,
    now: DateTime<Utc>,
) -> Result<SubscriptionTerms, DomainError> {
    let price = plans::billable_price(plan_id, period)?;
    let status = if plan_id == PlanId::Trial {
        SubscriptionStatus::Trial
    } else {
        SubscriptionStatus::Pending
    };

    Ok(SubscriptionTerms {
        status,
        start_date: now,
        end_date: term_end(plan_id, period, now)?,
        price,
    })
}
