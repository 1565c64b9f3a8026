use crate::domain::subscription::{self, SubscriptionState};
use crate::middleware::user_id::UserId;
use crate::services::metrics;
use crate::startup::AppState;
use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use chrono::Utc;
use service_core::error::AppError;

/// Extractor for operations that need a valid subscription.
///
/// Rejects with 403 when the account has no subscription, or when it is
/// pending, suspended or past its end date.
#[derive(Debug, Clone)]
pub struct Entitled {
    pub user_id: String,
    pub subscription: SubscriptionState,
}

#[async_trait]
impl FromRequestParts<AppState> for Entitled {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let UserId(user_id) = UserId::from_request_parts(parts, state).await?;

        let Some(stored) = state.store.get_subscription(&user_id).await? else {
            metrics::record_access_denied("no_subscription");
            return Err(AppError::Forbidden(anyhow::anyhow!(
                "An active subscription is required"
            )));
        };

        let evaluated = subscription::evaluate(
            &stored,
            Utc::now(),
            state.config.subscription.expiring_soon_days,
        );
        if !subscription::can_access(&evaluated) {
            metrics::record_access_denied(evaluated.status.as_str());
            tracing::info!(status = %evaluated.status, "Subscription does not grant access");
            return Err(AppError::Forbidden(anyhow::anyhow!(evaluated.message)));
        }

        Ok(Entitled {
            user_id,
            subscription: evaluated,
        })
    }
}
