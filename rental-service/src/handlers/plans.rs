use crate::domain::plans;
use crate::dtos::{PlanResponse, PriceParams, PriceResponse};
use crate::models::{BillingPeriod, PlanId};
use axum::{
    extract::{Path, Query},
    Json,
};
use service_core::error::AppError;

pub async fn list_plans() -> Json<Vec<PlanResponse>> {
    Json(plans::catalog().iter().map(PlanResponse::from).collect())
}

pub async fn plan_price(
    Path(plan_id): Path<String>,
    Query(params): Query<PriceParams>,
) -> Result<Json<PriceResponse>, AppError> {
    let plan_id: PlanId = plan_id.parse()?;
    let billing_period = params.billing_period.unwrap_or(BillingPeriod::Monthly);
    let price = plans::resolve_price(plan_id, billing_period);

    Ok(Json(PriceResponse {
        plan_id,
        billing_period,
        price,
        amount: price.amount(),
    }))
}
