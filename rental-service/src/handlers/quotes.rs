use crate::domain::{pricing, DomainError, RentalQuote};
use crate::dtos::QuoteRequest;
use crate::middleware::{UserId, ValidatedJson};
use crate::startup::AppState;
use axum::{extract::State, Json};
use service_core::error::AppError;

/// Price a rental period from a fleet vehicle's daily rate or an explicit one.
pub async fn create_quote(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    ValidatedJson(req): ValidatedJson<QuoteRequest>,
) -> Result<Json<RentalQuote>, AppError> {
    let daily_rate = match &req.vehicle_id {
        Some(vehicle_id) => {
            let vehicle = state
                .store
                .get_vehicle(&user_id, vehicle_id)
                .await?
                .ok_or_else(|| DomainError::not_found("vehicle", vehicle_id.as_str()))?;
            Some(vehicle.daily_rate)
        }
        None => req.daily_rate,
    };

    let quote = pricing::quote(req.start_date, req.end_date, daily_rate)?;
    tracing::debug!(days = quote.days, total = %quote.total_cost, "Quoted rental");
    Ok(Json(quote))
}
