use crate::domain::{plans, DomainError};
use crate::dtos::{CreateVehicleRequest, UpdateVehicleStatusRequest, VehicleResponse};
use crate::middleware::{Entitled, UserId, ValidatedJson};
use crate::models::{Vehicle, VehicleStatus, RECORD_VERSION};
use crate::startup::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use rust_decimal::Decimal;
use service_core::error::AppError;
use uuid::Uuid;

pub async fn create_vehicle(
    State(state): State<AppState>,
    entitled: Entitled,
    ValidatedJson(req): ValidatedJson<CreateVehicleRequest>,
) -> Result<(StatusCode, Json<VehicleResponse>), AppError> {
    if req.daily_rate < Decimal::ZERO {
        return Err(DomainError::InvalidInput(format!(
            "daily rate must not be negative (got {})",
            req.daily_rate
        ))
        .into());
    }

    let plan = plans::plan(entitled.subscription.plan_id);
    let fleet_size = state.store.list_vehicles(&entitled.user_id).await?.len();
    if !plan.allows_vehicles(fleet_size + 1) {
        return Err(DomainError::InvalidState(format!(
            "plan '{}' allows at most {} vehicles",
            plan.id,
            plan.max_vehicles.unwrap_or_default()
        ))
        .into());
    }

    let now = Utc::now();
    let vehicle = Vehicle {
        id: Uuid::new_v4().to_string(),
        user_id: entitled.user_id,
        brand: req.brand,
        model: req.model,
        year: req.year,
        registration: req.registration,
        daily_rate: req.daily_rate,
        status: VehicleStatus::Available,
        schema_version: RECORD_VERSION,
        created_at: now,
        updated_at: now,
    };
    state.store.insert_vehicle(&vehicle).await?;

    tracing::info!(vehicle_id = %vehicle.id, "Vehicle added to fleet");
    Ok((StatusCode::CREATED, Json(VehicleResponse::from(vehicle))))
}

pub async fn list_vehicles(
    State(state): State<AppState>,
    UserId(user_id): UserId,
) -> Result<Json<Vec<VehicleResponse>>, AppError> {
    let vehicles = state.store.list_vehicles(&user_id).await?;
    Ok(Json(vehicles.into_iter().map(VehicleResponse::from).collect()))
}

pub async fn get_vehicle(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Path(id): Path<String>,
) -> Result<Json<VehicleResponse>, AppError> {
    let vehicle = state
        .store
        .get_vehicle(&user_id, &id)
        .await?
        .ok_or_else(|| DomainError::not_found("vehicle", id))?;
    Ok(Json(VehicleResponse::from(vehicle)))
}

/// Manual availability changes. `rented` is owned by the rental lifecycle.
pub async fn update_vehicle_status(
    State(state): State<AppState>,
    entitled: Entitled,
    Path(id): Path<String>,
    Json(req): Json<UpdateVehicleStatusRequest>,
) -> Result<Json<VehicleResponse>, AppError> {
    if req.status == VehicleStatus::Rented {
        return Err(DomainError::InvalidInput(
            "vehicles are marked rented by activating a rental".to_string(),
        )
        .into());
    }

    let mut vehicle = state
        .store
        .get_vehicle(&entitled.user_id, &id)
        .await?
        .ok_or_else(|| DomainError::not_found("vehicle", id.as_str()))?;
    if vehicle.status == VehicleStatus::Rented {
        return Err(DomainError::InvalidState(format!(
            "vehicle {} is out on an active rental",
            vehicle.id
        ))
        .into());
    }

    state
        .store
        .set_vehicle_status(&entitled.user_id, &id, req.status)
        .await?;
    vehicle.status = req.status;
    vehicle.updated_at = Utc::now();

    tracing::info!(vehicle_id = %id, status = %req.status, "Vehicle status changed");
    Ok(Json(VehicleResponse::from(vehicle)))
}

pub async fn delete_vehicle(
    State(state): State<AppState>,
    entitled: Entitled,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let vehicle = state
        .store
        .get_vehicle(&entitled.user_id, &id)
        .await?
        .ok_or_else(|| DomainError::not_found("vehicle", id.as_str()))?;
    if vehicle.status == VehicleStatus::Rented {
        return Err(DomainError::InvalidState(format!(
            "vehicle {} cannot be deleted while rented",
            vehicle.id
        ))
        .into());
    }

    state.store.delete_vehicle(&entitled.user_id, &id).await?;
    tracing::info!(vehicle_id = %id, "Vehicle removed from fleet");
    Ok(StatusCode::NO_CONTENT)
}
