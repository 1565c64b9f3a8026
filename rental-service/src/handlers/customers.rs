use crate::domain::DomainError;
use crate::dtos::{CreateCustomerRequest, CustomerResponse};
use crate::middleware::{Entitled, UserId, ValidatedJson};
use crate::models::{Customer, RECORD_VERSION};
use crate::startup::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use service_core::error::AppError;
use uuid::Uuid;

pub async fn create_customer(
    State(state): State<AppState>,
    entitled: Entitled,
    ValidatedJson(req): ValidatedJson<CreateCustomerRequest>,
) -> Result<(StatusCode, Json<CustomerResponse>), AppError> {
    let customer = Customer {
        id: Uuid::new_v4().to_string(),
        user_id: entitled.user_id,
        first_name: req.first_name,
        last_name: req.last_name,
        phone: req.phone,
        email: req.email,
        license_number: req.license_number,
        schema_version: RECORD_VERSION,
        created_at: Utc::now(),
    };
    state.store.insert_customer(&customer).await?;

    tracing::info!(customer_id = %customer.id, "Customer created");
    Ok((StatusCode::CREATED, Json(CustomerResponse::from(customer))))
}

pub async fn list_customers(
    State(state): State<AppState>,
    UserId(user_id): UserId,
) -> Result<Json<Vec<CustomerResponse>>, AppError> {
    let customers = state.store.list_customers(&user_id).await?;
    Ok(Json(customers.into_iter().map(CustomerResponse::from).collect()))
}

pub async fn delete_customer(
    State(state): State<AppState>,
    entitled: Entitled,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    if !state.store.delete_customer(&entitled.user_id, &id).await? {
        return Err(DomainError::not_found("customer", id).into());
    }
    tracing::info!(customer_id = %id, "Customer deleted");
    Ok(StatusCode::NO_CONTENT)
}
