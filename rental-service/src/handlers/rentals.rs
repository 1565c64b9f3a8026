use crate::domain::{lifecycle, payment, pricing, DomainError, RentalQuote};
use crate::dtos::{
    CreateRentalRequest, InvoiceResponse, MonthParams, RentalResponse, UpdatePaymentRequest,
    UpdateRentalDatesRequest, UpdateRentalStatusRequest,
};
use crate::handlers::optional_window;
use crate::middleware::{Entitled, UserId, ValidatedJson};
use crate::models::{
    Customer, PaymentStatus, Rental, RentalStatus, StoredRecord, Vehicle, VehicleStatus, RECORD_VERSION,
};
use crate::services::{metrics, FleetStore};
use crate::startup::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use rust_decimal::Decimal;
use service_core::error::AppError;
use uuid::Uuid;

async fn load_rental(store: &dyn FleetStore, user_id: &str, id: &str) -> Result<Rental, AppError> {
    Ok(store
        .get_rental(user_id, id)
        .await?
        .ok_or_else(|| DomainError::not_found("rental", id))?)
}

async fn load_vehicle(
    store: &dyn FleetStore,
    user_id: &str,
    id: &str,
) -> Result<Vehicle, AppError> {
    Ok(store
        .get_vehicle(user_id, id)
        .await?
        .ok_or_else(|| DomainError::not_found("vehicle", id))?)
}

async fn load_customer(
    store: &dyn FleetStore,
    user_id: &str,
    id: &str,
) -> Result<Customer, AppError> {
    Ok(store
        .get_customer(user_id, id)
        .await?
        .ok_or_else(|| DomainError::not_found("customer", id))?)
}

fn ensure_available(vehicle: &Vehicle) -> Result<(), DomainError> {
    if vehicle.status != VehicleStatus::Available {
        return Err(DomainError::InvalidState(format!(
            "vehicle {} is {}",
            vehicle.id, vehicle.status
        )));
    }
    Ok(())
}

fn respond(rental: Rental) -> Result<RentalResponse, AppError> {
    let breakdown = payment::settle_rental(&rental)?;
    Ok(RentalResponse::new(rental, breakdown))
}

pub async fn create_rental(
    State(state): State<AppState>,
    entitled: Entitled,
    ValidatedJson(req): ValidatedJson<CreateRentalRequest>,
) -> Result<(StatusCode, Json<RentalResponse>), AppError> {
    let user_id = entitled.user_id;
    let status = lifecycle::validate_initial(req.status.unwrap_or(RentalStatus::Reservation))?;

    let (vehicle, _) = tokio::try_join!(
        load_vehicle(state.store.as_ref(), &user_id, &req.vehicle_id),
        load_customer(state.store.as_ref(), &user_id, &req.customer_id),
    )?;
    if status.occupies_vehicle() {
        ensure_available(&vehicle)?;
    }

    let quote = pricing::quote(req.start_date, req.end_date, Some(vehicle.daily_rate))?;
    let now = Utc::now();
    let rental = Rental {
        id: Uuid::new_v4().to_string(),
        user_id: user_id.clone(),
        vehicle_id: vehicle.id.clone(),
        customer_id: req.customer_id,
        start_date: quote.start_date,
        end_date: quote.end_date,
        total_cost: quote.total_cost,
        status,
        payment_status: req.payment_status.unwrap_or(PaymentStatus::Pending),
        paid_amount: req.paid_amount,
        additional_fees: req.additional_fees,
        schema_version: RECORD_VERSION,
        created_at: now,
        updated_at: now,
    };
    let breakdown = payment::settle_rental(&rental)?;
    rental.validate()?;

    state.store.insert_rental(&rental).await?;
    if status.occupies_vehicle() {
        state
            .store
            .set_vehicle_status(&user_id, &vehicle.id, VehicleStatus::Rented)
            .await?;
    }

    metrics::record_rental_created(status.as_str());
    tracing::info!(
        rental_id = %rental.id,
        vehicle_id = %rental.vehicle_id,
        days = quote.days,
        total_cost = %rental.total_cost,
        "Rental created"
    );
    Ok((
        StatusCode::CREATED,
        Json(RentalResponse::new(rental, breakdown)),
    ))
}

pub async fn list_rentals(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Query(params): Query<MonthParams>,
) -> Result<Json<Vec<RentalResponse>>, AppError> {
    let window = optional_window(params.year, params.month)?;
    let rentals = state.store.list_rentals(&user_id, window).await?;
    let responses = rentals
        .into_iter()
        .map(respond)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(responses))
}

pub async fn get_rental(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Path(id): Path<String>,
) -> Result<Json<RentalResponse>, AppError> {
    let rental = load_rental(state.store.as_ref(), &user_id, &id).await?;
    Ok(Json(respond(rental)?))
}

/// Record a payment. The stored paid amount is the one the ledger derives,
/// so a `paid` rental always stores its full amount due.
pub async fn update_payment(
    State(state): State<AppState>,
    entitled: Entitled,
    Path(id): Path<String>,
    Json(req): Json<UpdatePaymentRequest>,
) -> Result<Json<RentalResponse>, AppError> {
    let mut rental = load_rental(state.store.as_ref(), &entitled.user_id, &id).await?;
    let payment_status: PaymentStatus = req.payment_status.parse()?;

    if let Some(fees) = req.additional_fees {
        rental.additional_fees = Some(fees);
    }
    let breakdown = payment::settle(
        rental.total_cost,
        rental.fees_amount(),
        payment_status,
        req.paid_amount,
    )?;

    rental.payment_status = payment_status;
    rental.paid_amount = Some(breakdown.paid_amount);
    rental.updated_at = Utc::now();
    rental.validate()?;

    if !state.store.replace_rental(&rental).await? {
        return Err(DomainError::not_found("rental", id).into());
    }

    metrics::record_payment_update(payment_status.as_str());
    tracing::info!(
        rental_id = %rental.id,
        payment_status = %payment_status,
        remaining = %breakdown.remaining_amount,
        "Rental payment updated"
    );
    Ok(Json(RentalResponse::new(rental, breakdown)))
}

pub async fn update_status(
    State(state): State<AppState>,
    entitled: Entitled,
    Path(id): Path<String>,
    Json(req): Json<UpdateRentalStatusRequest>,
) -> Result<Json<RentalResponse>, AppError> {
    let user_id = entitled.user_id;
    let mut rental = load_rental(state.store.as_ref(), &user_id, &id).await?;
    let from = rental.status;
    let to = lifecycle::transition(from, req.status)?;

    if to.occupies_vehicle() {
        let vehicle = load_vehicle(state.store.as_ref(), &user_id, &rental.vehicle_id).await?;
        ensure_available(&vehicle)?;
    }

    rental.status = to;
    rental.updated_at = Utc::now();
    if !state.store.replace_rental(&rental).await? {
        return Err(DomainError::not_found("rental", id).into());
    }

    if to.occupies_vehicle() {
        state
            .store
            .set_vehicle_status(&user_id, &rental.vehicle_id, VehicleStatus::Rented)
            .await?;
    } else if from.occupies_vehicle() {
        release_vehicle(state.store.as_ref(), &user_id, &rental.vehicle_id).await?;
    }

    metrics::record_rental_transition(to.as_str());
    tracing::info!(rental_id = %rental.id, from = %from, to = %to, "Rental status changed");
    Ok(Json(respond(rental)?))
}

/// Move a rental and price it again from the vehicle's current daily rate.
pub async fn update_dates(
    State(state): State<AppState>,
    entitled: Entitled,
    Path(id): Path<String>,
    Json(req): Json<UpdateRentalDatesRequest>,
) -> Result<Json<RentalResponse>, AppError> {
    let user_id = entitled.user_id;
    let mut rental = load_rental(state.store.as_ref(), &user_id, &id).await?;
    if rental.status.is_terminal() {
        return Err(DomainError::InvalidState(format!(
            "rental {} is {} and can no longer be changed",
            rental.id, rental.status
        ))
        .into());
    }

    let vehicle = load_vehicle(state.store.as_ref(), &user_id, &rental.vehicle_id).await?;
    let quote = pricing::quote(req.start_date, req.end_date, Some(vehicle.daily_rate))?;

    rental.start_date = quote.start_date;
    rental.end_date = quote.end_date;
    rental.total_cost = quote.total_cost;
    if rental.payment_status == PaymentStatus::Paid {
        rental.paid_amount = Some(rental.total_due());
    }
    rental.updated_at = Utc::now();
    let breakdown = payment::settle_rental(&rental)?;
    rental.validate()?;

    if !state.store.replace_rental(&rental).await? {
        return Err(DomainError::not_found("rental", id).into());
    }

    tracing::info!(rental_id = %rental.id, days = quote.days, total_cost = %quote.total_cost, "Rental re-priced");
    Ok(Json(RentalResponse::new(rental, breakdown)))
}

pub async fn get_invoice(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Path(id): Path<String>,
) -> Result<Json<InvoiceResponse>, AppError> {
    let rental = load_rental(state.store.as_ref(), &user_id, &id).await?;
    let (vehicle, customer) = tokio::try_join!(
        state.store.get_vehicle(&user_id, &rental.vehicle_id),
        state.store.get_customer(&user_id, &rental.customer_id),
    )?;

    // The stored total is authoritative; the vehicle's rate may have changed
    // since the rental was priced.
    let days = pricing::rental_days(rental.start_date, rental.end_date)?;
    let quote = RentalQuote {
        start_date: rental.start_date,
        end_date: rental.end_date,
        days,
        daily_rate: rental.total_cost / Decimal::from(days),
        total_cost: rental.total_cost,
    };
    let breakdown = payment::settle_rental(&rental)?;

    let vehicle = vehicle
        .map(|v| v.label())
        .unwrap_or_else(|| rental.vehicle_id.clone());
    let customer = customer
        .map(|c| c.full_name())
        .unwrap_or_else(|| rental.customer_id.clone());

    Ok(Json(InvoiceResponse::new(
        &rental, vehicle, customer, quote, breakdown,
    )))
}

pub async fn delete_rental(
    State(state): State<AppState>,
    entitled: Entitled,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let user_id = entitled.user_id;
    let rental = load_rental(state.store.as_ref(), &user_id, &id).await?;

    state.store.delete_rental(&user_id, &id).await?;
    if rental.status.occupies_vehicle() {
        release_vehicle(state.store.as_ref(), &user_id, &rental.vehicle_id).await?;
    }

    tracing::info!(rental_id = %id, "Rental deleted");
    Ok(StatusCode::NO_CONTENT)
}

async fn release_vehicle(
    store: &dyn FleetStore,
    user_id: &str,
    vehicle_id: &str,
) -> Result<(), AppError> {
    if !store
        .set_vehicle_status(user_id, vehicle_id, VehicleStatus::Available)
        .await?
    {
        tracing::warn!(vehicle_id = %vehicle_id, "Rented vehicle no longer exists");
    }
    Ok(())
}
