use crate::domain::DomainError;
use crate::dtos::{CreateExpenseRequest, ExpenseListParams, ExpenseResponse};
use crate::handlers::optional_window;
use crate::middleware::{Entitled, UserId, ValidatedJson};
use crate::models::{Expense, ExpenseScope, StoredRecord, RECORD_VERSION};
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

async fn create_expense(
    state: AppState,
    user_id: String,
    scope: ExpenseScope,
    req: CreateExpenseRequest,
) -> Result<(StatusCode, Json<ExpenseResponse>), AppError> {
    if req.amount < Decimal::ZERO {
        return Err(DomainError::InvalidInput(format!(
            "expense amount must not be negative (got {})",
            req.amount
        ))
        .into());
    }

    let car_id = match (scope, req.car_id) {
        (ExpenseScope::Vehicle, None) => {
            return Err(DomainError::InvalidInput(
                "vehicle expenses need a car_id".to_string(),
            )
            .into());
        }
        (ExpenseScope::Vehicle, Some(car_id)) => {
            state
                .store
                .get_vehicle(&user_id, &car_id)
                .await?
                .ok_or_else(|| DomainError::not_found("vehicle", car_id.as_str()))?;
            Some(car_id)
        }
        (ExpenseScope::Business, car_id) => car_id,
    };

    let expense = Expense {
        id: Uuid::new_v4().to_string(),
        user_id,
        car_id,
        amount: req.amount,
        date: req.date,
        designation: req.designation,
        schema_version: RECORD_VERSION,
        created_at: Utc::now(),
    };
    expense.validate()?;
    state.store.insert_expense(scope, &expense).await?;

    tracing::info!(expense_id = %expense.id, scope = %scope, amount = %expense.amount, "Expense recorded");
    Ok((
        StatusCode::CREATED,
        Json(ExpenseResponse::new(scope.as_str(), expense)),
    ))
}

pub async fn create_vehicle_expense(
    State(state): State<AppState>,
    entitled: Entitled,
    ValidatedJson(req): ValidatedJson<CreateExpenseRequest>,
) -> Result<(StatusCode, Json<ExpenseResponse>), AppError> {
    create_expense(state, entitled.user_id, ExpenseScope::Vehicle, req).await
}

pub async fn create_business_expense(
    State(state): State<AppState>,
    entitled: Entitled,
    ValidatedJson(req): ValidatedJson<CreateExpenseRequest>,
) -> Result<(StatusCode, Json<ExpenseResponse>), AppError> {
    create_expense(state, entitled.user_id, ExpenseScope::Business, req).await
}

/// Expenses of one scope, or of both (vehicle first) when no scope is given.
pub async fn list_expenses(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Query(params): Query<ExpenseListParams>,
) -> Result<Json<Vec<ExpenseResponse>>, AppError> {
    let window = optional_window(params.year, params.month)?;
    let scopes = match params.scope.as_deref() {
        Some(scope) => vec![scope.parse::<ExpenseScope>()?],
        None => vec![ExpenseScope::Vehicle, ExpenseScope::Business],
    };

    let mut responses = Vec::new();
    for scope in scopes {
        let expenses = state.store.list_expenses(&user_id, scope, window).await?;
        responses.extend(
            expenses
                .into_iter()
                .map(|e| ExpenseResponse::new(scope.as_str(), e)),
        );
    }
    Ok(Json(responses))
}

pub async fn delete_expense(
    State(state): State<AppState>,
    entitled: Entitled,
    Path((scope, id)): Path<(String, String)>,
) -> Result<StatusCode, AppError> {
    let scope: ExpenseScope = scope.parse()?;
    if !state
        .store
        .delete_expense(&entitled.user_id, scope, &id)
        .await?
    {
        return Err(DomainError::not_found("expense", id).into());
    }
    tracing::info!(expense_id = %id, scope = %scope, "Expense deleted");
    Ok(StatusCode::NO_CONTENT)
}
