use crate::domain::{growth, CashJournal, JournalBuilder, MonthWindow};
use crate::dtos::{DashboardResponse, MonthParams};
use crate::handlers::month_window;
use crate::middleware::UserId;
use crate::models::{ExpenseScope, RentalStatus, VehicleStatus};
use crate::services::{metrics, FleetStore};
use crate::startup::AppState;
use axum::{
    extract::{Query, State},
    Json,
};
use service_core::error::AppError;
use std::collections::HashMap;

/// Build the cash journal of one month. The five reads are independent and
/// run concurrently.
pub(crate) async fn load_journal(
    store: &dyn FleetStore,
    user_id: &str,
    window: MonthWindow,
) -> Result<CashJournal, AppError> {
    let (rentals, vehicle_expenses, business_expenses, vehicles, customers) = tokio::try_join!(
        store.list_rentals(user_id, Some(window)),
        store.list_expenses(user_id, ExpenseScope::Vehicle, Some(window)),
        store.list_expenses(user_id, ExpenseScope::Business, Some(window)),
        store.list_vehicles(user_id),
        store.list_customers(user_id),
    )?;

    let vehicle_labels: HashMap<_, _> = vehicles.iter().map(|v| (v.id.as_str(), v.label())).collect();
    let customer_names: HashMap<_, _> = customers
        .iter()
        .map(|c| (c.id.as_str(), c.full_name()))
        .collect();

    let mut builder = JournalBuilder::new(window);
    for rental in &rentals {
        let vehicle = vehicle_labels
            .get(rental.vehicle_id.as_str())
            .map(String::as_str)
            .unwrap_or(rental.vehicle_id.as_str());
        let designation = match customer_names.get(rental.customer_id.as_str()) {
            Some(customer) => format!("Rental {} - {}", vehicle, customer),
            None => format!("Rental {}", vehicle),
        };
        builder.add_rental(rental, designation)?;
    }
    for expense in &vehicle_expenses {
        builder.add_expense(ExpenseScope::Vehicle, expense);
    }
    for expense in &business_expenses {
        builder.add_expense(ExpenseScope::Business, expense);
    }

    let journal = builder.build();
    metrics::record_journal_built(journal.entries.len());
    Ok(journal)
}

pub async fn get_journal(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Query(params): Query<MonthParams>,
) -> Result<Json<CashJournal>, AppError> {
    let window = month_window(params.year, params.month)?;
    let journal = load_journal(state.store.as_ref(), &user_id, window).await?;
    tracing::debug!(
        entries = journal.entries.len(),
        net_cash = %journal.totals.net_cash,
        "Cash journal built"
    );
    Ok(Json(journal))
}

pub async fn get_dashboard(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Query(params): Query<MonthParams>,
) -> Result<Json<DashboardResponse>, AppError> {
    let window = month_window(params.year, params.month)?;
    let store = state.store.as_ref();

    let (current, previous, vehicles, rentals) = tokio::try_join!(
        load_journal(store, &user_id, window),
        load_journal(store, &user_id, window.previous()),
        async { Ok::<_, AppError>(store.list_vehicles(&user_id).await?) },
        async { Ok::<_, AppError>(store.list_rentals(&user_id, None).await?) },
    )?;

    let rented_vehicles = vehicles
        .iter()
        .filter(|v| v.status == VehicleStatus::Rented)
        .count();
    let active_rentals = rentals
        .iter()
        .filter(|r| r.status == RentalStatus::Active)
        .count();

    Ok(Json(DashboardResponse {
        year: window.year,
        month: window.month,
        revenue: current.totals.revenue_total,
        previous_revenue: previous.totals.revenue_total,
        revenue_growth_percentage: growth::growth_percentage(
            previous.totals.revenue_total,
            current.totals.revenue_total,
        ),
        expenses: current.totals.expense_total,
        net_cash: current.totals.net_cash,
        pending_total: current.totals.pending_total,
        active_rentals,
        fleet_size: vehicles.len(),
        rented_vehicles,
        utilization_percentage: growth::utilization_percentage(rented_vehicles, vehicles.len()),
    }))
}
