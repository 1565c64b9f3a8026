use crate::models::Expense;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateExpenseRequest {
    /// Required for vehicle expenses.
    #[serde(default)]
    pub car_id: Option<String>,
    pub amount: Decimal,
    pub date: NaiveDate,
    #[serde(alias = "name")]
    #[validate(length(min = 1, max = 200, message = "Designation is required"))]
    pub designation: String,
}

#[derive(Debug, Deserialize)]
pub struct ExpenseListParams {
    pub scope: Option<String>,
    pub year: Option<i32>,
    pub month: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct ExpenseResponse {
    pub id: String,
    pub scope: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub car_id: Option<String>,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub designation: String,
    pub created_at: DateTime<Utc>,
}

impl ExpenseResponse {
    pub fn new(scope: &'static str, e: Expense) -> Self {
        Self {
            id: e.id,
            scope,
            car_id: e.car_id,
            amount: e.amount,
            date: e.date,
            designation: e.designation,
            created_at: e.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub year: i32,
    pub month: u32,
    pub revenue: Decimal,
    pub previous_revenue: Decimal,
    pub revenue_growth_percentage: Decimal,
    pub expenses: Decimal,
    pub net_cash: Decimal,
    pub pending_total: Decimal,
    pub active_rentals: usize,
    pub fleet_size: usize,
    pub rented_vehicles: usize,
    pub utilization_percentage: Decimal,
}

