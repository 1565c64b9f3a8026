use crate::models::{Customer, Vehicle, VehicleStatus};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateVehicleRequest {
    #[validate(length(min = 1, message = "Brand is required"))]
    pub brand: String,
    #[validate(length(min = 1, message = "Model is required"))]
    pub model: String,
    #[validate(range(min = 1950, max = 2100, message = "Year is out of range"))]
    pub year: i32,
    #[validate(length(min = 1, max = 32, message = "Registration is required"))]
    pub registration: String,
    /// Negative rates are rejected by the pricing rules, not here.
    pub daily_rate: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct UpdateVehicleStatusRequest {
    pub status: VehicleStatus,
}

#[derive(Debug, Serialize)]
pub struct VehicleResponse {
    pub id: String,
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub registration: String,
    pub daily_rate: Decimal,
    pub status: VehicleStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Vehicle> for VehicleResponse {
    fn from(v: Vehicle) -> Self {
        Self {
            id: v.id,
            brand: v.brand,
            model: v.model,
            year: v.year,
            registration: v.registration,
            daily_rate: v.daily_rate,
            status: v.status,
            created_at: v.created_at,
            updated_at: v.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCustomerRequest {
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,
    #[validate(length(min = 6, max = 20, message = "Invalid phone number"))]
    pub phone: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    #[validate(length(min = 1, message = "License number is required"))]
    pub license_number: String,
}

#[derive(Debug, Serialize)]
pub struct CustomerResponse {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub license_number: String,
    pub created_at: DateTime<Utc>,
}

impl From<Customer> for CustomerResponse {
    fn from(c: Customer) -> Self {
        Self {
            full_name: c.full_name(),
            id: c.id,
            first_name: c.first_name,
            last_name: c.last_name,
            phone: c.phone,
            email: c.email,
            license_number: c.license_number,
            created_at: c.created_at,
        }
    }
}
