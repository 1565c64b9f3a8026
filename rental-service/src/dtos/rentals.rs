use crate::domain::{PaymentBreakdown, RentalQuote};
use crate::models::{AdditionalFees, PaymentStatus, Rental, RentalStatus};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Price either a fleet vehicle (its daily rate) or an explicit rate.
#[derive(Debug, Deserialize, Validate)]
pub struct QuoteRequest {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[validate(length(min = 1))]
    pub vehicle_id: Option<String>,
    pub daily_rate: Option<Decimal>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateRentalRequest {
    #[validate(length(min = 1, message = "Vehicle is required"))]
    pub vehicle_id: String,
    #[validate(length(min = 1, message = "Customer is required"))]
    pub customer_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub status: Option<RentalStatus>,
    #[serde(default)]
    pub payment_status: Option<PaymentStatus>,
    #[serde(default)]
    pub paid_amount: Option<Decimal>,
    #[serde(default)]
    pub additional_fees: Option<AdditionalFees>,
}

/// Payment status travels as a string so an unknown value reaches the
/// ledger and is reported as an invalid state.
#[derive(Debug, Deserialize)]
pub struct UpdatePaymentRequest {
    pub payment_status: String,
    #[serde(default)]
    pub paid_amount: Option<Decimal>,
    #[serde(default)]
    pub additional_fees: Option<AdditionalFees>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateRentalStatusRequest {
    pub status: RentalStatus,
}

#[derive(Debug, Deserialize)]
pub struct UpdateRentalDatesRequest {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Serialize)]
pub struct RentalResponse {
    pub id: String,
    pub vehicle_id: String,
    pub customer_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_cost: Decimal,
    pub status: RentalStatus,
    pub payment_status: PaymentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_fees: Option<AdditionalFees>,
    pub payment: PaymentBreakdown,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RentalResponse {
    pub fn new(rental: Rental, payment: PaymentBreakdown) -> Self {
        Self {
            id: rental.id,
            vehicle_id: rental.vehicle_id,
            customer_id: rental.customer_id,
            start_date: rental.start_date,
            end_date: rental.end_date,
            total_cost: rental.total_cost,
            status: rental.status,
            payment_status: rental.payment_status,
            additional_fees: rental.additional_fees,
            payment,
            created_at: rental.created_at,
            updated_at: rental.updated_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct MonthParams {
    pub year: Option<i32>,
    pub month: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct InvoiceResponse {
    pub rental_id: String,
    pub vehicle: String,
    pub customer: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub days: i64,
    pub daily_rate: Decimal,
    pub subtotal: Decimal,
    pub additional_fees: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_fees_description: Option<String>,
    pub total_due: Decimal,
    pub paid_amount: Decimal,
    pub remaining_amount: Decimal,
    pub payment_status: PaymentStatus,
    pub currency: &'static str,
}

impl InvoiceResponse {
    pub fn new(
        rental: &Rental,
        vehicle: String,
        customer: String,
        quote: RentalQuote,
        payment: PaymentBreakdown,
    ) -> Self {
        Self {
            rental_id: rental.id.clone(),
            vehicle,
            customer,
            start_date: quote.start_date,
            end_date: quote.end_date,
            days: quote.days,
            daily_rate: quote.daily_rate,
            subtotal: rental.total_cost,
            additional_fees: rental.fees_amount(),
            additional_fees_description: rental
                .additional_fees
                .as_ref()
                .map(|fees| fees.description.clone())
                .filter(|d| !d.is_empty()),
            total_due: payment.total_due,
            paid_amount: payment.paid_amount,
            remaining_amount: payment.remaining_amount,
            payment_status: rental.payment_status,
            currency: crate::domain::plans::CURRENCY,
        }
    }
}
