//! Rental model.

use super::{default_schema_version, StoredRecord};
use crate::domain::DomainError;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Rental status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RentalStatus {
    Reservation,
    Active,
    Completed,
    Cancelled,
}

impl RentalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RentalStatus::Reservation => "reservation",
            RentalStatus::Active => "active",
            RentalStatus::Completed => "completed",
            RentalStatus::Cancelled => "cancelled",
        }
    }

    /// Whether the vehicle is physically out with the customer.
    pub fn occupies_vehicle(&self) -> bool {
        matches!(self, RentalStatus::Active)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, RentalStatus::Completed | RentalStatus::Cancelled)
    }
}

impl fmt::Display for RentalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RentalStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "reservation" => Ok(RentalStatus::Reservation),
            "active" => Ok(RentalStatus::Active),
            "completed" => Ok(RentalStatus::Completed),
            "cancelled" => Ok(RentalStatus::Cancelled),
            other => Err(DomainError::InvalidState(format!(
                "unknown rental status '{}'",
                other
            ))),
        }
    }
}

/// Payment status of a rental.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Partial,
    Paid,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Partial => "partial",
            PaymentStatus::Paid => "paid",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(PaymentStatus::Pending),
            "partial" => Ok(PaymentStatus::Partial),
            "paid" => Ok(PaymentStatus::Paid),
            other => Err(DomainError::InvalidState(format!(
                "unknown payment status '{}'",
                other
            ))),
        }
    }
}

/// Fees charged on top of the rental days (fuel, damage, late return).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdditionalFees {
    #[serde(default)]
    pub description: String,
    pub amount: Decimal,
}

/// Rental.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rental {
    #[serde(rename = "_id")]
    pub id: String,
    pub user_id: String,
    pub vehicle_id: String,
    pub customer_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_cost: Decimal,
    pub status: RentalStatus,
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub paid_amount: Option<Decimal>,
    #[serde(default)]
    pub additional_fees: Option<AdditionalFees>,
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl Rental {
    pub fn fees_amount(&self) -> Decimal {
        self.additional_fees
            .as_ref()
            .map(|fees| fees.amount)
            .unwrap_or(Decimal::ZERO)
    }

    pub fn total_due(&self) -> Decimal {
        self.total_cost + self.fees_amount()
    }
}

impl StoredRecord for Rental {
    const KIND: &'static str = "rental";

    fn record_id(&self) -> &str {
        &self.id
    }

    fn schema_version(&self) -> u32 {
        self.schema_version
    }

    fn validate(&self) -> Result<(), DomainError> {
        if self.end_date < self.start_date {
            return Err(DomainError::InvalidState(format!(
                "rental {} ends ({}) before it starts ({})",
                self.id, self.end_date, self.start_date
            )));
        }
        if self.total_cost < Decimal::ZERO || self.fees_amount() < Decimal::ZERO {
            return Err(DomainError::InvalidState(format!(
                "rental {} has a negative amount",
                self.id
            )));
        }
        if let Some(paid) = self.paid_amount {
            if paid < Decimal::ZERO || paid > self.total_due() {
                return Err(DomainError::InvalidState(format!(
                    "rental {} paid amount {} is outside 0..={}",
                    self.id,
                    paid,
                    self.total_due()
                )));
            }
        }
        Ok(())
    }
}
