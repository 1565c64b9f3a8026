//! Vehicle model.

use super::{default_schema_version, StoredRecord};
use crate::domain::DomainError;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Vehicle availability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleStatus {
    Available,
    Rented,
    Unavailable,
}

impl VehicleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleStatus::Available => "available",
            VehicleStatus::Rented => "rented",
            VehicleStatus::Unavailable => "unavailable",
        }
    }
}

impl fmt::Display for VehicleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VehicleStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "available" => Ok(VehicleStatus::Available),
            "rented" => Ok(VehicleStatus::Rented),
            "unavailable" => Ok(VehicleStatus::Unavailable),
            other => Err(DomainError::InvalidState(format!(
                "unknown vehicle status '{}'",
                other
            ))),
        }
    }
}

/// Vehicle in the fleet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vehicle {
    #[serde(rename = "_id")]
    pub id: String,
    pub user_id: String,
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub registration: String,
    pub daily_rate: Decimal,
    pub status: VehicleStatus,
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl Vehicle {
    /// Short label used in journal designations.
    pub fn label(&self) -> String {
        format!("{} {} ({})", self.brand, self.model, self.registration)
    }
}

impl StoredRecord for Vehicle {
    const KIND: &'static str = "vehicle";

    fn record_id(&self) -> &str {
        &self.id
    }

    fn schema_version(&self) -> u32 {
        self.schema_version
    }

    fn validate(&self) -> Result<(), DomainError> {
        if self.daily_rate < Decimal::ZERO {
            return Err(DomainError::InvalidState(format!(
                "vehicle {} has a negative daily rate",
                self.id
            )));
        }
        Ok(())
    }
}
