//! Expense model.
//!
//! Vehicle and business expenses share one shape; which collection a record
//! lives in is what tells them apart.

use super::{default_schema_version, StoredRecord};
use crate::domain::DomainError;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseScope {
    Vehicle,
    Business,
}

impl ExpenseScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExpenseScope::Vehicle => "vehicle",
            ExpenseScope::Business => "business",
        }
    }

    pub fn collection(&self) -> &'static str {
        match self {
            ExpenseScope::Vehicle => "vehicle_expenses",
            ExpenseScope::Business => "business_expenses",
        }
    }
}

impl fmt::Display for ExpenseScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExpenseScope {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "vehicle" => Ok(ExpenseScope::Vehicle),
            "business" => Ok(ExpenseScope::Business),
            other => Err(DomainError::InvalidInput(format!(
                "unknown expense scope '{}'",
                other
            ))),
        }
    }
}

/// Expense.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    #[serde(rename = "_id")]
    pub id: String,
    pub user_id: String,
    #[serde(default)]
    pub car_id: Option<String>,
    pub amount: Decimal,
    pub date: NaiveDate,
    #[serde(alias = "name")]
    pub designation: String,
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

impl StoredRecord for Expense {
    const KIND: &'static str = "expense";

    fn record_id(&self) -> &str {
        &self.id
    }

    fn schema_version(&self) -> u32 {
        self.schema_version
    }

    fn validate(&self) -> Result<(), DomainError> {
        if self.amount < Decimal::ZERO {
            return Err(DomainError::InvalidState(format!(
                "expense {} has a negative amount",
                self.id
            )));
        }
        Ok(())
    }
}
