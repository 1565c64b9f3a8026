//! Customer model.

use super::{default_schema_version, StoredRecord};
use crate::domain::DomainError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Customer renting vehicles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    #[serde(rename = "_id")]
    pub id: String,
    pub user_id: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    #[serde(default)]
    pub email: Option<String>,
    pub license_number: String,
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

impl Customer {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

impl StoredRecord for Customer {
    const KIND: &'static str = "customer";

    fn record_id(&self) -> &str {
        &self.id
    }

    fn schema_version(&self) -> u32 {
        self.schema_version
    }

    fn validate(&self) -> Result<(), DomainError> {
        if self.license_number.trim().is_empty() {
            return Err(DomainError::InvalidState(format!(
                "customer {} has no license number",
                self.id
            )));
        }
        Ok(())
    }
}
