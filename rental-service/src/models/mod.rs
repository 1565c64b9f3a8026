//! Stored record types for rental-service.
//!
//! Every record is decoded at the store boundary and checked with
//! [`StoredRecord::check`] before it reaches the domain code, so a document
//! with a missing field, an unknown enum value or a broken invariant fails
//! fast instead of flowing through as a half-filled value.

mod customer;
mod expense;
mod rental;
mod subscription;
mod vehicle;

pub use customer::Customer;
pub use expense::{Expense, ExpenseScope};
pub use rental::{AdditionalFees, PaymentStatus, Rental, RentalStatus};
pub use subscription::{BillingPeriod, PlanId, Subscription, SubscriptionStatus};
pub use vehicle::{Vehicle, VehicleStatus};

use crate::domain::DomainError;

/// Current shape version written by this service.
pub const RECORD_VERSION: u32 = 1;

pub(crate) fn default_schema_version() -> u32 {
    RECORD_VERSION
}

pub trait StoredRecord: Sized {
    /// Collection the record lives in, used in error messages.
    const KIND: &'static str;

    fn record_id(&self) -> &str;

    fn schema_version(&self) -> u32;

    /// Record-level invariants.
    fn validate(&self) -> Result<(), DomainError>;

    /// Reject unknown shape versions and broken invariants.
    fn check(self) -> Result<Self, DomainError> {
        if self.schema_version() != RECORD_VERSION {
            return Err(DomainError::InvalidState(format!(
                "{} {} has unsupported schema version {} (expected {})",
                Self::KIND,
                self.record_id(),
                self.schema_version(),
                RECORD_VERSION
            )));
        }
        self.validate()?;
        Ok(self)
    }
}
