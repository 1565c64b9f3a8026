//! Pure rental computations.
//!
//! Nothing in here touches the store, the clock or the network: callers pass
//! resolved records and the current instant, and get values or a
//! [`DomainError`] back.

mod error;
pub mod growth;
pub mod journal;
pub mod lifecycle;
pub mod payment;
pub mod plans;
pub mod pricing;
pub mod subscription;

pub use error::DomainError;
pub use journal::{CashJournal, EntryKind, JournalBuilder, JournalEntry, JournalTotals, MonthWindow};
pub use payment::PaymentBreakdown;
pub use plans::{Plan, PlanPrice};
pub use pricing::RentalQuote;
pub use subscription::{ExpiryClass, SubscriptionState};

use chrono::TimeDelta;

pub const MILLIS_PER_DAY: i64 = 86_400_000;

/// Whole days in `delta`, rounded up. Negative spans round toward zero.
pub(crate) fn ceil_days(delta: TimeDelta) -> i64 {
    let millis = delta.num_milliseconds();
    let days = millis / MILLIS_PER_DAY;
    if millis % MILLIS_PER_DAY > 0 {
        days + 1
    } else {
        days
    }
}
