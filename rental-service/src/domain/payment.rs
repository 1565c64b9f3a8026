//! Paid and remaining amounts of a rental.

use super::DomainError;
use crate::models::{PaymentStatus, Rental};
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaymentBreakdown {
    pub total_due: Decimal,
    pub paid_amount: Decimal,
    pub remaining_amount: Decimal,
}

/// Derive paid/remaining amounts from the payment status.
///
/// `stored_paid` is only read for partial payments; paid and pending are
/// fully determined by the status.
pub fn settle(
    total_cost: Decimal,
    fees: Decimal,
    status: PaymentStatus,
    stored_paid: Option<Decimal>,
) -> Result<PaymentBreakdown, DomainError> {
    if total_cost < Decimal::ZERO || fees < Decimal::ZERO {
        return Err(DomainError::InvalidInput(format!(
            "amounts must not be negative (cost {}, fees {})",
            total_cost, fees
        )));
    }
    let total_due = total_cost + fees;

    let paid_amount = match status {
        PaymentStatus::Paid => total_due,
        PaymentStatus::Pending => Decimal::ZERO,
        PaymentStatus::Partial => {
            let paid = stored_paid.ok_or_else(|| {
                DomainError::InvalidState("partial payment without a paid amount".to_string())
            })?;
            if paid < Decimal::ZERO {
                return Err(DomainError::InvalidInput(format!(
                    "paid amount must not be negative (got {})",
                    paid
                )));
            }
            if paid > total_due {
                return Err(DomainError::InvalidState(format!(
                    "paid amount {} exceeds total due {}",
                    paid, total_due
                )));
            }
            paid
        }
    };

    Ok(PaymentBreakdown {
        total_due,
        paid_amount,
        remaining_amount: total_due - paid_amount,
    })
}

pub fn settle_rental(rental: &Rental) -> Result<PaymentBreakdown, DomainError> {
    settle(
        rental.total_cost,
        rental.fees_amount(),
        rental.payment_status,
        rental.paid_amount,
    )
}
