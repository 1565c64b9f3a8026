//! Period-over-period ratios for the dashboard.

use rust_decimal::{Decimal, RoundingStrategy};

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Percentage change from `previous` to `current`, rounded to two places.
///
/// A zero previous period has no ratio. Growth from zero counts as +100%
/// (or -100% for a drop below zero) and flat zero counts as 0%.
pub fn growth_percentage(previous: Decimal, current: Decimal) -> Decimal {
    if previous.is_zero() {
        return if current > Decimal::ZERO {
            HUNDRED
        } else if current < Decimal::ZERO {
            -HUNDRED
        } else {
            Decimal::ZERO
        };
    }

    ((current - previous) / previous.abs() * HUNDRED)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Share of the fleet currently rented, in percent.
pub fn utilization_percentage(rented: usize, total: usize) -> Decimal {
    if total == 0 {
        return Decimal::ZERO;
    }
    (Decimal::from(rented) / Decimal::from(total) * HUNDRED)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
