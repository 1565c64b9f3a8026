//! Rental day counting and cost.
//!
//! One definition serves every call site (quotes, new rentals, re-pricing and
//! invoices): a rental that starts and ends on the same calendar day bills one
//! day, anything longer bills the number of calendar days between the dates.

use super::{ceil_days, DomainError};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

/// Priced rental period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RentalQuote {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub days: i64,
    pub daily_rate: Decimal,
    pub total_cost: Decimal,
}

/// Billable days between two calendar dates.
pub fn rental_days(start: NaiveDate, end: NaiveDate) -> Result<i64, DomainError> {
    if end < start {
        return Err(DomainError::InvalidInput(format!(
            "rental end date {} is before start date {}",
            end, start
        )));
    }
    if start == end {
        return Ok(1);
    }
    Ok(ceil_days(end.signed_duration_since(start)))
}

/// Billable days between two instants, after truncating both to their UTC date.
pub fn rental_days_between(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<i64, DomainError> {
    rental_days(start.date_naive(), end.date_naive())
}

/// Price a rental. A missing or negative daily rate is rejected rather than
/// producing a free rental.
pub fn quote(
    start: NaiveDate,
    end: NaiveDate,
    daily_rate: Option<Decimal>,
) -> Result<RentalQuote, DomainError> {
    let daily_rate = daily_rate
        .ok_or_else(|| DomainError::InvalidInput("daily rate is required".to_string()))?;
    if daily_rate < Decimal::ZERO {
        return Err(DomainError::InvalidInput(format!(
            "daily rate must not be negative (got {})",
            daily_rate
        )));
    }

    let days = rental_days(start, end)?;
    Ok(RentalQuote {
        start_date: start,
        end_date: end,
        days,
        daily_rate,
        total_cost: Decimal::from(days) * daily_rate,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_same_day_bills_one_day() {
        let q = quote(date(2024, 1, 1), date(2024, 1, 1), Some(Decimal::from(5000))).unwrap();
        assert_eq!(q.days, 1);
        assert_eq!(q.total_cost, Decimal::from(5000));
    }

    #[test]
    fn test_three_nights() {
        let q = quote(date(2024, 1, 1), date(2024, 1, 4), Some(Decimal::from(5000))).unwrap();
        assert_eq!(q.days, 3);
        assert_eq!(q.total_cost, Decimal::from(15000));
    }

    #[test]
    fn test_n_days_bills_n_times_rate() {
        let start = date(2024, 2, 20);
        let rate = Decimal::new(45005, 1);
        for n in 1..=60 {
            let end = start + chrono::Days::new(n);
            let q = quote(start, end, Some(rate)).unwrap();
            assert_eq!(q.days, n as i64);
            assert_eq!(q.total_cost, Decimal::from(n) * rate);
        }
    }

    #[test]
    fn test_crosses_leap_day_and_month() {
        assert_eq!(rental_days(date(2024, 2, 28), date(2024, 3, 1)).unwrap(), 2);
        assert_eq!(rental_days(date(2023, 12, 31), date(2024, 1, 1)).unwrap(), 1);
    }

    #[test]
    fn test_instants_are_truncated_to_dates() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 9, 30, 0).unwrap();
        let same_evening = Utc.with_ymd_and_hms(2024, 1, 1, 22, 0, 0).unwrap();
        let next_morning = Utc.with_ymd_and_hms(2024, 1, 2, 8, 0, 0).unwrap();

        assert_eq!(rental_days_between(start, same_evening).unwrap(), 1);
        assert_eq!(rental_days_between(start, next_morning).unwrap(), 1);
    }

    #[test]
    fn test_zero_rate_is_allowed() {
        let q = quote(date(2024, 1, 1), date(2024, 1, 3), Some(Decimal::ZERO)).unwrap();
        assert_eq!(q.total_cost, Decimal::ZERO);
    }

    #[test]
    fn test_missing_rate_is_invalid_input() {
        let err = quote(date(2024, 1, 1), date(2024, 1, 3), None).unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(_)));
    }

    #[test]
    fn test_negative_rate_is_invalid_input() {
        let err = quote(date(2024, 1, 1), date(2024, 1, 3), Some(Decimal::from(-1))).unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(_)));
    }

    #[test]
    fn test_end_before_start_is_invalid_input() {
        let err = rental_days(date(2024, 1, 5), date(2024, 1, 4)).unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(_)));
    }
}
