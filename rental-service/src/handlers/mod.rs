pub mod customers;
pub mod expenses;
pub mod health;
pub mod journal;
pub mod plans;
pub mod quotes;
pub mod rentals;
pub mod subscription;
pub mod vehicles;

use crate::domain::{DomainError, MonthWindow};
use chrono::Utc;

/// Month from `year`/`month` query parameters; the current month when both
/// are absent.
pub(crate) fn month_window(year: Option<i32>, month: Option<u32>) -> Result<MonthWindow, DomainError> {
    match (year, month) {
        (Some(year), Some(month)) => MonthWindow::new(year, month),
        (None, None) => Ok(MonthWindow::containing(Utc::now().date_naive())),
        _ => Err(DomainError::InvalidInput(
            "year and month must be given together".to_string(),
        )),
    }
}

/// Like [`month_window`], but no parameters means no window at all.
pub(crate) fn optional_window(
    year: Option<i32>,
    month: Option<u32>,
) -> Result<Option<MonthWindow>, DomainError> {
    match (year, month) {
        (None, None) => Ok(None),
        _ => month_window(year, month).map(Some),
    }
}
