//! Monthly cash journal.
//!
//! Rentals (cash received), vehicle expenses and business expenses are merged
//! into one list sorted by date, newest first. Entries on the same date keep
//! the order they were added in: rentals, then vehicle expenses, then
//! business expenses, each in input order.

use super::{payment, DomainError};
use crate::models::{Expense, ExpenseScope, Rental, RentalStatus};
use chrono::{Datelike, Months, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

/// Calendar month `[first day, first day of next month)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthWindow {
    pub year: i32,
    pub month: u32,
}

impl MonthWindow {
    pub fn new(year: i32, month: u32) -> Result<Self, DomainError> {
        if !(1..=12).contains(&month) {
            return Err(DomainError::InvalidInput(format!(
                "month must be between 1 and 12 (got {})",
                month
            )));
        }
        // Stored dates are compared as ISO strings, which only order
        // correctly for four-digit years.
        if !(1..=9999).contains(&year) {
            return Err(DomainError::InvalidInput(format!(
                "year must be between 1 and 9999 (got {})",
                year
            )));
        }
        Ok(Self { year, month })
    }

    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn start(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    /// First day of the following month.
    pub fn end(&self) -> NaiveDate {
        self.start()
            .checked_add_months(Months::new(1))
            .unwrap_or(NaiveDate::MAX)
    }

    /// Last day of the month.
    pub fn last_day(&self) -> NaiveDate {
        self.end().pred_opt().unwrap_or(NaiveDate::MAX)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start() && date < self.end()
    }

    pub fn previous(&self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Rental,
    VehicleExpense,
    BusinessExpense,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JournalEntry {
    pub kind: EntryKind,
    pub source_id: String,
    pub date: NaiveDate,
    pub designation: String,
    /// Cash received for this line.
    pub revenue: Decimal,
    pub expense: Decimal,
    pub total_amount: Decimal,
    /// Set for rental lines only.
    pub paid_amount: Option<Decimal>,
    pub remaining_amount: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct JournalTotals {
    pub revenue_total: Decimal,
    pub expense_total: Decimal,
    pub pending_total: Decimal,
    pub net_cash: Decimal,
}

impl JournalTotals {
    fn add(mut self, entry: &JournalEntry) -> Self {
        self.revenue_total += entry.paid_amount.unwrap_or(entry.revenue);
        self.expense_total += entry.expense;
        self.pending_total += entry.remaining_amount;
        self.net_cash = self.revenue_total - self.expense_total;
        self
    }
}

/// Fold entries into totals.
pub fn totals<'a>(entries: impl IntoIterator<Item = &'a JournalEntry>) -> JournalTotals {
    entries
        .into_iter()
        .fold(JournalTotals::default(), JournalTotals::add)
}

#[derive(Debug, Clone, Serialize)]
pub struct CashJournal {
    pub window: MonthWindow,
    pub entries: Vec<JournalEntry>,
    pub totals: JournalTotals,
}

#[derive(Debug)]
pub struct JournalBuilder {
    window: MonthWindow,
    entries: Vec<JournalEntry>,
}

impl JournalBuilder {
    pub fn new(window: MonthWindow) -> Self {
        Self {
            window,
            entries: Vec::new(),
        }
    }

    /// Add a rental dated by its start date. Cancelled rentals and rentals
    /// outside the window are skipped.
    pub fn add_rental(
        &mut self,
        rental: &Rental,
        designation: impl Into<String>,
    ) -> Result<&mut Self, DomainError> {
        if rental.status == RentalStatus::Cancelled || !self.window.contains(rental.start_date) {
            return Ok(self);
        }

        let breakdown = payment::settle_rental(rental)?;
        self.entries.push(JournalEntry {
            kind: EntryKind::Rental,
            source_id: rental.id.clone(),
            date: rental.start_date,
            designation: designation.into(),
            revenue: breakdown.paid_amount,
            expense: Decimal::ZERO,
            total_amount: breakdown.total_due,
            paid_amount: Some(breakdown.paid_amount),
            remaining_amount: breakdown.remaining_amount,
        });
        Ok(self)
    }

    pub fn add_expense(&mut self, scope: ExpenseScope, expense: &Expense) -> &mut Self {
        if !self.window.contains(expense.date) {
            return self;
        }

        let kind = match scope {
            ExpenseScope::Vehicle => EntryKind::VehicleExpense,
            ExpenseScope::Business => EntryKind::BusinessExpense,
        };
        self.entries.push(JournalEntry {
            kind,
            source_id: expense.id.clone(),
            date: expense.date,
            designation: expense.designation.clone(),
            revenue: Decimal::ZERO,
            expense: expense.amount,
            total_amount: expense.amount,
            paid_amount: None,
            remaining_amount: Decimal::ZERO,
        });
        self
    }

    pub fn build(mut self) -> CashJournal {
        // `sort_by` is stable, so equal dates keep insertion order.
        self.entries.sort_by(|a, b| b.date.cmp(&a.date));
        let totals = totals(&self.entries);
        CashJournal {
            window: self.window,
            entries: self.entries,
            totals,
        }
    }
}
