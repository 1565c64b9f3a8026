//! In-process store used by tests and by local runs without MongoDB.

use crate::domain::{DomainError, MonthWindow};
use crate::models::{
    Customer, Expense, ExpenseScope, Rental, StoredRecord, Subscription, Vehicle, VehicleStatus,
};
use crate::services::store::{FleetStore, StoreResult};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

#[derive(Default)]
struct Tables {
    vehicles: Vec<Vehicle>,
    customers: Vec<Customer>,
    rentals: Vec<Rental>,
    vehicle_expenses: Vec<Expense>,
    business_expenses: Vec<Expense>,
    subscriptions: HashMap<String, Subscription>,
}

impl Tables {
    fn expenses(&self, scope: ExpenseScope) -> &[Expense] {
        match scope {
            ExpenseScope::Vehicle => &self.vehicle_expenses,
            ExpenseScope::Business => &self.business_expenses,
        }
    }

    fn expenses_mut(&mut self, scope: ExpenseScope) -> &mut Vec<Expense> {
        match scope {
            ExpenseScope::Vehicle => &mut self.vehicle_expenses,
            ExpenseScope::Business => &mut self.business_expenses,
        }
    }
}

/// Records are kept in insertion order. Listings return newest first, like
/// the MongoDB store.
pub struct MemoryStore {
    tables: Mutex<Tables>,
    /// When set, every call fails as if the database were down.
    offline: AtomicBool,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            tables: Mutex::new(Tables::default()),
            offline: AtomicBool::new(false),
        }
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn tables(&self) -> StoreResult<MutexGuard<'_, Tables>> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(DomainError::UpstreamUnavailable(anyhow::anyhow!(
                "memory store is offline"
            )));
        }
        self.tables.lock().map_err(|e| poisoned(e.to_string()))
    }
}

fn poisoned(msg: String) -> DomainError {
    DomainError::UpstreamUnavailable(anyhow::anyhow!("memory store mutex poisoned: {}", msg))
}

trait Owned {
    fn owner(&self) -> &str;
}

macro_rules! owned {
    ($($ty:ty),*) => {
        $(impl Owned for $ty {
            fn owner(&self) -> &str {
                &self.user_id
            }
        })*
    };
}

owned!(Vehicle, Customer, Rental, Expense);

fn owned_by<'a, T: Owned>(
    items: &'a [T],
    user_id: &'a str,
) -> impl DoubleEndedIterator<Item = &'a T> + 'a {
    items.iter().filter(move |item| item.owner() == user_id)
}

fn checked<T: StoredRecord + Clone>(item: &T) -> StoreResult<T> {
    item.clone().check()
}

fn remove_where<T>(items: &mut Vec<T>, pred: impl Fn(&T) -> bool) -> bool {
    let before = items.len();
    items.retain(|item| !pred(item));
    items.len() != before
}

#[async_trait]
impl FleetStore for MemoryStore {
    async fn ping(&self) -> StoreResult<()> {
        self.tables().map(|_| ())
    }

    async fn insert_vehicle(&self, vehicle: &Vehicle) -> StoreResult<()> {
        self.tables()?.vehicles.push(vehicle.clone());
        Ok(())
    }

    async fn get_vehicle(&self, user_id: &str, id: &str) -> StoreResult<Option<Vehicle>> {
        let tables = self.tables()?;
        let found = owned_by(&tables.vehicles, user_id)
            .find(|v| v.id == id)
            .map(checked)
            .transpose();
        found
    }

    async fn list_vehicles(&self, user_id: &str) -> StoreResult<Vec<Vehicle>> {
        let tables = self.tables()?;
        let listed = owned_by(&tables.vehicles, user_id)
            .rev()
            .map(checked)
            .collect::<StoreResult<Vec<_>>>();
        listed
    }

    async fn set_vehicle_status(
        &self,
        user_id: &str,
        id: &str,
        status: VehicleStatus,
    ) -> StoreResult<bool> {
        let mut tables = self.tables()?;
        match tables
            .vehicles
            .iter_mut()
            .find(|v| v.id == id && v.user_id == user_id)
        {
            Some(vehicle) => {
                vehicle.status = status;
                vehicle.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_vehicle(&self, user_id: &str, id: &str) -> StoreResult<bool> {
        let mut tables = self.tables()?;
        Ok(remove_where(&mut tables.vehicles, |v| {
            v.id == id && v.user_id == user_id
        }))
    }

    async fn insert_customer(&self, customer: &Customer) -> StoreResult<()> {
        self.tables()?.customers.push(customer.clone());
        Ok(())
    }

    async fn get_customer(&self, user_id: &str, id: &str) -> StoreResult<Option<Customer>> {
        let tables = self.tables()?;
        let found = owned_by(&tables.customers, user_id)
            .find(|c| c.id == id)
            .map(checked)
            .transpose();
        found
    }

    async fn list_customers(&self, user_id: &str) -> StoreResult<Vec<Customer>> {
        let tables = self.tables()?;
        let listed = owned_by(&tables.customers, user_id)
            .rev()
            .map(checked)
            .collect::<StoreResult<Vec<_>>>();
        listed
    }

    async fn delete_customer(&self, user_id: &str, id: &str) -> StoreResult<bool> {
        let mut tables = self.tables()?;
        Ok(remove_where(&mut tables.customers, |c| {
            c.id == id && c.user_id == user_id
        }))
    }

    async fn insert_rental(&self, rental: &Rental) -> StoreResult<()> {
        self.tables()?.rentals.push(rental.clone());
        Ok(())
    }

    async fn get_rental(&self, user_id: &str, id: &str) -> StoreResult<Option<Rental>> {
        let tables = self.tables()?;
        let found = owned_by(&tables.rentals, user_id)
            .find(|r| r.id == id)
            .map(checked)
            .transpose();
        found
    }

    async fn list_rentals(
        &self,
        user_id: &str,
        window: Option<MonthWindow>,
    ) -> StoreResult<Vec<Rental>> {
        let tables = self.tables()?;
        let mut rentals = owned_by(&tables.rentals, user_id)
            .filter(|r| window.map_or(true, |w| w.contains(r.start_date)))
            .map(checked)
            .collect::<StoreResult<Vec<_>>>()?;
        rentals.sort_by(|a, b| b.start_date.cmp(&a.start_date));
        Ok(rentals)
    }

    async fn replace_rental(&self, rental: &Rental) -> StoreResult<bool> {
        let mut tables = self.tables()?;
        match tables
            .rentals
            .iter_mut()
            .find(|r| r.id == rental.id && r.user_id == rental.user_id)
        {
            Some(slot) => {
                *slot = rental.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_rental(&self, user_id: &str, id: &str) -> StoreResult<bool> {
        let mut tables = self.tables()?;
        Ok(remove_where(&mut tables.rentals, |r| {
            r.id == id && r.user_id == user_id
        }))
    }

    async fn insert_expense(&self, scope: ExpenseScope, expense: &Expense) -> StoreResult<()> {
        self.tables()?.expenses_mut(scope).push(expense.clone());
        Ok(())
    }

    async fn list_expenses(
        &self,
        user_id: &str,
        scope: ExpenseScope,
        window: Option<MonthWindow>,
    ) -> StoreResult<Vec<Expense>> {
        let tables = self.tables()?;
        let mut expenses = owned_by(tables.expenses(scope), user_id)
            .filter(|e| window.map_or(true, |w| w.contains(e.date)))
            .map(checked)
            .collect::<StoreResult<Vec<_>>>()?;
        expenses.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(expenses)
    }

    async fn delete_expense(
        &self,
        user_id: &str,
        scope: ExpenseScope,
        id: &str,
    ) -> StoreResult<bool> {
        let mut tables = self.tables()?;
        Ok(remove_where(tables.expenses_mut(scope), |e| {
            e.id == id && e.user_id == user_id
        }))
    }

    async fn get_subscription(&self, user_id: &str) -> StoreResult<Option<Subscription>> {
        let tables = self.tables()?;
        let found = tables.subscriptions.get(user_id).map(checked).transpose();
        found
    }

    async fn save_subscription(&self, subscription: &Subscription) -> StoreResult<()> {
        self.tables()?
            .subscriptions
            .insert(subscription.user_id.clone(), subscription.clone());
        Ok(())
    }
}
