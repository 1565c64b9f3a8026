//! Persistence seam for rental-service.
//!
//! Every record is scoped to the account (`user_id`) that owns it. Records
//! returned by an implementation have already passed
//! [`StoredRecord::check`](crate::models::StoredRecord::check).

use crate::domain::{DomainError, MonthWindow};
use crate::models::{
    Customer, Expense, ExpenseScope, Rental, Subscription, Vehicle, VehicleStatus,
};
use async_trait::async_trait;

pub type StoreResult<T> = Result<T, DomainError>;

#[async_trait]
pub trait FleetStore: Send + Sync {
    async fn ping(&self) -> StoreResult<()>;

    async fn insert_vehicle(&self, vehicle: &Vehicle) -> StoreResult<()>;
    async fn get_vehicle(&self, user_id: &str, id: &str) -> StoreResult<Option<Vehicle>>;
    async fn list_vehicles(&self, user_id: &str) -> StoreResult<Vec<Vehicle>>;
    /// Returns false when no such vehicle exists.
    async fn set_vehicle_status(
        &self,
        user_id: &str,
        id: &str,
        status: VehicleStatus,
    ) -> StoreResult<bool>;
    async fn delete_vehicle(&self, user_id: &str, id: &str) -> StoreResult<bool>;

    async fn insert_customer(&self, customer: &Customer) -> StoreResult<()>;
    async fn get_customer(&self, user_id: &str, id: &str) -> StoreResult<Option<Customer>>;
    async fn list_customers(&self, user_id: &str) -> StoreResult<Vec<Customer>>;
    async fn delete_customer(&self, user_id: &str, id: &str) -> StoreResult<bool>;

    async fn insert_rental(&self, rental: &Rental) -> StoreResult<()>;
    async fn get_rental(&self, user_id: &str, id: &str) -> StoreResult<Option<Rental>>;
    /// Rentals starting inside `window`, or all of them.
    async fn list_rentals(
        &self,
        user_id: &str,
        window: Option<MonthWindow>,
    ) -> StoreResult<Vec<Rental>>;
    /// Full-document overwrite. Returns false when the rental is gone.
    async fn replace_rental(&self, rental: &Rental) -> StoreResult<bool>;
    async fn delete_rental(&self, user_id: &str, id: &str) -> StoreResult<bool>;

    async fn insert_expense(&self, scope: ExpenseScope, expense: &Expense) -> StoreResult<()>;
    async fn list_expenses(
        &self,
        user_id: &str,
        scope: ExpenseScope,
        window: Option<MonthWindow>,
    ) -> StoreResult<Vec<Expense>>;
    async fn delete_expense(
        &self,
        user_id: &str,
        scope: ExpenseScope,
        id: &str,
    ) -> StoreResult<bool>;

    async fn get_subscription(&self, user_id: &str) -> StoreResult<Option<Subscription>>;
    /// Insert or overwrite the single subscription of `subscription.user_id`.
    async fn save_subscription(&self, subscription: &Subscription) -> StoreResult<()>;
}
