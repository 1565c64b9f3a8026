use crate::domain::{DomainError, MonthWindow};
use crate::models::{
    Customer, Expense, ExpenseScope, Rental, StoredRecord, Subscription, Vehicle, VehicleStatus,
};
use crate::services::store::{FleetStore, StoreResult};
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, Document},
    error::ErrorKind,
    options::{FindOptions, IndexOptions, ReplaceOptions},
    Client as MongoClient, Collection, Database, IndexModel,
};
use serde::de::DeserializeOwned;

/// Map a driver failure. A document the driver cannot decode is a malformed
/// record; everything else means the store did not answer.
fn store_error(err: mongodb::error::Error) -> DomainError {
    if let ErrorKind::BsonDeserialization(e) = err.kind.as_ref() {
        return DomainError::InvalidState(format!("malformed record: {}", e));
    }
    tracing::error!(error = %err, "MongoDB operation failed");
    DomainError::UpstreamUnavailable(err.into())
}

fn bson_error(err: mongodb::bson::ser::Error) -> DomainError {
    DomainError::InvalidInput(format!("cannot encode value: {}", err))
}

fn window_filter(field: &str, window: MonthWindow) -> Document {
    // Dates are stored as ISO strings, so lexical order is calendar order.
    // The upper bound is the month's last day: the first day of the next
    // month may fall outside four-digit years.
    doc! {
        field: {
            "$gte": window.start().to_string(),
            "$lte": window.last_day().to_string(),
        }
    }
}

async fn collect_checked<T>(
    collection: &Collection<T>,
    filter: Document,
    options: Option<FindOptions>,
) -> StoreResult<Vec<T>>
where
    T: StoredRecord + DeserializeOwned + Unpin + Send + Sync,
{
    let cursor = collection.find(filter, options).await.map_err(store_error)?;
    let records: Vec<T> = cursor.try_collect().await.map_err(store_error)?;
    records.into_iter().map(StoredRecord::check).collect()
}

async fn find_checked<T>(collection: &Collection<T>, filter: Document) -> StoreResult<Option<T>>
where
    T: StoredRecord + DeserializeOwned + Unpin + Send + Sync,
{
    collection
        .find_one(filter, None)
        .await
        .map_err(store_error)?
        .map(StoredRecord::check)
        .transpose()
}

fn newest_first(field: &str) -> FindOptions {
    FindOptions::builder().sort(doc! { field: -1 }).build()
}

#[derive(Clone)]
pub struct MongoDb {
    client: MongoClient,
    db: Database,
}

impl MongoDb {
    pub async fn connect(uri: &str, database: &str) -> Result<Self, DomainError> {
        tracing::info!(database = %database, "Connecting to MongoDB");
        let client = MongoClient::with_uri_str(uri).await.map_err(|e| {
            tracing::error!("Failed to connect to MongoDB: {}", e);
            store_error(e)
        })?;
        let db = client.database(database);
        tracing::info!(database = %database, "Successfully connected to MongoDB database");
        Ok(Self { client, db })
    }

    pub async fn initialize_indexes(&self) -> Result<(), DomainError> {
        tracing::info!("Creating MongoDB indexes for rental-service");

        let owner_index = |name: &str| {
            IndexModel::builder()
                .keys(doc! { "user_id": 1 })
                .options(IndexOptions::builder().name(name.to_string()).build())
                .build()
        };

        self.vehicles()
            .create_index(owner_index("vehicle_owner_lookup"), None)
            .await
            .map_err(store_error)?;
        self.customers()
            .create_index(owner_index("customer_owner_lookup"), None)
            .await
            .map_err(store_error)?;

        // Monthly journal and rental listings filter on (user_id, start_date)
        let rental_month_index = IndexModel::builder()
            .keys(doc! { "user_id": 1, "start_date": -1 })
            .options(
                IndexOptions::builder()
                    .name("rental_owner_month".to_string())
                    .build(),
            )
            .build();
        self.rentals()
            .create_index(rental_month_index, None)
            .await
            .map_err(store_error)?;
        tracing::info!("Created index on rentals.(user_id, start_date)");

        for scope in [ExpenseScope::Vehicle, ExpenseScope::Business] {
            let expense_month_index = IndexModel::builder()
                .keys(doc! { "user_id": 1, "date": -1 })
                .options(
                    IndexOptions::builder()
                        .name(format!("{}_owner_month", scope.as_str()))
                        .build(),
                )
                .build();
            self.expenses(scope)
                .create_index(expense_month_index, None)
                .await
                .map_err(store_error)?;
        }

        let subscription_index = IndexModel::builder()
            .keys(doc! { "user_id": 1 })
            .options(
                IndexOptions::builder()
                    .name("subscription_owner_unique".to_string())
                    .unique(true)
                    .build(),
            )
            .build();
        self.subscriptions()
            .create_index(subscription_index, None)
            .await
            .map_err(store_error)?;
        tracing::info!("Created unique index on subscriptions.user_id");

        Ok(())
    }

    pub async fn health_check(&self) -> Result<(), DomainError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::error!("MongoDB health check failed: {}", e);
                store_error(e)
            })?;
        Ok(())
    }

    pub fn vehicles(&self) -> Collection<Vehicle> {
        self.db.collection("vehicles")
    }

    pub fn customers(&self) -> Collection<Customer> {
        self.db.collection("customers")
    }

    pub fn rentals(&self) -> Collection<Rental> {
        self.db.collection("rentals")
    }

    pub fn expenses(&self, scope: ExpenseScope) -> Collection<Expense> {
        self.db.collection(scope.collection())
    }

    pub fn subscriptions(&self) -> Collection<Subscription> {
        self.db.collection("subscriptions")
    }
}

#[async_trait]
impl FleetStore for MongoDb {
    async fn ping(&self) -> StoreResult<()> {
        self.health_check().await
    }

    async fn insert_vehicle(&self, vehicle: &Vehicle) -> StoreResult<()> {
        self.vehicles()
            .insert_one(vehicle, None)
            .await
            .map_err(store_error)?;
        Ok(())
    }

    async fn get_vehicle(&self, user_id: &str, id: &str) -> StoreResult<Option<Vehicle>> {
        find_checked(&self.vehicles(), doc! { "_id": id, "user_id": user_id }).await
    }

    async fn list_vehicles(&self, user_id: &str) -> StoreResult<Vec<Vehicle>> {
        collect_checked(
            &self.vehicles(),
            doc! { "user_id": user_id },
            Some(newest_first("created_at")),
        )
        .await
    }

    async fn set_vehicle_status(
        &self,
        user_id: &str,
        id: &str,
        status: VehicleStatus,
    ) -> StoreResult<bool> {
        let update = doc! {
            "$set": {
                "status": mongodb::bson::to_bson(&status).map_err(bson_error)?,
                "updated_at": mongodb::bson::DateTime::now(),
            }
        };
        let result = self
            .vehicles()
            .update_one(doc! { "_id": id, "user_id": user_id }, update, None)
            .await
            .map_err(store_error)?;
        Ok(result.matched_count > 0)
    }

    async fn delete_vehicle(&self, user_id: &str, id: &str) -> StoreResult<bool> {
        let result = self
            .vehicles()
            .delete_one(doc! { "_id": id, "user_id": user_id }, None)
            .await
            .map_err(store_error)?;
        Ok(result.deleted_count > 0)
    }

    async fn insert_customer(&self, customer: &Customer) -> StoreResult<()> {
        self.customers()
            .insert_one(customer, None)
            .await
            .map_err(store_error)?;
        Ok(())
    }

    async fn get_customer(&self, user_id: &str, id: &str) -> StoreResult<Option<Customer>> {
        find_checked(&self.customers(), doc! { "_id": id, "user_id": user_id }).await
    }

    async fn list_customers(&self, user_id: &str) -> StoreResult<Vec<Customer>> {
        collect_checked(
            &self.customers(),
            doc! { "user_id": user_id },
            Some(newest_first("created_at")),
        )
        .await
    }

    async fn delete_customer(&self, user_id: &str, id: &str) -> StoreResult<bool> {
        let result = self
            .customers()
            .delete_one(doc! { "_id": id, "user_id": user_id }, None)
            .await
            .map_err(store_error)?;
        Ok(result.deleted_count > 0)
    }

    async fn insert_rental(&self, rental: &Rental) -> StoreResult<()> {
        self.rentals()
            .insert_one(rental, None)
            .await
            .map_err(store_error)?;
        Ok(())
    }

    async fn get_rental(&self, user_id: &str, id: &str) -> StoreResult<Option<Rental>> {
        find_checked(&self.rentals(), doc! { "_id": id, "user_id": user_id }).await
    }

    async fn list_rentals(
        &self,
        user_id: &str,
        window: Option<MonthWindow>,
    ) -> StoreResult<Vec<Rental>> {
        let mut filter = doc! { "user_id": user_id };
        if let Some(window) = window {
            filter.extend(window_filter("start_date", window));
        }
        collect_checked(&self.rentals(), filter, Some(newest_first("start_date"))).await
    }

    async fn replace_rental(&self, rental: &Rental) -> StoreResult<bool> {
        let result = self
            .rentals()
            .replace_one(
                doc! { "_id": rental.id.as_str(), "user_id": rental.user_id.as_str() },
                rental,
                None,
            )
            .await
            .map_err(store_error)?;
        Ok(result.matched_count > 0)
    }

    async fn delete_rental(&self, user_id: &str, id: &str) -> StoreResult<bool> {
        let result = self
            .rentals()
            .delete_one(doc! { "_id": id, "user_id": user_id }, None)
            .await
            .map_err(store_error)?;
        Ok(result.deleted_count > 0)
    }

    async fn insert_expense(&self, scope: ExpenseScope, expense: &Expense) -> StoreResult<()> {
        self.expenses(scope)
            .insert_one(expense, None)
            .await
            .map_err(store_error)?;
        Ok(())
    }

    async fn list_expenses(
        &self,
        user_id: &str,
        scope: ExpenseScope,
        window: Option<MonthWindow>,
    ) -> StoreResult<Vec<Expense>> {
        let mut filter = doc! { "user_id": user_id };
        if let Some(window) = window {
            filter.extend(window_filter("date", window));
        }
        collect_checked(&self.expenses(scope), filter, Some(newest_first("date"))).await
    }

    async fn delete_expense(
        &self,
        user_id: &str,
        scope: ExpenseScope,
        id: &str,
    ) -> StoreResult<bool> {
        let result = self
            .expenses(scope)
            .delete_one(doc! { "_id": id, "user_id": user_id }, None)
            .await
            .map_err(store_error)?;
        Ok(result.deleted_count > 0)
    }

    async fn get_subscription(&self, user_id: &str) -> StoreResult<Option<Subscription>> {
        find_checked(&self.subscriptions(), doc! { "user_id": user_id }).await
    }

    async fn save_subscription(&self, subscription: &Subscription) -> StoreResult<()> {
        let options = ReplaceOptions::builder().upsert(true).build();
        self.subscriptions()
            .replace_one(
                doc! { "user_id": subscription.user_id.as_str() },
                subscription,
                options,
            )
            .await
            .map_err(store_error)?;
        Ok(())
    }
}
