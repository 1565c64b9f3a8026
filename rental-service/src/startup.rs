use crate::config::RentalConfig;
use crate::handlers::{
    customers, expenses, health, journal, plans, quotes, rentals, subscription, vehicles,
};
use crate::services::{FleetStore, MemoryStore, MongoDb};
use axum::middleware::from_fn;
use axum::{
    routing::{get, post, put},
    Router,
};
use secrecy::ExposeSecret;
use service_core::error::AppError;
use service_core::middleware::{metrics_middleware, request_id_middleware};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub config: RentalConfig,
    pub store: Arc<dyn FleetStore>,
}

impl AppState {
    pub fn new(config: RentalConfig, store: Arc<dyn FleetStore>) -> Self {
        Self { config, store }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .route("/metrics", get(health::metrics_endpoint))
        // Plan catalog
        .route("/plans", get(plans::list_plans))
        .route("/plans/:id/price", get(plans::plan_price))
        // Pricing
        .route("/quotes", post(quotes::create_quote))
        // Fleet and customers
        .route(
            "/vehicles",
            post(vehicles::create_vehicle).get(vehicles::list_vehicles),
        )
        .route(
            "/vehicles/:id",
            get(vehicles::get_vehicle).delete(vehicles::delete_vehicle),
        )
        .route("/vehicles/:id/status", put(vehicles::update_vehicle_status))
        .route(
            "/customers",
            post(customers::create_customer).get(customers::list_customers),
        )
        .route(
            "/customers/:id",
            axum::routing::delete(customers::delete_customer),
        )
        // Rentals
        .route(
            "/rentals",
            post(rentals::create_rental).get(rentals::list_rentals),
        )
        .route(
            "/rentals/:id",
            get(rentals::get_rental).delete(rentals::delete_rental),
        )
        .route("/rentals/:id/payment", put(rentals::update_payment))
        .route("/rentals/:id/status", put(rentals::update_status))
        .route("/rentals/:id/dates", put(rentals::update_dates))
        .route("/rentals/:id/invoice", get(rentals::get_invoice))
        // Expenses and reporting
        .route("/expenses", get(expenses::list_expenses))
        .route("/expenses/vehicle", post(expenses::create_vehicle_expense))
        .route("/expenses/business", post(expenses::create_business_expense))
        .route(
            "/expenses/:scope/:id",
            axum::routing::delete(expenses::delete_expense),
        )
        .route("/journal", get(journal::get_journal))
        .route("/dashboard", get(journal::get_dashboard))
        // Subscription
        .route(
            "/subscription",
            get(subscription::get_subscription).post(subscription::request_subscription),
        )
        .route(
            "/admin/subscriptions/:user_id/status",
            put(subscription::admin_update_status),
        )
        .layer(from_fn(metrics_middleware))
        .layer(from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Store named by the configuration: MongoDB when a URI is set, memory otherwise.
pub async fn connect_store(config: &RentalConfig) -> Result<Arc<dyn FleetStore>, AppError> {
    match &config.mongodb.uri {
        Some(uri) => {
            let db = MongoDb::connect(uri.expose_secret(), &config.mongodb.database)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to connect to MongoDB: {}", e);
                    e
                })?;
            db.initialize_indexes().await.map_err(|e| {
                tracing::error!("Failed to initialize database indexes: {}", e);
                e
            })?;
            Ok(Arc::new(db))
        }
        None => {
            tracing::warn!("mongodb.uri is not set; records are kept in memory only");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    pub async fn build(config: RentalConfig) -> Result<Self, AppError> {
        let store = connect_store(&config).await?;
        let port = config.common.port;
        let router = build_router(AppState::new(config, store));

        let addr = SocketAddr::from(([0, 0, 0, 0], port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Listening on {}", port);

        Ok(Self {
            port,
            listener,
            router,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped<F>(self, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await
    }
}
