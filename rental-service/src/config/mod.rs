use secrecy::Secret;
use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use service_core::observability::TelemetrySettings;

/// Environment keys holding comma-separated lists.
const LIST_KEYS: &[&str] = &["subscription.admin_user_ids"];

#[derive(Debug, Clone, Deserialize)]
pub struct RentalConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    #[serde(default)]
    pub mongodb: MongoConfig,
    #[serde(default)]
    pub telemetry: TelemetrySettings,
    #[serde(default)]
    pub subscription: SubscriptionConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MongoConfig {
    /// Without a URI the service keeps its records in memory (dev only).
    #[serde(default)]
    pub uri: Option<Secret<String>>,
    #[serde(default = "default_database")]
    pub database: String,
}

impl Default for MongoConfig {
    fn default() -> Self {
        Self {
            uri: None,
            database: default_database(),
        }
    }
}

fn default_database() -> String {
    "rental_db".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubscriptionConfig {
    /// Days before expiry from which the "expiring soon" warning is shown.
    #[serde(default = "default_expiring_soon_days")]
    pub expiring_soon_days: i64,
    /// Accounts allowed to change other accounts' subscription status.
    #[serde(default)]
    pub admin_user_ids: Vec<String>,
}

impl Default for SubscriptionConfig {
    fn default() -> Self {
        Self {
            expiring_soon_days: default_expiring_soon_days(),
            admin_user_ids: Vec::new(),
        }
    }
}

fn default_expiring_soon_days() -> i64 {
    crate::domain::subscription::DEFAULT_WARNING_DAYS
}

impl SubscriptionConfig {
    pub fn is_admin(&self, user_id: &str) -> bool {
        self.admin_user_ids.iter().any(|id| id == user_id)
    }
}

impl RentalConfig {
    /// Load from `configuration.*` and `APP__*` variables, e.g.
    /// `APP__MONGODB__URI` or `APP__SUBSCRIPTION__ADMIN_USER_IDS=a,b`.
    pub fn load() -> Result<Self, AppError> {
        let config: RentalConfig = core_config::load_layered(LIST_KEYS)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.common.environment.is_prod() && self.mongodb.uri.is_none() {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "mongodb.uri is required in production but not set"
            )));
        }
        if self.subscription.expiring_soon_days < 0 {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "subscription.expiring_soon_days must not be negative"
            )));
        }
        Ok(())
    }

    /// Defaults for tests and local runs: dev, in-memory store.
    pub fn local() -> Self {
        Self {
            common: core_config::Config {
                port: 0,
                environment: core_config::RuntimeEnvironment::Dev,
            },
            mongodb: MongoConfig::default(),
            telemetry: TelemetrySettings::default(),
            subscription: SubscriptionConfig::default(),
        }
    }
}
