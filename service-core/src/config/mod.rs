use crate::error::AppError;
use config::{Config as Cfg, Environment, File};
use serde::Deserialize;
use serde::de::DeserializeOwned;

/// Prefix for environment overrides, e.g. `APP__PORT=9000`.
pub const ENV_PREFIX: &str = "APP";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub environment: RuntimeEnvironment,
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeEnvironment {
    #[default]
    Dev,
    Prod,
}

impl RuntimeEnvironment {
    pub fn is_prod(&self) -> bool {
        matches!(self, RuntimeEnvironment::Prod)
    }
}

fn default_port() -> u16 {
    8080
}

impl Config {
    pub fn load() -> Result<Self, AppError> {
        load_layered(&[])
    }
}

/// Load any settings type from the `configuration` file (optional) layered
/// under `APP__`-prefixed environment variables.
///
/// Nested keys use `__` as separator: `APP__MONGODB__URI` maps to `mongodb.uri`.
/// Keys listed in `list_keys` are split on commas.
pub fn load_layered<T: DeserializeOwned>(list_keys: &[&str]) -> Result<T, AppError> {
    dotenvy::dotenv().ok();

    let mut environment = Environment::with_prefix(ENV_PREFIX)
        .separator("__")
        .try_parsing(true);
    if !list_keys.is_empty() {
        environment = environment.list_separator(",");
        for key in list_keys {
            environment = environment.with_list_parse_key(key);
        }
    }

    let config = Cfg::builder()
        .add_source(File::with_name("configuration").required(false))
        .add_source(environment)
        .build()?;

    Ok(config.try_deserialize()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runtime_environment_defaults_to_dev() {
        assert_eq!(RuntimeEnvironment::default(), RuntimeEnvironment::Dev);
        assert!(!RuntimeEnvironment::Dev.is_prod());
        assert!(RuntimeEnvironment::Prod.is_prod());
    }

    #[test]
    fn test_config_defaults_when_empty() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.environment, RuntimeEnvironment::Dev);
    }
}
