//! Configuration for the azure-prices CLI

use azure_pricing_client::ClientConfig;
use core_config::{ConfigError, Environment, FromEnv, env_or_default};

#[derive(Debug, Clone)]
pub struct Config {
    pub environment: Environment,
    /// Default log directive when `RUST_LOG` is unset
    pub log_filter: String,
    pub client: ClientConfig,
}

fn default_log_filter() -> &'static str {
    "warn,azure_pricing_client=info"
}

impl FromEnv for Config {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Config {
            environment: Environment::from_env(),
            log_filter: env_or_default("AZURE_PRICES_LOG", default_log_filter()),
            client: ClientConfig::from_env()?,
        })
    }
}
