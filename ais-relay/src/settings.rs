use std::net::SocketAddr;

use config::{Config, ConfigError, File};
use serde::Deserialize;
use vessel_core::{Environment, LogLevel};

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub environment: Environment,
    pub log_level: LogLevel,
    pub listen_address: SocketAddr,
    pub upstream_url: String,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let environment =
            Environment::from_env().map_err(|e| ConfigError::Message(e.to_string()))?;

        Config::builder()
            .add_source(File::with_name(&environment.config_file()).required(true))
            .add_source(config::Environment::with_prefix("AIS_RELAY").separator("__"))
            .set_override("environment", environment.as_ref())?
            .build()?
            .try_deserialize()
    }
}
