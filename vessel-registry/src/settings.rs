use std::time::Duration;

use ais_stream::{client::StreamSettings, models::ApiKey};
use config::{Config, ConfigError, File};
use fleet_simulator::SimulationSettings;
use serde::Deserialize;
use vessel_core::{Environment, LogLevel};

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub environment: Environment,
    pub log_level: LogLevel,
    /// Live mode only starts when a credential is configured.
    pub api_key: Option<ApiKey>,
    #[serde(default)]
    pub stream: StreamSettings,
    #[serde(default)]
    pub simulation: SimulationSettings,
    /// Period of the summary log line.
    #[serde(with = "humantime_serde")]
    pub status_interval: Duration,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let environment =
            Environment::from_env().map_err(|e| ConfigError::Message(e.to_string()))?;
        Self::load(environment)
    }

    pub fn load(environment: Environment) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name(&environment.config_file()).required(true))
            .add_source(config::Environment::with_prefix("VESSEL_REGISTRY").separator("__"))
            .set_override("environment", environment.as_ref())?
            .build()?
            .try_deserialize()
    }
}
