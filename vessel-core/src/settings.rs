use serde::Deserialize;
use strum::{AsRefStr, Display, EnumString};

/// Name of the variable selecting the configuration file.
pub const APP_ENVIRONMENT: &str = "APP_ENVIRONMENT";

/// Deployment environment, selects `config/<environment>.yml`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Display, AsRefStr, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum Environment {
    #[default]
    Local,
    Development,
    Production,
    Test,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl Environment {
    /// Reads [APP_ENVIRONMENT], defaulting to [Environment::Local] when unset.
    pub fn from_env() -> Result<Self, strum::ParseError> {
        match std::env::var(APP_ENVIRONMENT) {
            Ok(value) => value.parse(),
            Err(_) => Ok(Self::default()),
        }
    }

    pub fn config_file(&self) -> String {
        format!("config/{}", self.as_ref().to_lowercase())
    }
}

impl LogLevel {
    /// Default directive for an `EnvFilter`.
    pub fn as_directive(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}
