use std::time::Duration;

use vessel_core::{Environment, LogLevel};
use vessel_registry::settings::Settings;

#[test]
fn test_every_environment_has_valid_settings() {
    for environment in [
        Environment::Local,
        Environment::Development,
        Environment::Production,
        Environment::Test,
    ] {
        let settings = Settings::load(environment).unwrap();

        assert_eq!(settings.environment, environment);
        assert_eq!(settings.stream.max_retries, 5);
        assert_eq!(settings.stream.base_delay, Duration::from_secs(2));
        assert_eq!(settings.stream.flush_interval, Duration::from_millis(500));
        assert_eq!(settings.simulation.tick_interval, Duration::from_secs(2));
    }
}

#[test]
fn test_test_environment_uses_fixed_seed() {
    let settings = Settings::load(Environment::Test).unwrap();

    assert_eq!(settings.log_level, LogLevel::Debug);
    assert_eq!(settings.simulation.seed, Some(42));
    assert!(settings.api_key.is_none());
}
