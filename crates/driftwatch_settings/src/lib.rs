use serde::Serialize;
use std::fmt::Display;
use std::str::FromStr;
use tracing::warn;

pub mod database;
pub mod monitor;

pub use database::DatabaseSettings;
pub use monitor::MonitorSettings;

/// Reads `key` from the environment, falling back to `default` when the
/// variable is unset or cannot be parsed.
pub(crate) fn env_or<T>(key: &str, default: T) -> T
where
    T: FromStr,
    T::Err: Display,
{
    match std::env::var(key) {
        Ok(raw) => match raw.trim().parse::<T>() {
            Ok(value) => value,
            Err(e) => {
                warn!("Invalid value for {}: {} ({}), using default", key, raw, e);
                default
            }
        },
        Err(_) => default,
    }
}

/// Comma separated list from the environment, e.g. `temp,atemp,windspeed`
pub(crate) fn env_list_or(key: &str, default: &[&str]) -> Vec<String> {
    match std::env::var(key) {
        Ok(raw) => parse_list(&raw),
        Err(_) => default.iter().map(|s| s.to_string()).collect(),
    }
}

pub(crate) fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct DriftwatchConfig {
    pub database_settings: DatabaseSettings,
    pub monitor_settings: MonitorSettings,
}
