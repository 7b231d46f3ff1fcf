//! Application settings read from the environment.
//!
//! - `CODETRACK_DB`: SQLite file, default `codetrack.sqlite3`
//! - `CODETRACK_FORECAST_DAYS`: days shown in the forecast, default 11
//! - `CODETRACK_DAILY_LIMIT`: reviews allowed per day, default 5

use crate::models::SchedulerConfig;
use crate::models::forecast::DEFAULT_FORECAST_DAYS;
use std::str::FromStr;
use tracing::warn;

pub const DEFAULT_DB_PATH: &str = "codetrack.sqlite3";

#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub db_path: String,
    pub forecast_days: usize,
    pub scheduler: SchedulerConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: DEFAULT_DB_PATH.to_string(),
            forecast_days: DEFAULT_FORECAST_DAYS,
            scheduler: SchedulerConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. Unparsable or zero values keep the default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(path) = lookup("CODETRACK_DB").filter(|p| !p.trim().is_empty()) {
            config.db_path = path;
        }
        if let Some(days) = parse_positive(&lookup, "CODETRACK_FORECAST_DAYS") {
            config.forecast_days = days;
        }
        if let Some(limit) = parse_positive(&lookup, "CODETRACK_DAILY_LIMIT") {
            config.scheduler.daily_limit = limit;
        }
        config
    }
}

fn parse_positive<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T>
where
    T: FromStr + PartialOrd + Default,
{
    let raw = lookup(key)?;
    match raw.trim().parse::<T>() {
        Ok(value) if value > T::default() => Some(value),
        _ => {
            warn!(key, value = %raw, "ignoring invalid setting");
            None
        }
    }
}
