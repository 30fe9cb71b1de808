use crate::services::signals::GeneratorOptions;
use crate::sources::yahoo::DEFAULT_CHART_URL;
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Application configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// SQLite database file.
    pub database_path: String,
    /// Seconds between scheduled generation runs.
    pub generation_interval_secs: u64,
    /// Minutes of 1-minute history fetched per instrument.
    pub lookback_minutes: u32,
    /// Per-instrument fetch timeout.
    pub fetch_timeout_secs: u64,
    /// Instruments fetched concurrently.
    pub fetch_concurrency: usize,
    /// Stored signals older than this are purged.
    pub signal_retention_days: i64,
    /// Yahoo Finance chart endpoint.
    pub yahoo_chart_url: String,
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            database_path: env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "fxsignals.db".to_string()),
            generation_interval_secs: env_or("GENERATION_INTERVAL_SECS", 300),
            lookback_minutes: env_or("LOOKBACK_MINUTES", 240),
            fetch_timeout_secs: env_or("FETCH_TIMEOUT_SECS", 10),
            fetch_concurrency: env_or("FETCH_CONCURRENCY", 4),
            signal_retention_days: env_or("SIGNAL_RETENTION_DAYS", 7),
            yahoo_chart_url: env::var("YAHOO_CHART_URL")
                .unwrap_or_else(|_| DEFAULT_CHART_URL.to_string()),
        }
    }

    pub fn generation_interval(&self) -> Duration {
        // A zero period would make tokio's interval panic.
        Duration::from_secs(self.generation_interval_secs.max(1))
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn generator_options(&self) -> GeneratorOptions {
        GeneratorOptions {
            lookback_minutes: self.lookback_minutes,
            fetch_timeout: self.fetch_timeout(),
            concurrency: self.fetch_concurrency.max(1),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: "fxsignals.db".to_string(),
            generation_interval_secs: 300,
            lookback_minutes: 240,
            fetch_timeout_secs: 10,
            fetch_concurrency: 4,
            signal_retention_days: 7,
            yahoo_chart_url: DEFAULT_CHART_URL.to_string(),
        }
    }
}
