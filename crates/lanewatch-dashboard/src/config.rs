//! Configuration for a dashboard session.
//!
//! All configuration is loaded from environment variables. The
//! dashboard needs the feed producer's base URL and the cadence of the
//! auxiliary health poll; the one-second signal tick is part of the
//! cycle contract, not configuration.

use std::time::Duration;

/// Errors produced while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An environment variable was present but unparseable.
    #[error("config error: {0}")]
    Invalid(String),
}

/// Complete dashboard configuration loaded from the environment.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Base URL of the feed producer (e.g. `http://localhost:8000`).
    pub feed_base_url: String,
    /// Interval between health/metrics polls.
    pub health_poll_interval: Duration,
}

impl DashboardConfig {
    /// Load configuration from environment variables.
    ///
    /// Optional variables:
    /// - `FEED_BASE_URL` -- producer base URL (default
    ///   `http://localhost:8000`)
    /// - `HEALTH_POLL_INTERVAL_MS` -- health poll cadence in
    ///   milliseconds (default 10000)
    pub fn from_env() -> Result<Self, ConfigError> {
        let feed_base_url = std::env::var("FEED_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:8000".to_owned());

        let health_poll_interval_ms: u64 = std::env::var("HEALTH_POLL_INTERVAL_MS")
            .unwrap_or_else(|_| "10000".to_owned())
            .parse()
            .map_err(|e| ConfigError::Invalid(format!("invalid HEALTH_POLL_INTERVAL_MS: {e}")))?;

        Ok(Self {
            feed_base_url,
            health_poll_interval: Duration::from_millis(health_poll_interval_ms),
        })
    }
}
