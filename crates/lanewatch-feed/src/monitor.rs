//! Typed clients for the producer's health and metrics pull endpoints.
//!
//! These are polled on a fixed interval independent of the push feed.
//! A failed poll is reported and skipped; it never affects the feed
//! subscription or the cycle engine.

use lanewatch_types::{FeedMetrics, HealthStatus};

use crate::error::MonitorError;

/// Client for `GET /health` and `GET /metrics`.
#[derive(Debug, Clone)]
pub struct MonitorClient {
    http: reqwest::Client,
    base_url: String,
}

impl MonitorClient {
    /// Create a client for the given producer base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Fetch the producer's health report.
    pub async fn health(&self) -> Result<HealthStatus, MonitorError> {
        self.get_json("health").await
    }

    /// Fetch the producer's feed metrics.
    pub async fn metrics(&self) -> Result<FeedMetrics, MonitorError> {
        self.get_json("metrics").await
    }

    /// Issue a GET and decode the JSON body.
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<T, MonitorError> {
        let url = format!("{}/{path}", self.base_url.trim_end_matches('/'));
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| MonitorError::Request(format!("GET {url}: {e}")))?;
        response
            .json::<T>()
            .await
            .map_err(|e| MonitorError::Decode(format!("GET {url}: {e}")))
    }
}
