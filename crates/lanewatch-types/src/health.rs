//! Auxiliary pull-endpoint shapes: health, feed metrics, camera sources.
//!
//! These are polled on a fixed interval, independent of the push feed.
//! The dashboard only surfaces them for display; it interprets nothing
//! beyond connectivity.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Response shape of the producer's `/health` endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    /// Overall service status string (e.g. `"ok"`).
    pub status: String,
    /// Service uptime in seconds.
    pub uptime: f64,
    /// Name or state of the vehicle detector backend.
    pub detector: String,
    /// Per-lane source state strings, keyed by lane name.
    pub sources: BTreeMap<String, String>,
    /// Number of clients currently subscribed to the feed.
    pub active_clients: u32,
    /// Producer-supplied timestamp, opaque.
    pub timestamp: String,
}

/// Response shape of the producer's `/metrics` endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedMetrics {
    /// Number of open feed connections.
    pub active_connections: u32,
    /// Age in seconds of the producer's detection cache.
    pub cache_age_seconds: f64,
    /// Producer-supplied timestamp, opaque.
    pub timestamp: String,
}

/// Camera source configuration: lane name to source-path string.
pub type CameraSources = BTreeMap<String, String>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parses_health_response() {
        let payload = serde_json::json!({
            "status": "ok",
            "uptime": 5321.7,
            "detector": "yolov3",
            "sources": { "North": "open", "South": "open" },
            "active_clients": 3,
            "timestamp": "2025-06-01T12:00:00Z"
        });

        let health: HealthStatus = serde_json::from_value(payload).unwrap();
        assert_eq!(health.status, "ok");
        assert_eq!(health.active_clients, 3);
        assert_eq!(health.sources.get("North"), Some(&"open".to_owned()));
    }

    #[test]
    fn parses_metrics_response() {
        let payload = serde_json::json!({
            "active_connections": 2,
            "cache_age_seconds": 0.8,
            "timestamp": "12:00:01"
        });

        let metrics: FeedMetrics = serde_json::from_value(payload).unwrap();
        assert_eq!(metrics.active_connections, 2);
        assert!(metrics.cache_age_seconds < 1.0);
    }
}
