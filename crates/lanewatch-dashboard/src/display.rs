//! Log-line presentation of session state.
//!
//! The reconciliation core emits typed state and transitions; this
//! module maps them to operator-readable log lines. It is the only
//! place where alert transitions become user-visible effects.

use lanewatch_core::{AlertTransition, CycleState, SnapshotEffects};
use lanewatch_types::{CongestionLevel, FeedMetrics, HealthStatus, TrafficSnapshot};
use tracing::{info, warn};

/// Format a countdown as `mm:ss`.
pub fn format_countdown(seconds: u32) -> String {
    let minutes = seconds / 60;
    let rest = seconds % 60;
    format!("{minutes:02}:{rest:02}")
}

/// Operator-facing label for a congestion level.
pub const fn congestion_label(level: CongestionLevel) -> &'static str {
    match level {
        CongestionLevel::Light => "light",
        CongestionLevel::Moderate => "moderate",
        CongestionLevel::Heavy => "heavy",
    }
}

/// Log per-lane counts for one arrived snapshot.
pub fn log_lanes(snapshot: &TrafficSnapshot) {
    for (lane, data) in &snapshot.lanes {
        info!(
            lane = lane.as_str(),
            count = data.count,
            congestion = congestion_label(CongestionLevel::from_count(data.count)),
            emergency = data.emergency,
            timestamp = snapshot.timestamp.as_str(),
            "lane update"
        );
    }
}

/// Log what one applied snapshot changed.
pub fn log_effects(effects: &SnapshotEffects) {
    match &effects.alert {
        AlertTransition::Raised(lanes) => {
            warn!(lanes = ?lanes, "emergency vehicle detected");
        }
        AlertTransition::Cleared => info!("emergency cleared"),
        AlertTransition::NoChange => {}
    }
}

/// Log the signal state after a one-second tick.
pub fn log_cycle(state: &CycleState) {
    match &state.active_lane {
        Some(lane) => info!(
            active = lane.as_str(),
            countdown = format_countdown(state.remaining_seconds).as_str(),
            cycles = state.completed_cycles,
            "signal state"
        ),
        None => info!("signal idle, waiting for timing data"),
    }
}

/// Log a health poll result.
pub fn log_health(health: &HealthStatus) {
    info!(
        status = health.status.as_str(),
        uptime = health.uptime,
        detector = health.detector.as_str(),
        active_clients = health.active_clients,
        "producer health"
    );
}

/// Log a metrics poll result.
pub fn log_metrics(metrics: &FeedMetrics) {
    info!(
        active_connections = metrics.active_connections,
        cache_age_seconds = metrics.cache_age_seconds,
        "producer metrics"
    );
}
