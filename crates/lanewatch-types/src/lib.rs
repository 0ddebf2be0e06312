//! Shared type definitions for the Lanewatch traffic dashboard.
//!
//! This crate is the single source of truth for everything that crosses
//! the wire between the feed producer and the dashboard: the per-tick
//! traffic snapshot, the health and metrics responses, and the camera
//! source configuration. Downstream crates derive all dashboard state
//! from these types and never re-declare the schema.
//!
//! # Modules
//!
//! - [`snapshot`] -- the per-tick traffic snapshot and lane data
//! - [`health`] -- health check, feed metrics, and camera source shapes

pub mod health;
pub mod snapshot;

// Re-export all public types at crate root for convenience.
pub use health::{CameraSources, FeedMetrics, HealthStatus};
pub use snapshot::{CongestionLevel, DurationTable, LaneSnapshot, TrafficSnapshot};
