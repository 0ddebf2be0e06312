//! The per-tick traffic snapshot pushed by the feed producer.
//!
//! One [`TrafficSnapshot`] arrives per push tick and carries the state
//! of every monitored lane plus the signal-timing allocation computed
//! server-side. Lane maps preserve wire key order because the
//! signal-cycle rotation is defined by the order the producer sends
//! the lanes in, not by any ordering the dashboard invents.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Vehicle count at or above which a lane is considered heavily congested.
const HEAVY_THRESHOLD: u32 = 30;

/// Vehicle count at or above which a lane is considered moderately congested.
const MODERATE_THRESHOLD: u32 = 15;

/// Signal-duration allocation, in seconds, keyed by lane name.
///
/// Durations are `i64` on the wire so a non-positive allocation
/// survives parsing and can be handled as a timing anomaly instead of
/// rejecting the whole message.
pub type DurationTable = IndexMap<String, i64>;

/// One lane's state at one push tick. Immutable once received.
///
/// The producer may attach a base64 `image` field per lane; it is a
/// rendering concern and is ignored during deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaneSnapshot {
    /// Number of vehicles detected in the lane.
    pub count: u32,
    /// Whether an emergency vehicle was detected in the lane.
    pub emergency: bool,
}

/// A complete server-pushed measurement across all lanes at one point
/// in time, plus the signal-duration table.
///
/// Every key in `lanes` should also appear in `signal_times`, but a
/// partial mismatch is tolerated: a lane with no duration simply has
/// no active phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrafficSnapshot {
    /// Per-lane state, keyed by lane name, in wire key order.
    pub lanes: IndexMap<String, LaneSnapshot>,
    /// Allocated green time in seconds per lane, in wire key order.
    pub signal_times: DurationTable,
    /// Producer-supplied timestamp. Treated as an opaque string; the
    /// reference producer sends `%H:%M:%S`, the schema allows ISO-8601.
    pub timestamp: String,
}

impl TrafficSnapshot {
    /// Return the names of lanes currently reporting an emergency
    /// vehicle, in wire key order.
    pub fn emergency_lanes(&self) -> Vec<String> {
        self.lanes
            .iter()
            .filter(|(_, lane)| lane.emergency)
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Number of lanes currently reporting an emergency vehicle.
    pub fn emergency_count(&self) -> u32 {
        let flagged = self.lanes.values().filter(|lane| lane.emergency).count();
        u32::try_from(flagged).unwrap_or(u32::MAX)
    }
}

/// Coarse congestion classification of a lane's vehicle count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CongestionLevel {
    /// Fewer than 15 vehicles.
    Light,
    /// 15 to 29 vehicles.
    Moderate,
    /// 30 or more vehicles.
    Heavy,
}

impl CongestionLevel {
    /// Classify a vehicle count.
    pub const fn from_count(count: u32) -> Self {
        if count >= HEAVY_THRESHOLD {
            Self::Heavy
        } else if count >= MODERATE_THRESHOLD {
            Self::Moderate
        } else {
            Self::Light
        }
    }
}
