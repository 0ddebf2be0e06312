//! Latest-snapshot holder with last-write-wins semantics.
//!
//! The store is a pure data holder: the feed client has already
//! validated the message shape, so the store never rejects a structurally valid
//! snapshot, including one with an empty lane map. Each apply replaces
//! the held value wholesale -- there is no partial mutation -- keyed
//! only by arrival order.

use chrono::{DateTime, Utc};
use lanewatch_types::TrafficSnapshot;

/// Single-writer, read-many holder of the latest reconciled snapshot.
#[derive(Debug, Default)]
pub struct SnapshotStore {
    current: Option<TrafficSnapshot>,
    applied: u64,
    last_arrival: Option<DateTime<Utc>>,
}

impl SnapshotStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the held snapshot wholesale and stamp the arrival.
    pub fn apply(&mut self, snapshot: TrafficSnapshot) {
        self.current = Some(snapshot);
        self.applied = self.applied.saturating_add(1);
        self.last_arrival = Some(Utc::now());
    }

    /// The latest snapshot, if any has arrived this session.
    pub const fn current(&self) -> Option<&TrafficSnapshot> {
        self.current.as_ref()
    }

    /// Number of snapshots applied this session.
    pub const fn applied(&self) -> u64 {
        self.applied
    }

    /// Arrival instant of the latest snapshot.
    pub const fn last_arrival(&self) -> Option<DateTime<Utc>> {
        self.last_arrival
    }
}
