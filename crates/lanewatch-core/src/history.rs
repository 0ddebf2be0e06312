//! Bounded historical aggregates for trend charts.
//!
//! One [`HistoryAggregator`] per dashboard session. Each accepted
//! snapshot appends one sample per lane to a fixed-capacity window and
//! one slot to the weekly emergency series. The aggregator is a pure
//! function of its call sequence -- no wall-clock dependency -- so any
//! behavior can be reproduced by replaying the same snapshots.
//!
//! Consecutive duplicate snapshots append duplicate samples. The
//! weekly series models samples per call, not calendar days; mapping
//! slots to weekdays is a presentational concern left to the caller.

use std::collections::{BTreeMap, VecDeque};

use lanewatch_types::TrafficSnapshot;

/// Maximum number of count samples retained per lane.
pub const WINDOW_CAPACITY: usize = 24;

/// Number of slots in the weekly emergency series.
pub const WEEKLY_SLOTS: usize = 7;

/// Sliding per-lane count windows plus the weekly emergency series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryAggregator {
    /// Per-lane samples, most-recent-last, capped at [`WINDOW_CAPACITY`].
    windows: BTreeMap<String, VecDeque<u32>>,
    /// Emergency-lane counts, always exactly [`WEEKLY_SLOTS`] long.
    weekly: VecDeque<u32>,
}

impl HistoryAggregator {
    /// Create an aggregator with empty windows and an all-zero weekly
    /// series.
    pub fn new() -> Self {
        Self {
            windows: BTreeMap::new(),
            weekly: VecDeque::from(vec![0; WEEKLY_SLOTS]),
        }
    }

    /// Record one accepted snapshot.
    ///
    /// Appends each lane's count to its window (trimming the oldest
    /// sample beyond capacity) and shifts the weekly series left,
    /// appending the number of lanes flagged `emergency`.
    pub fn record(&mut self, snapshot: &TrafficSnapshot) {
        for (lane, data) in &snapshot.lanes {
            let window = self.windows.entry(lane.clone()).or_default();
            window.push_back(data.count);
            while window.len() > WINDOW_CAPACITY {
                window.pop_front();
            }
        }

        self.weekly.pop_front();
        self.weekly.push_back(snapshot.emergency_count());
    }

    /// The retained count samples for a lane, oldest first.
    ///
    /// Returns an empty vector for a lane that has never appeared.
    pub fn window(&self, lane: &str) -> Vec<u32> {
        self.windows
            .get(lane)
            .map(|window| window.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Names of all lanes that have ever appeared in a snapshot.
    pub fn lanes(&self) -> impl Iterator<Item = &String> {
        self.windows.keys()
    }

    /// The weekly emergency series, oldest slot first. Always exactly
    /// [`WEEKLY_SLOTS`] values.
    pub fn weekly_emergency(&self) -> Vec<u32> {
        self.weekly.iter().copied().collect()
    }
}

impl Default for HistoryAggregator {
    fn default() -> Self {
        Self::new()
    }
}
