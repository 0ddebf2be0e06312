//! The traffic-light cycle state machine.
//!
//! The feed producer pushes a signal-duration table but not a per-tick
//! phase, so the dashboard simulates the cycle itself: given the table,
//! [`SignalCycleEngine`] computes which lane currently has right-of-way
//! and how much green time remains, advancing once per second under an
//! externally driven [`tick`](SignalCycleEngine::tick).
//!
//! # Design Principles
//!
//! - The engine is resynchronized by incoming snapshots but never reset
//!   by them: a routine table refresh must not visibly jump the
//!   intersection to a different lane.
//! - Rotation order is the order of lane keys at the time of the last
//!   resync. The tick cadence itself is owned by the caller, so tests
//!   advance virtual time by calling `tick` directly.
//! - Malformed durations never halt the cycle. Non-positive allocations
//!   are clamped out, reported to an observer, and the lane is skipped.

use std::collections::BTreeMap;

use lanewatch_types::DurationTable;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Observer for timing anomalies found while resynchronizing.
///
/// A lane with a zero, negative, or missing allocation is skipped by
/// the cycle; the anomaly is reported here instead of being raised as
/// an error, so the countdown keeps running on whatever valid timing
/// policy remains.
pub trait TimingAnomalyObserver: Send {
    /// Called once per offending lane per table change.
    fn on_anomalous_timing(&mut self, lane: &str, seconds: i64);
}

/// Default observer: logs the anomaly at warn level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogTimingObserver;

impl TimingAnomalyObserver for LogTimingObserver {
    fn on_anomalous_timing(&mut self, lane: &str, seconds: i64) {
        warn!(
            lane = lane,
            seconds = seconds,
            "non-positive signal allocation, lane skipped in cycle"
        );
    }
}

/// Externally visible cycle state, owned exclusively by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleState {
    /// The lane that currently has right-of-way, if any.
    pub active_lane: Option<String>,
    /// Seconds of green time remaining for the active lane.
    pub remaining_seconds: u32,
    /// Number of full rotations completed since the engine started.
    pub completed_cycles: u64,
}

/// Live phase data while at least one lane has a usable allocation.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Running {
    /// Lane keys in the order they arrived at the last resync.
    rotation: Vec<String>,
    /// Positive allocations only; a lane absent here is skipped.
    durations: BTreeMap<String, u32>,
    /// Index into `rotation` of the lane with right-of-way.
    active_index: usize,
    /// Seconds left in the active lane's phase.
    remaining: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum EngineState {
    /// No usable duration table has arrived yet (or the last one was
    /// empty / entirely non-positive).
    Idle,
    /// The cycle is progressing.
    Running(Running),
}

/// Deterministic finite-state machine deriving the active signal and
/// countdown from the server-supplied duration table.
pub struct SignalCycleEngine {
    state: EngineState,
    /// Survives Idle periods so a degenerate table mid-run does not
    /// zero the counter the operator is watching.
    completed_cycles: u64,
    /// Raw table at the last resync, for change detection.
    last_table: Vec<(String, i64)>,
    observer: Box<dyn TimingAnomalyObserver>,
}

impl SignalCycleEngine {
    /// Create an engine in the `Idle` state with the logging observer.
    pub fn new() -> Self {
        Self::with_observer(Box::new(LogTimingObserver))
    }

    /// Create an engine with a custom timing-anomaly observer.
    pub fn with_observer(observer: Box<dyn TimingAnomalyObserver>) -> Self {
        Self {
            state: EngineState::Idle,
            completed_cycles: 0,
            last_table: Vec::new(),
            observer,
        }
    }

    /// Resynchronize against a newly arrived duration table.
    ///
    /// A table identical to the one last resynchronized against is a
    /// no-op. On change, the rotation order and allocations are taken
    /// from the new table, but the active lane and completed-cycle
    /// count are preserved; only the active lane's remaining time is
    /// clamped down to its new allocation. An empty or entirely
    /// non-positive table forces `Idle`.
    pub fn resync(&mut self, table: &DurationTable) {
        let incoming: Vec<(String, i64)> =
            table.iter().map(|(lane, &s)| (lane.clone(), s)).collect();
        if incoming == self.last_table {
            return;
        }

        let mut rotation = Vec::with_capacity(table.len());
        let mut durations = BTreeMap::new();
        for (lane, &seconds) in table {
            rotation.push(lane.clone());
            if seconds >= 1 {
                durations.insert(lane.clone(), u32::try_from(seconds).unwrap_or(u32::MAX));
            } else {
                self.observer.on_anomalous_timing(lane, seconds);
            }
        }
        self.last_table = incoming;

        if durations.is_empty() {
            self.state = EngineState::Idle;
            return;
        }

        let state = std::mem::replace(&mut self.state, EngineState::Idle);
        self.state = match state {
            EngineState::Idle => Self::start_state(rotation, durations),
            EngineState::Running(mut running) => {
                let active = running.rotation.get(running.active_index).cloned();
                let relocated = active.and_then(|lane| {
                    rotation.iter().position(|l| *l == lane).map(|i| (lane, i))
                });
                match relocated {
                    Some((lane, index)) => {
                        // Missing allocation clamps to 0; the next tick
                        // advances past the lane without stalling.
                        let ceiling = durations.get(&lane).copied().unwrap_or(0);
                        running.rotation = rotation;
                        running.durations = durations;
                        running.active_index = index;
                        running.remaining = running.remaining.min(ceiling);
                        EngineState::Running(running)
                    }
                    // The active lane vanished from the table; re-select
                    // as on first resync, keeping the cycle counter.
                    None => Self::start_state(rotation, durations),
                }
            }
        };
    }

    /// Advance the cycle by one second of wall-clock time.
    ///
    /// The caller invokes this exactly once per second, independent of
    /// snapshot arrival. When the active phase expires the engine moves
    /// to the next lane in rotation order, wrapping past the end back
    /// to the start (each wrap increments the completed-cycle count)
    /// and skipping lanes without a positive allocation within the same
    /// tick.
    pub fn tick(&mut self) {
        let EngineState::Running(running) = &mut self.state else {
            return;
        };

        if running.remaining > 1 {
            running.remaining = running.remaining.saturating_sub(1);
            return;
        }

        // Phase expired: find the next lane with a usable allocation.
        let lane_count = running.rotation.len();
        let mut index = running.active_index;
        for _ in 0..lane_count {
            index = index.saturating_add(1);
            if index >= lane_count {
                index = 0;
                self.completed_cycles = self.completed_cycles.saturating_add(1);
            }
            let Some(lane) = running.rotation.get(index) else {
                continue;
            };
            if let Some(&seconds) = running.durations.get(lane) {
                running.active_index = index;
                running.remaining = seconds;
                return;
            }
        }

        // No lane has a positive allocation left; stop rather than spin.
        self.state = EngineState::Idle;
    }

    /// Snapshot of the externally visible cycle state.
    pub fn state(&self) -> CycleState {
        match &self.state {
            EngineState::Idle => CycleState {
                active_lane: None,
                remaining_seconds: 0,
                completed_cycles: self.completed_cycles,
            },
            EngineState::Running(running) => CycleState {
                active_lane: running.rotation.get(running.active_index).cloned(),
                remaining_seconds: running.remaining,
                completed_cycles: self.completed_cycles,
            },
        }
    }

    /// The lane that currently has right-of-way, if any.
    pub fn active_lane(&self) -> Option<&str> {
        match &self.state {
            EngineState::Idle => None,
            EngineState::Running(running) => running
                .rotation
                .get(running.active_index)
                .map(String::as_str),
        }
    }

    /// Seconds remaining in the active phase (0 when idle).
    pub const fn remaining_seconds(&self) -> u32 {
        match &self.state {
            EngineState::Idle => 0,
            EngineState::Running(running) => running.remaining,
        }
    }

    /// Number of full rotations completed since construction.
    pub const fn completed_cycles(&self) -> u64 {
        self.completed_cycles
    }

    /// Whether the engine is waiting for a usable duration table.
    pub const fn is_idle(&self) -> bool {
        matches!(self.state, EngineState::Idle)
    }

    /// Lane keys in rotation order (empty when idle).
    pub fn rotation(&self) -> &[String] {
        match &self.state {
            EngineState::Idle => &[],
            EngineState::Running(running) => &running.rotation,
        }
    }

    /// Total seconds in one full rotation over the usable allocations.
    pub fn cycle_total_seconds(&self) -> u32 {
        match &self.state {
            EngineState::Idle => 0,
            EngineState::Running(running) => running
                .durations
                .values()
                .fold(0_u32, |total, &s| total.saturating_add(s)),
        }
    }

    /// How far through its phase the active lane is, as a percentage.
    ///
    /// Returns 0 when idle or when the active lane has no positive
    /// allocation, never dividing by zero.
    pub fn phase_progress_percent(&self) -> f64 {
        let EngineState::Running(running) = &self.state else {
            return 0.0;
        };
        let Some(lane) = running.rotation.get(running.active_index) else {
            return 0.0;
        };
        let Some(&allocated) = running.durations.get(lane) else {
            return 0.0;
        };
        if allocated == 0 {
            return 0.0;
        }
        let elapsed = allocated.saturating_sub(running.remaining);
        (f64::from(elapsed) / f64::from(allocated)) * 100.0
    }

    /// Pick the starting lane for a fresh table: the lane with the
    /// largest allocation, ties broken by lexicographically smallest
    /// name. Deterministic and stable across resyncs.
    fn start_state(rotation: Vec<String>, durations: BTreeMap<String, u32>) -> EngineState {
        let mut best: Option<(usize, u32)> = None;
        for (index, lane) in rotation.iter().enumerate() {
            let Some(&seconds) = durations.get(lane) else {
                continue;
            };
            let better = match best {
                None => true,
                Some((best_index, best_seconds)) => {
                    seconds > best_seconds
                        || (seconds == best_seconds
                            && rotation.get(best_index).is_some_and(|b| lane < b))
                }
            };
            if better {
                best = Some((index, seconds));
            }
        }
        match best {
            Some((active_index, remaining)) => EngineState::Running(Running {
                rotation,
                durations,
                active_index,
                remaining,
            }),
            None => EngineState::Idle,
        }
    }
}

impl Default for SignalCycleEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SignalCycleEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignalCycleEngine")
            .field("state", &self.state)
            .field("completed_cycles", &self.completed_cycles)
            .finish_non_exhaustive()
    }
}
