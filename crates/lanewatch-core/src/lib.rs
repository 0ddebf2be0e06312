//! Real-time data reconciliation and signal-cycle simulation for the
//! Lanewatch traffic dashboard.
//!
//! Everything in this crate is synchronous, deterministic, and free of
//! I/O. Each component owns its state exclusively, is constructed
//! explicitly (no hidden statics), and is only ever mutated from the
//! single event-loop thread that drives a dashboard session -- so
//! multiple independent sessions can coexist in one process and every
//! behavior can be tested by replaying a scripted call sequence.
//!
//! # Modules
//!
//! - [`store`] -- latest-snapshot holder with last-write-wins semantics
//! - [`cycle`] -- the traffic-light cycle state machine
//! - [`history`] -- bounded per-lane trend windows and the weekly
//!   emergency series
//! - [`alerts`] -- emergency alert episode detection and dismissal
//! - [`session`] -- the fixed-order reconciler tying the above together

pub mod alerts;
pub mod cycle;
pub mod history;
pub mod session;
pub mod store;

pub use alerts::{AlertState, AlertTransition, EmergencyAlertMonitor};
pub use cycle::{CycleState, LogTimingObserver, SignalCycleEngine, TimingAnomalyObserver};
pub use history::{HistoryAggregator, WEEKLY_SLOTS, WINDOW_CAPACITY};
pub use session::{DashboardSession, SnapshotEffects};
pub use store::SnapshotStore;
