//! The fixed-order snapshot reconciler for one dashboard session.
//!
//! A [`DashboardSession`] owns one snapshot store, one cycle engine,
//! one history aggregator, and one alert monitor, and applies every
//! accepted snapshot to them in a fixed order: store, engine resync,
//! history, alerts. The order guarantees derived aggregates never
//! observe a signal-duration table newer than the count and emergency
//! data they are paired with.
//!
//! Sessions are explicit instances with no hidden statics, so any
//! number can coexist in one process. All mutation happens from the
//! single event-loop thread that owns the session; no locks needed.

use lanewatch_types::TrafficSnapshot;

use crate::alerts::{AlertTransition, EmergencyAlertMonitor};
use crate::cycle::{CycleState, SignalCycleEngine, TimingAnomalyObserver};
use crate::history::HistoryAggregator;
use crate::store::SnapshotStore;

/// What one applied snapshot changed, for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotEffects {
    /// Cycle state after resynchronization.
    pub cycle: CycleState,
    /// Alert transition derived from this snapshot.
    pub alert: AlertTransition,
}

/// All reconciliation state for one dashboard session.
#[derive(Debug)]
pub struct DashboardSession {
    store: SnapshotStore,
    engine: SignalCycleEngine,
    history: HistoryAggregator,
    alerts: EmergencyAlertMonitor,
}

impl DashboardSession {
    /// Create a fresh session with empty state throughout.
    pub fn new() -> Self {
        Self {
            store: SnapshotStore::new(),
            engine: SignalCycleEngine::new(),
            history: HistoryAggregator::new(),
            alerts: EmergencyAlertMonitor::new(),
        }
    }

    /// Create a session with a custom timing-anomaly observer.
    pub fn with_observer(observer: Box<dyn TimingAnomalyObserver>) -> Self {
        Self {
            store: SnapshotStore::new(),
            engine: SignalCycleEngine::with_observer(observer),
            history: HistoryAggregator::new(),
            alerts: EmergencyAlertMonitor::new(),
        }
    }

    /// Apply one accepted snapshot in the fixed component order.
    pub fn apply_snapshot(&mut self, snapshot: TrafficSnapshot) -> SnapshotEffects {
        self.store.apply(snapshot);

        let mut alert = AlertTransition::NoChange;
        if let Some(current) = self.store.current() {
            self.engine.resync(&current.signal_times);
            self.history.record(current);
            alert = self.alerts.update(current);
        }

        SnapshotEffects {
            cycle: self.engine.state(),
            alert,
        }
    }

    /// Advance the signal cycle by one second.
    pub fn tick(&mut self) -> CycleState {
        self.engine.tick();
        self.engine.state()
    }

    /// Dismiss the current emergency alert episode, if any.
    pub fn dismiss_alert(&mut self) {
        self.alerts.dismiss();
    }

    /// The snapshot store.
    pub const fn store(&self) -> &SnapshotStore {
        &self.store
    }

    /// The signal-cycle engine.
    pub const fn engine(&self) -> &SignalCycleEngine {
        &self.engine
    }

    /// The history aggregator.
    pub const fn history(&self) -> &HistoryAggregator {
        &self.history
    }

    /// The alert monitor.
    pub const fn alerts(&self) -> &EmergencyAlertMonitor {
        &self.alerts
    }
}

impl Default for DashboardSession {
    fn default() -> Self {
        Self::new()
    }
}
