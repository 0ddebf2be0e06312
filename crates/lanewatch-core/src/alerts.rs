//! Emergency alert episode detection with dismiss/re-arm semantics.
//!
//! An episode is a maximal contiguous run of snapshots during which at
//! least one lane reports an emergency vehicle. The monitor emits at
//! most one [`AlertTransition::Raised`] per episode (plus one per
//! change of the flagged set while the episode is active) and exactly
//! one [`AlertTransition::Cleared`] when the episode ends.
//!
//! The monitor performs no I/O. Mapping transitions to user-visible
//! effects (sound, toast, log line) belongs to the presentation layer,
//! which keeps the state machine fully testable.

use std::collections::BTreeSet;

use lanewatch_types::TrafficSnapshot;

/// Outcome of feeding one snapshot to the monitor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlertTransition {
    /// Nothing the presentation layer needs to react to.
    NoChange,
    /// An alert should fire for these lanes (wire key order).
    Raised(Vec<String>),
    /// The episode ended; any visible alert should be withdrawn.
    Cleared,
}

/// Current alert state, owned by the monitor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlertState {
    /// Lanes currently reporting an emergency vehicle.
    pub active_lanes: BTreeSet<String>,
    /// Whether the operator dismissed the current episode.
    pub dismissed: bool,
}

/// Derives alert transitions from the stream of accepted snapshots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmergencyAlertMonitor {
    state: AlertState,
}

impl EmergencyAlertMonitor {
    /// Create a monitor with no active episode.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one snapshot and derive the transition, if any.
    pub fn update(&mut self, snapshot: &TrafficSnapshot) -> AlertTransition {
        let flagged_ordered = snapshot.emergency_lanes();
        let flagged: BTreeSet<String> = flagged_ordered.iter().cloned().collect();

        if flagged.is_empty() {
            let was_active = !self.state.active_lanes.is_empty();
            self.state.active_lanes.clear();
            // Episode over: re-arm so the next episode raises again.
            self.state.dismissed = false;
            return if was_active {
                AlertTransition::Cleared
            } else {
                AlertTransition::NoChange
            };
        }

        let changed = flagged != self.state.active_lanes;
        self.state.active_lanes = flagged;

        if self.state.dismissed || !changed {
            AlertTransition::NoChange
        } else {
            AlertTransition::Raised(flagged_ordered)
        }
    }

    /// Suppress further `Raised` transitions until the current episode
    /// ends. A no-op when no episode is active.
    pub fn dismiss(&mut self) {
        if !self.state.active_lanes.is_empty() {
            self.state.dismissed = true;
        }
    }

    /// The current alert state.
    pub const fn state(&self) -> &AlertState {
        &self.state
    }

    /// Whether an episode is currently active.
    pub fn is_active(&self) -> bool {
        !self.state.active_lanes.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use indexmap::IndexMap;
    use lanewatch_types::LaneSnapshot;

    use super::*;

    fn snapshot(emergency_lanes: &[&str]) -> TrafficSnapshot {
        let all = ["North", "South", "East", "West"];
        let lanes: IndexMap<String, LaneSnapshot> = all
            .iter()
            .map(|&lane| {
                (
                    lane.to_owned(),
                    LaneSnapshot {
                        count: 5,
                        emergency: emergency_lanes.contains(&lane),
                    },
                )
            })
            .collect();
        let signal_times = all.iter().map(|&lane| (lane.to_owned(), 30)).collect();
        TrafficSnapshot {
            lanes,
            signal_times,
            timestamp: "t".to_owned(),
        }
    }

    #[test]
    fn raises_once_per_episode() {
        let mut monitor = EmergencyAlertMonitor::new();

        assert_eq!(
            monitor.update(&snapshot(&["South"])),
            AlertTransition::Raised(vec!["South".to_owned()])
        );
        assert_eq!(monitor.update(&snapshot(&["South"])), AlertTransition::NoChange);
        assert_eq!(monitor.update(&snapshot(&["South"])), AlertTransition::NoChange);
    }

    #[test]
    fn clears_once_on_empty_transition() {
        let mut monitor = EmergencyAlertMonitor::new();
        let _ = monitor.update(&snapshot(&["South"]));

        assert_eq!(monitor.update(&snapshot(&[])), AlertTransition::Cleared);
        assert_eq!(monitor.update(&snapshot(&[])), AlertTransition::NoChange);
    }

    #[test]
    fn no_emergency_stream_stays_quiet() {
        let mut monitor = EmergencyAlertMonitor::new();
        for _ in 0..5 {
            assert_eq!(monitor.update(&snapshot(&[])), AlertTransition::NoChange);
        }
        assert!(!monitor.is_active());
    }

    #[test]
    fn set_change_reraises_during_episode() {
        let mut monitor = EmergencyAlertMonitor::new();
        let _ = monitor.update(&snapshot(&["South"]));

        assert_eq!(
            monitor.update(&snapshot(&["South", "East"])),
            AlertTransition::Raised(vec!["South".to_owned(), "East".to_owned()])
        );
        assert_eq!(
            monitor.update(&snapshot(&["South", "East"])),
            AlertTransition::NoChange
        );
    }

    #[test]
    fn dismiss_suppresses_until_new_episode() {
        let mut monitor = EmergencyAlertMonitor::new();
        let _ = monitor.update(&snapshot(&["South"]));
        monitor.dismiss();

        // Still the same episode: nothing may fire, even on set change.
        assert_eq!(monitor.update(&snapshot(&["South"])), AlertTransition::NoChange);
        assert_eq!(
            monitor.update(&snapshot(&["South", "West"])),
            AlertTransition::NoChange
        );

        // Episode ends: Cleared fires despite dismissal, and re-arms.
        assert_eq!(monitor.update(&snapshot(&[])), AlertTransition::Cleared);
        assert!(!monitor.state().dismissed);

        // A fresh episode raises again.
        assert_eq!(
            monitor.update(&snapshot(&["North"])),
            AlertTransition::Raised(vec!["North".to_owned()])
        );
    }

    #[test]
    fn dismiss_without_episode_is_noop() {
        let mut monitor = EmergencyAlertMonitor::new();
        monitor.dismiss();
        assert!(!monitor.state().dismissed);

        // The next emergency still raises.
        assert_eq!(
            monitor.update(&snapshot(&["East"])),
            AlertTransition::Raised(vec!["East".to_owned()])
        );
    }

    #[test]
    fn repeated_pushes_then_all_clear_fire_once_each() {
        let mut monitor = EmergencyAlertMonitor::new();

        let mut raised = 0_u32;
        let mut cleared = 0_u32;
        for snap in [snapshot(&["South"]), snapshot(&["South"]), snapshot(&[])] {
            match monitor.update(&snap) {
                AlertTransition::Raised(lanes) => {
                    assert_eq!(lanes, ["South"]);
                    raised = raised.saturating_add(1);
                }
                AlertTransition::Cleared => cleared = cleared.saturating_add(1),
                AlertTransition::NoChange => {}
            }
        }
        assert_eq!(raised, 1);
        assert_eq!(cleared, 1);
    }

    #[test]
    fn raised_lanes_follow_wire_order() {
        let mut monitor = EmergencyAlertMonitor::new();
        // North appears before East in the canonical snapshot order.
        assert_eq!(
            monitor.update(&snapshot(&["East", "North"])),
            AlertTransition::Raised(vec!["North".to_owned(), "East".to_owned()])
        );
    }
}
