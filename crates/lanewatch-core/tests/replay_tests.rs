//! End-to-end replay tests for a full dashboard session.
//!
//! These drive a [`DashboardSession`] with scripted snapshot and tick
//! sequences, the same way the event loop does in production, and
//! check the cross-component properties: countdown continuity across
//! pushes, bounded history, and episode-scoped alerting.

#![allow(clippy::unwrap_used)]

use indexmap::IndexMap;
use lanewatch_core::{AlertTransition, DashboardSession, WINDOW_CAPACITY};
use lanewatch_types::{LaneSnapshot, TrafficSnapshot};

fn snapshot(entries: &[(&str, u32, bool, i64)]) -> TrafficSnapshot {
    let lanes: IndexMap<String, LaneSnapshot> = entries
        .iter()
        .map(|&(lane, count, emergency, _)| (lane.to_owned(), LaneSnapshot { count, emergency }))
        .collect();
    let signal_times = entries
        .iter()
        .map(|&(lane, _, _, seconds)| (lane.to_owned(), seconds))
        .collect();
    TrafficSnapshot {
        lanes,
        signal_times,
        timestamp: "t".to_owned(),
    }
}

fn four_lane(counts: [u32; 4], emergencies: [bool; 4]) -> TrafficSnapshot {
    snapshot(&[
        ("North", counts[0], emergencies[0], 40),
        ("South", counts[1], emergencies[1], 35),
        ("East", counts[2], emergencies[2], 25),
        ("West", counts[3], emergencies[3], 25),
    ])
}

#[test]
fn countdown_survives_routine_pushes() {
    let mut session = DashboardSession::new();
    let _ = session.apply_snapshot(four_lane([10, 10, 10, 10], [false; 4]));

    // Pushes arrive every ~2 s while the cycle counts down.
    for _ in 0..10 {
        let _ = session.tick();
        let _ = session.tick();
        let _ = session.apply_snapshot(four_lane([12, 9, 11, 8], [false; 4]));
    }

    // 20 ticks into North's 40 s phase, no visible jump.
    let state = session.engine().state();
    assert_eq!(state.active_lane.as_deref(), Some("North"));
    assert_eq!(state.remaining_seconds, 20);
    assert_eq!(state.completed_cycles, 0);
}

#[test]
fn full_rotation_with_interleaved_pushes() {
    let mut session = DashboardSession::new();
    let _ = session.apply_snapshot(four_lane([1, 1, 1, 1], [false; 4]));

    for second in 1..=125_u32 {
        let _ = session.tick();
        // A fresh push every 5 s with identical timing policy.
        if second % 5 == 0 {
            let _ = session.apply_snapshot(four_lane([1, 1, 1, 1], [false; 4]));
        }
    }

    let state = session.engine().state();
    assert_eq!(state.active_lane.as_deref(), Some("North"));
    assert_eq!(state.completed_cycles, 1);
}

#[test]
fn emergency_episode_across_the_feed() {
    let mut session = DashboardSession::new();

    let mut raised = Vec::new();
    let mut cleared = 0_u32;
    let script = [
        four_lane([5, 5, 5, 5], [false; 4]),
        four_lane([5, 5, 5, 5], [false, true, false, false]),
        four_lane([5, 5, 5, 5], [false, true, false, false]),
        four_lane([5, 5, 5, 5], [false; 4]),
        four_lane([5, 5, 5, 5], [false; 4]),
    ];
    for snap in script {
        match session.apply_snapshot(snap).alert {
            AlertTransition::Raised(lanes) => raised.push(lanes),
            AlertTransition::Cleared => cleared = cleared.saturating_add(1),
            AlertTransition::NoChange => {}
        }
    }

    assert_eq!(raised, [vec!["South".to_owned()]]);
    assert_eq!(cleared, 1);
}

#[test]
fn history_windows_stay_bounded_over_long_sessions() {
    let mut session = DashboardSession::new();
    for count in 0..100_u32 {
        let _ = session.apply_snapshot(four_lane([count, 0, 0, 0], [false; 4]));
    }

    let window = session.history().window("North");
    assert_eq!(window.len(), WINDOW_CAPACITY);
    assert_eq!(window.first().copied(), Some(76));
    assert_eq!(window.last().copied(), Some(99));
}

#[test]
fn identical_scripts_replay_identically() {
    let script: Vec<TrafficSnapshot> = (0..30)
        .map(|i: u32| {
            four_lane(
                [i, i.wrapping_mul(2), 3, 4],
                [false, i % 7 == 0, false, false],
            )
        })
        .collect();

    let mut a = DashboardSession::new();
    let mut b = DashboardSession::new();
    for snap in &script {
        let ea = a.apply_snapshot(snap.clone());
        let eb = b.apply_snapshot(snap.clone());
        assert_eq!(ea, eb);
        let _ = a.tick();
        let _ = b.tick();
    }

    assert_eq!(a.engine().state(), b.engine().state());
    assert_eq!(a.history().weekly_emergency(), b.history().weekly_emergency());
}
