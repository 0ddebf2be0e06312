//! Dashboard session entry point for the Lanewatch traffic monitor.
//!
//! One process runs one dashboard session: a long-lived feed
//! subscription reconciled into the session state, a one-second timer
//! driving the signal-cycle countdown, and a periodic health poll --
//! three independent timing sources sharing one cooperative event
//! loop.
//!
//! # Architecture
//!
//! ```text
//! SSE feed --> DashboardSession {store, cycle, history, alerts} --> log lines
//!                  ^ 1 s signal tick          health poll (own task)
//! ```
//!
//! Within one scheduling turn a snapshot's effects land in a fixed
//! order (store, cycle resync, history, alerts), so derived aggregates
//! never see a timing table newer than the counts it shipped with.
//! Teardown aborts the poller and closes the subscription before
//! returning: no timer keeps mutating session state afterwards.

mod config;
mod display;

use std::time::Duration;

use lanewatch_core::DashboardSession;
use lanewatch_feed::{CameraSourceClient, FeedClient, FeedEvent, MonitorClient};
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::DashboardConfig;

/// The cycle engine advances exactly once per second of wall-clock
/// time, independent of snapshot arrival.
const SIGNAL_TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Application entry point.
///
/// Initializes logging, loads configuration from environment
/// variables, opens the feed subscription, starts the health poller,
/// then runs the event loop until ctrl-c.
///
/// # Errors
///
/// Returns an error if configuration is invalid; feed and poll
/// failures are surfaced as log lines, never as process exits.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("lanewatch-dashboard starting");

    let config = DashboardConfig::from_env()?;
    info!(
        feed_base_url = config.feed_base_url.as_str(),
        health_poll_interval_ms = config.health_poll_interval.as_millis(),
        "configuration loaded"
    );

    // Camera sources are producer state; fetch once for display.
    let cameras = CameraSourceClient::new(&config.feed_base_url);
    match cameras.fetch().await {
        Ok(sources) => {
            for (lane, source) in &sources {
                info!(lane = lane.as_str(), source = source.as_str(), "camera source");
            }
        }
        Err(e) => warn!(error = %e, "camera source fetch failed"),
    }

    // The health poller runs on its own interval, independent of the
    // push feed, and is aborted on teardown.
    let monitor = MonitorClient::new(&config.feed_base_url);
    let poller = tokio::spawn(poll_monitor(monitor, config.health_poll_interval));

    let feed = FeedClient::new(&config.feed_base_url);
    let mut subscription = feed.subscribe();
    let mut connectivity = subscription.connectivity();

    let mut session = DashboardSession::new();
    let mut signal_tick = tokio::time::interval(SIGNAL_TICK_INTERVAL);
    signal_tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

    info!("session started, entering event loop");

    loop {
        tokio::select! {
            event = subscription.next_event() => match event {
                Some(FeedEvent::Snapshot(snapshot)) => {
                    display::log_lanes(&snapshot);
                    let effects = session.apply_snapshot(snapshot);
                    display::log_effects(&effects);
                }
                Some(FeedEvent::Error(error)) => {
                    warn!(error = %error, "feed error");
                }
                None => {
                    warn!("feed subscription ended");
                    break;
                }
            },
            _ = signal_tick.tick() => {
                let state = session.tick();
                display::log_cycle(&state);
            }
            changed = connectivity.changed() => {
                if changed.is_err() {
                    break;
                }
                let connected = *connectivity.borrow_and_update();
                info!(connected = connected, "feed connectivity changed");
            }
            _ = tokio::signal::ctrl_c() => {
                info!("shutdown requested");
                break;
            }
        }
    }

    // Teardown: every timer and task stops before we return, so
    // nothing mutates session state after this point.
    poller.abort();
    subscription.close();
    info!(
        snapshots_applied = session.store().applied(),
        completed_cycles = session.engine().completed_cycles(),
        "session torn down"
    );

    Ok(())
}

/// Poll the producer's health and metrics endpoints on a fixed
/// interval, logging results. Failures skip the round; the feed and
/// the cycle engine are unaffected.
async fn poll_monitor(monitor: MonitorClient, interval: Duration) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    loop {
        ticker.tick().await;
        match monitor.health().await {
            Ok(health) => display::log_health(&health),
            Err(e) => warn!(error = %e, "health poll failed"),
        }
        match monitor.metrics().await {
            Ok(metrics) => display::log_metrics(&metrics),
            Err(e) => warn!(error = %e, "metrics poll failed"),
        }
    }
}
