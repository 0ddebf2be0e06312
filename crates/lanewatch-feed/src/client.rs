//! The long-lived feed subscription.
//!
//! [`FeedClient::subscribe`] spawns a task that owns the SSE read loop
//! and hands back a [`FeedSubscription`]: a stream of [`FeedEvent`]s
//! plus a connectivity signal. Reconnection with bounded backoff is
//! internal to the task -- consumers only see the normalized
//! [`FeedError`] taxonomy and the connected/disconnected flag.
//!
//! Connectivity semantics: the flag turns true only once a snapshot has
//! actually been parsed on the current connection, never on mere TCP
//! success, and turns false on any transport failure. A malformed
//! payload drops that tick without touching connectivity or the
//! connection.
//!
//! Closing the subscription aborts the task and consumes the event
//! receiver, so no event can be observed after `close` returns.

use std::time::Duration;

use futures::StreamExt;
use lanewatch_types::TrafficSnapshot;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::error::FeedError;
use crate::sse::SseFrameBuffer;

/// Buffered events between the subscription task and the consumer.
const EVENT_BUFFER: usize = 64;

/// Delay before the first reconnect attempt.
const INITIAL_BACKOFF: Duration = Duration::from_secs(1);

/// Ceiling on the reconnect delay.
const MAX_BACKOFF: Duration = Duration::from_secs(30);

/// One observation delivered by the subscription.
#[derive(Debug)]
pub enum FeedEvent {
    /// A successfully parsed traffic snapshot.
    Snapshot(TrafficSnapshot),
    /// A non-fatal feed failure (tick dropped or transport lost).
    Error(FeedError),
}

/// Client for the producer's server-push traffic feed.
#[derive(Debug, Clone)]
pub struct FeedClient {
    http: reqwest::Client,
    base_url: String,
}

impl FeedClient {
    /// Create a client for the given producer base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Open the subscription.
    ///
    /// The returned handle owns the background task; dropping or
    /// [`close`](FeedSubscription::close)-ing it releases all
    /// resources.
    pub fn subscribe(&self) -> FeedSubscription {
        let (events_tx, events_rx) = mpsc::channel(EVENT_BUFFER);
        let (connected_tx, connected_rx) = watch::channel(false);
        let url = format!("{}/traffic_feed", self.base_url.trim_end_matches('/'));
        let task = tokio::spawn(run_subscription(
            self.http.clone(),
            url,
            events_tx,
            connected_tx,
        ));
        FeedSubscription {
            events: events_rx,
            connected: connected_rx,
            task,
        }
    }
}

/// Handle to an open feed subscription.
pub struct FeedSubscription {
    events: mpsc::Receiver<FeedEvent>,
    connected: watch::Receiver<bool>,
    task: JoinHandle<()>,
}

impl FeedSubscription {
    /// Wait for the next feed event. Returns `None` once the
    /// subscription task has stopped and all buffered events are
    /// drained.
    pub async fn next_event(&mut self) -> Option<FeedEvent> {
        self.events.recv().await
    }

    /// Current connectivity as last reported by the subscription task.
    pub fn is_connected(&self) -> bool {
        *self.connected.borrow()
    }

    /// A watchable connectivity signal for display layers.
    pub fn connectivity(&self) -> watch::Receiver<bool> {
        self.connected.clone()
    }

    /// Close the subscription, releasing all resources.
    ///
    /// Consumes the handle: after this returns no further event or
    /// connectivity change can be observed from it.
    pub fn close(self) {
        self.task.abort();
    }
}

impl Drop for FeedSubscription {
    fn drop(&mut self) {
        self.task.abort();
    }
}

impl std::fmt::Debug for FeedSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedSubscription")
            .field("connected", &self.is_connected())
            .finish_non_exhaustive()
    }
}

/// Why one connection attempt ended.
enum StreamEnd {
    /// The consumer dropped the subscription; stop entirely.
    ReceiverDropped,
    /// The transport failed; reconnect after backoff.
    TransportLost(String),
}

/// Connect-read-reconnect loop owned by the subscription task.
async fn run_subscription(
    http: reqwest::Client,
    url: String,
    events: mpsc::Sender<FeedEvent>,
    connected: watch::Sender<bool>,
) {
    let mut backoff = INITIAL_BACKOFF;
    loop {
        match stream_once(&http, &url, &events, &connected, &mut backoff).await {
            StreamEnd::ReceiverDropped => return,
            StreamEnd::TransportLost(detail) => {
                let _ = connected.send(false);
                let lost = FeedEvent::Error(FeedError::TransportLost { detail });
                if events.send(lost).await.is_err() {
                    return;
                }
                debug!(delay_ms = backoff.as_millis(), "feed reconnect scheduled");
                tokio::time::sleep(backoff).await;
                backoff = backoff.saturating_mul(2).min(MAX_BACKOFF);
            }
        }
    }
}

/// Run one connection until it ends, forwarding parsed snapshots.
async fn stream_once(
    http: &reqwest::Client,
    url: &str,
    events: &mpsc::Sender<FeedEvent>,
    connected: &watch::Sender<bool>,
    backoff: &mut Duration,
) -> StreamEnd {
    let response = match http
        .get(url)
        .send()
        .await
        .and_then(reqwest::Response::error_for_status)
    {
        Ok(response) => response,
        Err(e) => return StreamEnd::TransportLost(format!("connect to {url} failed: {e}")),
    };

    let mut stream = Box::pin(response.bytes_stream());
    let mut frames = SseFrameBuffer::new();

    while let Some(chunk) = stream.next().await {
        let bytes = match chunk {
            Ok(bytes) => bytes,
            Err(e) => return StreamEnd::TransportLost(format!("stream read failed: {e}")),
        };

        for payload in frames.push(&bytes) {
            match serde_json::from_str::<TrafficSnapshot>(&payload) {
                Ok(snapshot) => {
                    // First parsed snapshot on this connection marks
                    // the feed live again.
                    if !*connected.borrow() {
                        let _ = connected.send(true);
                        *backoff = INITIAL_BACKOFF;
                    }
                    if events.send(FeedEvent::Snapshot(snapshot)).await.is_err() {
                        return StreamEnd::ReceiverDropped;
                    }
                }
                Err(e) => {
                    let malformed = FeedEvent::Error(FeedError::MalformedPayload {
                        detail: e.to_string(),
                    });
                    if events.send(malformed).await.is_err() {
                        return StreamEnd::ReceiverDropped;
                    }
                }
            }
        }
    }

    StreamEnd::TransportLost("stream ended".to_owned())
}
