//! Error taxonomy for the feed edge.
//!
//! Uses `thiserror` for typed errors. Nothing here is fatal: a
//! malformed payload drops one tick, a lost transport surfaces a
//! disconnected state until the stream recovers, and the pull clients
//! simply skip a poll round on failure.

/// Errors surfaced by the feed subscription.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    /// One pushed message failed to parse as a traffic snapshot. The
    /// tick is dropped; the subscription stays alive.
    #[error("malformed payload: {detail}")]
    MalformedPayload {
        /// Parser diagnostics for the offending frame.
        detail: String,
    },

    /// The underlying connection dropped. The subscription reconnects
    /// with backoff; connectivity reads disconnected until the first
    /// successfully parsed snapshot after recovery.
    #[error("transport lost: {detail}")]
    TransportLost {
        /// Transport diagnostics for the failure.
        detail: String,
    },
}

/// Errors from the auxiliary pull clients (health, metrics, cameras).
#[derive(Debug, thiserror::Error)]
pub enum MonitorError {
    /// The request could not be sent or returned a non-success status.
    #[error("request failed: {0}")]
    Request(String),

    /// The response body did not match the documented shape.
    #[error("malformed response: {0}")]
    Decode(String),
}
