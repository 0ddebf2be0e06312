//! Feed subscription and auxiliary HTTP clients for the Lanewatch
//! dashboard.
//!
//! All I/O for a dashboard session lives in this crate: the long-lived
//! server-push feed subscription, the health/metrics pull clients, and
//! the camera-source configuration client. Transport failures are
//! normalized into the [`FeedError`] taxonomy; nothing here is fatal to
//! the session.
//!
//! # Modules
//!
//! - [`sse`] -- incremental server-sent-event frame reassembly
//! - [`client`] -- the cancellable feed subscription
//! - [`monitor`] -- typed `/health` and `/metrics` pull clients
//! - [`cameras`] -- camera-source configuration read/write client
//! - [`error`] -- the error taxonomy for the feed edge

pub mod cameras;
pub mod client;
pub mod error;
pub mod monitor;
pub mod sse;

pub use cameras::CameraSourceClient;
pub use client::{FeedClient, FeedEvent, FeedSubscription};
pub use error::{FeedError, MonitorError};
pub use monitor::MonitorClient;
pub use sse::SseFrameBuffer;
