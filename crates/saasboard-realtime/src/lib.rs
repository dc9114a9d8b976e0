//! # saasboard-realtime
//!
//! In-process notification push over Server-Sent-Events streams.
//!
//! - [`ConnectionRegistry`] tracks every open stream per user
//! - [`NotificationDispatcher`] writes a notification to each of a user's streams
//! - [`stream::open_stream`] runs the stream protocol: `connected` frame,
//!   registration, keep-alive comments, and one idempotent cleanup
//!
//! Delivery is best-effort and at-most-once per stream. A stream whose
//! write fails is evicted; clients recover state through the pull API.
//! The registry lives in one process, so several server instances would
//! need an external pub/sub to share it.

pub mod dispatcher;
pub mod frame;
pub mod registry;
pub mod sink;
pub mod stream;

pub use dispatcher::NotificationDispatcher;
pub use frame::Frame;
pub use registry::{ConnectionRegistry, StreamHandle};
pub use sink::{ChannelSink, NotificationSink, SinkError};
pub use stream::{NotificationStream, StreamCleanup, open_stream};
