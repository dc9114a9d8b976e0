//! Writable endpoints for notification frames.

use std::sync::{Mutex, PoisonError};

use thiserror::Error;
use tokio::sync::mpsc;

use crate::frame::Frame;

/// Why a frame could not be written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SinkError {
    /// The client is not draining frames fast enough.
    #[error("sink buffer is full")]
    Full,
    /// The client is gone or the sink was closed.
    #[error("sink is closed")]
    Closed,
}

/// An open stream's write side.
///
/// Writes never block. Any error means the stream is unusable and the
/// caller evicts it.
pub trait NotificationSink: Send + Sync + 'static {
    /// Queues one frame for the client.
    fn write(&self, frame: &Frame) -> Result<(), SinkError>;

    /// Ends the stream. Safe to call more than once.
    fn close(&self);
}

/// Sink backed by a bounded `mpsc` channel whose receiver is the HTTP body.
#[derive(Debug)]
pub struct ChannelSink {
    tx: Mutex<Option<mpsc::Sender<Frame>>>,
}

impl ChannelSink {
    /// Creates a sink and the receiver the response body reads from.
    pub fn channel(buffer: usize) -> (Self, mpsc::Receiver<Frame>) {
        let (tx, rx) = mpsc::channel(buffer.max(1));
        (
            Self {
                tx: Mutex::new(Some(tx)),
            },
            rx,
        )
    }
}

impl NotificationSink for ChannelSink {
    fn write(&self, frame: &Frame) -> Result<(), SinkError> {
        let guard = self.tx.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(tx) = guard.as_ref() else {
            return Err(SinkError::Closed);
        };
        tx.try_send(frame.clone()).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => SinkError::Full,
            mpsc::error::TrySendError::Closed(_) => SinkError::Closed,
        })
    }

    fn close(&self) {
        // Dropping the only sender ends the receiver once it drains.
        self.tx
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_then_close_ends_receiver() {
        let (sink, mut rx) = ChannelSink::channel(4);
        sink.write(&Frame::ping()).unwrap();
        sink.close();
        sink.close();
        assert_eq!(rx.recv().await, Some(Frame::ping()));
        assert_eq!(rx.recv().await, None);
        assert_eq!(sink.write(&Frame::ping()), Err(SinkError::Closed));
    }

    #[test]
    fn test_full_buffer_is_an_error() {
        let (sink, _rx) = ChannelSink::channel(1);
        sink.write(&Frame::ping()).unwrap();
        assert_eq!(sink.write(&Frame::ping()), Err(SinkError::Full));
    }

    #[test]
    fn test_dropped_receiver_is_closed() {
        let (sink, rx) = ChannelSink::channel(1);
        drop(rx);
        assert_eq!(sink.write(&Frame::connected()), Err(SinkError::Closed));
    }
}
