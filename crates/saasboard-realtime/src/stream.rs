//! Notification stream lifecycle.
//!
//! Opening a stream writes the `connected` frame, registers the sink, and
//! starts a keep-alive task. From then on the stream ends in one of two
//! ways: the client goes away (the response body is dropped) or a write
//! fails (keep-alive or delivery). Both paths run the same
//! [`StreamCleanup`], which acts exactly once.

use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::task::{Context, Poll};
use std::time::Duration;

use futures::Stream;
use pin_project_lite::pin_project;
use tokio::sync::mpsc;
use tokio::task::AbortHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use saasboard_core::config::RealtimeConfig;
use saasboard_core::types::UserId;

use crate::frame::Frame;
use crate::registry::{ConnectionRegistry, StreamHandle};
use crate::sink::{ChannelSink, NotificationSink};

/// Tear-down for one stream: stop keep-alive, unregister, close the sink.
pub struct StreamCleanup {
    done: AtomicBool,
    registry: Arc<ConnectionRegistry>,
    handle: Arc<StreamHandle>,
    keep_alive: Mutex<Option<AbortHandle>>,
}

impl std::fmt::Debug for StreamCleanup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamCleanup")
            .field("conn_id", &self.handle.id)
            .field("done", &self.is_done())
            .finish_non_exhaustive()
    }
}

impl StreamCleanup {
    fn new(registry: Arc<ConnectionRegistry>, handle: Arc<StreamHandle>) -> Self {
        Self {
            done: AtomicBool::new(false),
            registry,
            handle,
            keep_alive: Mutex::new(None),
        }
    }

    /// Runs the cleanup. Every call after the first is a no-op.
    pub fn run(&self) {
        if self.done.swap(true, Ordering::SeqCst) {
            return;
        }

        if let Some(task) = self
            .keep_alive
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            task.abort();
        }
        self.registry.unregister(&self.handle);
        self.handle.close();

        info!(
            user_id = %self.handle.user_id,
            conn_id = %self.handle.id,
            "Notification stream closed"
        );
    }

    /// Whether cleanup has already run.
    pub fn is_done(&self) -> bool {
        self.done.load(Ordering::SeqCst)
    }

    fn attach_keep_alive(&self, task: AbortHandle) {
        let mut slot = self
            .keep_alive
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if self.is_done() {
            task.abort();
        } else {
            *slot = Some(task);
        }
    }
}

pin_project! {
    /// Frames for one client, in write order.
    ///
    /// Dropping the stream (client disconnect) runs its cleanup.
    pub struct NotificationStream {
        rx: mpsc::Receiver<Frame>,
        cleanup: Arc<StreamCleanup>,
    }

    impl PinnedDrop for NotificationStream {
        fn drop(this: Pin<&mut Self>) {
            this.project().cleanup.run();
        }
    }
}

impl NotificationStream {
    /// The stream's connection handle.
    pub fn handle(&self) -> &Arc<StreamHandle> {
        &self.cleanup.handle
    }

    /// The stream's cleanup.
    pub fn cleanup(&self) -> &Arc<StreamCleanup> {
        &self.cleanup
    }
}

impl Stream for NotificationStream {
    type Item = Frame;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Frame>> {
        self.project().rx.poll_recv(cx)
    }
}

/// Opens a notification stream for `user_id`.
///
/// Must be called inside a tokio runtime; the keep-alive runs as a task.
pub fn open_stream(
    registry: &Arc<ConnectionRegistry>,
    user_id: UserId,
    config: &RealtimeConfig,
) -> NotificationStream {
    let (sink, rx) = ChannelSink::channel(config.sink_buffer_size);

    // The buffer is empty, so this cannot be refused.
    if let Err(e) = sink.write(&Frame::connected()) {
        warn!(user_id = %user_id, error = %e, "Failed to write connected frame");
    }

    // Cleanup is bound before the handle becomes visible to dispatchers.
    let handle = StreamHandle::new(user_id, Arc::new(sink));
    let cleanup = Arc::new(StreamCleanup::new(Arc::clone(registry), Arc::clone(&handle)));
    handle.attach_cleanup(Arc::downgrade(&cleanup));
    registry.insert(Arc::clone(&handle));

    let task = tokio::spawn(keep_alive(
        handle,
        Arc::clone(&cleanup),
        config.keep_alive_interval(),
    ));
    cleanup.attach_keep_alive(task.abort_handle());

    NotificationStream { rx, cleanup }
}

async fn keep_alive(handle: Arc<StreamHandle>, cleanup: Arc<StreamCleanup>, period: Duration) {
    let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        if let Err(e) = handle.write(&Frame::ping()) {
            debug!(conn_id = %handle.id, error = %e, "Keep-alive write failed");
            cleanup.run();
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    use crate::dispatcher::NotificationDispatcher;

    fn config(buffer: usize) -> RealtimeConfig {
        RealtimeConfig {
            keep_alive_seconds: 30,
            sink_buffer_size: buffer,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_connected_frame_then_registered() {
        let registry = Arc::new(ConnectionRegistry::new());
        let user = UserId::new();
        let mut stream = open_stream(&registry, user, &config(8));

        assert_eq!(registry.sinks_for(user).len(), 1);
        assert_eq!(stream.next().await, Some(Frame::connected()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_keep_alive_every_interval() {
        let registry = Arc::new(ConnectionRegistry::new());
        let mut stream = open_stream(&registry, UserId::new(), &config(8));
        assert_eq!(stream.next().await, Some(Frame::connected()));

        let start = Instant::now();
        assert_eq!(stream.next().await, Some(Frame::ping()));
        assert_eq!(start.elapsed(), Duration::from_secs(30));
        assert_eq!(stream.next().await, Some(Frame::ping()));
        assert_eq!(start.elapsed(), Duration::from_secs(60));
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_unregisters_and_is_idempotent() {
        let registry = Arc::new(ConnectionRegistry::new());
        let user = UserId::new();
        let stream = open_stream(&registry, user, &config(8));
        let cleanup = Arc::clone(stream.cleanup());

        drop(stream);
        assert!(cleanup.is_done());
        assert_eq!(registry.connection_count(), 0);

        cleanup.run();
        assert_eq!(registry.connection_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_keep_alive_failure_runs_cleanup() {
        let registry = Arc::new(ConnectionRegistry::new());
        let user = UserId::new();
        // Buffer of one, already holding the connected frame.
        let stream = open_stream(&registry, user, &config(1));
        let cleanup = Arc::clone(stream.cleanup());

        tokio::time::sleep(Duration::from_secs(31)).await;

        assert!(cleanup.is_done());
        assert!(registry.sinks_for(user).is_empty());
        drop(stream);
    }

    #[tokio::test(start_paused = true)]
    async fn test_delivery_reaches_stream_and_eviction_ends_it() {
        let registry = Arc::new(ConnectionRegistry::new());
        let dispatcher = NotificationDispatcher::new(
            Arc::clone(&registry),
            Arc::new(saasboard_database::MemoryStore::new()),
        );
        let user = UserId::new();
        let mut stream = open_stream(&registry, user, &config(2));

        assert_eq!(dispatcher.deliver_to_user(user, "one"), 1);
        // Buffer now full: connected + "one".
        assert_eq!(dispatcher.deliver_to_user(user, "two"), 0);
        assert!(registry.sinks_for(user).is_empty());

        assert_eq!(stream.next().await, Some(Frame::connected()));
        assert_eq!(stream.next().await, Some(Frame::Data("\"one\"".into())));
        assert_eq!(stream.next().await, None);

        drop(stream);
        assert_eq!(registry.connection_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_delivery_runs_stream_cleanup() {
        let registry = Arc::new(ConnectionRegistry::new());
        let dispatcher = NotificationDispatcher::new(
            Arc::clone(&registry),
            Arc::new(saasboard_database::MemoryStore::new()),
        );
        let user = UserId::new();
        // Buffer of one, already holding the connected frame.
        let mut stream = open_stream(&registry, user, &config(1));
        let cleanup = Arc::clone(stream.cleanup());

        assert_eq!(dispatcher.deliver_to_user(user, "lost"), 0);

        assert!(cleanup.is_done());
        assert!(cleanup.keep_alive.lock().unwrap().is_none());
        assert_eq!(registry.connection_count(), 0);

        // No keep-alive ticks after eviction; the stream just drains.
        tokio::time::sleep(Duration::from_secs(90)).await;
        assert_eq!(stream.next().await, Some(Frame::connected()));
        assert_eq!(stream.next().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_all_stops_keep_alive() {
        let registry = Arc::new(ConnectionRegistry::new());
        let stream = open_stream(&registry, UserId::new(), &config(8));
        let cleanup = Arc::clone(stream.cleanup());

        assert_eq!(registry.close_all(), 1);
        assert!(cleanup.is_done());
        assert!(cleanup.keep_alive.lock().unwrap().is_none());
        drop(stream);
    }
}
