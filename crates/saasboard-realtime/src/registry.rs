//! Connection registry: every open notification stream, indexed by user.

use std::sync::{Arc, OnceLock, Weak};

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tracing::{debug, info};

use saasboard_core::types::{ConnectionId, UserId};

use crate::frame::Frame;
use crate::sink::{NotificationSink, SinkError};
use crate::stream::StreamCleanup;

/// One open stream owned by a user.
pub struct StreamHandle {
    /// Unique connection ID; the identity used for removal.
    pub id: ConnectionId,
    /// User who opened the stream.
    pub user_id: UserId,
    /// When the stream was opened.
    pub connected_at: DateTime<Utc>,
    sink: Arc<dyn NotificationSink>,
    cleanup: OnceLock<Weak<StreamCleanup>>,
}

impl std::fmt::Debug for StreamHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamHandle")
            .field("id", &self.id)
            .field("user_id", &self.user_id)
            .field("connected_at", &self.connected_at)
            .finish_non_exhaustive()
    }
}

impl StreamHandle {
    /// Creates a handle for a new stream. It is not registered yet.
    pub fn new(user_id: UserId, sink: Arc<dyn NotificationSink>) -> Arc<Self> {
        Arc::new(Self {
            id: ConnectionId::new(),
            user_id,
            connected_at: Utc::now(),
            sink,
            cleanup: OnceLock::new(),
        })
    }

    /// Binds the stream's cleanup so evictions run it. Only the first call
    /// takes effect.
    pub(crate) fn attach_cleanup(&self, cleanup: Weak<StreamCleanup>) {
        if self.cleanup.set(cleanup).is_err() {
            debug!(conn_id = %self.id, "Stream cleanup already attached");
        }
    }

    /// Removes a dead stream.
    ///
    /// A stream opened through [`crate::open_stream`] runs its own cleanup,
    /// which also stops its keep-alive. A bare sink is unregistered and
    /// closed.
    pub fn evict(&self, registry: &ConnectionRegistry) {
        match self.cleanup.get().and_then(Weak::upgrade) {
            Some(cleanup) => cleanup.run(),
            None => {
                if registry.unregister(self) {
                    self.close();
                }
            }
        }
    }

    /// Writes one frame to the underlying sink.
    pub fn write(&self, frame: &Frame) -> Result<(), SinkError> {
        self.sink.write(frame)
    }

    /// Closes the underlying sink.
    pub fn close(&self) {
        self.sink.close();
    }
}

/// Thread-safe map of user ID to open streams.
///
/// A user may hold any number of streams (one per tab or device).
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    by_user: DashMap<UserId, Vec<Arc<StreamHandle>>>,
    by_id: DashMap<ConnectionId, Arc<StreamHandle>>,
}

impl ConnectionRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a stream for `user_id` and returns its handle.
    pub fn register(&self, user_id: UserId, sink: Arc<dyn NotificationSink>) -> Arc<StreamHandle> {
        let handle = StreamHandle::new(user_id, sink);
        self.insert(Arc::clone(&handle));
        handle
    }

    /// Adds an already built handle.
    pub fn insert(&self, handle: Arc<StreamHandle>) {
        let (user_id, conn_id) = (handle.user_id, handle.id);
        self.by_id.insert(conn_id, Arc::clone(&handle));
        self.by_user.entry(user_id).or_default().push(handle);

        info!(user_id = %user_id, conn_id = %conn_id, "Notification stream registered");
    }

    /// Removes a stream by identity. Returns `false` if it was not present.
    pub fn unregister(&self, handle: &StreamHandle) -> bool {
        if self.by_id.remove(&handle.id).is_none() {
            return false;
        }

        if let Some(mut streams) = self.by_user.get_mut(&handle.user_id) {
            streams.retain(|s| s.id != handle.id);
        }
        // Checked under the shard lock so a concurrent register is not lost.
        self.by_user
            .remove_if(&handle.user_id, |_, streams| streams.is_empty());

        debug!(user_id = %handle.user_id, conn_id = %handle.id, "Notification stream unregistered");
        true
    }

    /// Snapshot of the user's open streams.
    pub fn sinks_for(&self, user_id: UserId) -> Vec<Arc<StreamHandle>> {
        self.by_user
            .get(&user_id)
            .map(|entry| entry.value().clone())
            .unwrap_or_default()
    }

    /// Total number of open streams.
    pub fn connection_count(&self) -> usize {
        self.by_id.len()
    }

    /// Number of users with at least one open stream.
    pub fn user_count(&self) -> usize {
        self.by_user.len()
    }

    /// Evicts every stream. Returns how many were open.
    pub fn close_all(&self) -> usize {
        let handles: Vec<Arc<StreamHandle>> =
            self.by_id.iter().map(|e| Arc::clone(e.value())).collect();
        for handle in &handles {
            handle.evict(self);
        }
        handles.len()
    }
}
