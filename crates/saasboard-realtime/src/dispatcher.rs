//! Notification dispatcher: pushes payloads to every open stream of a user.

use std::sync::Arc;

use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use saasboard_core::types::{TenantId, UserId};
use saasboard_database::TenantDirectory;

use crate::frame::Frame;
use crate::registry::ConnectionRegistry;

/// Fans notifications out to open streams.
///
/// Fire-and-forget: no retries, and failures are never reported to the
/// caller. A stream that fails a write is evicted through its cleanup.
#[derive(Clone)]
pub struct NotificationDispatcher {
    registry: Arc<ConnectionRegistry>,
    directory: Arc<dyn TenantDirectory>,
}

impl std::fmt::Debug for NotificationDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationDispatcher")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

impl NotificationDispatcher {
    /// Creates a dispatcher over the registry and tenant directory.
    pub fn new(registry: Arc<ConnectionRegistry>, directory: Arc<dyn TenantDirectory>) -> Self {
        Self {
            registry,
            directory,
        }
    }

    /// The registry this dispatcher writes through.
    pub fn registry(&self) -> &Arc<ConnectionRegistry> {
        &self.registry
    }

    /// Writes `payload` to each of the user's open streams.
    ///
    /// Returns the number of streams that accepted the frame.
    pub fn deliver_to_user<T: Serialize + ?Sized>(&self, user_id: UserId, payload: &T) -> usize {
        match Frame::json(payload) {
            Ok(frame) => self.deliver_frame(user_id, &frame),
            Err(e) => {
                warn!(user_id = %user_id, error = %e, "Dropping undeliverable notification payload");
                0
            }
        }
    }

    /// Delivers `payload` to every member of the tenant on a spawned task.
    ///
    /// The payload is serialized before spawning. The returned handle may be
    /// awaited or dropped; the task runs either way.
    pub fn deliver_to_tenant<T: Serialize + ?Sized>(
        &self,
        tenant_id: TenantId,
        payload: &T,
    ) -> JoinHandle<()> {
        let frame = Frame::json(payload);
        let this = self.clone();

        tokio::spawn(async move {
            let frame = match frame {
                Ok(frame) => frame,
                Err(e) => {
                    warn!(tenant_id = %tenant_id, error = %e, "Dropping undeliverable tenant payload");
                    return;
                }
            };

            let members = match this.directory.member_ids(tenant_id).await {
                Ok(members) => members,
                Err(e) => {
                    warn!(tenant_id = %tenant_id, error = %e, "Failed to resolve tenant members");
                    return;
                }
            };

            let delivered: usize = members
                .into_iter()
                .map(|user_id| this.deliver_frame(user_id, &frame))
                .sum();
            debug!(tenant_id = %tenant_id, delivered, "Tenant notification delivered");
        })
    }

    fn deliver_frame(&self, user_id: UserId, frame: &Frame) -> usize {
        let mut delivered = 0;
        for handle in self.registry.sinks_for(user_id) {
            match handle.write(frame) {
                Ok(()) => delivered += 1,
                Err(e) => {
                    debug!(user_id = %user_id, conn_id = %handle.id, error = %e, "Evicting dead notification stream");
                    handle.evict(&self.registry);
                }
            }
        }
        delivered
    }
}
