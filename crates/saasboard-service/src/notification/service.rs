//! Notification service: persist-then-push creation and the pull API.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use saasboard_core::AppError;
use saasboard_core::result::AppResult;
use saasboard_core::types::{NotificationId, UserId};
use saasboard_database::NotificationStore;
use saasboard_entity::{NewNotification, Notification};
use saasboard_realtime::NotificationDispatcher;

use crate::context::RequestContext;

use super::samples;

/// How many notifications the list endpoint returns.
pub const RECENT_LIMIT: u64 = 10;

/// Latest notifications plus the unread total.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationList {
    /// Newest first, at most [`RECENT_LIMIT`].
    pub notifications: Vec<Notification>,
    /// Unread count across all of the user's notifications.
    pub unread_count: u64,
}

/// Creates notifications and serves their read state.
#[derive(Clone)]
pub struct NotificationService {
    store: Arc<dyn NotificationStore>,
    dispatcher: NotificationDispatcher,
}

impl std::fmt::Debug for NotificationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationService").finish_non_exhaustive()
    }
}

impl NotificationService {
    /// Creates a new notification service.
    pub fn new(store: Arc<dyn NotificationStore>, dispatcher: NotificationDispatcher) -> Self {
        Self { store, dispatcher }
    }

    /// Persists a notification, then pushes it to the recipient's open streams.
    ///
    /// Push is best-effort; the stored record is returned even when no
    /// stream received it.
    pub async fn create_notification(
        &self,
        title: impl Into<String>,
        message: impl Into<String>,
        user_id: UserId,
    ) -> AppResult<Notification> {
        let notification = self
            .store
            .create_notification(NewNotification::new(title, message, user_id))
            .await?;

        let delivered = self.dispatcher.deliver_to_user(user_id, &notification);
        debug!(
            notification_id = %notification.id,
            user_id = %user_id,
            delivered,
            "Notification created"
        );
        Ok(notification)
    }

    /// Latest notifications and the unread count for the current user.
    pub async fn list(&self, ctx: &RequestContext) -> AppResult<NotificationList> {
        let notifications = self
            .store
            .recent_for_user(ctx.user_id, RECENT_LIMIT)
            .await?;
        let unread_count = self.store.count_unread(ctx.user_id).await?;
        Ok(NotificationList {
            notifications,
            unread_count,
        })
    }

    /// Marks one of the current user's notifications read.
    pub async fn mark_read(
        &self,
        ctx: &RequestContext,
        id: NotificationId,
    ) -> AppResult<Notification> {
        self.store
            .mark_read(id, ctx.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("Notification not found"))
    }

    /// Marks all of the current user's notifications read.
    pub async fn mark_all_read(&self, ctx: &RequestContext) -> AppResult<u64> {
        let updated = self.store.mark_all_read(ctx.user_id).await?;
        info!(user_id = %ctx.user_id, updated, "Marked all notifications read");
        Ok(updated)
    }

    /// Creates a random sample notification for the current user.
    pub async fn create_mock(&self, ctx: &RequestContext) -> AppResult<Notification> {
        let (title, message) = samples::pick();
        self.create_notification(title, message, ctx.user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    use saasboard_core::config::RealtimeConfig;
    use saasboard_core::error::ErrorKind;
    use saasboard_core::types::TenantId;
    use saasboard_database::MemoryStore;
    use saasboard_entity::UserRole;
    use saasboard_realtime::{ConnectionRegistry, Frame, open_stream};

    fn setup() -> (NotificationService, Arc<ConnectionRegistry>, RequestContext) {
        let store = Arc::new(MemoryStore::new());
        let registry = Arc::new(ConnectionRegistry::new());
        let dispatcher = NotificationDispatcher::new(Arc::clone(&registry), store.clone());
        let ctx = RequestContext::new(
            UserId::new(),
            TenantId::new(),
            UserRole::Member,
            "m@example.com".into(),
        );
        (NotificationService::new(store, dispatcher), registry, ctx)
    }

    #[tokio::test]
    async fn test_created_notification_is_pushed_to_open_stream() {
        let (service, registry, ctx) = setup();
        let mut stream = open_stream(&registry, ctx.user_id, &RealtimeConfig::default());
        assert_eq!(stream.next().await, Some(Frame::connected()));

        let created = service
            .create_notification("Hello", "World", ctx.user_id)
            .await
            .unwrap();

        let Some(Frame::Data(json)) = stream.next().await else {
            panic!("expected a data frame");
        };
        let pushed: Notification = serde_json::from_str(&json).unwrap();
        assert_eq!(pushed, created);
    }

    #[tokio::test]
    async fn test_list_returns_latest_ten_and_unread_count() {
        let (service, _, ctx) = setup();
        for i in 0..12 {
            service
                .create_notification(format!("t{i}"), "m", ctx.user_id)
                .await
                .unwrap();
        }
        let list = service.list(&ctx).await.unwrap();
        assert_eq!(list.notifications.len(), 10);
        assert_eq!(list.unread_count, 12);
        assert_eq!(list.notifications[0].title, "t11");
    }

    #[tokio::test]
    async fn test_mark_read_of_foreign_notification_is_not_found() {
        let (service, _, ctx) = setup();
        let other = service
            .create_notification("t", "m", UserId::new())
            .await
            .unwrap();
        let err = service.mark_read(&ctx, other.id).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_mark_all_read_clears_unread() {
        let (service, _, ctx) = setup();
        service.create_mock(&ctx).await.unwrap();
        service.create_mock(&ctx).await.unwrap();
        assert_eq!(service.mark_all_read(&ctx).await.unwrap(), 2);
        assert_eq!(service.list(&ctx).await.unwrap().unread_count, 0);
    }
}
