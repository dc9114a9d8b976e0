//! Notification entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use saasboard_core::types::{NotificationId, UserId};

/// A notification addressed to one user.
///
/// Serialized in camelCase; this is both the pull API shape and the payload
/// pushed over the notification stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Unique notification identifier.
    pub id: NotificationId,
    /// Short headline.
    pub title: String,
    /// Body text.
    pub message: String,
    /// Whether the recipient has read it.
    pub read: bool,
    /// Recipient.
    pub user_id: UserId,
    /// When the notification was created.
    pub created_at: DateTime<Utc>,
}

/// Input for creating a notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewNotification {
    /// Short headline.
    pub title: String,
    /// Body text.
    pub message: String,
    /// Recipient.
    pub user_id: UserId,
}

impl NewNotification {
    /// Build a notification input for `user_id`.
    pub fn new(title: impl Into<String>, message: impl Into<String>, user_id: UserId) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            user_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_shape_is_camel_case() {
        let n = Notification {
            id: NotificationId::new(),
            title: "New Customer".into(),
            message: "Acme was added as a new customer".into(),
            read: false,
            user_id: UserId::new(),
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&n).expect("serialize");
        for key in ["id", "title", "message", "read", "userId", "createdAt"] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
    }
}
