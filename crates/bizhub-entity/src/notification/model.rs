//! Notification entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use bizhub_core::types::{ActorId, BusinessId, NotificationId, NotificationTypeId};

use super::kind::NotificationType;

/// One dispatched event instance. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Notification {
    /// Unique notification identifier.
    pub id: NotificationId,
    /// Notification type, if any.
    pub type_id: Option<NotificationTypeId>,
    /// Owning business; `None` means cross-tenant.
    pub business_id: Option<BusinessId>,
    /// Title.
    pub title: String,
    /// Body text.
    pub body: Option<String>,
    /// Opaque structured data.
    pub payload: Option<serde_json::Value>,
    /// The actor who created the notification.
    pub created_by: ActorId,
    /// When the notification was created.
    pub created_at: DateTime<Utc>,
}

/// Data required to persist a notification row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewNotification {
    /// Notification type, if any.
    pub type_id: Option<NotificationTypeId>,
    /// Owning business; `None` means cross-tenant.
    pub business_id: Option<BusinessId>,
    /// Title.
    pub title: String,
    /// Body text.
    pub body: Option<String>,
    /// Opaque structured data.
    pub payload: Option<serde_json::Value>,
    /// The creating actor.
    pub created_by: ActorId,
}

impl NewNotification {
    /// Materialize the row with a fresh id and the given creation time.
    pub fn into_notification(self, now: DateTime<Utc>) -> Notification {
        Notification {
            id: NotificationId::new(),
            type_id: self.type_id,
            business_id: self.business_id,
            title: self.title,
            body: self.body,
            payload: self.payload,
            created_by: self.created_by,
            created_at: now,
        }
    }
}

/// A notification with its type relation loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationWithType {
    /// The notification row.
    #[serde(flatten)]
    pub notification: Notification,
    /// The loaded type, if the notification has one.
    pub notification_type: Option<NotificationType>,
}
