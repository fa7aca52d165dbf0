//! Inbox read model ("my notifications").

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use bizhub_core::types::{
    ActorId, BusinessId, BusinessUserId, DeliveryRecordId, NotificationId,
};

use super::delivery::DeliveryStatus;
use super::severity::NotificationSeverity;

/// A delivery record joined with its notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct InboxItem {
    /// Delivery record id.
    pub delivery_id: DeliveryRecordId,
    /// Notification id.
    pub notification_id: NotificationId,
    /// Recipient membership.
    pub business_user_id: BusinessUserId,
    /// Delivery status.
    pub status: DeliveryStatus,
    /// When it was delivered.
    pub delivered_at: DateTime<Utc>,
    /// When it was read.
    pub read_at: Option<DateTime<Utc>>,
    /// Code of the notification type, if any.
    pub type_code: Option<String>,
    /// Severity of the notification type, if any.
    pub severity: Option<NotificationSeverity>,
    /// Notification business scope.
    pub business_id: Option<BusinessId>,
    /// Title.
    pub title: String,
    /// Body.
    pub body: Option<String>,
    /// Payload.
    pub payload: Option<serde_json::Value>,
    /// Creating actor.
    pub created_by: ActorId,
    /// When the notification was created.
    pub created_at: DateTime<Utc>,
}
