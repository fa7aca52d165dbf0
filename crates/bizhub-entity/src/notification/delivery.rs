//! Per-recipient delivery record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use bizhub_core::types::{BusinessUserId, DeliveryRecordId, NotificationId};

/// Lifecycle state of a delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "delivery_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum DeliveryStatus {
    /// Delivered, not yet read.
    Unread,
    /// Read by the recipient.
    Read,
    /// Hidden from the default inbox.
    Archived,
}

impl DeliveryStatus {
    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unread => "unread",
            Self::Read => "read",
            Self::Archived => "archived",
        }
    }
}

impl std::fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for DeliveryStatus {
    type Err = bizhub_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "unread" => Ok(Self::Unread),
            "read" => Ok(Self::Read),
            "archived" => Ok(Self::Archived),
            _ => Err(bizhub_core::AppError::validation(format!(
                "Invalid delivery status: '{s}'. Expected one of: unread, read, archived"
            ))),
        }
    }
}

/// One notification delivered to one business user.
///
/// Unique per `(notification_id, business_user_id)`; owned by the
/// notification and removed with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct DeliveryRecord {
    /// Unique record identifier.
    pub id: DeliveryRecordId,
    /// The delivered notification.
    pub notification_id: NotificationId,
    /// The recipient membership.
    pub business_user_id: BusinessUserId,
    /// Current status.
    pub status: DeliveryStatus,
    /// When the record was delivered.
    pub delivered_at: DateTime<Utc>,
    /// When the recipient last read it.
    pub read_at: Option<DateTime<Utc>>,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
}

impl DeliveryRecord {
    /// Build a fresh unread record delivered at `now`.
    pub fn unread(
        notification_id: NotificationId,
        business_user_id: BusinessUserId,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: DeliveryRecordId::new(),
            notification_id,
            business_user_id,
            status: DeliveryStatus::Unread,
            delivered_at: now,
            read_at: None,
            created_at: now,
        }
    }

    /// Check if the record is still unread.
    pub fn is_unread(&self) -> bool {
        self.status == DeliveryStatus::Unread
    }
}
