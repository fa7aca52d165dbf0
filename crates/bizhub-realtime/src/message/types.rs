//! Outbound session frame definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use bizhub_core::types::{BusinessId, NotificationId, NotificationTypeId};

/// Frames sent from the server to a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutboundMessage {
    /// A notification was delivered to this actor.
    ///
    /// Lightweight on purpose; clients fetch the full item from the inbox.
    Notification {
        /// Notification id.
        notification_id: NotificationId,
        /// Notification type, if any.
        type_id: Option<NotificationTypeId>,
        /// Type code, if the notification has a type.
        type_code: Option<String>,
        /// Owning business; absent for cross-tenant notifications.
        business_id: Option<BusinessId>,
        /// Title.
        title: String,
        /// Creation time.
        created_at: DateTime<Utc>,
    },
    /// The actor's unread counter changed.
    UnreadCount {
        /// New unread count.
        count: u64,
    },
}

impl OutboundMessage {
    /// Encode as a JSON value for a transport.
    pub fn to_value(&self) -> serde_json::Value {
        // Serializing this enum cannot fail: every field is a plain value.
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frames_are_tagged() {
        let frame = OutboundMessage::UnreadCount { count: 4 }.to_value();
        assert_eq!(frame["type"], "unread_count");
        assert_eq!(frame["count"], 4);

        let id = NotificationId::new();
        let frame = OutboundMessage::Notification {
            notification_id: id,
            type_id: None,
            type_code: Some("budget_created".to_string()),
            business_id: None,
            title: "Budget created".to_string(),
            created_at: Utc::now(),
        }
        .to_value();
        assert_eq!(frame["type"], "notification");
        assert_eq!(frame["notification_id"], id.to_string());
    }
}
