//! Notification type (template/category) entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use bizhub_core::types::NotificationTypeId;

use super::severity::NotificationSeverity;

/// A category of notification, e.g. `budget_created`.
///
/// Recipients are expanded from two relations: business users directly
/// subscribed to the type and roles whose members should receive it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct NotificationType {
    /// Unique type identifier.
    pub id: NotificationTypeId,
    /// Display name.
    pub name: String,
    /// Stable code (unique).
    pub code: String,
    /// Delivery channel label (e.g. `in_app`).
    pub channel: String,
    /// Severity.
    pub severity: NotificationSeverity,
    /// Disabled types resolve no recipients.
    pub enabled: bool,
    /// When the type was created.
    pub created_at: DateTime<Utc>,
}

impl NotificationType {
    /// Build an enabled in-app type with `Info` severity.
    pub fn new(code: impl Into<String>) -> Self {
        let code = code.into();
        Self {
            id: NotificationTypeId::new(),
            name: code.clone(),
            code,
            channel: "in_app".to_string(),
            severity: NotificationSeverity::Info,
            enabled: true,
            created_at: Utc::now(),
        }
    }
}
