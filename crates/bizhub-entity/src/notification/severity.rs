//! Notification severity levels.

use serde::{Deserialize, Serialize};

/// Severity of a notification type.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "notification_severity", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum NotificationSeverity {
    /// Informational.
    Info,
    /// Needs attention.
    Warning,
    /// Requires immediate action.
    Critical,
}

impl NotificationSeverity {
    /// Parse leniently, defaulting to `Info`.
    pub fn from_str_value(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "warning" | "warn" => Self::Warning,
            "critical" => Self::Critical,
            _ => Self::Info,
        }
    }

    /// Return the severity as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Critical => "critical",
        }
    }
}

impl std::fmt::Display for NotificationSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
