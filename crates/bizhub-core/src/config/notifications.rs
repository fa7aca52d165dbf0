//! Notification dispatch configuration.

use serde::{Deserialize, Serialize};

/// Notification dispatcher settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsConfig {
    /// Delete the notification row again when its delivery records fail to
    /// insert. When disabled, the orphaned notification is kept.
    #[serde(default)]
    pub rollback_orphans: bool,
    /// Run the realtime push on a detached task instead of awaiting it.
    #[serde(default = "default_true")]
    pub detach_realtime: bool,
    /// Page size used for inbox listings when the caller gives none.
    #[serde(default = "default_page_size")]
    pub default_page_size: u64,
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            rollback_orphans: false,
            detach_realtime: true,
            default_page_size: default_page_size(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_page_size() -> u64 {
    25
}
