//! Actor entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use bizhub_core::types::ActorId;

/// The user behind one or more business memberships.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Actor {
    /// Unique actor identifier.
    pub id: ActorId,
    /// Login email address.
    pub email: String,
    /// Human-readable display name.
    pub display_name: Option<String>,
    /// Global administrator flag; bypasses every permission check.
    pub is_admin: bool,
    /// Whether the account is enabled.
    pub enabled: bool,
    /// When the actor was created.
    pub created_at: DateTime<Utc>,
}

impl Actor {
    /// Build a fresh, enabled, non-admin actor.
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            id: ActorId::new(),
            email: email.into(),
            display_name: None,
            is_admin: false,
            enabled: true,
            created_at: Utc::now(),
        }
    }

    /// Builder-style toggle for the global admin flag.
    pub fn with_admin(mut self, is_admin: bool) -> Self {
        self.is_admin = is_admin;
        self
    }
}
