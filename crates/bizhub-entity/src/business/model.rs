//! Business entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use bizhub_core::types::BusinessId;

/// A tenant boundary. Owns its business memberships.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Business {
    /// Unique business identifier.
    pub id: BusinessId,
    /// Business display name.
    pub name: String,
    /// Whether the business is enabled.
    pub enabled: bool,
    /// When the business was created.
    pub created_at: DateTime<Utc>,
}

impl Business {
    /// Build a fresh, enabled business.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: BusinessId::new(),
            name: name.into(),
            enabled: true,
            created_at: Utc::now(),
        }
    }
}
