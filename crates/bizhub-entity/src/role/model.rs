//! Role entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use bizhub_core::types::{BusinessId, RoleId};

/// A named bundle of permissions.
///
/// Roles are many-to-many with permissions (`role_permissions`) and with
/// business users (`business_user_roles`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Role {
    /// Unique role identifier.
    pub id: RoleId,
    /// Role name.
    pub name: String,
    /// Owning business, or `None` for a global role.
    pub business_id: Option<BusinessId>,
    /// Holding this role makes the member a super-user of its business.
    pub grants_super: bool,
    /// When the role was created.
    pub created_at: DateTime<Utc>,
}

impl Role {
    /// Build a global role without the super capability.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: RoleId::new(),
            name: name.into(),
            business_id: None,
            grants_super: false,
            created_at: Utc::now(),
        }
    }

    /// Scope the role to one business.
    pub fn scoped_to(mut self, business_id: BusinessId) -> Self {
        self.business_id = Some(business_id);
        self
    }

    /// Builder-style toggle for the super capability.
    pub fn with_grants_super(mut self, grants_super: bool) -> Self {
        self.grants_super = grants_super;
        self
    }

    /// Whether this role is shared across all businesses.
    pub fn is_global(&self) -> bool {
        self.business_id.is_none()
    }
}
