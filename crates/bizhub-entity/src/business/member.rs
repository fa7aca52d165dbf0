//! Business membership (business user) entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use bizhub_core::types::{ActorId, BusinessId, BusinessUserId};

/// The membership of one actor in one business.
///
/// Every permission check and every notification delivery is scoped to a
/// business user. At most one exists per `(actor_id, business_id)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct BusinessUser {
    /// Unique membership identifier.
    pub id: BusinessUserId,
    /// The member actor.
    pub actor_id: ActorId,
    /// The business this membership belongs to.
    pub business_id: BusinessId,
    /// Per-business super-user; bypasses explicit grants inside the business.
    pub is_super: bool,
    /// May authorize (approve) on behalf of the business.
    pub is_authorizer: bool,
    /// Marks the actor's currently active business.
    pub selected: bool,
    /// When the membership was created.
    pub created_at: DateTime<Utc>,
}

impl BusinessUser {
    /// Build a plain (non-super, unselected) membership.
    pub fn new(actor_id: ActorId, business_id: BusinessId) -> Self {
        Self {
            id: BusinessUserId::new(),
            actor_id,
            business_id,
            is_super: false,
            is_authorizer: false,
            selected: false,
            created_at: Utc::now(),
        }
    }

    /// Builder-style toggle for the super-user flag.
    pub fn with_super(mut self, is_super: bool) -> Self {
        self.is_super = is_super;
        self
    }

    /// Builder-style toggle for the selected flag.
    pub fn with_selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }
}

/// Minimal projection used when mapping recipients to live sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, FromRow)]
pub struct BusinessMember {
    /// Membership id.
    pub business_user_id: BusinessUserId,
    /// Underlying actor id.
    pub actor_id: ActorId,
}
