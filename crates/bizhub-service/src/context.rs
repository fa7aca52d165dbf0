//! Request context carrying the acting actor and business scope.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use bizhub_auth::BusinessContext;
use bizhub_core::types::{ActorId, BusinessId};

/// Context for the current request.
///
/// Built by the caller's transport layer and passed into service methods so
/// every operation knows who is acting and in which business.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The acting actor.
    pub actor_id: ActorId,
    /// Business named by the request; `None` falls back to the selected one.
    pub business_id: Option<BusinessId>,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Context without an explicit business.
    pub fn new(actor_id: ActorId) -> Self {
        Self {
            actor_id,
            business_id: None,
            request_time: Utc::now(),
        }
    }

    /// Context scoped to a business.
    pub fn for_business(actor_id: ActorId, business_id: BusinessId) -> Self {
        Self {
            business_id: Some(business_id),
            ..Self::new(actor_id)
        }
    }

    /// The membership selector for permission checks.
    pub fn business_context(&self) -> BusinessContext {
        BusinessContext::from(self.business_id)
    }
}
