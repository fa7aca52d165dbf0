//! Who receives a notification of a given type.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::debug;

use bizhub_core::error::AppError;
use bizhub_core::result::AppResult;
use bizhub_core::types::{BusinessId, BusinessUserId, NotificationTypeId};
use bizhub_database::store::NotificationStore;

/// Resolves the recipients of a notification type.
///
/// Recipients are the union of directly subscribed memberships and members
/// of subscribed roles, optionally limited to one business.
#[derive(Clone)]
pub struct RecipientResolver {
    store: Arc<dyn NotificationStore>,
}

impl std::fmt::Debug for RecipientResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecipientResolver").finish_non_exhaustive()
    }
}

impl RecipientResolver {
    /// Create a resolver over a notification store.
    pub fn new(store: Arc<dyn NotificationStore>) -> Self {
        Self { store }
    }

    /// Resolve the recipients of `type_id`.
    ///
    /// `business_id` of `None` resolves across all businesses. A disabled
    /// type resolves to nobody.
    pub async fn resolve_recipients(
        &self,
        type_id: NotificationTypeId,
        business_id: Option<BusinessId>,
    ) -> AppResult<HashSet<BusinessUserId>> {
        let kind = self
            .store
            .find_notification_type(type_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Notification type {type_id} not found")))?;

        if !kind.enabled {
            debug!(type_code = %kind.code, "Notification type disabled, no recipients");
            return Ok(HashSet::new());
        }

        let direct = self.store.find_direct_subscribers(type_id, business_id).await?;
        let via_roles = self.store.find_role_subscribers(type_id, business_id).await?;

        let direct_count = direct.len();
        let role_count = via_roles.len();
        let recipients: HashSet<BusinessUserId> = direct.into_iter().chain(via_roles).collect();

        debug!(
            type_code = %kind.code,
            business_id = ?business_id,
            direct = direct_count,
            via_roles = role_count,
            recipients = recipients.len(),
            "Recipients resolved"
        );
        Ok(recipients)
    }
}
