//! "My notifications": the caller's inbox.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use bizhub_auth::PermissionEvaluator;
use bizhub_core::config::NotificationsConfig;
use bizhub_core::error::AppError;
use bizhub_core::result::AppResult;
use bizhub_core::types::{NotificationId, PageRequest, PageResponse};
use bizhub_database::store::NotificationStore;
use bizhub_entity::business::BusinessUser;
use bizhub_entity::notification::{DeliveryRecord, DeliveryStatus, InboxItem};

use crate::context::RequestContext;

use super::dispatcher::NotificationDispatcher;

/// Inbox operations scoped to the caller's membership.
///
/// The membership is resolved from the request context with the same
/// explicit-or-selected rules as permission checks.
#[derive(Clone)]
pub struct NotificationService {
    store: Arc<dyn NotificationStore>,
    dispatcher: Arc<NotificationDispatcher>,
    evaluator: PermissionEvaluator,
    config: NotificationsConfig,
}

impl std::fmt::Debug for NotificationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationService")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl NotificationService {
    /// Creates a new notification service.
    pub fn new(
        store: Arc<dyn NotificationStore>,
        dispatcher: Arc<NotificationDispatcher>,
        evaluator: PermissionEvaluator,
        config: NotificationsConfig,
    ) -> Self {
        Self {
            store,
            dispatcher,
            evaluator,
            config,
        }
    }

    async fn membership(&self, ctx: &RequestContext) -> AppResult<BusinessUser> {
        self.evaluator
            .resolve_membership(ctx.actor_id, ctx.business_context())
            .await?
            .ok_or_else(|| AppError::not_found("No business membership for this request"))
    }

    /// Lists the caller's notifications, newest first.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        status: Option<DeliveryStatus>,
        page: Option<PageRequest>,
    ) -> AppResult<PageResponse<InboxItem>> {
        let bu = self.membership(ctx).await?;
        let page = page.unwrap_or_else(|| PageRequest::new(1, self.config.default_page_size));
        self.store.list_inbox(bu.id, status, &page).await
    }

    /// Gets the unread notification count.
    pub async fn unread_count(&self, ctx: &RequestContext) -> AppResult<u64> {
        let bu = self.membership(ctx).await?;
        self.store.count_unread(bu.id).await
    }

    /// Marks a notification as read.
    pub async fn mark_read(
        &self,
        ctx: &RequestContext,
        notification_id: NotificationId,
    ) -> AppResult<DeliveryRecord> {
        let bu = self.membership(ctx).await?;
        let record = self
            .dispatcher
            .mark_as_read(notification_id, bu.id)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!("Notification {notification_id} not found"))
            })?;
        self.push_unread(&bu).await;
        Ok(record)
    }

    /// Marks all notifications as read for the caller.
    pub async fn mark_all_read(&self, ctx: &RequestContext) -> AppResult<u64> {
        let bu = self.membership(ctx).await?;
        let changed = self.store.mark_all_read(bu.id, Utc::now()).await?;
        info!(business_user_id = %bu.id, changed, "Marked all notifications read");
        if changed > 0 {
            self.push_unread(&bu).await;
        }
        Ok(changed)
    }

    /// Archives a notification, hiding it from the default listing.
    pub async fn archive(
        &self,
        ctx: &RequestContext,
        notification_id: NotificationId,
    ) -> AppResult<DeliveryRecord> {
        let bu = self.membership(ctx).await?;
        let record = self
            .store
            .find_delivery(notification_id, bu.id)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!("Notification {notification_id} not found"))
            })?;
        let archived = self
            .store
            .update_delivery_status(record.id, DeliveryStatus::Archived, None)
            .await?;
        if record.status == DeliveryStatus::Unread {
            self.push_unread(&bu).await;
        }
        Ok(archived)
    }

    /// Best effort: a failed count skips the push, never the operation.
    async fn push_unread(&self, bu: &BusinessUser) {
        match self.store.count_unread(bu.id).await {
            Ok(count) => self.dispatcher.push_unread_count(bu.id, count).await,
            Err(e) => warn!(
                business_user_id = %bu.id,
                error = %e,
                "Could not count unread notifications, skipping realtime push"
            ),
        }
    }
}
