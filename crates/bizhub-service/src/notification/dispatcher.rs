//! Notification creation, delivery fan-out, and read tracking.
//!
//! A dispatch persists the notification first, then one delivery per
//! recipient, then pushes a lightweight frame to the recipients' live
//! sessions. The realtime push never fails a dispatch.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use bizhub_core::config::NotificationsConfig;
use bizhub_core::error::AppError;
use bizhub_core::result::AppResult;
use bizhub_core::types::{
    ActorId, BusinessId, BusinessUserId, NotificationId, NotificationTypeId,
};
use bizhub_database::store::{NotificationStore, TenancyStore};
use bizhub_entity::notification::{
    DeliveryRecord, DeliveryStatus, NewNotification, NotificationType, NotificationWithType,
};
use bizhub_realtime::{OutboundMessage, RealtimePublisher};

use super::resolver::RecipientResolver;

/// Input to [`NotificationDispatcher::create_and_dispatch`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateNotification {
    /// Notification type; drives recipient resolution when no explicit list is given.
    #[serde(default)]
    pub type_id: Option<NotificationTypeId>,
    /// Owning business; `None` is cross-tenant.
    #[serde(default)]
    pub business_id: Option<BusinessId>,
    /// Title.
    pub title: String,
    /// Body text.
    #[serde(default)]
    pub body: Option<String>,
    /// Opaque structured data.
    #[serde(default)]
    pub payload: Option<serde_json::Value>,
    /// The creating actor.
    pub created_by: ActorId,
    /// Explicit recipients. When non-empty, type-based resolution is skipped.
    #[serde(default)]
    pub recipient_ids: Option<Vec<BusinessUserId>>,
}

/// What a dispatch produced.
#[derive(Debug, Clone, Serialize)]
pub struct DispatchOutcome {
    /// The persisted notification with its type.
    pub notification: NotificationWithType,
    /// Delivery records created, one per recipient.
    pub deliveries: Vec<DeliveryRecord>,
}

/// Creates notifications and their per-recipient deliveries.
#[derive(Clone)]
pub struct NotificationDispatcher {
    notifications: Arc<dyn NotificationStore>,
    tenancy: Arc<dyn TenancyStore>,
    resolver: RecipientResolver,
    publisher: RealtimePublisher,
    config: NotificationsConfig,
}

impl std::fmt::Debug for NotificationDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationDispatcher")
            .field("publisher", &self.publisher)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl NotificationDispatcher {
    /// Create a dispatcher.
    pub fn new(
        notifications: Arc<dyn NotificationStore>,
        tenancy: Arc<dyn TenancyStore>,
        publisher: RealtimePublisher,
        config: NotificationsConfig,
    ) -> Self {
        Self {
            resolver: RecipientResolver::new(notifications.clone()),
            notifications,
            tenancy,
            publisher,
            config,
        }
    }

    /// The resolver used for type-based recipients.
    pub fn resolver(&self) -> &RecipientResolver {
        &self.resolver
    }

    /// Persist a notification, deliver it, and push it to live sessions.
    pub async fn create_and_dispatch(
        &self,
        request: CreateNotification,
    ) -> AppResult<NotificationWithType> {
        self.dispatch(request).await.map(|outcome| outcome.notification)
    }

    /// Like [`create_and_dispatch`](Self::create_and_dispatch), also returning the deliveries.
    pub async fn dispatch(&self, request: CreateNotification) -> AppResult<DispatchOutcome> {
        if request.title.trim().is_empty() {
            return Err(AppError::validation("Notification title must not be empty"));
        }

        let kind = self.load_type(request.type_id).await?;
        let now = Utc::now();
        let row = NewNotification {
            type_id: request.type_id,
            business_id: request.business_id,
            title: request.title,
            body: request.body,
            payload: request.payload,
            created_by: request.created_by,
        }
        .into_notification(now);
        let notification = self.notifications.insert_notification(&row).await?;

        let recipients = match request.recipient_ids.filter(|ids| !ids.is_empty()) {
            Some(ids) => dedup(ids),
            None => match request.type_id {
                Some(type_id) => {
                    let resolved = self
                        .resolver
                        .resolve_recipients(type_id, notification.business_id)
                        .await;
                    match resolved {
                        Ok(set) => set.into_iter().collect(),
                        Err(e) => return Err(self.abandon(notification.id, e).await),
                    }
                }
                None => Vec::new(),
            },
        };

        let deliveries = if recipients.is_empty() {
            Vec::new()
        } else {
            match self
                .notifications
                .insert_deliveries(notification.id, &recipients, now)
                .await
            {
                Ok(records) => records,
                Err(e) => return Err(self.abandon(notification.id, e).await),
            }
        };

        info!(
            notification_id = %notification.id,
            type_code = kind.as_ref().map(|k| k.code.as_str()),
            business_id = ?notification.business_id,
            recipients = deliveries.len(),
            "Notification dispatched"
        );

        if !recipients.is_empty() {
            let frame = OutboundMessage::Notification {
                notification_id: notification.id,
                type_id: notification.type_id,
                type_code: kind.as_ref().map(|k| k.code.clone()),
                business_id: notification.business_id,
                title: notification.title.clone(),
                created_at: notification.created_at,
            }
            .to_value();
            self.push_realtime(recipients, frame).await;
        }

        Ok(DispatchOutcome {
            notification: NotificationWithType {
                notification,
                notification_type: kind,
            },
            deliveries,
        })
    }

    /// Mark the delivery of a notification to one membership as read.
    ///
    /// Returns `None` without writing when no such delivery exists. Repeat
    /// calls succeed and refresh `read_at`. An archived delivery stays
    /// archived and only gets its `read_at` set.
    pub async fn mark_as_read(
        &self,
        notification_id: NotificationId,
        business_user_id: BusinessUserId,
    ) -> AppResult<Option<DeliveryRecord>> {
        let Some(record) = self
            .notifications
            .find_delivery(notification_id, business_user_id)
            .await?
        else {
            debug!(
                notification_id = %notification_id,
                business_user_id = %business_user_id,
                "No delivery to mark read"
            );
            return Ok(None);
        };

        let status = match record.status {
            DeliveryStatus::Archived => DeliveryStatus::Archived,
            _ => DeliveryStatus::Read,
        };
        let updated = self
            .notifications
            .update_delivery_status(record.id, status, Some(Utc::now()))
            .await?;
        Ok(Some(updated))
    }

    /// Push a membership's new unread counter to its live sessions.
    pub async fn push_unread_count(&self, business_user_id: BusinessUserId, count: u64) {
        let frame = OutboundMessage::UnreadCount { count }.to_value();
        self.push_realtime(vec![business_user_id], frame).await;
    }

    async fn load_type(
        &self,
        type_id: Option<NotificationTypeId>,
    ) -> AppResult<Option<NotificationType>> {
        let Some(type_id) = type_id else {
            return Ok(None);
        };
        self.notifications
            .find_notification_type(type_id)
            .await?
            .map(Some)
            .ok_or_else(|| AppError::not_found(format!("Notification type {type_id} not found")))
    }

    /// Apply the orphan policy after a failure that follows the notification insert.
    async fn abandon(&self, notification_id: NotificationId, cause: AppError) -> AppError {
        if !self.config.rollback_orphans {
            warn!(
                notification_id = %notification_id,
                error = %cause,
                "Dispatch failed after notification was stored, keeping orphan"
            );
            return cause;
        }
        match self.notifications.delete_notification(notification_id).await {
            Ok(_) => warn!(
                notification_id = %notification_id,
                error = %cause,
                "Dispatch failed, notification rolled back"
            ),
            Err(e) => error!(
                notification_id = %notification_id,
                error = %e,
                "Failed to roll back orphaned notification"
            ),
        }
        cause
    }

    async fn push_realtime(&self, recipients: Vec<BusinessUserId>, frame: serde_json::Value) {
        let tenancy = self.tenancy.clone();
        let publisher = self.publisher.clone();
        let push = async move {
            match tenancy.find_members(&recipients).await {
                Ok(members) => {
                    publisher.publish(&members, &frame).await;
                }
                Err(e) => {
                    warn!(error = %e, "Could not map recipients to actors, skipping realtime push")
                }
            }
        };

        if self.config.detach_realtime {
            tokio::spawn(push);
        } else {
            push.await;
        }
    }
}

/// Deduplicate while keeping first-seen order.
fn dedup(ids: Vec<BusinessUserId>) -> Vec<BusinessUserId> {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.into_iter().filter(|id| seen.insert(*id)).collect()
}
