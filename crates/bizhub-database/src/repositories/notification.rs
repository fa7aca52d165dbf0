//! PostgreSQL notification repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use bizhub_core::error::{AppError, ErrorKind};
use bizhub_core::result::AppResult;
use bizhub_core::types::{
    BusinessId, BusinessUserId, DeliveryRecordId, NotificationId, NotificationTypeId,
    PageRequest, PageResponse,
};
use bizhub_entity::notification::{
    DeliveryRecord, DeliveryStatus, InboxItem, Notification, NotificationType,
};

use crate::store::NotificationStore;

const INBOX_SELECT: &str = "SELECT d.id AS delivery_id, d.notification_id, d.business_user_id, \
     d.status, d.delivered_at, d.read_at, t.code AS type_code, t.severity, \
     n.business_id, n.title, n.body, n.payload, n.created_by, n.created_at \
     FROM notification_deliveries d \
     JOIN notifications n ON n.id = d.notification_id \
     LEFT JOIN notification_types t ON t.id = n.type_id";

const INBOX_FILTER: &str = "WHERE d.business_user_id = $1 \
     AND (($2::delivery_status IS NULL AND d.status <> 'archived') OR d.status = $2)";

/// Notification persistence backed by PostgreSQL.
#[derive(Debug, Clone)]
pub struct PgNotificationStore {
    pool: PgPool,
}

impl PgNotificationStore {
    /// Create a new notification repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationStore for PgNotificationStore {
    async fn find_notification_type(
        &self,
        id: NotificationTypeId,
    ) -> AppResult<Option<NotificationType>> {
        sqlx::query_as::<_, NotificationType>("SELECT * FROM notification_types WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find notification type", e)
            })
    }

    async fn find_direct_subscribers(
        &self,
        type_id: NotificationTypeId,
        business_id: Option<BusinessId>,
    ) -> AppResult<Vec<BusinessUserId>> {
        sqlx::query_scalar::<_, BusinessUserId>(
            "SELECT bu.id FROM notification_type_business_users s \
             JOIN business_users bu ON bu.id = s.business_user_id \
             WHERE s.notification_type_id = $1 AND ($2::uuid IS NULL OR bu.business_id = $2)",
        )
        .bind(type_id)
        .bind(business_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to load direct subscribers", e)
        })
    }

    async fn find_role_subscribers(
        &self,
        type_id: NotificationTypeId,
        business_id: Option<BusinessId>,
    ) -> AppResult<Vec<BusinessUserId>> {
        sqlx::query_scalar::<_, BusinessUserId>(
            "SELECT DISTINCT bu.id FROM notification_type_roles s \
             JOIN business_user_roles bur ON bur.role_id = s.role_id \
             JOIN business_users bu ON bu.id = bur.business_user_id \
             JOIN roles r ON r.id = s.role_id \
             WHERE s.notification_type_id = $1 AND ($2::uuid IS NULL OR bu.business_id = $2) \
               AND (r.business_id IS NULL OR r.business_id = bu.business_id)",
        )
        .bind(type_id)
        .bind(business_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to load role subscribers", e)
        })
    }

    async fn insert_notification(&self, notification: &Notification) -> AppResult<Notification> {
        sqlx::query_as::<_, Notification>(
            "INSERT INTO notifications \
             (id, type_id, business_id, title, body, payload, created_by, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING *",
        )
        .bind(notification.id)
        .bind(notification.type_id)
        .bind(notification.business_id)
        .bind(&notification.title)
        .bind(&notification.body)
        .bind(&notification.payload)
        .bind(notification.created_by)
        .bind(notification.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create notification", e))
    }

    async fn delete_notification(&self, id: NotificationId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM notifications WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete notification", e)
            })?;
        Ok(result.rows_affected() > 0)
    }

    async fn find_notification(&self, id: NotificationId) -> AppResult<Option<Notification>> {
        sqlx::query_as::<_, Notification>("SELECT * FROM notifications WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find notification", e)
            })
    }

    async fn insert_deliveries(
        &self,
        notification_id: NotificationId,
        recipients: &[BusinessUserId],
        now: DateTime<Utc>,
    ) -> AppResult<Vec<DeliveryRecord>> {
        if recipients.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<Uuid> = recipients.iter().map(|_| Uuid::new_v4()).collect();

        // One statement, so a single bad recipient rejects the whole batch.
        sqlx::query_as::<_, DeliveryRecord>(
            "INSERT INTO notification_deliveries \
             (id, notification_id, business_user_id, status, delivered_at, created_at) \
             SELECT r.id, $1, r.business_user_id, 'unread', $4, $4 \
             FROM UNNEST($2::uuid[], $3::uuid[]) AS r(id, business_user_id) \
             RETURNING *",
        )
        .bind(notification_id)
        .bind(ids)
        .bind(BusinessUserId::to_uuids(recipients))
        .bind(now)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to insert deliveries", e))
    }

    async fn find_delivery(
        &self,
        notification_id: NotificationId,
        business_user_id: BusinessUserId,
    ) -> AppResult<Option<DeliveryRecord>> {
        sqlx::query_as::<_, DeliveryRecord>(
            "SELECT * FROM notification_deliveries \
             WHERE notification_id = $1 AND business_user_id = $2",
        )
        .bind(notification_id)
        .bind(business_user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find delivery", e))
    }

    async fn update_delivery_status(
        &self,
        id: DeliveryRecordId,
        status: DeliveryStatus,
        read_at: Option<DateTime<Utc>>,
    ) -> AppResult<DeliveryRecord> {
        sqlx::query_as::<_, DeliveryRecord>(
            "UPDATE notification_deliveries SET status = $2, read_at = COALESCE($3, read_at) \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .bind(read_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update delivery", e))?
        .ok_or_else(|| AppError::not_found(format!("Delivery {id} not found")))
    }

    async fn mark_all_read(
        &self,
        business_user_id: BusinessUserId,
        now: DateTime<Utc>,
    ) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE notification_deliveries SET status = 'read', read_at = $2 \
             WHERE business_user_id = $1 AND status = 'unread'",
        )
        .bind(business_user_id)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to mark all read", e))?;
        Ok(result.rows_affected())
    }

    async fn list_inbox(
        &self,
        business_user_id: BusinessUserId,
        status: Option<DeliveryStatus>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<InboxItem>> {
        let total: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM notification_deliveries d {INBOX_FILTER}"
        ))
        .bind(business_user_id)
        .bind(status)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count inbox", e))?;

        let items = sqlx::query_as::<_, InboxItem>(&format!(
            "{INBOX_SELECT} {INBOX_FILTER} ORDER BY d.delivered_at DESC, d.id LIMIT $3 OFFSET $4"
        ))
        .bind(business_user_id)
        .bind(status)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list inbox", e))?;

        Ok(PageResponse::new(
            items,
            page.page,
            page.page_size,
            total.max(0) as u64,
        ))
    }

    async fn count_unread(&self, business_user_id: BusinessUserId) -> AppResult<u64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM notification_deliveries \
             WHERE business_user_id = $1 AND status = 'unread'",
        )
        .bind(business_user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count unread", e))?;
        Ok(count.max(0) as u64)
    }
}
