//! Store traits consumed by the access and notification engines.
//!
//! Both traits are object safe and used as `Arc<dyn ...>` so the engines can
//! run against PostgreSQL or the in-memory store interchangeably.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use bizhub_core::result::AppResult;
use bizhub_core::types::{
    ActorId, BusinessId, BusinessUserId, DeliveryRecordId, ModuleId, NotificationId,
    NotificationTypeId, PageRequest, PageResponse, PermissionId,
};
use bizhub_entity::actor::Actor;
use bizhub_entity::business::{BusinessMember, BusinessUser};
use bizhub_entity::notification::{
    DeliveryRecord, DeliveryStatus, InboxItem, Notification, NotificationType,
};
use bizhub_entity::permission::{Module, Permission};
use bizhub_entity::role::Role;

/// Read access to actors, memberships, roles and permissions.
#[async_trait]
pub trait TenancyStore: Send + Sync + 'static {
    /// Find an actor by id.
    async fn find_actor(&self, id: ActorId) -> AppResult<Option<Actor>>;

    /// Find a membership by its own id.
    async fn find_business_user(&self, id: BusinessUserId) -> AppResult<Option<BusinessUser>>;

    /// Find the membership of `actor_id` in `business_id`.
    async fn find_membership(
        &self,
        actor_id: ActorId,
        business_id: BusinessId,
    ) -> AppResult<Option<BusinessUser>>;

    /// Find the membership the actor has flagged as selected.
    async fn find_selected_membership(&self, actor_id: ActorId)
    -> AppResult<Option<BusinessUser>>;

    /// All roles held by a membership.
    async fn find_roles(&self, business_user_id: BusinessUserId) -> AppResult<Vec<Role>>;

    /// Find a module by its stable key.
    async fn find_module_by_key(&self, key: &str) -> AppResult<Option<Module>>;

    /// Find a permission by module and action key.
    async fn find_permission(
        &self,
        module_id: ModuleId,
        action_key: &str,
    ) -> AppResult<Option<Permission>>;

    /// Whether any role held by the membership carries the permission.
    async fn role_grants_permission(
        &self,
        business_user_id: BusinessUserId,
        permission_id: PermissionId,
    ) -> AppResult<bool>;

    /// Whether the permission is granted to the membership directly.
    async fn has_direct_permission(
        &self,
        business_user_id: BusinessUserId,
        permission_id: PermissionId,
    ) -> AppResult<bool>;

    /// Map memberships to their actors. Unknown ids are skipped.
    async fn find_members(&self, ids: &[BusinessUserId]) -> AppResult<Vec<BusinessMember>>;
}

/// Persistence for notification types, notifications and deliveries.
#[async_trait]
pub trait NotificationStore: Send + Sync + 'static {
    /// Find a notification type by id.
    async fn find_notification_type(
        &self,
        id: NotificationTypeId,
    ) -> AppResult<Option<NotificationType>>;

    /// Memberships subscribed to the type directly, optionally limited to one business.
    async fn find_direct_subscribers(
        &self,
        type_id: NotificationTypeId,
        business_id: Option<BusinessId>,
    ) -> AppResult<Vec<BusinessUserId>>;

    /// Memberships holding a role subscribed to the type, optionally limited to one business.
    async fn find_role_subscribers(
        &self,
        type_id: NotificationTypeId,
        business_id: Option<BusinessId>,
    ) -> AppResult<Vec<BusinessUserId>>;

    /// Persist a notification row.
    async fn insert_notification(&self, notification: &Notification) -> AppResult<Notification>;

    /// Delete a notification and, by cascade, its deliveries.
    async fn delete_notification(&self, id: NotificationId) -> AppResult<bool>;

    /// Find a notification by id.
    async fn find_notification(&self, id: NotificationId) -> AppResult<Option<Notification>>;

    /// Insert one unread delivery per recipient. All or nothing.
    async fn insert_deliveries(
        &self,
        notification_id: NotificationId,
        recipients: &[BusinessUserId],
        now: DateTime<Utc>,
    ) -> AppResult<Vec<DeliveryRecord>>;

    /// Find the delivery of a notification to one membership.
    async fn find_delivery(
        &self,
        notification_id: NotificationId,
        business_user_id: BusinessUserId,
    ) -> AppResult<Option<DeliveryRecord>>;

    /// Set the status of a delivery. `read_at` of `None` leaves the column untouched.
    async fn update_delivery_status(
        &self,
        id: DeliveryRecordId,
        status: DeliveryStatus,
        read_at: Option<DateTime<Utc>>,
    ) -> AppResult<DeliveryRecord>;

    /// Mark every unread delivery of a membership as read.
    async fn mark_all_read(
        &self,
        business_user_id: BusinessUserId,
        now: DateTime<Utc>,
    ) -> AppResult<u64>;

    /// Page through a membership's inbox, newest delivery first.
    ///
    /// Without a status filter archived deliveries are left out.
    async fn list_inbox(
        &self,
        business_user_id: BusinessUserId,
        status: Option<DeliveryStatus>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<InboxItem>>;

    /// Count unread deliveries of a membership.
    async fn count_unread(&self, business_user_id: BusinessUserId) -> AppResult<u64>;
}
