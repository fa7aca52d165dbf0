//! In-memory implementation of both store traits.
//!
//! Holds every table behind one Tokio `RwLock`. Seeding methods enforce the
//! same uniqueness and reference rules as the PostgreSQL schema so engine
//! behavior matches across backends.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::debug;

use bizhub_core::error::AppError;
use bizhub_core::result::AppResult;
use bizhub_core::types::{
    ActorId, BusinessId, BusinessUserId, DeliveryRecordId, ModuleId, NotificationId,
    NotificationTypeId, PageRequest, PageResponse, PermissionId, RoleId,
};
use bizhub_entity::actor::Actor;
use bizhub_entity::business::{Business, BusinessMember, BusinessUser};
use bizhub_entity::notification::{
    DeliveryRecord, DeliveryStatus, InboxItem, Notification, NotificationType,
};
use bizhub_entity::permission::{Module, Permission};
use bizhub_entity::role::Role;

use crate::store::{NotificationStore, TenancyStore};

#[derive(Debug, Default)]
struct Tables {
    actors: HashMap<ActorId, Actor>,
    businesses: HashMap<BusinessId, Business>,
    business_users: HashMap<BusinessUserId, BusinessUser>,
    roles: HashMap<RoleId, Role>,
    modules: HashMap<ModuleId, Module>,
    permissions: HashMap<PermissionId, Permission>,
    role_permissions: HashSet<(RoleId, PermissionId)>,
    business_user_roles: HashSet<(BusinessUserId, RoleId)>,
    business_user_permissions: HashSet<(BusinessUserId, PermissionId)>,
    notification_types: HashMap<NotificationTypeId, NotificationType>,
    type_business_users: HashSet<(NotificationTypeId, BusinessUserId)>,
    type_roles: HashSet<(NotificationTypeId, RoleId)>,
    notifications: HashMap<NotificationId, Notification>,
    deliveries: HashMap<DeliveryRecordId, DeliveryRecord>,
}

impl Tables {
    fn business_user_in(&self, id: &BusinessUserId, business_id: Option<BusinessId>) -> bool {
        self.business_users
            .get(id)
            .is_some_and(|bu| business_id.is_none_or(|b| bu.business_id == b))
    }

    /// A role applies to a membership when it is global or scoped to the same business.
    fn role_applies(&self, business_user_id: &BusinessUserId, role_id: &RoleId) -> bool {
        match (self.business_users.get(business_user_id), self.roles.get(role_id)) {
            (Some(bu), Some(role)) => role.business_id.is_none_or(|b| b == bu.business_id),
            _ => false,
        }
    }

    fn inbox_item(&self, delivery: &DeliveryRecord) -> Option<InboxItem> {
        let notification = self.notifications.get(&delivery.notification_id)?;
        let kind = notification
            .type_id
            .and_then(|id| self.notification_types.get(&id));
        Some(InboxItem {
            delivery_id: delivery.id,
            notification_id: notification.id,
            business_user_id: delivery.business_user_id,
            status: delivery.status,
            delivered_at: delivery.delivered_at,
            read_at: delivery.read_at,
            type_code: kind.map(|t| t.code.clone()),
            severity: kind.map(|t| t.severity),
            business_id: notification.business_id,
            title: notification.title.clone(),
            body: notification.body.clone(),
            payload: notification.payload.clone(),
            created_by: notification.created_by,
            created_at: notification.created_at,
        })
    }
}

/// Store keeping all tenancy and notification data in process memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an actor.
    pub async fn insert_actor(&self, actor: Actor) -> AppResult<()> {
        let mut t = self.tables.write().await;
        if t.actors.values().any(|a| a.email == actor.email) {
            return Err(AppError::conflict(format!("Actor '{}' already exists", actor.email)));
        }
        t.actors.insert(actor.id, actor);
        Ok(())
    }

    /// Insert a business.
    pub async fn insert_business(&self, business: Business) -> AppResult<()> {
        self.tables
            .write()
            .await
            .businesses
            .insert(business.id, business);
        Ok(())
    }

    /// Insert a membership. Selecting it clears the actor's other selections.
    pub async fn insert_business_user(&self, member: BusinessUser) -> AppResult<()> {
        let mut t = self.tables.write().await;
        if !t.actors.contains_key(&member.actor_id) {
            return Err(AppError::validation(format!("Unknown actor {}", member.actor_id)));
        }
        if !t.businesses.contains_key(&member.business_id) {
            return Err(AppError::validation(format!(
                "Unknown business {}",
                member.business_id
            )));
        }
        if t
            .business_users
            .values()
            .any(|bu| bu.actor_id == member.actor_id && bu.business_id == member.business_id)
        {
            return Err(AppError::conflict(format!(
                "Actor {} is already a member of business {}",
                member.actor_id, member.business_id
            )));
        }
        if member.selected {
            for bu in t.business_users.values_mut() {
                if bu.actor_id == member.actor_id {
                    bu.selected = false;
                }
            }
        }
        t.business_users.insert(member.id, member);
        Ok(())
    }

    /// Flag one membership as the actor's selected business.
    pub async fn select_business(
        &self,
        actor_id: ActorId,
        business_id: BusinessId,
    ) -> AppResult<()> {
        let mut t = self.tables.write().await;
        let mut found = false;
        for bu in t.business_users.values_mut().filter(|bu| bu.actor_id == actor_id) {
            bu.selected = bu.business_id == business_id;
            found |= bu.selected;
        }
        if found {
            Ok(())
        } else {
            Err(AppError::not_found(format!(
                "Actor {actor_id} has no membership in business {business_id}"
            )))
        }
    }

    /// Insert a role.
    pub async fn insert_role(&self, role: Role) -> AppResult<()> {
        self.tables.write().await.roles.insert(role.id, role);
        Ok(())
    }

    /// Insert a module. Keys are unique.
    pub async fn insert_module(&self, module: Module) -> AppResult<()> {
        let mut t = self.tables.write().await;
        if t.modules.values().any(|m| m.key == module.key) {
            return Err(AppError::conflict(format!("Module '{}' already exists", module.key)));
        }
        t.modules.insert(module.id, module);
        Ok(())
    }

    /// Insert a permission. Unique per module and action key.
    pub async fn insert_permission(&self, permission: Permission) -> AppResult<()> {
        let mut t = self.tables.write().await;
        if !t.modules.contains_key(&permission.module_id) {
            return Err(AppError::validation(format!(
                "Unknown module {}",
                permission.module_id
            )));
        }
        if t.permissions.values().any(|p| {
            p.module_id == permission.module_id && p.action_key == permission.action_key
        }) {
            return Err(AppError::conflict(format!(
                "Permission '{}' already exists for module {}",
                permission.action_key, permission.module_id
            )));
        }
        t.permissions.insert(permission.id, permission);
        Ok(())
    }

    /// Attach a permission to a role.
    pub async fn grant_role_permission(
        &self,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> AppResult<()> {
        let mut t = self.tables.write().await;
        if !t.roles.contains_key(&role_id) || !t.permissions.contains_key(&permission_id) {
            return Err(AppError::validation("Unknown role or permission"));
        }
        t.role_permissions.insert((role_id, permission_id));
        Ok(())
    }

    /// Give a role to a membership.
    ///
    /// A business-scoped role can only go to members of that business.
    pub async fn assign_role(
        &self,
        business_user_id: BusinessUserId,
        role_id: RoleId,
    ) -> AppResult<()> {
        let mut t = self.tables.write().await;
        if !t.business_users.contains_key(&business_user_id) || !t.roles.contains_key(&role_id) {
            return Err(AppError::validation("Unknown business user or role"));
        }
        if !t.role_applies(&business_user_id, &role_id) {
            return Err(AppError::validation(format!(
                "Role {role_id} belongs to another business than {business_user_id}"
            )));
        }
        t.business_user_roles.insert((business_user_id, role_id));
        Ok(())
    }

    /// Grant a permission to a membership directly.
    pub async fn grant_direct_permission(
        &self,
        business_user_id: BusinessUserId,
        permission_id: PermissionId,
    ) -> AppResult<()> {
        let mut t = self.tables.write().await;
        if !t.business_users.contains_key(&business_user_id)
            || !t.permissions.contains_key(&permission_id)
        {
            return Err(AppError::validation("Unknown business user or permission"));
        }
        t.business_user_permissions
            .insert((business_user_id, permission_id));
        Ok(())
    }

    /// Insert a notification type. Codes are unique.
    pub async fn insert_notification_type(&self, kind: NotificationType) -> AppResult<()> {
        let mut t = self.tables.write().await;
        if t.notification_types.values().any(|k| k.code == kind.code) {
            return Err(AppError::conflict(format!(
                "Notification type '{}' already exists",
                kind.code
            )));
        }
        t.notification_types.insert(kind.id, kind);
        Ok(())
    }

    /// Subscribe a membership to a notification type.
    pub async fn subscribe_business_user(
        &self,
        type_id: NotificationTypeId,
        business_user_id: BusinessUserId,
    ) -> AppResult<()> {
        let mut t = self.tables.write().await;
        if !t.notification_types.contains_key(&type_id)
            || !t.business_users.contains_key(&business_user_id)
        {
            return Err(AppError::validation("Unknown notification type or business user"));
        }
        t.type_business_users.insert((type_id, business_user_id));
        Ok(())
    }

    /// Subscribe a role to a notification type.
    pub async fn subscribe_role(
        &self,
        type_id: NotificationTypeId,
        role_id: RoleId,
    ) -> AppResult<()> {
        let mut t = self.tables.write().await;
        if !t.notification_types.contains_key(&type_id) || !t.roles.contains_key(&role_id) {
            return Err(AppError::validation("Unknown notification type or role"));
        }
        t.type_roles.insert((type_id, role_id));
        Ok(())
    }

    /// Number of stored notifications.
    pub async fn notification_count(&self) -> usize {
        self.tables.read().await.notifications.len()
    }

    /// Number of stored deliveries.
    pub async fn delivery_count(&self) -> usize {
        self.tables.read().await.deliveries.len()
    }

    /// Deliveries of one notification.
    pub async fn deliveries_for(&self, notification_id: NotificationId) -> Vec<DeliveryRecord> {
        self.tables
            .read()
            .await
            .deliveries
            .values()
            .filter(|d| d.notification_id == notification_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl TenancyStore for MemoryStore {
    async fn find_actor(&self, id: ActorId) -> AppResult<Option<Actor>> {
        Ok(self.tables.read().await.actors.get(&id).cloned())
    }

    async fn find_business_user(&self, id: BusinessUserId) -> AppResult<Option<BusinessUser>> {
        Ok(self.tables.read().await.business_users.get(&id).cloned())
    }

    async fn find_membership(
        &self,
        actor_id: ActorId,
        business_id: BusinessId,
    ) -> AppResult<Option<BusinessUser>> {
        let t = self.tables.read().await;
        Ok(t.business_users
            .values()
            .find(|bu| bu.actor_id == actor_id && bu.business_id == business_id)
            .cloned())
    }

    async fn find_selected_membership(
        &self,
        actor_id: ActorId,
    ) -> AppResult<Option<BusinessUser>> {
        let t = self.tables.read().await;
        Ok(t.business_users
            .values()
            .find(|bu| bu.actor_id == actor_id && bu.selected)
            .cloned())
    }

    async fn find_roles(&self, business_user_id: BusinessUserId) -> AppResult<Vec<Role>> {
        let t = self.tables.read().await;
        let mut roles: Vec<Role> = t
            .business_user_roles
            .iter()
            .filter(|(bu, role_id)| *bu == business_user_id && t.role_applies(bu, role_id))
            .filter_map(|(_, role_id)| t.roles.get(role_id).cloned())
            .collect();
        roles.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(roles)
    }

    async fn find_module_by_key(&self, key: &str) -> AppResult<Option<Module>> {
        let t = self.tables.read().await;
        Ok(t.modules.values().find(|m| m.key == key).cloned())
    }

    async fn find_permission(
        &self,
        module_id: ModuleId,
        action_key: &str,
    ) -> AppResult<Option<Permission>> {
        let t = self.tables.read().await;
        Ok(t.permissions
            .values()
            .find(|p| p.module_id == module_id && p.action_key == action_key)
            .cloned())
    }

    async fn role_grants_permission(
        &self,
        business_user_id: BusinessUserId,
        permission_id: PermissionId,
    ) -> AppResult<bool> {
        let t = self.tables.read().await;
        Ok(t.business_user_roles
            .iter()
            .filter(|(bu, role_id)| *bu == business_user_id && t.role_applies(bu, role_id))
            .any(|(_, role_id)| {
                t.role_permissions.contains(&(*role_id, permission_id))
            }))
    }

    async fn has_direct_permission(
        &self,
        business_user_id: BusinessUserId,
        permission_id: PermissionId,
    ) -> AppResult<bool> {
        let t = self.tables.read().await;
        Ok(t.business_user_permissions
            .contains(&(business_user_id, permission_id)))
    }

    async fn find_members(&self, ids: &[BusinessUserId]) -> AppResult<Vec<BusinessMember>> {
        let t = self.tables.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| t.business_users.get(id))
            .map(|bu| BusinessMember {
                business_user_id: bu.id,
                actor_id: bu.actor_id,
            })
            .collect())
    }
}

#[async_trait]
impl NotificationStore for MemoryStore {
    async fn find_notification_type(
        &self,
        id: NotificationTypeId,
    ) -> AppResult<Option<NotificationType>> {
        Ok(self.tables.read().await.notification_types.get(&id).cloned())
    }

    async fn find_direct_subscribers(
        &self,
        type_id: NotificationTypeId,
        business_id: Option<BusinessId>,
    ) -> AppResult<Vec<BusinessUserId>> {
        let t = self.tables.read().await;
        Ok(t.type_business_users
            .iter()
            .filter(|(ty, bu)| *ty == type_id && t.business_user_in(bu, business_id))
            .map(|(_, bu)| *bu)
            .collect())
    }

    async fn find_role_subscribers(
        &self,
        type_id: NotificationTypeId,
        business_id: Option<BusinessId>,
    ) -> AppResult<Vec<BusinessUserId>> {
        let t = self.tables.read().await;
        let roles: HashSet<RoleId> = t
            .type_roles
            .iter()
            .filter(|(ty, _)| *ty == type_id)
            .map(|(_, role)| *role)
            .collect();
        let members: HashSet<BusinessUserId> = t
            .business_user_roles
            .iter()
            .filter(|(bu, role)| {
                roles.contains(role)
                    && t.role_applies(bu, role)
                    && t.business_user_in(bu, business_id)
            })
            .map(|(bu, _)| *bu)
            .collect();
        Ok(members.into_iter().collect())
    }

    async fn insert_notification(&self, notification: &Notification) -> AppResult<Notification> {
        let mut t = self.tables.write().await;
        if let Some(type_id) = notification.type_id {
            if !t.notification_types.contains_key(&type_id) {
                return Err(AppError::validation(format!("Unknown notification type {type_id}")));
            }
        }
        if t.notifications.contains_key(&notification.id) {
            return Err(AppError::conflict(format!(
                "Notification {} already exists",
                notification.id
            )));
        }
        t.notifications
            .insert(notification.id, notification.clone());
        Ok(notification.clone())
    }

    async fn delete_notification(&self, id: NotificationId) -> AppResult<bool> {
        let mut t = self.tables.write().await;
        let removed = t.notifications.remove(&id).is_some();
        if removed {
            t.deliveries.retain(|_, d| d.notification_id != id);
        }
        Ok(removed)
    }

    async fn find_notification(&self, id: NotificationId) -> AppResult<Option<Notification>> {
        Ok(self.tables.read().await.notifications.get(&id).cloned())
    }

    async fn insert_deliveries(
        &self,
        notification_id: NotificationId,
        recipients: &[BusinessUserId],
        now: DateTime<Utc>,
    ) -> AppResult<Vec<DeliveryRecord>> {
        let mut t = self.tables.write().await;
        if !t.notifications.contains_key(&notification_id) {
            return Err(AppError::validation(format!(
                "Unknown notification {notification_id}"
            )));
        }

        // Validate the whole batch before touching the table.
        let mut seen = HashSet::with_capacity(recipients.len());
        for bu in recipients {
            if !t.business_users.contains_key(bu) {
                return Err(AppError::validation(format!("Unknown business user {bu}")));
            }
            let duplicate = !seen.insert(*bu)
                || t.deliveries
                    .values()
                    .any(|d| d.notification_id == notification_id && d.business_user_id == *bu);
            if duplicate {
                return Err(AppError::conflict(format!(
                    "Notification {notification_id} already delivered to {bu}"
                )));
            }
        }

        let records: Vec<DeliveryRecord> = recipients
            .iter()
            .map(|bu| DeliveryRecord::unread(notification_id, *bu, now))
            .collect();
        for record in &records {
            t.deliveries.insert(record.id, record.clone());
        }
        debug!(notification_id = %notification_id, count = records.len(), "Deliveries stored");
        Ok(records)
    }

    async fn find_delivery(
        &self,
        notification_id: NotificationId,
        business_user_id: BusinessUserId,
    ) -> AppResult<Option<DeliveryRecord>> {
        let t = self.tables.read().await;
        Ok(t.deliveries
            .values()
            .find(|d| {
                d.notification_id == notification_id && d.business_user_id == business_user_id
            })
            .cloned())
    }

    async fn update_delivery_status(
        &self,
        id: DeliveryRecordId,
        status: DeliveryStatus,
        read_at: Option<DateTime<Utc>>,
    ) -> AppResult<DeliveryRecord> {
        let mut t = self.tables.write().await;
        let record = t
            .deliveries
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("Delivery {id} not found")))?;
        record.status = status;
        if read_at.is_some() {
            record.read_at = read_at;
        }
        Ok(record.clone())
    }

    async fn mark_all_read(
        &self,
        business_user_id: BusinessUserId,
        now: DateTime<Utc>,
    ) -> AppResult<u64> {
        let mut t = self.tables.write().await;
        let mut changed = 0;
        for d in t
            .deliveries
            .values_mut()
            .filter(|d| d.business_user_id == business_user_id && d.is_unread())
        {
            d.status = DeliveryStatus::Read;
            d.read_at = Some(now);
            changed += 1;
        }
        Ok(changed)
    }

    async fn list_inbox(
        &self,
        business_user_id: BusinessUserId,
        status: Option<DeliveryStatus>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<InboxItem>> {
        let t = self.tables.read().await;
        let mut matching: Vec<&DeliveryRecord> = t
            .deliveries
            .values()
            .filter(|d| d.business_user_id == business_user_id)
            .filter(|d| match status {
                Some(s) => d.status == s,
                None => d.status != DeliveryStatus::Archived,
            })
            .collect();
        matching.sort_by(|a, b| b.delivered_at.cmp(&a.delivered_at).then(a.id.cmp(&b.id)));

        let total = matching.len() as u64;
        let items = matching
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .filter_map(|d| t.inbox_item(d))
            .collect();
        Ok(PageResponse::new(items, page.page, page.page_size, total))
    }

    async fn count_unread(&self, business_user_id: BusinessUserId) -> AppResult<u64> {
        let t = self.tables.read().await;
        Ok(t.deliveries
            .values()
            .filter(|d| d.business_user_id == business_user_id && d.is_unread())
            .count() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bizhub_entity::notification::NewNotification;

    async fn member(store: &MemoryStore, business: &Business, email: &str) -> BusinessUser {
        let actor = Actor::new(email);
        let bu = BusinessUser::new(actor.id, business.id);
        store.insert_actor(actor).await.unwrap();
        store.insert_business_user(bu.clone()).await.unwrap();
        bu
    }

    async fn notification(store: &MemoryStore, created_by: ActorId) -> Notification {
        let row = NewNotification {
            type_id: None,
            business_id: None,
            title: "Budget created".to_string(),
            body: None,
            payload: None,
            created_by,
        }
        .into_notification(Utc::now());
        store.insert_notification(&row).await.unwrap()
    }

    #[tokio::test]
    async fn test_duplicate_membership_is_rejected() {
        let store = MemoryStore::new();
        let business = Business::new("Acme");
        store.insert_business(business.clone()).await.unwrap();
        let bu = member(&store, &business, "a@acme.test").await;

        let err = store
            .insert_business_user(BusinessUser::new(bu.actor_id, business.id))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "CONFLICT");
    }

    #[tokio::test]
    async fn test_selecting_business_is_exclusive() {
        let store = MemoryStore::new();
        let first = Business::new("First");
        let second = Business::new("Second");
        store.insert_business(first.clone()).await.unwrap();
        store.insert_business(second.clone()).await.unwrap();
        let bu = member(&store, &first, "a@acme.test").await;
        store
            .insert_business_user(BusinessUser::new(bu.actor_id, second.id))
            .await
            .unwrap();

        store.select_business(bu.actor_id, first.id).await.unwrap();
        store.select_business(bu.actor_id, second.id).await.unwrap();

        let selected = store.find_selected_membership(bu.actor_id).await.unwrap().unwrap();
        assert_eq!(selected.business_id, second.id);
        assert!(store.select_business(bu.actor_id, BusinessId::new()).await.is_err());
    }

    #[tokio::test]
    async fn test_insert_deliveries_is_all_or_nothing() {
        let store = MemoryStore::new();
        let business = Business::new("Acme");
        store.insert_business(business.clone()).await.unwrap();
        let bu = member(&store, &business, "a@acme.test").await;
        let n = notification(&store, bu.actor_id).await;

        let result = store
            .insert_deliveries(n.id, &[bu.id, BusinessUserId::new()], Utc::now())
            .await;
        assert!(result.is_err());
        assert_eq!(store.delivery_count().await, 0);

        let records = store.insert_deliveries(n.id, &[bu.id], Utc::now()).await.unwrap();
        assert_eq!(records.len(), 1);
        assert!(store.insert_deliveries(n.id, &[bu.id], Utc::now()).await.is_err());
        assert_eq!(store.delivery_count().await, 1);
    }

    #[tokio::test]
    async fn test_delete_notification_cascades() {
        let store = MemoryStore::new();
        let business = Business::new("Acme");
        store.insert_business(business.clone()).await.unwrap();
        let bu = member(&store, &business, "a@acme.test").await;
        let n = notification(&store, bu.actor_id).await;
        store.insert_deliveries(n.id, &[bu.id], Utc::now()).await.unwrap();

        assert!(store.delete_notification(n.id).await.unwrap());
        assert_eq!(store.notification_count().await, 0);
        assert_eq!(store.delivery_count().await, 0);
        assert!(!store.delete_notification(n.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_inbox_hides_archived_and_counts_unread() {
        let store = MemoryStore::new();
        let business = Business::new("Acme");
        store.insert_business(business.clone()).await.unwrap();
        let bu = member(&store, &business, "a@acme.test").await;

        let kept = notification(&store, bu.actor_id).await;
        let archived = notification(&store, bu.actor_id).await;
        store.insert_deliveries(kept.id, &[bu.id], Utc::now()).await.unwrap();
        let records = store
            .insert_deliveries(archived.id, &[bu.id], Utc::now())
            .await
            .unwrap();
        store
            .update_delivery_status(records[0].id, DeliveryStatus::Archived, None)
            .await
            .unwrap();

        let page = store
            .list_inbox(bu.id, None, &PageRequest::default())
            .await
            .unwrap();
        assert_eq!(page.total_items, 1);
        assert_eq!(page.items[0].notification_id, kept.id);

        let archived_page = store
            .list_inbox(bu.id, Some(DeliveryStatus::Archived), &PageRequest::default())
            .await
            .unwrap();
        assert_eq!(archived_page.items[0].notification_id, archived.id);
        assert_eq!(store.count_unread(bu.id).await.unwrap(), 1);

        assert_eq!(store.mark_all_read(bu.id, Utc::now()).await.unwrap(), 1);
        assert_eq!(store.count_unread(bu.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_subscribers_are_scoped_to_business() {
        let store = MemoryStore::new();
        let acme = Business::new("Acme");
        let globex = Business::new("Globex");
        store.insert_business(acme.clone()).await.unwrap();
        store.insert_business(globex.clone()).await.unwrap();
        let a = member(&store, &acme, "a@acme.test").await;
        let g = member(&store, &globex, "g@globex.test").await;

        let kind = NotificationType::new("budget_created");
        store.insert_notification_type(kind.clone()).await.unwrap();
        store.subscribe_business_user(kind.id, a.id).await.unwrap();
        store.subscribe_business_user(kind.id, g.id).await.unwrap();

        let scoped = store
            .find_direct_subscribers(kind.id, Some(acme.id))
            .await
            .unwrap();
        assert_eq!(scoped, vec![a.id]);
        let all = store.find_direct_subscribers(kind.id, None).await.unwrap();
        assert_eq!(all.len(), 2);
    }
}
