//! PostgreSQL tenancy repository.

use async_trait::async_trait;
use sqlx::PgPool;

use bizhub_core::error::{AppError, ErrorKind};
use bizhub_core::result::AppResult;
use bizhub_core::types::{ActorId, BusinessId, BusinessUserId, ModuleId, PermissionId};
use bizhub_entity::actor::Actor;
use bizhub_entity::business::{BusinessMember, BusinessUser};
use bizhub_entity::permission::{Module, Permission};
use bizhub_entity::role::Role;

use crate::store::TenancyStore;

/// Tenancy lookups backed by PostgreSQL.
#[derive(Debug, Clone)]
pub struct PgTenancyStore {
    pool: PgPool,
}

impl PgTenancyStore {
    /// Create a new tenancy repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TenancyStore for PgTenancyStore {
    async fn find_actor(&self, id: ActorId) -> AppResult<Option<Actor>> {
        sqlx::query_as::<_, Actor>("SELECT * FROM actors WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find actor", e))
    }

    async fn find_business_user(&self, id: BusinessUserId) -> AppResult<Option<BusinessUser>> {
        sqlx::query_as::<_, BusinessUser>("SELECT * FROM business_users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find business user", e)
            })
    }

    async fn find_membership(
        &self,
        actor_id: ActorId,
        business_id: BusinessId,
    ) -> AppResult<Option<BusinessUser>> {
        sqlx::query_as::<_, BusinessUser>(
            "SELECT * FROM business_users WHERE actor_id = $1 AND business_id = $2",
        )
        .bind(actor_id)
        .bind(business_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find membership", e))
    }

    async fn find_selected_membership(
        &self,
        actor_id: ActorId,
    ) -> AppResult<Option<BusinessUser>> {
        sqlx::query_as::<_, BusinessUser>(
            "SELECT * FROM business_users WHERE actor_id = $1 AND selected = TRUE",
        )
        .bind(actor_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find selected membership", e)
        })
    }

    async fn find_roles(&self, business_user_id: BusinessUserId) -> AppResult<Vec<Role>> {
        sqlx::query_as::<_, Role>(
            "SELECT r.* FROM roles r \
             JOIN business_user_roles bur ON bur.role_id = r.id \
             JOIN business_users bu ON bu.id = bur.business_user_id \
             WHERE bur.business_user_id = $1 \
               AND (r.business_id IS NULL OR r.business_id = bu.business_id) \
             ORDER BY r.name",
        )
        .bind(business_user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list roles", e))
    }

    async fn find_module_by_key(&self, key: &str) -> AppResult<Option<Module>> {
        sqlx::query_as::<_, Module>("SELECT * FROM modules WHERE key = $1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find module", e))
    }

    async fn find_permission(
        &self,
        module_id: ModuleId,
        action_key: &str,
    ) -> AppResult<Option<Permission>> {
        sqlx::query_as::<_, Permission>(
            "SELECT * FROM permissions WHERE module_id = $1 AND action_key = $2",
        )
        .bind(module_id)
        .bind(action_key)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find permission", e))
    }

    async fn role_grants_permission(
        &self,
        business_user_id: BusinessUserId,
        permission_id: PermissionId,
    ) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS ( \
                SELECT 1 FROM business_user_roles bur \
                JOIN business_users bu ON bu.id = bur.business_user_id \
                JOIN roles r ON r.id = bur.role_id \
                JOIN role_permissions rp ON rp.role_id = bur.role_id \
                WHERE bur.business_user_id = $1 AND rp.permission_id = $2 \
                  AND (r.business_id IS NULL OR r.business_id = bu.business_id) \
             )",
        )
        .bind(business_user_id)
        .bind(permission_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to check role permission", e)
        })
    }

    async fn has_direct_permission(
        &self,
        business_user_id: BusinessUserId,
        permission_id: PermissionId,
    ) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS ( \
                SELECT 1 FROM business_user_permissions \
                WHERE business_user_id = $1 AND permission_id = $2 \
             )",
        )
        .bind(business_user_id)
        .bind(permission_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to check direct permission", e)
        })
    }

    async fn find_members(&self, ids: &[BusinessUserId]) -> AppResult<Vec<BusinessMember>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        sqlx::query_as::<_, BusinessMember>(
            "SELECT id AS business_user_id, actor_id FROM business_users WHERE id = ANY($1)",
        )
        .bind(BusinessUserId::to_uuids(ids))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to map members", e))
    }
}
