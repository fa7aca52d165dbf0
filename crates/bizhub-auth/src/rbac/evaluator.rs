//! Three-tier permission cascade.
//!
//! Resolution order, short-circuiting on the first match:
//! 1. Global admin flag on the actor.
//! 2. Super user membership (`is_super`, or a role with `grants_super`).
//! 3. The (module, action) permission through a held role or a direct grant.
//!
//! Anything missing along the way fails closed.

use std::sync::Arc;

use tracing::{debug, warn};

use bizhub_core::config::AuthorizationConfig;
use bizhub_core::result::AppResult;
use bizhub_core::types::ActorId;
use bizhub_database::store::TenancyStore;
use bizhub_entity::business::BusinessUser;

use super::decision::{AccessDecision, BusinessContext, DenialReason};

/// Evaluates whether an actor may perform an action on a module.
///
/// Performs no writes and no caching. Membership is re-resolved on every call.
#[derive(Clone)]
pub struct PermissionEvaluator {
    tenancy: Arc<dyn TenancyStore>,
    config: AuthorizationConfig,
}

impl std::fmt::Debug for PermissionEvaluator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PermissionEvaluator")
            .field("config", &self.config)
            .finish()
    }
}

impl PermissionEvaluator {
    /// Create an evaluator over a tenancy store.
    pub fn new(tenancy: Arc<dyn TenancyStore>, config: AuthorizationConfig) -> Self {
        Self { tenancy, config }
    }

    /// Resolve the membership a context refers to.
    ///
    /// `Selected` resolves nothing when the selected-business fallback is off.
    pub async fn resolve_membership(
        &self,
        actor_id: ActorId,
        context: BusinessContext,
    ) -> AppResult<Option<BusinessUser>> {
        match context {
            BusinessContext::Explicit(business_id) => {
                self.tenancy.find_membership(actor_id, business_id).await
            }
            BusinessContext::Selected if self.config.selected_business_fallback => {
                self.tenancy.find_selected_membership(actor_id).await
            }
            BusinessContext::Selected => Ok(None),
        }
    }

    /// Run the cascade and report which tier decided.
    pub async fn evaluate(
        &self,
        actor_id: ActorId,
        module_key: &str,
        action_key: &str,
        context: BusinessContext,
    ) -> AppResult<AccessDecision> {
        let Some(actor) = self.tenancy.find_actor(actor_id).await? else {
            return Ok(AccessDecision::Denied(DenialReason::UnknownActor));
        };
        if actor.is_admin {
            return Ok(AccessDecision::GlobalAdmin);
        }

        let membership = self.resolve_membership(actor_id, context).await?;
        if let Some(bu) = &membership {
            if bu.is_super {
                return Ok(AccessDecision::SuperUser);
            }
            let roles = self.tenancy.find_roles(bu.id).await?;
            if roles.iter().any(|r| r.grants_super) {
                return Ok(AccessDecision::SuperUser);
            }
        }

        let Some(bu) = membership else {
            return Ok(AccessDecision::Denied(DenialReason::NoMembership));
        };
        let Some(module) = self.tenancy.find_module_by_key(module_key).await? else {
            return Ok(AccessDecision::Denied(DenialReason::UnknownModule));
        };
        let Some(permission) = self
            .tenancy
            .find_permission(module.id, action_key)
            .await?
        else {
            return Ok(AccessDecision::Denied(DenialReason::UnknownPermission));
        };

        if self
            .tenancy
            .role_grants_permission(bu.id, permission.id)
            .await?
        {
            return Ok(AccessDecision::RoleGrant);
        }
        if self
            .tenancy
            .has_direct_permission(bu.id, permission.id)
            .await?
        {
            return Ok(AccessDecision::DirectGrant);
        }
        Ok(AccessDecision::Denied(DenialReason::NotGranted))
    }

    /// Boolean form of [`evaluate`](Self::evaluate). Store errors deny.
    pub async fn can_perform(
        &self,
        actor_id: ActorId,
        module_key: &str,
        action_key: &str,
        context: BusinessContext,
    ) -> bool {
        match self.evaluate(actor_id, module_key, action_key, context).await {
            Ok(decision) => {
                debug!(
                    actor_id = %actor_id,
                    module = module_key,
                    action = action_key,
                    context = %context,
                    decision = %decision,
                    "Permission evaluated"
                );
                decision.is_allowed()
            }
            Err(e) => {
                warn!(
                    actor_id = %actor_id,
                    module = module_key,
                    action = action_key,
                    error = %e,
                    "Permission check failed, denying"
                );
                false
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use std::sync::Arc;

    use bizhub_database::MemoryStore;
    use bizhub_entity::actor::Actor;
    use bizhub_entity::business::{Business, BusinessUser};
    use bizhub_entity::permission::{Module, Permission};
    use bizhub_entity::role::Role;

    /// One business with a `settings` module carrying view and update.
    pub struct Tenant {
        pub store: Arc<MemoryStore>,
        pub business: Business,
        pub view: Permission,
        pub update: Permission,
    }

    impl Tenant {
        pub async fn new() -> Self {
            let store = Arc::new(MemoryStore::new());
            let business = Business::new("Acme");
            store.insert_business(business.clone()).await.unwrap();
            let module = Module::new("settings");
            store.insert_module(module.clone()).await.unwrap();
            let view = Permission::new(module.id, "view");
            let update = Permission::new(module.id, "update");
            store.insert_permission(view.clone()).await.unwrap();
            store.insert_permission(update.clone()).await.unwrap();
            Self {
                store,
                business,
                view,
                update,
            }
        }

        pub async fn actor(&self, actor: Actor) -> Actor {
            self.store.insert_actor(actor.clone()).await.unwrap();
            actor
        }

        pub async fn member(&self, email: &str) -> BusinessUser {
            let actor = self.actor(Actor::new(email)).await;
            let bu = BusinessUser::new(actor.id, self.business.id).with_selected(true);
            self.store.insert_business_user(bu.clone()).await.unwrap();
            bu
        }

        pub async fn role(&self, role: Role) -> Role {
            self.store.insert_role(role.clone()).await.unwrap();
            role
        }
    }
}
