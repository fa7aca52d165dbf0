//! Request guard producing permission outcomes as values.
//!
//! A denial does not unwind. The caller inspects the outcome and stops
//! processing when it is handled, or converts it into an [`AppError`] with
//! `?` via [`GuardOutcome::into_result`].

use std::fmt;

use tracing::{info, warn};

use bizhub_core::error::AppError;
use bizhub_core::result::AppResult;
use bizhub_core::types::ActorId;
use bizhub_entity::permission::PermissionKey;

use crate::rbac::{AccessDecision, BusinessContext, DenialReason, PermissionEvaluator};

/// Details of a rejected permission check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Denial {
    /// The rejected actor.
    pub actor_id: ActorId,
    /// The permission that was required.
    pub permission: PermissionKey,
    /// Why the cascade denied. `None` when the check itself failed.
    pub reason: Option<DenialReason>,
}

impl Denial {
    /// Convert into the `INSUFFICIENT_PERMISSIONS` application error.
    pub fn into_error(self) -> AppError {
        AppError::authorization(format!(
            "Insufficient permissions: '{}' is required",
            self.permission
        ))
    }
}

impl fmt::Display for Denial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.reason {
            Some(reason) => write!(f, "{} denied: {reason}", self.permission),
            None => write!(f, "{} denied: check failed", self.permission),
        }
    }
}

impl From<Denial> for AppError {
    fn from(denial: Denial) -> Self {
        denial.into_error()
    }
}

/// Outcome of [`PermissionGuard::require_permission`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "a denied outcome must stop request processing"]
pub enum GuardOutcome {
    /// The check passed.
    Allowed(AccessDecision),
    /// The check failed and the response has been decided.
    Denied(Denial),
}

impl GuardOutcome {
    /// True when the guard has produced the response and the caller must stop.
    pub fn is_handled(&self) -> bool {
        matches!(self, Self::Denied(_))
    }

    /// `Ok(())` when allowed, the authorization error otherwise.
    pub fn into_result(self) -> AppResult<()> {
        match self {
            Self::Allowed(_) => Ok(()),
            Self::Denied(denial) => Err(denial.into_error()),
        }
    }
}

/// Turns permission checks into guard outcomes.
#[derive(Debug, Clone)]
pub struct PermissionGuard {
    evaluator: PermissionEvaluator,
}

impl PermissionGuard {
    /// Wrap an evaluator.
    pub fn new(evaluator: PermissionEvaluator) -> Self {
        Self { evaluator }
    }

    /// The wrapped evaluator.
    pub fn evaluator(&self) -> &PermissionEvaluator {
        &self.evaluator
    }

    /// Check `module_key.action_key` for the actor in the given context.
    pub async fn require_permission(
        &self,
        actor_id: ActorId,
        module_key: &str,
        action_key: &str,
        context: BusinessContext,
    ) -> GuardOutcome {
        let permission = PermissionKey::new(module_key, action_key);
        match self
            .evaluator
            .evaluate(actor_id, module_key, action_key, context)
            .await
        {
            Ok(decision) if decision.is_allowed() => GuardOutcome::Allowed(decision),
            Ok(decision) => {
                info!(
                    actor_id = %actor_id,
                    permission = %permission,
                    context = %context,
                    decision = %decision,
                    "Permission denied"
                );
                GuardOutcome::Denied(Denial {
                    actor_id,
                    permission,
                    reason: decision.denial_reason(),
                })
            }
            Err(e) => {
                warn!(
                    actor_id = %actor_id,
                    permission = %permission,
                    error = %e,
                    "Permission check failed, denying"
                );
                GuardOutcome::Denied(Denial {
                    actor_id,
                    permission,
                    reason: None,
                })
            }
        }
    }
}
