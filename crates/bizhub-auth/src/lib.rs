//! # bizhub-auth
//!
//! Authorization for Bizhub business users.
//!
//! ## Modules
//!
//! - `rbac`: the three-tier permission cascade (global admin, super user, grants)
//! - `guard`: `require_permission` outcome values for request handlers
//! - `route`: controller/action/method to required permission inference

pub mod guard;
pub mod rbac;
pub mod route;

pub use guard::{Denial, GuardOutcome, PermissionGuard};
pub use rbac::{AccessDecision, BusinessContext, DenialReason, PermissionEvaluator};
pub use route::{RequiredPermission, RouteInference, infer};
