//! Role-based permission evaluation for business users.

pub mod decision;
pub mod evaluator;

pub use decision::{AccessDecision, BusinessContext, DenialReason};
pub use evaluator::PermissionEvaluator;
