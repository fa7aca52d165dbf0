//! Outcome types of the permission cascade.

use std::fmt;

use serde::{Deserialize, Serialize};

use bizhub_core::types::BusinessId;

/// Which membership a check is evaluated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "business_id")]
pub enum BusinessContext {
    /// The caller names the business explicitly.
    Explicit(BusinessId),
    /// Use the actor's `selected` membership.
    Selected,
}

impl From<Option<BusinessId>> for BusinessContext {
    fn from(business_id: Option<BusinessId>) -> Self {
        business_id.map_or(Self::Selected, Self::Explicit)
    }
}

impl fmt::Display for BusinessContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Explicit(id) => write!(f, "business:{id}"),
            Self::Selected => write!(f, "selected"),
        }
    }
}

/// Why a check was denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialReason {
    /// The actor does not exist.
    UnknownActor,
    /// No membership could be resolved for the context.
    NoMembership,
    /// No module has the requested key.
    UnknownModule,
    /// The module has no such action.
    UnknownPermission,
    /// The permission exists but is not granted.
    NotGranted,
}

impl DenialReason {
    /// Short human-readable explanation.
    pub fn describe(&self) -> &'static str {
        match self {
            Self::UnknownActor => "unknown actor",
            Self::NoMembership => "no business membership for this context",
            Self::UnknownModule => "unknown module",
            Self::UnknownPermission => "unknown permission",
            Self::NotGranted => "permission not granted",
        }
    }
}

impl fmt::Display for DenialReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// Result of evaluating one permission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "decision", content = "reason")]
pub enum AccessDecision {
    /// The actor carries the global admin flag.
    GlobalAdmin,
    /// The membership is a super user in its business.
    SuperUser,
    /// A role held by the membership carries the permission.
    RoleGrant,
    /// The permission is granted to the membership directly.
    DirectGrant,
    /// Access denied.
    Denied(DenialReason),
}

impl AccessDecision {
    /// Whether access is granted.
    pub fn is_allowed(&self) -> bool {
        !matches!(self, Self::Denied(_))
    }

    /// The denial reason, if denied.
    pub fn denial_reason(&self) -> Option<DenialReason> {
        match self {
            Self::Denied(reason) => Some(*reason),
            _ => None,
        }
    }
}

impl fmt::Display for AccessDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GlobalAdmin => write!(f, "allowed (global admin)"),
            Self::SuperUser => write!(f, "allowed (super user)"),
            Self::RoleGrant => write!(f, "allowed (role grant)"),
            Self::DirectGrant => write!(f, "allowed (direct grant)"),
            Self::Denied(reason) => write!(f, "denied ({reason})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_from_option() {
        let id = BusinessId::new();
        assert_eq!(BusinessContext::from(Some(id)), BusinessContext::Explicit(id));
        assert_eq!(BusinessContext::from(None), BusinessContext::Selected);
    }

    #[test]
    fn test_decision_allowed() {
        assert!(AccessDecision::RoleGrant.is_allowed());
        let denied = AccessDecision::Denied(DenialReason::UnknownModule);
        assert!(!denied.is_allowed());
        assert_eq!(denied.denial_reason(), Some(DenialReason::UnknownModule));
        assert_eq!(denied.to_string(), "denied (unknown module)");
    }
}
