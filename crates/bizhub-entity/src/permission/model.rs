//! Permission entity model.

use std::fmt;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use bizhub_core::types::{ModuleId, PermissionId};

/// An atomic capability, unique per `(module_id, action_key)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Permission {
    /// Unique permission identifier.
    pub id: PermissionId,
    /// Owning module.
    pub module_id: ModuleId,
    /// Action key within the module (e.g. `view`, `approve`).
    pub action_key: String,
    /// Optional description.
    pub description: Option<String>,
}

impl Permission {
    /// Build a permission for an action in a module.
    pub fn new(module_id: ModuleId, action_key: impl Into<String>) -> Self {
        Self {
            id: PermissionId::new(),
            module_id,
            action_key: action_key.into(),
            description: None,
        }
    }
}

/// A `(module_key, action_key)` pair as callers name permissions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PermissionKey {
    /// Module key.
    pub module_key: String,
    /// Action key.
    pub action_key: String,
}

impl PermissionKey {
    /// Create a permission key.
    pub fn new(module_key: impl Into<String>, action_key: impl Into<String>) -> Self {
        Self {
            module_key: module_key.into(),
            action_key: action_key.into(),
        }
    }
}

impl fmt::Display for PermissionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.module_key, self.action_key)
    }
}
