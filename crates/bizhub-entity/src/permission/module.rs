//! Permission module entity.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use bizhub_core::types::ModuleId;

/// A logical grouping of permissions, addressed by a stable key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Module {
    /// Unique module identifier.
    pub id: ModuleId,
    /// Stable key used by route-to-permission mapping (e.g. `settings`).
    pub key: String,
    /// Display name.
    pub name: String,
}

impl Module {
    /// Build a module whose name equals its key.
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            id: ModuleId::new(),
            name: key.clone(),
            key,
        }
    }
}
