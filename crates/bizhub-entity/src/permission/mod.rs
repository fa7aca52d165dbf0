//! Module, permission, and action key entities.

pub mod action;
pub mod model;
pub mod module;

pub use action::StandardAction;
pub use model::{Permission, PermissionKey};
pub use module::Module;
