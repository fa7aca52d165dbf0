//! Derive the permission a route requires from its controller, action and method.
//!
//! Inference is pure and total: every input yields a [`RequiredPermission`].

pub mod naming;
pub mod table;

use std::collections::HashMap;
use std::fmt;

use http::Method;
use serde::Serialize;

use bizhub_entity::permission::{PermissionKey, StandardAction};

pub use naming::snake_case;

/// The permission a route requires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum RequiredPermission {
    /// Public route, no check.
    None,
    /// Check `module_key.action_key`.
    Check {
        /// Module key.
        module_key: String,
        /// Action key.
        action_key: String,
    },
}

impl RequiredPermission {
    /// The permission key to check, if any.
    pub fn key(&self) -> Option<PermissionKey> {
        match self {
            Self::None => None,
            Self::Check {
                module_key,
                action_key,
            } => Some(PermissionKey::new(module_key.clone(), action_key.clone())),
        }
    }
}

impl fmt::Display for RequiredPermission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("none"),
            Self::Check {
                module_key,
                action_key,
            } => write!(f, "{module_key}.{action_key}"),
        }
    }
}

/// Route inference tables.
#[derive(Debug, Clone)]
pub struct RouteInference {
    public_actions: Vec<&'static str>,
    controller_modules: HashMap<String, String>,
    action_keys: HashMap<&'static str, &'static str>,
}

impl Default for RouteInference {
    fn default() -> Self {
        Self {
            public_actions: table::PUBLIC_ACTIONS.to_vec(),
            controller_modules: table::CONTROLLER_MODULES
                .iter()
                .map(|(c, m)| (c.to_string(), m.to_string()))
                .collect(),
            action_keys: table::ACTION_KEYS.iter().copied().collect(),
        }
    }
}

impl RouteInference {
    /// Inference with the built-in tables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Map a controller to a module key, overriding the naming convention.
    pub fn with_controller_module(
        mut self,
        controller: impl Into<String>,
        module_key: impl Into<String>,
    ) -> Self {
        self.controller_modules
            .insert(controller.into(), module_key.into());
        self
    }

    /// Infer the permission required by `controller@action` reached via `method`.
    pub fn infer(&self, controller: &str, action: &str, method: &Method) -> RequiredPermission {
        let action_name = snake_case(action);
        if self.public_actions.contains(&action_name.as_str()) {
            return RequiredPermission::None;
        }

        let module_key = match self.controller_modules.get(controller) {
            Some(module) => module.clone(),
            None => module_key_for(controller),
        };
        let action_key = match self.action_keys.get(action_name.as_str()) {
            Some(key) => (*key).to_string(),
            None => method_action(method).as_str().to_string(),
        };

        RequiredPermission::Check {
            module_key,
            action_key,
        }
    }
}

/// Infer with the built-in tables.
pub fn infer(controller: &str, action: &str, method: &Method) -> RequiredPermission {
    RouteInference::default().infer(controller, action, method)
}

/// `BudgetLineController` → `budget_line`.
fn module_key_for(controller: &str) -> String {
    let name = snake_case(controller);
    match name.strip_suffix("_controller") {
        Some(stripped) if !stripped.is_empty() => stripped.to_string(),
        _ => name,
    }
}

/// Action implied by the HTTP method alone.
fn method_action(method: &Method) -> StandardAction {
    match *method {
        Method::GET | Method::HEAD => StandardAction::View,
        Method::POST => StandardAction::Create,
        Method::PUT | Method::PATCH => StandardAction::Update,
        Method::DELETE => StandardAction::Delete,
        _ => StandardAction::View,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(module: &str, action: &str) -> RequiredPermission {
        RequiredPermission::Check {
            module_key: module.to_string(),
            action_key: action.to_string(),
        }
    }

    #[test]
    fn test_public_actions_need_nothing() {
        let public = [
            "login",
            "logout",
            "refreshToken",
            "forgot_password",
            "resetPassword",
            "verifyResetToken",
            "health",
        ];
        for action in public {
            assert_eq!(
                infer("AuthController", action, &Method::POST),
                RequiredPermission::None,
                "{action}"
            );
        }
    }

    #[test]
    fn test_action_table_wins_over_method() {
        assert_eq!(infer("BudgetController", "index", &Method::GET), check("budget", "view"));
        assert_eq!(infer("BudgetController", "store", &Method::POST), check("budget", "create"));
        assert_eq!(
            infer("BudgetController", "destroy", &Method::DELETE),
            check("budget", "delete")
        );
        assert_eq!(infer("BudgetController", "approve", &Method::POST), check("budget", "approve"));
        assert_eq!(infer("BudgetController", "export", &Method::GET), check("budget", "export"));
        assert_eq!(infer("BudgetController", "show", &Method::POST), check("budget", "view"));
    }

    #[test]
    fn test_method_fallback() {
        let cases = [
            (Method::GET, "view"),
            (Method::HEAD, "view"),
            (Method::POST, "create"),
            (Method::PUT, "update"),
            (Method::PATCH, "update"),
            (Method::DELETE, "delete"),
            (Method::OPTIONS, "view"),
        ];
        for (method, action) in cases {
            assert_eq!(infer("BudgetController", "recalculate", &method), check("budget", action));
        }
    }

    #[test]
    fn test_controller_names() {
        assert_eq!(
            infer("BudgetLineController", "index", &Method::GET),
            check("budget_line", "view")
        );
        assert_eq!(infer("SettingController", "index", &Method::GET), check("settings", "view"));
        assert_eq!(infer("Controller", "index", &Method::GET), check("controller", "view"));

        let custom = RouteInference::new().with_controller_module("LedgerController", "accounting");
        assert_eq!(
            custom.infer("LedgerController", "list", &Method::GET),
            check("accounting", "view")
        );
    }

    #[test]
    fn test_required_permission_key() {
        let required = infer("SettingController", "update", &Method::PUT);
        assert_eq!(required.to_string(), "settings.update");
        assert_eq!(required.key(), Some(PermissionKey::new("settings", "update")));
        assert_eq!(RequiredPermission::None.key(), None);
    }
}
