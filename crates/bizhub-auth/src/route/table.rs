//! Fixed inference tables.

/// Actions reachable without any permission, as snake_case names.
pub const PUBLIC_ACTIONS: &[&str] = &[
    "login",
    "logout",
    "refresh",
    "refresh_token",
    "forgot_password",
    "reset_password",
    "verify_reset_token",
    "health",
];

/// Controllers whose module key does not follow the naming convention.
pub const CONTROLLER_MODULES: &[(&str, &str)] = &[
    ("SettingController", "settings"),
    ("BusinessController", "businesses"),
    ("BusinessUserController", "business_users"),
    ("RoleController", "roles"),
    ("PermissionController", "permissions"),
    ("NotificationTypeController", "notification_types"),
    ("NotificationController", "notifications"),
];

/// Action names mapped to action keys. Anything else falls back to the method.
pub const ACTION_KEYS: &[(&str, &str)] = &[
    ("index", "view"),
    ("list", "view"),
    ("show", "view"),
    ("create", "create"),
    ("store", "create"),
    ("edit", "update"),
    ("update", "update"),
    ("destroy", "delete"),
    ("delete", "delete"),
    ("approve", "approve"),
    ("export", "export"),
];
