//! Permission evaluation configuration.

use serde::{Deserialize, Serialize};

/// Settings for the permission evaluator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorizationConfig {
    /// Whether a check without an explicit business falls back to the
    /// actor's `selected` membership. When disabled, callers must always
    /// supply the business context.
    #[serde(default = "default_true")]
    pub selected_business_fallback: bool,
}

impl Default for AuthorizationConfig {
    fn default() -> Self {
        Self {
            selected_business_fallback: true,
        }
    }
}

fn default_true() -> bool {
    true
}
