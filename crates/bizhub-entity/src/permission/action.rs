//! Standard action keys.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The action keys every module understands.
///
/// Modules may define further actions (`approve`, `export`, ...); those are
/// plain strings on [`super::Permission`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StandardAction {
    /// Read access.
    View,
    /// Create new records.
    Create,
    /// Modify existing records.
    Update,
    /// Remove records.
    Delete,
}

impl StandardAction {
    /// Return the action as its lowercase key.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for StandardAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for StandardAction {
    type Err = bizhub_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "view" => Ok(Self::View),
            "create" => Ok(Self::Create),
            "update" => Ok(Self::Update),
            "delete" => Ok(Self::Delete),
            _ => Err(bizhub_core::AppError::validation(format!(
                "Invalid action: '{s}'. Expected one of: view, create, update, delete"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str() {
        assert_eq!("VIEW".parse::<StandardAction>().unwrap(), StandardAction::View);
        assert_eq!("delete".parse::<StandardAction>().unwrap(), StandardAction::Delete);
        assert!("approve".parse::<StandardAction>().is_err());
    }
}
