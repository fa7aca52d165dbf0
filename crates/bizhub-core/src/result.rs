//! Convenience result type alias for Bizhub.

use crate::error::AppError;

/// A specialized `Result` type for Bizhub operations.
pub type AppResult<T> = Result<T, AppError>;
