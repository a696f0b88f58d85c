//! Convenience result type alias for HomeHunt.

use crate::error::AppError;

/// A specialized `Result` type for HomeHunt operations.
pub type AppResult<T> = Result<T, AppError>;
