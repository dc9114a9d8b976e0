//! Convenience result type alias for SaaSBoard.

use crate::error::AppError;

/// A specialized `Result` type for SaaSBoard operations.
pub type AppResult<T> = Result<T, AppError>;
