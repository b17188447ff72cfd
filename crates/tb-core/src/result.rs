//! Result type alias used across the workspace

use crate::error::BoardError;

/// Standard Result type for board operations
pub type BoardResult<T> = Result<T, BoardError>;
