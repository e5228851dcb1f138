//! Board-level errors.

use crate::storage::StorageError;
use thiserror::Error;

/// Errors from the fallible board entry points (configuration, restore).
///
/// Input handling itself never fails.
#[derive(Debug, Error)]
pub enum BoardError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Result type for board operations.
pub type BoardResult<T> = Result<T, BoardError>;
