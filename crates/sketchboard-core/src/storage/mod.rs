//! Persistence collaborator.
//!
//! Items are stored as [`ItemProps`] records keyed by item id. The board writes on
//! every committed mutation (pointer-up, key command), never on intermediate drag
//! frames, and reads everything back once with [`ItemStore::load_all`].

mod memory;

#[cfg(not(target_arch = "wasm32"))]
mod file;

pub use memory::MemoryStore;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStore;

use crate::items::ItemProps;
use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Key-value store for item props, keyed by item id.
///
/// Implementations can keep items in memory, on disk, or forward them to a host
/// (IndexedDB, a server). Calls are synchronous and made from the event thread.
pub trait ItemStore {
    /// Insert or overwrite the record for `props.id`.
    fn set_item(&mut self, props: &ItemProps) -> StorageResult<()>;

    /// Delete the record for `props.id`. Deleting a missing record is not an error.
    fn remove_item(&mut self, props: &ItemProps) -> StorageResult<()>;

    /// Every stored record, in paint order where the backend knows it.
    fn load_all(&self) -> StorageResult<Vec<ItemProps>>;
}
