//! In-memory storage implementation.

use super::{ItemStore, StorageError, StorageResult};
use crate::items::{ItemId, ItemProps};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

#[derive(Debug, Default)]
struct Records {
    items: HashMap<ItemId, ItemProps>,
    /// First-write order.
    order: Vec<ItemId>,
    writes: usize,
}

/// In-memory storage for testing and ephemeral use.
///
/// Clones share the same records, so a host can keep a handle to a store it has
/// handed to the board.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Arc<RwLock<Records>>,
}

impl MemoryStore {
    /// Create a new empty memory store.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: ItemId) -> Option<ItemProps> {
        self.records
            .read()
            .ok()
            .and_then(|records| records.items.get(&id).cloned())
    }

    pub fn len(&self) -> usize {
        self.records.read().map(|records| records.items.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of `set_item`/`remove_item` calls served so far.
    pub fn writes(&self) -> usize {
        self.records.read().map(|records| records.writes).unwrap_or(0)
    }
}

impl ItemStore for MemoryStore {
    fn set_item(&mut self, props: &ItemProps) -> StorageResult<()> {
        let mut records = self
            .records
            .write()
            .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
        if records.items.insert(props.id, props.clone()).is_none() {
            records.order.push(props.id);
        }
        records.writes += 1;
        Ok(())
    }

    fn remove_item(&mut self, props: &ItemProps) -> StorageResult<()> {
        let mut records = self
            .records
            .write()
            .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
        if records.items.remove(&props.id).is_some() {
            records.order.retain(|&id| id != props.id);
        }
        records.writes += 1;
        Ok(())
    }

    fn load_all(&self) -> StorageResult<Vec<ItemProps>> {
        let records = self
            .records
            .read()
            .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
        Ok(records
            .order
            .iter()
            .filter_map(|id| records.items.get(id).cloned())
            .collect())
    }
}
