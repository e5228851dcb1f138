//! File-based storage implementation for native platforms.

use super::{ItemStore, StorageError, StorageResult};
use crate::items::ItemProps;
use std::fs;
use std::path::PathBuf;

/// File-based storage for native platforms.
///
/// Stores one `<id>.json` file per item in a directory.
#[derive(Debug)]
pub struct FileStore {
    /// Base directory for item records.
    base_path: PathBuf,
}

impl FileStore {
    /// Create a new file store with the given base directory.
    ///
    /// Creates the directory if it doesn't exist.
    pub fn new(base_path: PathBuf) -> StorageResult<Self> {
        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(|e| {
                StorageError::Io(format!("Failed to create storage directory: {}", e))
            })?;
        }
        Ok(Self { base_path })
    }

    /// Create file storage in the default location.
    ///
    /// On Linux: `~/.local/share/sketchboard/items/`
    /// On Windows: `%LOCALAPPDATA%\sketchboard\items\`
    pub fn default_location() -> StorageResult<Self> {
        let base = dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| StorageError::Io("Could not determine home directory".to_string()))?;

        Self::new(base.join("sketchboard").join("items"))
    }

    /// Get the file path for an item ID.
    fn item_path(&self, id: &str) -> PathBuf {
        // Sanitize ID to be safe for filenames
        let safe_id: String = id
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.base_path.join(format!("{}.json", safe_id))
    }

    /// Get the base path.
    pub fn base_path(&self) -> &PathBuf {
        &self.base_path
    }

    fn read(path: &PathBuf) -> StorageResult<ItemProps> {
        let json = fs::read_to_string(path)
            .map_err(|e| StorageError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
        serde_json::from_str(&json).map_err(|e| {
            StorageError::Serialization(format!("Failed to parse {}: {}", path.display(), e))
        })
    }
}

impl ItemStore for FileStore {
    fn set_item(&mut self, props: &ItemProps) -> StorageResult<()> {
        let path = self.item_path(&props.id.to_string());
        let json = serde_json::to_string_pretty(props)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        fs::write(&path, json)
            .map_err(|e| StorageError::Io(format!("Failed to write {}: {}", path.display(), e)))
    }

    fn remove_item(&mut self, props: &ItemProps) -> StorageResult<()> {
        let path = self.item_path(&props.id.to_string());
        if path.exists() {
            fs::remove_file(&path).map_err(|e| {
                StorageError::Io(format!("Failed to delete {}: {}", path.display(), e))
            })?;
        }
        Ok(())
    }

    /// Every readable record, sorted by z-order then id.
    ///
    /// Files that fail to parse are skipped with a warning.
    fn load_all(&self) -> StorageResult<Vec<ItemProps>> {
        if !self.base_path.exists() {
            return Ok(vec![]);
        }
        let entries = fs::read_dir(&self.base_path)
            .map_err(|e| StorageError::Io(format!("Failed to read directory: {}", e)))?;

        let mut items = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            // Only include .json files
            if path.extension().map(|e| e == "json").unwrap_or(false) {
                match Self::read(&path) {
                    Ok(props) => items.push(props),
                    Err(err) => log::warn!("skipping item record: {err}"),
                }
            }
        }
        items.sort_by(|a, b| a.z_order.cmp(&b.z_order).then_with(|| a.id.cmp(&b.id)));
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::{Item, Paint, PropsPatch};
    use kurbo::Point;
    use tempfile::tempdir;

    fn props(x: f64, z_order: i32) -> ItemProps {
        let mut item = Item::ellipse(Point::new(x, 0.0), 5.0, 8.0, Paint::default());
        item.set_props(&PropsPatch {
            z_order: Some(z_order),
            ..Default::default()
        });
        item.get_props()
    }

    #[test]
    fn test_file_store_save_load() {
        let dir = tempdir().unwrap();
        let mut store = FileStore::new(dir.path().to_path_buf()).unwrap();

        let top = props(0.0, 2);
        let bottom = props(10.0, 1);
        store.set_item(&top).unwrap();
        store.set_item(&bottom).unwrap();

        let loaded = store.load_all().unwrap();
        assert_eq!(loaded, vec![bottom, top]);
    }

    #[test]
    fn test_file_store_remove() {
        let dir = tempdir().unwrap();
        let mut store = FileStore::new(dir.path().to_path_buf()).unwrap();

        let item = props(0.0, 0);
        store.set_item(&item).unwrap();
        store.remove_item(&item).unwrap();
        store.remove_item(&item).unwrap();
        assert!(store.load_all().unwrap().is_empty());
    }

    #[test]
    fn test_file_store_skips_corrupt_records() {
        let dir = tempdir().unwrap();
        let mut store = FileStore::new(dir.path().to_path_buf()).unwrap();
        store.set_item(&props(0.0, 0)).unwrap();
        fs::write(dir.path().join("broken.json"), "{ not json").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        assert_eq!(store.load_all().unwrap().len(), 1);
    }

    #[test]
    fn test_file_store_creates_directory() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let store = FileStore::new(nested.clone()).unwrap();
        assert!(nested.exists());
        assert_eq!(store.base_path(), &nested);
    }
}
