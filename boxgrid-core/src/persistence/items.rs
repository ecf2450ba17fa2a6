//! Item lists stored as one JSON file per container
//!
//! Container names are free text, so file stems are the hex encoding of the
//! UTF-8 name: `items/42696e2041.json` holds the items of `Bin A`.

use std::path::{Path, PathBuf};

use crate::error::{PersistenceError, PersistenceResult};
use crate::models::Item;

use super::ItemStore;

/// Sub-directory of the data directory that holds item lists
pub const ITEMS_DIR: &str = "items";

/// Item store backed by `items/<hex name>.json`.
#[derive(Debug, Clone)]
pub struct FileItemStore {
    dir: PathBuf,
}

impl FileItemStore {
    /// Creates a store rooted at `data_dir/items`.
    #[must_use]
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            dir: data_dir.as_ref().join(ITEMS_DIR),
        }
    }

    /// Directory holding the item files.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File holding the items of `name`.
    #[must_use]
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.json", hex::encode(name.as_bytes())))
    }

    /// Container names that have a stored item list.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory exists but cannot be listed.
    pub fn stored_names(&self) -> PersistenceResult<Vec<String>> {
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(PersistenceError::Io {
                    path: self.dir.clone(),
                    source,
                });
            }
        };
        let mut names: Vec<String> = entries
            .filter_map(Result::ok)
            .filter_map(|entry| {
                let path = entry.path();
                if path.extension().is_none_or(|ext| ext != "json") {
                    return None;
                }
                let stem = path.file_stem()?.to_str()?;
                let bytes = hex::decode(stem).ok()?;
                String::from_utf8(bytes).ok()
            })
            .collect();
        names.sort();
        Ok(names)
    }

    fn io_error(path: &Path, source: std::io::Error) -> PersistenceError {
        PersistenceError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl ItemStore for FileItemStore {
    fn load_items(&self, name: &str) -> PersistenceResult<Vec<Item>> {
        let path = self.path_for(name);
        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => return Err(Self::io_error(&path, source)),
        };
        serde_json::from_str(&text).map_err(|e| {
            PersistenceError::Deserialization(format!("items of '{name}': {e}"))
        })
    }

    fn save_items(&mut self, name: &str, items: &[Item]) -> PersistenceResult<()> {
        std::fs::create_dir_all(&self.dir).map_err(|e| Self::io_error(&self.dir, e))?;
        let json = serde_json::to_string_pretty(items)
            .map_err(|e| PersistenceError::Serialization(e.to_string()))?;
        let path = self.path_for(name);
        std::fs::write(&path, json).map_err(|e| Self::io_error(&path, e))?;
        tracing::debug!(container = name, count = items.len(), "Items saved");
        Ok(())
    }

    fn delete_items(&mut self, name: &str) -> PersistenceResult<()> {
        let path = self.path_for(name);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(Self::io_error(&path, source)),
        }
    }

    fn rename_items(&mut self, old: &str, new: &str) -> PersistenceResult<()> {
        if old == new {
            return Ok(());
        }
        let from = self.path_for(old);
        if !from.exists() {
            return Ok(());
        }
        let to = self.path_for(new);
        std::fs::rename(&from, &to).map_err(|e| Self::io_error(&from, e))
    }
}
