//! Layout and item persistence
//!
//! Layout edits are written to a *staged* copy first; `commit` promotes the
//! staged copy to the committed one and `revert` discards it. Loading prefers
//! the staged copy, falls back to the committed copy, and finally to a single
//! 1×1 root. A document that fails to parse or violates the layout invariants
//! is logged and skipped, never returned.

mod file;
mod items;
mod memory;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{PersistenceError, PersistenceResult};
use crate::layout::{ContainerTree, LayoutValidator};
use crate::models::{Container, Item};

pub use file::{COMMITTED_FILE, FilePersistence, STAGED_FILE};
pub use items::{FileItemStore, ITEMS_DIR};
pub use memory::{MemoryItemStore, MemoryPersistence};

/// Current layout document format version
pub const LAYOUT_FORMAT_VERSION: u32 = 1;

const fn default_format_version() -> u32 {
    LAYOUT_FORMAT_VERSION
}

/// Staged/committed storage for the container tree.
pub trait PersistenceGateway {
    /// Writes `tree` as the staged copy.
    ///
    /// # Errors
    ///
    /// Returns an error if the tree cannot be serialized or written.
    fn save_staged(&mut self, tree: &ContainerTree) -> PersistenceResult<()>;

    /// Writes `tree` as the committed copy and drops the staged copy.
    ///
    /// # Errors
    ///
    /// Returns an error if the tree cannot be serialized or written.
    fn commit(&mut self, tree: &ContainerTree) -> PersistenceResult<()>;

    /// Drops the staged copy.
    ///
    /// # Errors
    ///
    /// Returns an error if the staged copy exists but cannot be removed.
    fn revert(&mut self) -> PersistenceResult<()>;

    /// Loads the best available tree. Never fails.
    fn load(&self) -> ContainerTree;

    /// Returns true if a staged copy exists.
    fn has_staged(&self) -> bool;
}

/// Per-container item lists keyed by container name.
pub trait ItemStore {
    /// Items of `name`; a missing list is empty.
    ///
    /// # Errors
    ///
    /// Returns an error if a stored list cannot be read or parsed.
    fn load_items(&self, name: &str) -> PersistenceResult<Vec<Item>>;

    /// Replaces the items of `name`.
    ///
    /// # Errors
    ///
    /// Returns an error if the list cannot be written.
    fn save_items(&mut self, name: &str, items: &[Item]) -> PersistenceResult<()>;

    /// Removes the item list of `name`. Removing a missing list succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing list cannot be removed.
    fn delete_items(&mut self, name: &str) -> PersistenceResult<()>;

    /// Moves the item list of `old` to `new`.
    ///
    /// # Errors
    ///
    /// Returns an error if the list cannot be moved.
    fn rename_items(&mut self, old: &str, new: &str) -> PersistenceResult<()>;
}

/// Serialized form of a container tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutDocument {
    /// Document format version for compatibility
    #[serde(default = "default_format_version")]
    pub format_version: u32,
    /// When the document was written
    pub saved_at: DateTime<Utc>,
    /// The root container with its subtree
    pub root: Container,
}

impl LayoutDocument {
    /// Wraps a tree for saving.
    #[must_use]
    pub fn from_tree(tree: &ContainerTree) -> Self {
        Self {
            format_version: LAYOUT_FORMAT_VERSION,
            saved_at: Utc::now(),
            root: tree.root().clone(),
        }
    }

    /// Serializes to pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> PersistenceResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| PersistenceError::Serialization(e.to_string()))
    }

    /// Parses a document and checks it against the layout invariants.
    ///
    /// # Errors
    ///
    /// `Deserialization` for unparsable text, `MalformedPersistedState` for an
    /// unsupported version or a tree that fails validation.
    pub fn decode(text: &str, validator: &LayoutValidator) -> PersistenceResult<ContainerTree> {
        let document: Self =
            serde_json::from_str(text).map_err(|e| PersistenceError::Deserialization(e.to_string()))?;
        if document.format_version > LAYOUT_FORMAT_VERSION {
            return Err(PersistenceError::MalformedPersistedState(format!(
                "unsupported format version {}",
                document.format_version
            )));
        }
        let tree = ContainerTree::new(document.root);
        tree.validate(validator)
            .map_err(|e| PersistenceError::MalformedPersistedState(e.to_string()))?;
        Ok(tree)
    }
}

/// Picks the first usable document, logging the ones that are skipped.
///
/// `sources` yields `(label, text)` pairs in priority order; `None` text means
/// the source does not exist.
pub(crate) fn load_first_valid<'a, I>(sources: I, validator: &LayoutValidator) -> ContainerTree
where
    I: IntoIterator<Item = (&'a str, PersistenceResult<Option<String>>)>,
{
    let _span = crate::trace_operation_debug!(crate::tracing::span_names::LOAD);
    for (label, text) in sources {
        let text = match text {
            Ok(Some(text)) => text,
            Ok(None) => continue,
            Err(error) => {
                tracing::warn!(source = label, %error, "Could not read layout; skipping");
                continue;
            }
        };
        match LayoutDocument::decode(&text, validator) {
            Ok(tree) => {
                tracing::debug!(source = label, containers = tree.container_count(), "Layout loaded");
                return tree;
            }
            Err(error) => {
                tracing::warn!(source = label, %error, "Ignoring unusable layout");
            }
        }
    }
    tracing::info!("No stored layout; starting with a single cell");
    ContainerTree::single_cell()
}
