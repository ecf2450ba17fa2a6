//! Pre-operation sibling snapshot
//!
//! Captured when an interaction starts and used to restore the sibling group
//! when a frame or the whole operation is rolled back.

use crate::error::{LayoutError, LayoutResult};
use crate::layout::ContainerTree;
use crate::models::GridRect;

/// Rectangle of one container at snapshot time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotEntry {
    /// Container name
    pub name: String,
    /// Rectangle at capture time
    pub rect: GridRect,
}

/// Rectangles of a container and all of its siblings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutSnapshot {
    active: String,
    parent: Option<String>,
    entries: Vec<SnapshotEntry>,
}

impl LayoutSnapshot {
    /// Captures `name` together with every child of its parent.
    ///
    /// For the root, only the root itself is captured.
    ///
    /// # Errors
    ///
    /// Returns `ContainerNotFound` if `name` is unknown.
    pub fn capture(tree: &ContainerTree, name: &str) -> LayoutResult<Self> {
        let active = tree
            .find_by_name(name)
            .ok_or_else(|| LayoutError::ContainerNotFound(name.to_string()))?;
        let (parent, entries) = match tree.find_parent_of(name) {
            Some(parent) => (
                Some(parent.name.clone()),
                parent
                    .children
                    .iter()
                    .map(|c| SnapshotEntry {
                        name: c.name.clone(),
                        rect: c.rect(),
                    })
                    .collect(),
            ),
            None => (
                None,
                vec![SnapshotEntry {
                    name: active.name.clone(),
                    rect: active.rect(),
                }],
            ),
        };
        Ok(Self {
            active: name.to_string(),
            parent,
            entries,
        })
    }

    /// The container the snapshot was taken for.
    #[must_use]
    pub fn active(&self) -> &str {
        &self.active
    }

    /// Parent of the active container, `None` for the root.
    #[must_use]
    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    /// Captured rectangles in child order.
    #[must_use]
    pub fn entries(&self) -> &[SnapshotEntry] {
        &self.entries
    }

    /// Captured rectangle of `name`.
    #[must_use]
    pub fn rect_of(&self, name: &str) -> Option<GridRect> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.rect)
    }

    /// Writes every captured rectangle back into the tree.
    ///
    /// Containers that no longer exist are skipped.
    pub fn restore(&self, tree: &mut ContainerTree) {
        for entry in &self.entries {
            if let Some(container) = tree.find_by_name_mut(&entry.name) {
                container.position = entry.rect.position();
                container.size = entry.rect.size();
            }
        }
    }

    /// Returns true if every captured container still has its captured rectangle.
    #[must_use]
    pub fn matches(&self, tree: &ContainerTree) -> bool {
        self.entries.iter().all(|entry| {
            tree.find_by_name(&entry.name)
                .is_some_and(|c| c.rect() == entry.rect)
        })
    }

    /// Names whose current rectangle differs from the captured one.
    #[must_use]
    pub fn changed(&self, tree: &ContainerTree) -> Vec<String> {
        self.entries
            .iter()
            .filter(|entry| {
                tree.find_by_name(&entry.name)
                    .is_some_and(|c| c.rect() != entry.rect)
            })
            .map(|entry| entry.name.clone())
            .collect()
    }
}
