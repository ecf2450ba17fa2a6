//! Container name → visual handle map
//!
//! The host UI keys its resize handles and hit regions by [`HandleId`]. The
//! registry is the only place that maps container names to those ids; entries
//! are created and removed together with the containers they belong to.

use std::collections::HashMap;
use std::fmt;

use uuid::Uuid;

use crate::layout::ContainerTree;

/// Identifier of a container's visual handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandleId(pub Uuid);

impl HandleId {
    /// Creates a new random handle ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for HandleId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for HandleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle({})", self.0)
    }
}

/// Explicit name → handle map.
#[derive(Debug, Clone, Default)]
pub struct HandleRegistry {
    handles: HashMap<String, HandleId>,
}

impl HandleRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with one handle per container in `tree`.
    #[must_use]
    pub fn from_tree(tree: &ContainerTree) -> Self {
        let mut registry = Self::new();
        registry.rebuild(tree);
        registry
    }

    /// Drops every handle and registers the containers of `tree`.
    pub fn rebuild(&mut self, tree: &ContainerTree) {
        self.handles.clear();
        for name in tree.names() {
            self.register(&name);
        }
    }

    /// Returns the handle of `name`, creating one if needed.
    pub fn register(&mut self, name: &str) -> HandleId {
        *self.handles.entry(name.to_string()).or_default()
    }

    /// Removes the handle of `name`.
    pub fn unregister(&mut self, name: &str) -> Option<HandleId> {
        self.handles.remove(name)
    }

    /// Moves the handle of `old` to `new`, keeping its id.
    pub fn rename(&mut self, old: &str, new: &str) -> Option<HandleId> {
        let id = self.handles.remove(old)?;
        self.handles.insert(new.to_string(), id);
        Some(id)
    }

    /// The handle of `name`, if registered.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<HandleId> {
        self.handles.get(name).copied()
    }

    /// Reverse lookup.
    #[must_use]
    pub fn name_of(&self, handle: HandleId) -> Option<&str> {
        self.handles
            .iter()
            .find_map(|(name, id)| (*id == handle).then_some(name.as_str()))
    }

    /// Number of registered handles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// True when no handle is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}
