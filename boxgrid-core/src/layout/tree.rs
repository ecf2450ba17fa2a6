//! The owned container tree
//!
//! ```text
//! Root (depth 0)
//! ├── Shelf (depth 1)
//! │   ├── Bin A (depth 2, item leaf)
//! │   └── Bin B (depth 2, item leaf)
//! └── Drawer (depth 1)
//! ```
//!
//! Every container is exclusively owned by its parent. Lookups are by name,
//! which is unique across the whole tree.

use std::collections::HashSet;

use crate::error::{LayoutError, LayoutResult};
use crate::models::{Container, GridPoint};

use super::validator::LayoutValidator;

/// Name of the root container in a freshly created tree.
pub const ROOT_NAME: &str = "Root";

/// Hierarchical container model with name-keyed queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerTree {
    root: Container,
}

impl Default for ContainerTree {
    fn default() -> Self {
        Self::single_cell()
    }
}

impl ContainerTree {
    /// Wraps an existing root container.
    #[must_use]
    pub const fn new(root: Container) -> Self {
        Self { root }
    }

    /// A tree holding only a 1×1 root at the origin.
    #[must_use]
    pub fn single_cell() -> Self {
        Self::new(Container::new(ROOT_NAME))
    }

    /// The root container.
    #[must_use]
    pub const fn root(&self) -> &Container {
        &self.root
    }

    /// Consumes the tree and returns its root.
    #[must_use]
    pub fn into_root(self) -> Container {
        self.root
    }

    /// Finds a container by exact name, depth-first in child order.
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<&Container> {
        find(&self.root, name)
    }

    /// Mutable variant of [`find_by_name`](Self::find_by_name).
    #[must_use]
    pub fn find_by_name_mut(&mut self, name: &str) -> Option<&mut Container> {
        find_mut(&mut self.root, name)
    }

    /// Returns true if a container with this name exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.find_by_name(name).is_some()
    }

    /// The parent of `name`; `None` for the root or an unknown name.
    #[must_use]
    pub fn find_parent_of(&self, name: &str) -> Option<&Container> {
        parent_of(&self.root, name)
    }

    /// Ancestors of `name` from the root down to its parent.
    ///
    /// Returns `None` for an unknown name and an empty list for the root.
    #[must_use]
    pub fn ancestors_of(&self, name: &str) -> Option<Vec<&Container>> {
        let mut path = Vec::new();
        collect_path(&self.root, name, &mut path).then_some(path)
    }

    /// Returns true if `a` lies strictly inside the subtree of `b`.
    ///
    /// Walks `a`'s ancestor chain, so the answer does not depend on how the
    /// tree is shaped below `a`.
    #[must_use]
    pub fn is_descendant_of(&self, a: &str, b: &str) -> bool {
        self.ancestors_of(a)
            .is_some_and(|ancestors| ancestors.iter().any(|c| c.name == b))
    }

    /// Number of containers below `node` (not counting `node`).
    #[must_use]
    pub fn count_descendants(node: &Container) -> usize {
        node.children
            .iter()
            .map(|child| 1 + Self::count_descendants(child))
            .sum()
    }

    /// Total number of containers, root included.
    #[must_use]
    pub fn container_count(&self) -> usize {
        1 + Self::count_descendants(&self.root)
    }

    /// All names in depth-first order.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut names = Vec::with_capacity(self.container_count());
        collect_names(&self.root, &mut names);
        names
    }

    /// Children of `parent`.
    #[must_use]
    pub fn children_of(&self, parent: &str) -> Option<&[Container]> {
        self.find_by_name(parent).map(|c| c.children.as_slice())
    }

    /// Mutable children of `parent`.
    #[must_use]
    pub fn children_of_mut(&mut self, parent: &str) -> Option<&mut Vec<Container>> {
        self.find_by_name_mut(parent).map(|c| &mut c.children)
    }

    /// Removes `name` (with its subtree) from its parent and returns it.
    ///
    /// # Errors
    ///
    /// Returns `NoParent` for the root and `ContainerNotFound` for unknown names.
    pub fn detach(&mut self, name: &str) -> LayoutResult<Container> {
        if self.root.name == name {
            return Err(LayoutError::NoParent(name.to_string()));
        }
        let parent = self
            .find_parent_of(name)
            .map(|p| p.name.clone())
            .ok_or_else(|| LayoutError::ContainerNotFound(name.to_string()))?;
        let children = self
            .children_of_mut(&parent)
            .ok_or_else(|| LayoutError::ContainerNotFound(parent.clone()))?;
        let index = children
            .iter()
            .position(|c| c.name == name)
            .ok_or_else(|| LayoutError::ContainerNotFound(name.to_string()))?;
        Ok(children.remove(index))
    }

    /// Appends `container` as the last child of `parent`.
    ///
    /// The container's depth and its subtree's depths are rebased onto the
    /// parent. Its position is left as is.
    ///
    /// # Errors
    ///
    /// Fails if the parent is unknown or an item leaf, or if any name in the
    /// attached subtree is already used.
    pub fn attach(&mut self, parent: &str, mut container: Container) -> LayoutResult<()> {
        let mut incoming = Vec::new();
        collect_names(&container, &mut incoming);
        if let Some(taken) = incoming.iter().find(|n| self.contains(n)) {
            return Err(LayoutError::DuplicateName(taken.clone()));
        }
        let target = self
            .find_by_name_mut(parent)
            .ok_or_else(|| LayoutError::ContainerNotFound(parent.to_string()))?;
        if target.is_item_leaf {
            return Err(LayoutError::ItemLeafChildren(parent.to_string()));
        }
        let delta = i64::from(target.depth) + 1 - i64::from(container.depth);
        adjust_depth(&mut container, delta);
        target.children.push(container);
        Ok(())
    }

    /// Renames a container in place.
    ///
    /// # Errors
    ///
    /// Fails if `old` is unknown or `new` is already used.
    pub fn rename(&mut self, old: &str, new: &str) -> LayoutResult<()> {
        if old == new {
            return Ok(());
        }
        if self.contains(new) {
            return Err(LayoutError::DuplicateName(new.to_string()));
        }
        let container = self
            .find_by_name_mut(old)
            .ok_or_else(|| LayoutError::ContainerNotFound(old.to_string()))?;
        container.name = new.to_string();
        Ok(())
    }

    /// Moves `name` (with its subtree) to the end of `new_parent`'s children,
    /// placed at the origin cell.
    ///
    /// Every precondition is checked before the tree is touched, so an error
    /// leaves it unchanged. Sibling overlap at the new parent is not resolved
    /// here.
    ///
    /// # Errors
    ///
    /// Returns `CycleViolation` if `new_parent` is `name` itself or one of its
    /// descendants, `NoParent` for the root, `ContainerNotFound` for unknown
    /// names and `ItemLeafChildren` if `new_parent` holds items.
    pub fn reparent(&mut self, name: &str, new_parent: &str) -> LayoutResult<()> {
        self.check_reparent(name, new_parent)?;
        let mut node = self.detach(name)?;
        node.position = GridPoint::ORIGIN;
        self.attach(new_parent, node)
    }

    /// Checks that `name` could be moved under `new_parent` without changing
    /// the tree. The ancestor chain of `new_parent` is walked, so no shape of
    /// tree can turn the move into a cycle.
    ///
    /// # Errors
    ///
    /// Same as [`ContainerTree::reparent`].
    pub fn check_reparent(&self, name: &str, new_parent: &str) -> LayoutResult<()> {
        if !self.contains(name) {
            return Err(LayoutError::ContainerNotFound(name.to_string()));
        }
        let parent = self
            .find_by_name(new_parent)
            .ok_or_else(|| LayoutError::ContainerNotFound(new_parent.to_string()))?;
        if new_parent == name || self.is_descendant_of(new_parent, name) {
            return Err(LayoutError::CycleViolation {
                dragged: name.to_string(),
                target: new_parent.to_string(),
            });
        }
        if parent.is_item_leaf {
            return Err(LayoutError::ItemLeafChildren(new_parent.to_string()));
        }
        Ok(())
    }

    /// Checks every tree invariant.
    ///
    /// # Errors
    ///
    /// Returns the first violation found: duplicate name, wrong depth, item
    /// leaf with children, out-of-bounds rectangle, or overlapping siblings.
    pub fn validate(&self, validator: &LayoutValidator) -> LayoutResult<()> {
        if self.root.depth != 0 {
            return Err(LayoutError::InvalidDepth {
                name: self.root.name.clone(),
                expected: 0,
                actual: self.root.depth,
            });
        }
        let mut seen = HashSet::new();
        validate_node(&self.root, validator, &mut seen)
    }
}

/// Adds `delta` to the depth of `node` and of every descendant.
///
/// Depths saturate at zero.
pub fn adjust_depth(node: &mut Container, delta: i64) {
    let depth = (i64::from(node.depth) + delta).clamp(0, i64::from(u32::MAX));
    node.depth = u32::try_from(depth).unwrap_or(u32::MAX);
    for child in &mut node.children {
        adjust_depth(child, delta);
    }
}

fn find<'a>(node: &'a Container, name: &str) -> Option<&'a Container> {
    if node.name == name {
        return Some(node);
    }
    node.children.iter().find_map(|child| find(child, name))
}

fn find_mut<'a>(node: &'a mut Container, name: &str) -> Option<&'a mut Container> {
    if node.name == name {
        return Some(node);
    }
    node.children.iter_mut().find_map(|child| find_mut(child, name))
}

fn parent_of<'a>(node: &'a Container, name: &str) -> Option<&'a Container> {
    if node.children.iter().any(|c| c.name == name) {
        return Some(node);
    }
    node.children.iter().find_map(|child| parent_of(child, name))
}

fn collect_path<'a>(node: &'a Container, name: &str, path: &mut Vec<&'a Container>) -> bool {
    if node.name == name {
        return true;
    }
    path.push(node);
    if node
        .children
        .iter()
        .any(|child| collect_path(child, name, path))
    {
        return true;
    }
    path.pop();
    false
}

fn collect_names(node: &Container, names: &mut Vec<String>) {
    names.push(node.name.clone());
    for child in &node.children {
        collect_names(child, names);
    }
}

fn validate_node<'a>(
    node: &'a Container,
    validator: &LayoutValidator,
    seen: &mut HashSet<&'a str>,
) -> LayoutResult<()> {
    if !seen.insert(node.name.as_str()) {
        return Err(LayoutError::DuplicateName(node.name.clone()));
    }
    validator.check_container(node)?;
    if node.is_item_leaf && !node.children.is_empty() {
        return Err(LayoutError::ItemLeafChildren(node.name.clone()));
    }
    for child in &node.children {
        if child.depth != node.depth + 1 {
            return Err(LayoutError::InvalidDepth {
                name: child.name.clone(),
                expected: node.depth + 1,
                actual: child.depth,
            });
        }
    }
    LayoutValidator::check_siblings(&node.children)?;
    node.children
        .iter()
        .try_for_each(|child| validate_node(child, validator, seen))
}
