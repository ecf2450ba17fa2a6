//! Container model
//!
//! A container is a named rectangle on its parent's grid. It either holds
//! sub-containers or, when it is an item leaf, a flat item list kept by the
//! [`ItemStore`](crate::persistence::ItemStore).

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::geometry::{GridPoint, GridRect, GridSize};

/// Default fill color for new containers.
pub const DEFAULT_COLOR: &str = "#8FA3B8";

/// A node of the container tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Container {
    /// Globally unique name, used as the identity key
    pub name: String,
    /// Free-form kind (e.g. "drawer", "shelf", "bin")
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Item categories this container accepts
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub allowed_categories: BTreeSet<String>,
    /// Nesting level, root is 0
    #[serde(default)]
    pub depth: u32,
    /// Top-left cell relative to the parent
    #[serde(default)]
    pub position: GridPoint,
    /// Size in cells
    #[serde(default)]
    pub size: GridSize,
    /// Fill color as `#RRGGBB` (or `#RGB`, `#AARRGGBB`)
    #[serde(default = "default_color")]
    pub color: String,
    /// Holds an item list instead of sub-containers
    #[serde(default)]
    pub is_item_leaf: bool,
    /// Owned sub-containers in insertion order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Container>,
}

fn default_color() -> String {
    DEFAULT_COLOR.to_string()
}

impl Container {
    /// Creates a 1×1 container at the origin.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: String::new(),
            allowed_categories: BTreeSet::new(),
            depth: 0,
            position: GridPoint::ORIGIN,
            size: GridSize::new(1, 1),
            color: default_color(),
            is_item_leaf: false,
            children: Vec::new(),
        }
    }

    /// Creates an item-leaf container.
    #[must_use]
    pub fn item_leaf(name: impl Into<String>) -> Self {
        Self {
            is_item_leaf: true,
            ..Self::new(name)
        }
    }

    /// Sets the position.
    #[must_use]
    pub const fn at(mut self, x: i32, y: i32) -> Self {
        self.position = GridPoint::new(x, y);
        self
    }

    /// Sets the size.
    #[must_use]
    pub const fn sized(mut self, width: i32, height: i32) -> Self {
        self.size = GridSize::new(width, height);
        self
    }

    /// Sets the kind.
    #[must_use]
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }

    /// Sets the color.
    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    /// Adds an allowed category.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.allowed_categories.insert(category.into());
        self
    }

    /// Appends a child, fixing its depth (and its subtree's) to `self.depth + 1`.
    #[must_use]
    pub fn with_child(mut self, mut child: Self) -> Self {
        let delta = i64::from(self.depth) + 1 - i64::from(child.depth);
        crate::layout::adjust_depth(&mut child, delta);
        self.children.push(child);
        self
    }

    /// The container's rectangle on its parent's grid.
    #[must_use]
    pub const fn rect(&self) -> GridRect {
        GridRect::from_parts(self.position, self.size)
    }
}

/// Returns true if `value` is `#RGB`, `#RRGGBB` or `#AARRGGBB`.
#[must_use]
pub fn is_valid_color(value: &str) -> bool {
    value.strip_prefix('#').is_some_and(|hex| {
        matches!(hex.len(), 3 | 6 | 8) && hex.chars().all(|c| c.is_ascii_hexdigit())
    })
}
