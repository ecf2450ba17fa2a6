//! Shared strategies for the property tests

use boxgrid_core::{Container, ContainerTree, GridBounds, GridRect, LayoutValidator, ROOT_NAME};
use proptest::prelude::*;

pub const GRID_WIDTH: i32 = 12;
pub const GRID_HEIGHT: i32 = 8;

pub fn validator() -> LayoutValidator {
    LayoutValidator::new(GridBounds {
        max_width: GRID_WIDTH,
        max_height: GRID_HEIGHT,
        min_size: 1,
    })
}

/// Any rectangle that fits the grid.
pub fn rect_strategy() -> impl Strategy<Value = GridRect> {
    (0..GRID_WIDTH, 0..GRID_HEIGHT, 1..5i32, 1..5i32).prop_map(|(x, y, w, h)| {
        GridRect::new(x, y, w.min(GRID_WIDTH - x), h.min(GRID_HEIGHT - y))
    })
}

/// Non-overlapping sibling rectangles, at least one.
pub fn sibling_layout() -> impl Strategy<Value = Vec<GridRect>> {
    prop::collection::vec(rect_strategy(), 1..12).prop_map(|raw| {
        let mut kept: Vec<GridRect> = Vec::new();
        for rect in raw {
            if kept.iter().all(|k| !k.intersects(&rect)) {
                kept.push(rect);
            }
        }
        kept
    })
}

pub fn child_name(index: usize) -> String {
    format!("C{index}")
}

/// A root spanning the whole grid with one child per rectangle.
pub fn tree_from(rects: &[GridRect], leaves: &[bool]) -> ContainerTree {
    let mut root = Container::new(ROOT_NAME).sized(GRID_WIDTH, GRID_HEIGHT);
    for (i, rect) in rects.iter().enumerate() {
        let mut child = if leaves.get(i).copied().unwrap_or(false) {
            Container::item_leaf(child_name(i))
        } else {
            Container::new(child_name(i))
        };
        child = child.at(rect.x, rect.y).sized(rect.width, rect.height);
        root = root.with_child(child);
    }
    ContainerTree::new(root)
}
