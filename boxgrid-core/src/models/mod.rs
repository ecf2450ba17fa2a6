//! Core data structures: grid geometry, containers, items

mod container;
mod geometry;
mod item;

pub use container::{Container, DEFAULT_COLOR, is_valid_color};
pub use geometry::{Axis, GridPoint, GridRect, GridSize};
pub use item::{Item, merge_items};
