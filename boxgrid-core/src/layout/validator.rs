//! Stateless bounds and overlap checks
//!
//! The validator knows the grid extent and minimum size and nothing else. It
//! never mutates; callers decide whether a failed check means rejecting a
//! frame, restoring a snapshot, or refusing an edit.

use crate::error::{LayoutError, LayoutResult};
use crate::models::{Container, GridRect};

/// Grid extent and minimum container size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridBounds {
    /// Number of columns
    pub max_width: i32,
    /// Number of rows
    pub max_height: i32,
    /// Smallest width/height
    pub min_size: i32,
}

impl Default for GridBounds {
    fn default() -> Self {
        Self {
            max_width: 12,
            max_height: 8,
            min_size: 1,
        }
    }
}

/// Bounds and overlap checks over sibling rectangles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LayoutValidator {
    bounds: GridBounds,
}

impl LayoutValidator {
    /// Creates a validator for the given grid.
    #[must_use]
    pub const fn new(bounds: GridBounds) -> Self {
        Self { bounds }
    }

    /// The grid this validator checks against.
    #[must_use]
    pub const fn bounds(&self) -> GridBounds {
        self.bounds
    }

    /// Returns true if the rectangle lies on the grid and meets the minimum size.
    ///
    /// Far edges are summed in `i64`, so no input can wrap past the bound.
    #[must_use]
    pub const fn within_bounds(&self, x: i32, y: i32, width: i32, height: i32) -> bool {
        x >= 0
            && y >= 0
            && width >= self.bounds.min_size
            && height >= self.bounds.min_size
            && x as i64 + width as i64 <= self.bounds.max_width as i64
            && y as i64 + height as i64 <= self.bounds.max_height as i64
    }

    /// [`within_bounds`](Self::within_bounds) for a rectangle.
    #[must_use]
    pub const fn rect_within_bounds(&self, rect: &GridRect) -> bool {
        self.within_bounds(rect.x, rect.y, rect.width, rect.height)
    }

    /// Half-open rectangle intersection on both axes.
    #[must_use]
    pub const fn overlap(a: &GridRect, b: &GridRect) -> bool {
        a.intersects(b)
    }

    /// Returns true if no two siblings at equal depth overlap.
    #[must_use]
    pub fn no_overlap(siblings: &[Container]) -> bool {
        Self::first_overlap(siblings).is_none()
    }

    /// Names of the first overlapping equal-depth pair, if any.
    #[must_use]
    pub fn first_overlap(siblings: &[Container]) -> Option<(String, String)> {
        siblings.iter().enumerate().find_map(|(i, a)| {
            siblings[i + 1..]
                .iter()
                .find(|b| a.depth == b.depth && Self::overlap(&a.rect(), &b.rect()))
                .map(|b| (a.name.clone(), b.name.clone()))
        })
    }

    /// Checks a single container's rectangle against the grid.
    ///
    /// # Errors
    ///
    /// Returns `LayoutError::BoundsViolation` if it does not fit.
    pub fn check_container(&self, container: &Container) -> LayoutResult<()> {
        let rect = container.rect();
        if self.rect_within_bounds(&rect) {
            Ok(())
        } else {
            Err(LayoutError::BoundsViolation {
                name: container.name.clone(),
                rect,
            })
        }
    }

    /// Checks that a sibling list is free of overlap.
    ///
    /// # Errors
    ///
    /// Returns `LayoutError::OverlapConflict` naming the first offending pair.
    pub fn check_siblings(siblings: &[Container]) -> LayoutResult<()> {
        match Self::first_overlap(siblings) {
            None => Ok(()),
            Some((first, second)) => Err(LayoutError::OverlapConflict { first, second }),
        }
    }
}
