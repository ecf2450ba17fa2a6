//! Integer grid geometry
//!
//! All rectangles are half-open: a rectangle at `x` with width `w` covers the
//! cells `x..x + w`. Two rectangles that merely touch do not overlap.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Grid axis used by resize propagation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// The x axis (widths, left/right edges)
    Horizontal,
    /// The y axis (heights, top/bottom edges)
    Vertical,
}

impl Axis {
    /// Returns the other axis.
    #[must_use]
    pub const fn perpendicular(self) -> Self {
        match self {
            Self::Horizontal => Self::Vertical,
            Self::Vertical => Self::Horizontal,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Horizontal => write!(f, "horizontal"),
            Self::Vertical => write!(f, "vertical"),
        }
    }
}

/// A cell position on the grid, relative to the parent container.
///
/// Serialized as a two-element array `[x, y]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "[i32; 2]", into = "[i32; 2]")]
pub struct GridPoint {
    /// Column
    pub x: i32,
    /// Row
    pub y: i32,
}

impl GridPoint {
    /// Grid origin.
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    /// Creates a new grid point.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<[i32; 2]> for GridPoint {
    fn from([x, y]: [i32; 2]) -> Self {
        Self { x, y }
    }
}

impl From<GridPoint> for [i32; 2] {
    fn from(point: GridPoint) -> Self {
        [point.x, point.y]
    }
}

/// A size in grid cells.
///
/// Serialized as a two-element array `[w, h]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[i32; 2]", into = "[i32; 2]")]
pub struct GridSize {
    /// Width in cells
    pub width: i32,
    /// Height in cells
    pub height: i32,
}

impl GridSize {
    /// Creates a new grid size.
    #[must_use]
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Number of cells covered.
    #[must_use]
    pub const fn area(self) -> i64 {
        self.width as i64 * self.height as i64
    }
}

impl Default for GridSize {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

impl From<[i32; 2]> for GridSize {
    fn from([width, height]: [i32; 2]) -> Self {
        Self { width, height }
    }
}

impl From<GridSize> for [i32; 2] {
    fn from(size: GridSize) -> Self {
        [size.width, size.height]
    }
}

/// A half-open rectangle of grid cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridRect {
    /// Left column
    pub x: i32,
    /// Top row
    pub y: i32,
    /// Width in cells
    pub width: i32,
    /// Height in cells
    pub height: i32,
}

impl GridRect {
    /// Creates a rectangle from its components.
    #[must_use]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Creates a rectangle from a position and a size.
    #[must_use]
    pub const fn from_parts(position: GridPoint, size: GridSize) -> Self {
        Self::new(position.x, position.y, size.width, size.height)
    }

    /// Top-left corner.
    #[must_use]
    pub const fn position(&self) -> GridPoint {
        GridPoint::new(self.x, self.y)
    }

    /// Width and height.
    #[must_use]
    pub const fn size(&self) -> GridSize {
        GridSize::new(self.width, self.height)
    }

    /// Exclusive right edge, saturating at `i32::MAX`.
    #[must_use]
    pub const fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    /// Exclusive bottom edge, saturating at `i32::MAX`.
    #[must_use]
    pub const fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    /// Number of cells covered.
    #[must_use]
    pub const fn area(&self) -> i64 {
        self.width as i64 * self.height as i64
    }

    /// Leading edge along `axis`.
    #[must_use]
    pub const fn near(&self, axis: Axis) -> i32 {
        match axis {
            Axis::Horizontal => self.x,
            Axis::Vertical => self.y,
        }
    }

    /// Exclusive trailing edge along `axis`.
    #[must_use]
    pub const fn far(&self, axis: Axis) -> i32 {
        match axis {
            Axis::Horizontal => self.right(),
            Axis::Vertical => self.bottom(),
        }
    }

    /// Extent along `axis`.
    #[must_use]
    pub const fn extent(&self, axis: Axis) -> i32 {
        match axis {
            Axis::Horizontal => self.width,
            Axis::Vertical => self.height,
        }
    }

    /// Returns a copy moved so its leading edge along `axis` is `near`.
    #[must_use]
    pub const fn with_near(mut self, axis: Axis, near: i32) -> Self {
        match axis {
            Axis::Horizontal => self.x = near,
            Axis::Vertical => self.y = near,
        }
        self
    }

    /// Returns true if the spans along `axis` intersect.
    #[must_use]
    pub const fn spans_overlap(&self, other: &Self, axis: Axis) -> bool {
        self.near(axis) < other.far(axis) && other.near(axis) < self.far(axis)
    }

    /// Returns true if both spans intersect.
    #[must_use]
    pub const fn intersects(&self, other: &Self) -> bool {
        self.spans_overlap(other, Axis::Horizontal) && self.spans_overlap(other, Axis::Vertical)
    }

    /// Area of the intersection, zero when disjoint.
    #[must_use]
    pub fn intersection_area(&self, other: &Self) -> i64 {
        let span = |near_a: i32, far_a: i32, near_b: i32, far_b: i32| {
            (i64::from(far_a.min(far_b)) - i64::from(near_a.max(near_b))).max(0)
        };
        span(self.x, self.right(), other.x, other.right())
            * span(self.y, self.bottom(), other.y, other.bottom())
    }
}

impl fmt::Display for GridRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{},{} {}x{}]",
            self.x, self.y, self.width, self.height
        )
    }
}
