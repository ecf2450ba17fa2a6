//! Pointer-driven resize and drag
//!
//! - `resize` - chain push/pull resizing and post-drop repositioning
//! - `drag` - drag, drop-target dispatch, merge and reparent
//! - `drop_target` - IoU-based target resolution
//! - `snapshot` - per-operation sibling snapshot for rollback
//! - `surface` - pointer capture and handle visibility guards
//! - `handles` - container name to handle id registry

mod drag;
mod drop_target;
mod handles;
mod resize;
mod snapshot;
mod surface;

pub use drag::{
    AlwaysConfirm, ConfirmDrop, ConfirmWith, DragController, DragOutcome, DragPhase, DropAction,
    NeverConfirm, RevertReason,
};
pub use drop_target::{
    DropCandidate, DropMetrics, DropThresholds, intersection_over_union, resolve_drop_target,
};
pub use handles::{HandleId, HandleRegistry};
pub use resize::{
    FrameOutcome, ResizeController, ResizeHandle, ResizeOutcome, ResizePhase, propagate_resize,
};
pub use snapshot::{LayoutSnapshot, SnapshotEntry};
pub use surface::{HiddenHandle, InteractionSurface, NullSurface, PointerCapture, RecordingSurface};

/// Pointer position in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerPosition {
    /// Horizontal pixel coordinate
    pub x: f64,
    /// Vertical pixel coordinate
    pub y: f64,
}

impl PointerPosition {
    /// Creates a pointer position.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance in pixels.
    #[must_use]
    pub fn distance_to(self, other: Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}
