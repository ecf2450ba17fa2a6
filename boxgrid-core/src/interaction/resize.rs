//! Resize with chain push/pull of siblings
//!
//! While a resize handle is held, every pointer frame recomputes the active
//! container's size from the snapshot taken at press time and re-derives all
//! sibling positions from that same snapshot. A frame therefore never builds on
//! a previous frame's result, and a rejected frame leaves the last good layout
//! untouched.
//!
//! Each axis is resolved on its own, horizontal first:
//!
//! - growing pushes siblings ahead of the far edge, transitively, in ascending
//!   original coordinate
//! - shrinking pulls siblings that are chained to the active container back
//!   toward it, never past another sibling
//!
//! After both passes a residual scan over the whole sibling group rejects any
//! frame that still overlaps.

use std::rc::Rc;

use crate::error::{LayoutError, LayoutResult};
use crate::layout::{ContainerTree, GridBounds, LayoutValidator};
use crate::models::{Axis, GridPoint, GridRect, GridSize};
use crate::persistence::PersistenceGateway;
use crate::tracing::span_names;

use super::PointerPosition;
use super::handles::HandleId;
use super::snapshot::LayoutSnapshot;
use super::surface::{InteractionSurface, PointerCapture};

/// Which edge(s) of the container the pressed handle moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ResizeHandle {
    /// Right edge (width only)
    Right,
    /// Bottom edge (height only)
    Bottom,
    /// Bottom-right corner (both)
    #[default]
    BottomRight,
}

impl ResizeHandle {
    /// Returns true if dragging this handle changes the extent along `axis`.
    #[must_use]
    pub const fn affects(self, axis: Axis) -> bool {
        matches!(
            (self, axis),
            (Self::Right | Self::BottomRight, Axis::Horizontal)
                | (Self::Bottom | Self::BottomRight, Axis::Vertical)
        )
    }
}

impl std::str::FromStr for ResizeHandle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "right" | "r" => Ok(Self::Right),
            "bottom" | "b" => Ok(Self::Bottom),
            "bottom-right" | "bottomright" | "br" => Ok(Self::BottomRight),
            other => Err(format!("unknown resize handle: {other}")),
        }
    }
}

/// Lifecycle of a resize operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResizePhase {
    /// No resize in progress
    #[default]
    Idle,
    /// Handle held, frames being applied
    Active,
    /// Handle released, staging the result
    Committing,
    /// Staging failed, restoring the snapshot
    RollingBack,
}

/// Result of a single pointer frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameOutcome {
    /// The new size and the displaced siblings were written to the tree
    Applied {
        /// Active container size after this frame
        size: GridSize,
        /// Siblings whose position differs from the snapshot
        displaced: Vec<String>,
    },
    /// The frame maps to the size already applied
    Unchanged,
    /// The active rectangle left the grid; nothing was mutated
    Rejected(LayoutError),
    /// Propagation failed; the snapshot was restored
    RolledBack(LayoutError),
}

/// Result of releasing the handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResizeOutcome {
    /// Layout equals the snapshot; nothing was saved
    Unchanged {
        /// Resized container
        name: String,
    },
    /// The new layout was staged
    Committed {
        /// Resized container
        name: String,
        /// Final size
        size: GridSize,
        /// Siblings that moved
        displaced: Vec<String>,
    },
    /// Staging failed and the snapshot was restored
    RolledBack {
        /// Resized container
        name: String,
        /// Non-fatal warning for the user
        warning: String,
    },
}

struct ResizeSession {
    name: String,
    handle: ResizeHandle,
    press: PointerPosition,
    snapshot: LayoutSnapshot,
    applied: GridSize,
    _capture: PointerCapture,
}

/// Drives a single resize from handle press to release.
pub struct ResizeController {
    validator: LayoutValidator,
    cell_px: f64,
    phase: ResizePhase,
    session: Option<ResizeSession>,
}

impl std::fmt::Debug for ResizeController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResizeController")
            .field("validator", &self.validator)
            .field("cell_px", &self.cell_px)
            .field("phase", &self.phase)
            .field("active", &self.active_container())
            .finish()
    }
}

impl ResizeController {
    /// Creates an idle controller.
    #[must_use]
    pub const fn new(validator: LayoutValidator, cell_px: f64) -> Self {
        Self {
            validator,
            cell_px,
            phase: ResizePhase::Idle,
            session: None,
        }
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> ResizePhase {
        self.phase
    }

    /// Returns true while a handle is held.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// Name of the container being resized.
    #[must_use]
    pub fn active_container(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.name.as_str())
    }

    /// Starts a resize of `name` and captures the pointer.
    ///
    /// # Errors
    ///
    /// Fails with `InteractionInProgress` if a resize is already active and
    /// with `ContainerNotFound` for unknown names.
    pub fn begin(
        &mut self,
        tree: &ContainerTree,
        name: &str,
        handle: ResizeHandle,
        pointer: PointerPosition,
        surface: &Rc<dyn InteractionSurface>,
        handle_id: HandleId,
    ) -> LayoutResult<()> {
        if self.session.is_some() {
            return Err(LayoutError::InteractionInProgress);
        }
        let _span = crate::trace_operation_debug!(span_names::RESIZE_BEGIN, container = %name);
        let snapshot = LayoutSnapshot::capture(tree, name)?;
        let applied = snapshot
            .rect_of(name)
            .map(|r| r.size())
            .ok_or_else(|| LayoutError::ContainerNotFound(name.to_string()))?;
        let capture = PointerCapture::acquire(surface, handle_id);
        self.session = Some(ResizeSession {
            name: name.to_string(),
            handle,
            press: pointer,
            snapshot,
            applied,
            _capture: capture,
        });
        self.transition(ResizePhase::Active);
        Ok(())
    }

    /// Applies one pointer frame.
    ///
    /// # Errors
    ///
    /// Fails with `NoActiveInteraction` when no resize is in progress. Layout
    /// problems are reported through [`FrameOutcome`].
    pub fn update(
        &mut self,
        tree: &mut ContainerTree,
        pointer: PointerPosition,
    ) -> LayoutResult<FrameOutcome> {
        let session = self
            .session
            .as_mut()
            .ok_or(LayoutError::NoActiveInteraction)?;
        let _span =
            crate::trace_operation_debug!(span_names::RESIZE_UPDATE, container = %session.name);
        let original = session
            .snapshot
            .rect_of(&session.name)
            .ok_or_else(|| LayoutError::ContainerNotFound(session.name.clone()))?;

        let min = self.validator.bounds().min_size;
        let dx = cells(pointer.x - session.press.x, self.cell_px);
        let dy = cells(pointer.y - session.press.y, self.cell_px);
        let width = if session.handle.affects(Axis::Horizontal) {
            original.width.saturating_add(dx).max(min)
        } else {
            original.width
        };
        let height = if session.handle.affects(Axis::Vertical) {
            original.height.saturating_add(dy).max(min)
        } else {
            original.height
        };
        let size = GridSize::new(width, height);
        if size == session.applied {
            return Ok(FrameOutcome::Unchanged);
        }

        let proposed = GridRect::from_parts(original.position(), size);
        if !self.validator.rect_within_bounds(&proposed) {
            tracing::trace!(container = %session.name, rect = %proposed, "Resize frame out of bounds");
            return Ok(FrameOutcome::Rejected(LayoutError::BoundsViolation {
                name: session.name.clone(),
                rect: proposed,
            }));
        }

        match propagate_resize(
            &session.snapshot,
            &session.name,
            proposed,
            self.validator.bounds(),
        ) {
            Ok(placements) => {
                apply_placements(tree, &placements);
                session.applied = size;
                let displaced = session
                    .snapshot
                    .changed(tree)
                    .into_iter()
                    .filter(|n| *n != session.name)
                    .collect();
                Ok(FrameOutcome::Applied { size, displaced })
            }
            Err(error) => {
                tracing::debug!(container = %session.name, %error, "Resize frame rolled back");
                session.snapshot.restore(tree);
                session.applied = original.size();
                Ok(FrameOutcome::RolledBack(error))
            }
        }
    }

    /// Releases the handle and stages the result.
    ///
    /// # Errors
    ///
    /// Fails with `NoActiveInteraction` when no resize is in progress. A failed
    /// save is reported as [`ResizeOutcome::RolledBack`].
    pub fn finish(
        &mut self,
        tree: &mut ContainerTree,
        gateway: &mut dyn PersistenceGateway,
    ) -> LayoutResult<ResizeOutcome> {
        let session = self.session.take().ok_or(LayoutError::NoActiveInteraction)?;
        let _span = crate::trace_operation!(span_names::RESIZE_END, container = %session.name);

        if session.snapshot.matches(tree) {
            self.transition(ResizePhase::Idle);
            return Ok(ResizeOutcome::Unchanged { name: session.name });
        }

        self.transition(ResizePhase::Committing);
        let displaced: Vec<String> = session
            .snapshot
            .changed(tree)
            .into_iter()
            .filter(|n| *n != session.name)
            .collect();
        let outcome = match gateway.save_staged(tree) {
            Ok(()) => {
                tracing::info!(
                    container = %session.name,
                    size = ?session.applied,
                    displaced = displaced.len(),
                    "Resize staged"
                );
                ResizeOutcome::Committed {
                    name: session.name.clone(),
                    size: session.applied,
                    displaced,
                }
            }
            Err(error) => {
                self.transition(ResizePhase::RollingBack);
                session.snapshot.restore(tree);
                tracing::warn!(
                    container = %session.name,
                    error = %error,
                    "Could not stage resize; layout restored"
                );
                ResizeOutcome::RolledBack {
                    name: session.name.clone(),
                    warning: format!("Could not save the new size of {}: {error}", session.name),
                }
            }
        };
        self.transition(ResizePhase::Idle);
        Ok(outcome)
    }

    /// Abandons the resize and restores the snapshot.
    ///
    /// Returns false if no resize was active.
    pub fn cancel(&mut self, tree: &mut ContainerTree) -> bool {
        let Some(session) = self.session.take() else {
            return false;
        };
        session.snapshot.restore(tree);
        tracing::debug!(container = %session.name, "Resize cancelled");
        self.transition(ResizePhase::Idle);
        true
    }

    /// Finds a place for a freshly attached container inside its new parent.
    ///
    /// Tries the origin first. If it is taken, pushes the other children to the
    /// right as if the container had grown from zero width at the origin. If
    /// that overflows, the first free cell in row-major order is used and the
    /// other children stay put.
    ///
    /// # Errors
    ///
    /// Returns `OverlapConflict` when the container fits nowhere.
    pub fn make_room(
        validator: &LayoutValidator,
        tree: &mut ContainerTree,
        name: &str,
    ) -> LayoutResult<GridPoint> {
        let _span = crate::trace_operation_debug!(span_names::MAKE_ROOM, container = %name);
        let snapshot = LayoutSnapshot::capture(tree, name)?;
        let Some(parent) = snapshot.parent().map(str::to_string) else {
            return Err(LayoutError::NoParent(name.to_string()));
        };
        let size = snapshot
            .rect_of(name)
            .map(|r| r.size())
            .ok_or_else(|| LayoutError::ContainerNotFound(name.to_string()))?;
        let at_origin = GridRect::from_parts(GridPoint::ORIGIN, size);
        let others: Vec<GridRect> = snapshot
            .entries()
            .iter()
            .filter(|e| e.name != name)
            .map(|e| e.rect)
            .collect();

        if !validator.rect_within_bounds(&at_origin) {
            return Err(LayoutError::BoundsViolation {
                name: name.to_string(),
                rect: at_origin,
            });
        }

        if others.iter().all(|r| !r.intersects(&at_origin)) {
            set_position(tree, name, GridPoint::ORIGIN);
            return Ok(GridPoint::ORIGIN);
        }

        let collapsed = GridRect::new(0, 0, 0, size.height);
        let mut slots = slots_from(&snapshot, name);
        let pushed = push_axis(
            Axis::Horizontal,
            &collapsed,
            &at_origin,
            &mut slots,
            validator.bounds().max_width,
        )
        .and_then(|()| residual_scan(name, &at_origin, &slots));
        if pushed.is_ok() {
            let mut placements = vec![(name.to_string(), at_origin)];
            placements.extend(slots.into_iter().map(|s| (s.name, s.current)));
            apply_placements(tree, &placements);
            tracing::debug!(container = name, "Made room at origin by pushing siblings");
            return Ok(GridPoint::ORIGIN);
        }

        let bounds = validator.bounds();
        for y in 0..=bounds.max_height - size.height {
            for x in 0..=bounds.max_width - size.width {
                let candidate = GridRect::from_parts(GridPoint::new(x, y), size);
                if others.iter().all(|r| !r.intersects(&candidate)) {
                    set_position(tree, name, candidate.position());
                    tracing::debug!(container = name, x, y, "Placed in first free cell");
                    return Ok(candidate.position());
                }
            }
        }

        Err(LayoutError::OverlapConflict {
            first: name.to_string(),
            second: parent,
        })
    }

    fn transition(&mut self, next: ResizePhase) {
        tracing::trace!(from = ?self.phase, to = ?next, "Resize phase");
        self.phase = next;
    }
}

/// Computes every sibling rectangle for a resized active container.
///
/// `proposed` is the active container's new rectangle; all other rectangles
/// are taken from the snapshot. Returns the new rectangle of every captured
/// container, the active one included.
///
/// # Errors
///
/// `BoundsViolation` if a pushed sibling leaves the grid and
/// `OverlapConflict` if the result still overlaps.
pub fn propagate_resize(
    snapshot: &LayoutSnapshot,
    active: &str,
    proposed: GridRect,
    bounds: GridBounds,
) -> LayoutResult<Vec<(String, GridRect)>> {
    let original = snapshot
        .rect_of(active)
        .ok_or_else(|| LayoutError::ContainerNotFound(active.to_string()))?;
    let mut slots = slots_from(snapshot, active);

    for axis in [Axis::Horizontal, Axis::Vertical] {
        let bound = match axis {
            Axis::Horizontal => bounds.max_width,
            Axis::Vertical => bounds.max_height,
        };
        match proposed.extent(axis).cmp(&original.extent(axis)) {
            std::cmp::Ordering::Greater => push_axis(axis, &original, &proposed, &mut slots, bound)?,
            std::cmp::Ordering::Less => pull_axis(axis, &original, &proposed, &mut slots),
            std::cmp::Ordering::Equal => {}
        }
    }

    residual_scan(active, &proposed, &slots)?;

    let mut placements = Vec::with_capacity(slots.len() + 1);
    placements.push((active.to_string(), proposed));
    placements.extend(slots.into_iter().map(|s| (s.name, s.current)));
    Ok(placements)
}

#[derive(Debug, Clone)]
struct Slot {
    name: String,
    original: GridRect,
    current: GridRect,
}

fn slots_from(snapshot: &LayoutSnapshot, active: &str) -> Vec<Slot> {
    snapshot
        .entries()
        .iter()
        .filter(|e| e.name != active)
        .map(|e| Slot {
            name: e.name.clone(),
            original: e.rect,
            current: e.rect,
        })
        .collect()
}

fn sorted_indices(slots: &[Slot], axis: Axis, from: i32) -> Vec<usize> {
    let perp = axis.perpendicular();
    let mut order: Vec<usize> = (0..slots.len())
        .filter(|&i| slots[i].original.near(axis) >= from)
        .collect();
    order.sort_by_key(|&i| (slots[i].original.near(axis), slots[i].original.near(perp)));
    order
}

fn push_axis(
    axis: Axis,
    original: &GridRect,
    proposed: &GridRect,
    slots: &mut [Slot],
    bound: i32,
) -> LayoutResult<()> {
    let perp = axis.perpendicular();
    let old_far = original.far(axis);
    let new_far = proposed.far(axis);
    let mut processed: Vec<usize> = Vec::new();

    for i in sorted_indices(slots, axis, original.near(axis)) {
        let start = slots[i].original.near(axis);
        let in_span = slots[i].current.spans_overlap(proposed, perp);
        let direct = start < new_far && in_span;
        let transitive = start >= old_far && in_span;
        if !direct && !transitive {
            continue;
        }
        let mut required = if direct { new_far } else { start };
        for &p in &processed {
            if slots[p].current.spans_overlap(&slots[i].current, perp) {
                required = required.max(slots[p].current.far(axis));
            }
        }
        if required > slots[i].current.near(axis) {
            let moved = slots[i].current.with_near(axis, required);
            if moved.far(axis) > bound {
                return Err(LayoutError::BoundsViolation {
                    name: slots[i].name.clone(),
                    rect: moved,
                });
            }
            slots[i].current = moved;
        }
        processed.push(i);
    }
    Ok(())
}

fn pull_axis(axis: Axis, original: &GridRect, proposed: &GridRect, slots: &mut [Slot]) {
    let perp = axis.perpendicular();

    for i in sorted_indices(slots, axis, original.far(axis)) {
        let current = slots[i].current;
        let mut floor = proposed.far(axis);
        for (j, other) in slots.iter().enumerate() {
            if j != i
                && other.current.near(axis) < current.near(axis)
                && other.current.spans_overlap(&current, perp)
            {
                floor = floor.max(other.current.far(axis));
            }
        }
        slots[i].current = current.with_near(axis, floor.min(current.near(axis)));
    }
}

fn residual_scan(active: &str, proposed: &GridRect, slots: &[Slot]) -> LayoutResult<()> {
    for (i, slot) in slots.iter().enumerate() {
        if slot.current.intersects(proposed) {
            return Err(LayoutError::OverlapConflict {
                first: active.to_string(),
                second: slot.name.clone(),
            });
        }
        if let Some(other) = slots[i + 1..]
            .iter()
            .find(|o| o.current.intersects(&slot.current))
        {
            return Err(LayoutError::OverlapConflict {
                first: slot.name.clone(),
                second: other.name.clone(),
            });
        }
    }
    Ok(())
}

fn apply_placements(tree: &mut ContainerTree, placements: &[(String, GridRect)]) {
    for (name, rect) in placements {
        if let Some(container) = tree.find_by_name_mut(name) {
            container.position = rect.position();
            container.size = rect.size();
        }
    }
}

fn set_position(tree: &mut ContainerTree, name: &str, position: GridPoint) {
    if let Some(container) = tree.find_by_name_mut(name) {
        container.position = position;
    }
}

#[allow(clippy::cast_possible_truncation)]
fn cells(delta_px: f64, cell_px: f64) -> i32 {
    (delta_px / cell_px).round() as i32
}
