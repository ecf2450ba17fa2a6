//! Drag, drop, merge and reparent
//!
//! A drag never touches the tree while the pointer moves. On release the
//! snapped rectangle is matched against the dragged container's siblings and
//! the result is dispatched:
//!
//! | target          | dragged  | action                         |
//! |-----------------|----------|--------------------------------|
//! | item leaf       | item leaf| merge item lists, remove source|
//! | item leaf       | other    | revert                         |
//! | non-leaf        | any      | reparent into target           |
//! | none            | any      | move within the parent         |
//!
//! Every mutation made during the drop is undone if staging fails.

use std::rc::Rc;

use crate::error::{LayoutError, LayoutResult};
use crate::layout::{ContainerTree, LayoutValidator};
use crate::models::{GridPoint, GridRect, GridSize, Item, merge_items};
use crate::persistence::{ItemStore, PersistenceGateway};
use crate::tracing::span_names;

use super::PointerPosition;
use super::drop_target::{DropThresholds, resolve_drop_target};
use super::handles::HandleId;
use super::resize::ResizeController;
use super::snapshot::LayoutSnapshot;
use super::surface::{HiddenHandle, InteractionSurface, PointerCapture};

/// A structural change that needs the user's consent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropAction<'a> {
    /// Merge the items of `source` into `target` and remove `source`
    Merge {
        /// Dragged item container
        source: &'a str,
        /// Receiving item container
        target: &'a str,
    },
    /// Move `container` (with its subtree) into `new_parent`
    Reparent {
        /// Dragged container
        container: &'a str,
        /// Receiving container
        new_parent: &'a str,
    },
}

impl std::fmt::Display for DropAction<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Merge { source, target } => {
                write!(f, "Merge the items of '{source}' into '{target}'?")
            }
            Self::Reparent {
                container,
                new_parent,
            } => write!(f, "Move '{container}' into '{new_parent}'?"),
        }
    }
}

/// Yes/no prompt shown before a merge or reparent.
pub trait ConfirmDrop {
    /// Returns true to proceed.
    fn confirm(&self, action: &DropAction<'_>) -> bool;
}

/// Accepts every drop.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysConfirm;

impl ConfirmDrop for AlwaysConfirm {
    fn confirm(&self, _action: &DropAction<'_>) -> bool {
        true
    }
}

/// Declines every drop.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverConfirm;

impl ConfirmDrop for NeverConfirm {
    fn confirm(&self, _action: &DropAction<'_>) -> bool {
        false
    }
}

/// Adapts a closure to [`ConfirmDrop`].
pub struct ConfirmWith<F>(pub F);

impl<F> ConfirmDrop for ConfirmWith<F>
where
    F: Fn(&DropAction<'_>) -> bool,
{
    fn confirm(&self, action: &DropAction<'_>) -> bool {
        (self.0)(action)
    }
}

/// Lifecycle of a drag operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragPhase {
    /// No drag in progress
    #[default]
    Idle,
    /// Container pressed, pointer moving
    Active,
    /// Released over an acceptable target
    DroppedOnTarget,
    /// Released over free space
    MovedFree,
    /// Returned to its origin
    Reverted,
}

/// Why a drop snapped back to its origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevertReason {
    /// The user declined the confirmation
    Declined,
    /// A non-item container was dropped on an item container
    ItemLeafTarget(String),
    /// The target lies inside the dragged subtree
    Cycle(LayoutError),
    /// The new position overlaps a sibling or no room was found
    Overlap(LayoutError),
    /// Staging or item storage failed
    Persistence(String),
}

impl std::fmt::Display for RevertReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Declined => write!(f, "drop declined"),
            Self::ItemLeafTarget(target) => {
                write!(f, "only item containers can be dropped on '{target}'")
            }
            Self::Cycle(e) | Self::Overlap(e) => write!(f, "{e}"),
            Self::Persistence(message) => write!(f, "could not save: {message}"),
        }
    }
}

/// Result of releasing a dragged container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragOutcome {
    /// Released on its origin cell with no target
    Unchanged {
        /// Dragged container
        name: String,
    },
    /// Moved within its parent
    Moved {
        /// Dragged container
        name: String,
        /// New top-left cell
        to: GridPoint,
    },
    /// Items merged and the source removed
    Merged {
        /// Removed item container
        source: String,
        /// Receiving item container
        target: String,
        /// Number of distinct items after the merge
        items: usize,
    },
    /// Moved into another container
    Reparented {
        /// Dragged container
        name: String,
        /// New parent
        new_parent: String,
        /// Position inside the new parent
        position: GridPoint,
    },
    /// Snapped back to its origin
    Reverted {
        /// Dragged container
        name: String,
        /// Why
        reason: RevertReason,
    },
}

impl DragOutcome {
    /// The terminal phase this outcome represents.
    #[must_use]
    pub const fn phase(&self) -> DragPhase {
        match self {
            Self::Merged { .. } | Self::Reparented { .. } => DragPhase::DroppedOnTarget,
            Self::Moved { .. } | Self::Unchanged { .. } => DragPhase::MovedFree,
            Self::Reverted { .. } => DragPhase::Reverted,
        }
    }

    /// Returns true if the tree's structure changed.
    #[must_use]
    pub const fn is_structural(&self) -> bool {
        matches!(self, Self::Merged { .. } | Self::Reparented { .. })
    }
}

struct DragSession {
    name: String,
    origin: GridPoint,
    size: GridSize,
    press: PointerPosition,
    last: PointerPosition,
    snapshot: LayoutSnapshot,
    _hidden: HiddenHandle,
    _capture: PointerCapture,
}

/// Drives a single drag from press to release.
pub struct DragController {
    validator: LayoutValidator,
    thresholds: DropThresholds,
    cell_px: f64,
    jitter_px: f64,
    phase: DragPhase,
    session: Option<DragSession>,
}

impl std::fmt::Debug for DragController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DragController")
            .field("phase", &self.phase)
            .field("active", &self.active_container())
            .finish_non_exhaustive()
    }
}

impl DragController {
    /// Creates an idle controller.
    #[must_use]
    pub const fn new(
        validator: LayoutValidator,
        thresholds: DropThresholds,
        cell_px: f64,
        jitter_px: f64,
    ) -> Self {
        Self {
            validator,
            thresholds,
            cell_px,
            jitter_px,
            phase: DragPhase::Idle,
            session: None,
        }
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> DragPhase {
        self.phase
    }

    /// Returns true while a container is held.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// Name of the container being dragged.
    #[must_use]
    pub fn active_container(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.name.as_str())
    }

    /// Starts dragging `name`: hides its resize handle and captures the pointer.
    ///
    /// # Errors
    ///
    /// Fails with `InteractionInProgress` if a drag is already active,
    /// `NoParent` for the root, and `ContainerNotFound` for unknown names.
    pub fn begin(
        &mut self,
        tree: &ContainerTree,
        name: &str,
        pointer: PointerPosition,
        surface: &Rc<dyn InteractionSurface>,
        handle_id: HandleId,
    ) -> LayoutResult<()> {
        if self.session.is_some() {
            return Err(LayoutError::InteractionInProgress);
        }
        let _span = crate::trace_operation_debug!(span_names::DRAG_BEGIN, container = %name);
        let container = tree
            .find_by_name(name)
            .ok_or_else(|| LayoutError::ContainerNotFound(name.to_string()))?;
        if tree.find_parent_of(name).is_none() {
            return Err(LayoutError::NoParent(name.to_string()));
        }
        let origin = container.position;
        let size = container.size;
        let snapshot = LayoutSnapshot::capture(tree, name)?;
        let hidden = HiddenHandle::hide(surface, handle_id);
        let capture = PointerCapture::acquire(surface, handle_id);
        self.session = Some(DragSession {
            name: name.to_string(),
            origin,
            size,
            press: pointer,
            last: pointer,
            snapshot,
            _hidden: hidden,
            _capture: capture,
        });
        self.transition(DragPhase::Active);
        Ok(())
    }

    /// Records a pointer move.
    ///
    /// Returns false if the move is below the jitter threshold and was ignored.
    ///
    /// # Errors
    ///
    /// Fails with `NoActiveInteraction` when no drag is in progress.
    pub fn pointer_moved(&mut self, pointer: PointerPosition) -> LayoutResult<bool> {
        let jitter = self.jitter_px;
        let session = self
            .session
            .as_mut()
            .ok_or(LayoutError::NoActiveInteraction)?;
        if session.last.distance_to(pointer) < jitter {
            return Ok(false);
        }
        session.last = pointer;
        Ok(true)
    }

    /// Cell the container would snap to if released now.
    #[must_use]
    pub fn preview_cell(&self) -> Option<GridPoint> {
        self.session.as_ref().map(|s| self.snap(s, s.last))
    }

    /// Releases the container at `pointer` and applies the drop.
    ///
    /// # Errors
    ///
    /// Fails with `NoActiveInteraction` when no drag is in progress. Every
    /// other problem is reported as [`DragOutcome::Reverted`].
    pub fn finish(
        &mut self,
        tree: &mut ContainerTree,
        pointer: PointerPosition,
        confirm: &dyn ConfirmDrop,
        gateway: &mut dyn PersistenceGateway,
        items: &mut dyn ItemStore,
    ) -> LayoutResult<DragOutcome> {
        let mut session = self.session.take().ok_or(LayoutError::NoActiveInteraction)?;
        session.last = pointer;
        let cell = self.snap(&session, pointer);
        let rect = GridRect::from_parts(cell, session.size);
        let _span = crate::trace_operation!(
            span_names::DRAG_DROP,
            container = %session.name,
            x = cell.x,
            y = cell.y
        );

        let outcome = match resolve_drop_target(tree, &session.name, &rect, &self.thresholds) {
            Some(target) => self.drop_on_target(tree, &session, &target.name, confirm, gateway, items),
            None => Self::move_free(tree, &session, cell, gateway),
        };

        if let DragOutcome::Reverted { reason, .. } = &outcome {
            session.snapshot.restore(tree);
            tracing::info!(container = %session.name, %reason, "Drop reverted");
        }
        self.transition(outcome.phase());
        self.transition(DragPhase::Idle);
        Ok(outcome)
    }

    /// Abandons the drag; the container stays at its origin.
    ///
    /// Returns false if no drag was active.
    pub fn cancel(&mut self, tree: &mut ContainerTree) -> bool {
        let Some(session) = self.session.take() else {
            return false;
        };
        session.snapshot.restore(tree);
        tracing::debug!(container = %session.name, "Drag cancelled");
        self.transition(DragPhase::Reverted);
        self.transition(DragPhase::Idle);
        true
    }

    #[allow(clippy::cast_possible_truncation)]
    fn snap(&self, session: &DragSession, pointer: PointerPosition) -> GridPoint {
        let bounds = self.validator.bounds();
        let axis = |origin: i32, delta: f64, extent: i32, max: i32| {
            let px = f64::from(origin).mul_add(self.cell_px, delta);
            let cell = (px / self.cell_px).round() as i32;
            cell.clamp(0, (max - extent).max(0))
        };
        GridPoint::new(
            axis(
                session.origin.x,
                pointer.x - session.press.x,
                session.size.width,
                bounds.max_width,
            ),
            axis(
                session.origin.y,
                pointer.y - session.press.y,
                session.size.height,
                bounds.max_height,
            ),
        )
    }

    fn drop_on_target(
        &self,
        tree: &mut ContainerTree,
        session: &DragSession,
        target: &str,
        confirm: &dyn ConfirmDrop,
        gateway: &mut dyn PersistenceGateway,
        items: &mut dyn ItemStore,
    ) -> DragOutcome {
        let name = session.name.as_str();
        let target_leaf = tree.find_by_name(target).is_some_and(|c| c.is_item_leaf);
        let dragged_leaf = tree.find_by_name(name).is_some_and(|c| c.is_item_leaf);
        match (target_leaf, dragged_leaf) {
            (true, true) => merge(tree, name, target, confirm, gateway, items),
            (true, false) => reverted(name, RevertReason::ItemLeafTarget(target.to_string())),
            (false, _) => self.reparent(tree, name, target, confirm, gateway),
        }
    }

    fn reparent(
        &self,
        tree: &mut ContainerTree,
        name: &str,
        target: &str,
        confirm: &dyn ConfirmDrop,
        gateway: &mut dyn PersistenceGateway,
    ) -> DragOutcome {
        match tree.check_reparent(name, target) {
            Ok(()) => {}
            Err(error @ LayoutError::CycleViolation { .. }) => {
                return reverted(name, RevertReason::Cycle(error));
            }
            Err(error) => return reverted(name, RevertReason::Overlap(error)),
        }
        if !confirm.confirm(&DropAction::Reparent {
            container: name,
            new_parent: target,
        }) {
            return reverted(name, RevertReason::Declined);
        }

        let before = tree.clone();
        let result = self.attach_at_origin(tree, name, target);
        let position = match result {
            Ok(position) => position,
            Err(error) => {
                *tree = before;
                return reverted(name, RevertReason::Overlap(error));
            }
        };

        if let Err(error) = gateway.save_staged(tree) {
            *tree = before;
            tracing::warn!(container = name, into = target, %error, "Could not stage reparent; tree restored");
            return reverted(name, RevertReason::Persistence(error.to_string()));
        }
        tracing::info!(container = name, new_parent = target, ?position, "Container reparented");
        DragOutcome::Reparented {
            name: name.to_string(),
            new_parent: target.to_string(),
            position,
        }
    }

    fn attach_at_origin(
        &self,
        tree: &mut ContainerTree,
        name: &str,
        target: &str,
    ) -> LayoutResult<GridPoint> {
        tree.reparent(name, target)?;
        ResizeController::make_room(&self.validator, tree, name)
    }

    fn move_free(
        tree: &mut ContainerTree,
        session: &DragSession,
        cell: GridPoint,
        gateway: &mut dyn PersistenceGateway,
    ) -> DragOutcome {
        let name = session.name.as_str();
        if cell == session.origin {
            return DragOutcome::Unchanged {
                name: name.to_string(),
            };
        }
        if let Some(container) = tree.find_by_name_mut(name) {
            container.position = cell;
        }
        let siblings = session
            .snapshot
            .parent()
            .and_then(|parent| tree.children_of(parent))
            .unwrap_or_default();
        if let Err(error) = LayoutValidator::check_siblings(siblings) {
            return reverted(name, RevertReason::Overlap(error));
        }
        if let Err(error) = gateway.save_staged(tree) {
            tracing::warn!(container = name, %error, "Could not stage move");
            return reverted(name, RevertReason::Persistence(error.to_string()));
        }
        tracing::info!(container = name, x = cell.x, y = cell.y, "Container moved");
        DragOutcome::Moved {
            name: name.to_string(),
            to: cell,
        }
    }

    fn transition(&mut self, next: DragPhase) {
        tracing::trace!(from = ?self.phase, to = ?next, "Drag phase");
        self.phase = next;
    }
}

fn merge(
    tree: &mut ContainerTree,
    source: &str,
    target: &str,
    confirm: &dyn ConfirmDrop,
    gateway: &mut dyn PersistenceGateway,
    items: &mut dyn ItemStore,
) -> DragOutcome {
    if !confirm.confirm(&DropAction::Merge { source, target }) {
        return reverted(source, RevertReason::Declined);
    }
    let loaded = items
        .load_items(target)
        .and_then(|t| items.load_items(source).map(|s| (t, s)));
    let (target_items, source_items) = match loaded {
        Ok(lists) => lists,
        Err(error) => return reverted(source, RevertReason::Persistence(error.to_string())),
    };
    let merged = merge_items(&target_items, &source_items);

    let before = tree.clone();
    if let Err(error) = tree.detach(source) {
        return reverted(source, RevertReason::Overlap(error));
    }
    if let Err(error) = gateway.save_staged(tree) {
        *tree = before;
        return reverted(source, RevertReason::Persistence(error.to_string()));
    }
    if let Err(error) = items
        .save_items(target, &merged)
        .and_then(|()| items.delete_items(source))
    {
        *tree = before;
        restore_items(items, target, &target_items, source, &source_items);
        if let Err(restage) = gateway.save_staged(tree) {
            tracing::warn!(%restage, "Could not restage layout after failed merge");
        }
        tracing::warn!(source, into = target, %error, "Could not store merged items; merge undone");
        return reverted(source, RevertReason::Persistence(error.to_string()));
    }

    tracing::info!(source, into = target, items = merged.len(), "Item containers merged");
    DragOutcome::Merged {
        source: source.to_string(),
        target: target.to_string(),
        items: merged.len(),
    }
}

fn restore_items(
    items: &mut dyn ItemStore,
    target: &str,
    target_items: &[Item],
    source: &str,
    source_items: &[Item],
) {
    for (name, list) in [(target, target_items), (source, source_items)] {
        if let Err(error) = items.save_items(name, list) {
            tracing::warn!(container = name, %error, "Could not restore item list");
        }
    }
}

fn reverted(name: &str, reason: RevertReason) -> DragOutcome {
    DragOutcome::Reverted {
        name: name.to_string(),
        reason,
    }
}
