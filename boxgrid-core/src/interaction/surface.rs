//! Presentation seam for pointer capture and handle visibility
//!
//! The engine never touches widgets. It asks an [`InteractionSurface`] to
//! capture the pointer or hide a resize handle, and it does so through guards
//! whose `Drop` undoes the request. An operation context that owns these
//! guards therefore releases them on every exit path: normal end, cancel,
//! early return, or unwinding.

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use super::handles::HandleId;

/// Pointer capture and handle visibility, implemented by the host UI.
pub trait InteractionSurface {
    /// Routes all pointer events to `handle` until released.
    fn capture_pointer(&self, handle: HandleId);

    /// Ends a capture started by [`capture_pointer`](Self::capture_pointer).
    fn release_pointer(&self, handle: HandleId);

    /// Shows or hides the resize handle of a container.
    fn set_handle_visible(&self, handle: HandleId, visible: bool);
}

/// A surface that ignores every request (headless use).
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSurface;

impl InteractionSurface for NullSurface {
    fn capture_pointer(&self, _handle: HandleId) {}
    fn release_pointer(&self, _handle: HandleId) {}
    fn set_handle_visible(&self, _handle: HandleId, _visible: bool) {}
}

/// A surface that records outstanding captures and hidden handles.
///
/// Useful to assert that no capture outlives its operation.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    captured: RefCell<HashSet<HandleId>>,
    hidden: RefCell<HashSet<HandleId>>,
    capture_count: RefCell<usize>,
}

impl RecordingSurface {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Handles that currently hold the pointer.
    #[must_use]
    pub fn captured(&self) -> HashSet<HandleId> {
        self.captured.borrow().clone()
    }

    /// Handles that are currently hidden.
    #[must_use]
    pub fn hidden(&self) -> HashSet<HandleId> {
        self.hidden.borrow().clone()
    }

    /// Total number of captures ever acquired.
    #[must_use]
    pub fn capture_count(&self) -> usize {
        *self.capture_count.borrow()
    }

    /// True when nothing is captured and nothing is hidden.
    #[must_use]
    pub fn is_quiet(&self) -> bool {
        self.captured.borrow().is_empty() && self.hidden.borrow().is_empty()
    }
}

impl InteractionSurface for RecordingSurface {
    fn capture_pointer(&self, handle: HandleId) {
        self.captured.borrow_mut().insert(handle);
        *self.capture_count.borrow_mut() += 1;
    }

    fn release_pointer(&self, handle: HandleId) {
        self.captured.borrow_mut().remove(&handle);
    }

    fn set_handle_visible(&self, handle: HandleId, visible: bool) {
        if visible {
            self.hidden.borrow_mut().remove(&handle);
        } else {
            self.hidden.borrow_mut().insert(handle);
        }
    }
}

/// Scoped pointer capture; released on drop.
#[must_use = "dropping the guard releases the capture immediately"]
pub struct PointerCapture {
    surface: Rc<dyn InteractionSurface>,
    handle: HandleId,
}

impl PointerCapture {
    /// Captures the pointer for `handle`.
    pub fn acquire(surface: &Rc<dyn InteractionSurface>, handle: HandleId) -> Self {
        surface.capture_pointer(handle);
        Self {
            surface: Rc::clone(surface),
            handle,
        }
    }

    /// The capturing handle.
    #[must_use]
    pub const fn handle(&self) -> HandleId {
        self.handle
    }
}

impl Drop for PointerCapture {
    fn drop(&mut self) {
        self.surface.release_pointer(self.handle);
    }
}

impl std::fmt::Debug for PointerCapture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PointerCapture")
            .field("handle", &self.handle)
            .finish_non_exhaustive()
    }
}

/// Scoped hiding of a resize handle; shown again on drop.
#[must_use = "dropping the guard shows the handle immediately"]
pub struct HiddenHandle {
    surface: Rc<dyn InteractionSurface>,
    handle: HandleId,
}

impl HiddenHandle {
    /// Hides the resize handle of `handle`.
    pub fn hide(surface: &Rc<dyn InteractionSurface>, handle: HandleId) -> Self {
        surface.set_handle_visible(handle, false);
        Self {
            surface: Rc::clone(surface),
            handle,
        }
    }
}

impl Drop for HiddenHandle {
    fn drop(&mut self) {
        self.surface.set_handle_visible(self.handle, true);
    }
}

impl std::fmt::Debug for HiddenHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HiddenHandle")
            .field("handle", &self.handle)
            .finish_non_exhaustive()
    }
}
