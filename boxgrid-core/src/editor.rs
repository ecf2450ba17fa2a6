//! Layout editor façade
//!
//! [`LayoutEditor`] owns the tree and everything that may change it: the
//! persistence gateway, the item store, the handle registry and the two
//! interaction controllers. Host UIs forward pointer events and menu actions
//! here and redraw from the refresh callback.
//!
//! At most one interaction (resize or drag) is active at a time. Structural
//! edits are refused while one is in progress.

use std::rc::Rc;

use crate::config::{ConfigManager, LayoutSettings};
use crate::error::{BoxGridResult, LayoutError};
use crate::interaction::{
    ConfirmDrop, DragController, DragOutcome, FrameOutcome, HandleRegistry, InteractionSurface,
    NullSurface, PointerPosition, ResizeController, ResizeHandle, ResizeOutcome,
};
use crate::layout::{ContainerTree, LayoutValidator};
use crate::models::{Container, GridPoint, Item, is_valid_color};
use crate::persistence::{FileItemStore, FilePersistence, ItemStore, PersistenceGateway};

/// Called with the current tree after every applied change.
pub type RefreshCallback = Box<dyn FnMut(&ContainerTree)>;

/// Feedback for a pointer move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PointerFeedback {
    /// Resize frame result
    Resize(FrameOutcome),
    /// Drag move result
    Drag {
        /// False if the move was under the jitter threshold
        accepted: bool,
        /// Cell the container would land on
        preview: Option<GridPoint>,
    },
}

/// Result of releasing the pointer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InteractionOutcome {
    /// A resize ended
    Resize(ResizeOutcome),
    /// A drag ended
    Drag(DragOutcome),
}

impl InteractionOutcome {
    /// Returns true if the tree was changed and staged.
    #[must_use]
    pub const fn changed_layout(&self) -> bool {
        matches!(
            self,
            Self::Resize(ResizeOutcome::Committed { .. })
                | Self::Drag(
                    DragOutcome::Moved { .. }
                        | DragOutcome::Merged { .. }
                        | DragOutcome::Reparented { .. }
                )
        )
    }
}

/// Owns the container tree and applies every edit to it.
pub struct LayoutEditor {
    tree: ContainerTree,
    settings: LayoutSettings,
    validator: LayoutValidator,
    gateway: Box<dyn PersistenceGateway>,
    items: Box<dyn ItemStore>,
    surface: Rc<dyn InteractionSurface>,
    handles: HandleRegistry,
    resize: ResizeController,
    drag: DragController,
    refresh: Option<RefreshCallback>,
}

impl std::fmt::Debug for LayoutEditor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayoutEditor")
            .field("containers", &self.tree.container_count())
            .field("settings", &self.settings)
            .field("resize", &self.resize)
            .field("drag", &self.drag)
            .finish_non_exhaustive()
    }
}

impl LayoutEditor {
    /// Creates an editor and loads the tree from `gateway`.
    #[must_use]
    pub fn new(
        settings: LayoutSettings,
        gateway: Box<dyn PersistenceGateway>,
        items: Box<dyn ItemStore>,
    ) -> Self {
        let validator = LayoutValidator::new(settings.bounds());
        let tree = gateway.load();
        let handles = HandleRegistry::from_tree(&tree);
        Self {
            tree,
            settings,
            validator,
            gateway,
            items,
            surface: Rc::new(NullSurface),
            handles,
            resize: ResizeController::new(validator, settings.pointer.cell_px),
            drag: DragController::new(
                validator,
                settings.drop_thresholds(),
                settings.pointer.cell_px,
                settings.pointer.jitter_px,
            ),
            refresh: None,
        }
    }

    /// Opens the file-backed layout in the manager's data directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings file exists but cannot be loaded.
    pub fn open(config: &ConfigManager) -> BoxGridResult<Self> {
        let settings = config.load_settings()?;
        let validator = LayoutValidator::new(settings.bounds());
        let gateway = FilePersistence::new(config.data_dir(), validator);
        let items = FileItemStore::new(config.data_dir());
        Ok(Self::new(settings, Box::new(gateway), Box::new(items)))
    }

    /// Replaces the interaction surface.
    #[must_use]
    pub fn with_surface(mut self, surface: Rc<dyn InteractionSurface>) -> Self {
        self.surface = surface;
        self
    }

    /// Sets the refresh callback.
    pub fn set_refresh(&mut self, callback: impl FnMut(&ContainerTree) + 'static) {
        self.refresh = Some(Box::new(callback));
    }

    /// The current tree.
    #[must_use]
    pub const fn tree(&self) -> &ContainerTree {
        &self.tree
    }

    /// Active settings.
    #[must_use]
    pub const fn settings(&self) -> &LayoutSettings {
        &self.settings
    }

    /// Name → handle registry.
    #[must_use]
    pub const fn handles(&self) -> &HandleRegistry {
        &self.handles
    }

    /// Returns true while a resize or drag is in progress.
    #[must_use]
    pub const fn is_interacting(&self) -> bool {
        self.resize.is_active() || self.drag.is_active()
    }

    /// Returns true if unsaved (staged) changes exist.
    #[must_use]
    pub fn has_staged_changes(&self) -> bool {
        self.gateway.has_staged()
    }

    // ---------------------------------------------------------------------
    // Structural edits
    // ---------------------------------------------------------------------

    /// Adds `container` as the last child of `parent`.
    ///
    /// Adding a container that already exists under `parent` with the same
    /// attributes is a no-op and returns false.
    ///
    /// # Errors
    ///
    /// Fails if an interaction is active, the name is taken elsewhere, the
    /// color is invalid, the result breaks a layout invariant, or staging
    /// fails.
    pub fn add_box(&mut self, parent: &str, mut container: Container) -> BoxGridResult<bool> {
        self.ensure_idle()?;
        if let Some(existing) = self.tree.find_by_name(&container.name) {
            let same_parent = self
                .tree
                .find_parent_of(&container.name)
                .is_some_and(|p| p.name == parent);
            container.depth = existing.depth;
            if same_parent && *existing == container {
                return Ok(false);
            }
            return Err(LayoutError::DuplicateName(container.name).into());
        }
        check_name(&container.name)?;
        if !is_valid_color(&container.color) {
            return Err(LayoutError::InvalidColor(container.color).into());
        }

        let before = self.tree.clone();
        let name = container.name.clone();
        let added = self.tree.attach(parent, container).and_then(|()| {
            self.tree
                .find_by_name(&name)
                .map_or(Ok(()), |c| self.validator.check_container(c))
                .and_then(|()| {
                    self.tree
                        .children_of(parent)
                        .map_or(Ok(()), LayoutValidator::check_siblings)
                })
                .and_then(|()| self.tree.validate(&self.validator))
        });
        if let Err(error) = added {
            self.tree = before;
            return Err(error.into());
        }
        if let Err(error) = self.gateway.save_staged(&self.tree) {
            self.tree = before;
            return Err(error.into());
        }
        if let Some(node) = self.tree.find_by_name(&name) {
            for n in subtree_names(node) {
                self.handles.register(&n);
            }
        }
        tracing::info!(container = %name, parent, "Container added");
        self.notify();
        Ok(true)
    }

    /// Removes `name` with its subtree and deletes the item lists it held.
    ///
    /// # Errors
    ///
    /// Fails for the root, unknown names, during an interaction, or if staging
    /// fails.
    pub fn remove(&mut self, name: &str) -> BoxGridResult<Container> {
        self.ensure_idle()?;
        let before = self.tree.clone();
        let removed = self.tree.detach(name)?;
        if let Err(error) = self.gateway.save_staged(&self.tree) {
            self.tree = before;
            return Err(error.into());
        }
        for node in item_leaves(&removed) {
            if let Err(error) = self.items.delete_items(&node) {
                tracing::warn!(container = %node, %error, "Could not delete item list");
            }
        }
        for n in subtree_names(&removed) {
            self.handles.unregister(&n);
        }
        tracing::info!(container = name, "Container removed");
        self.notify();
        Ok(removed)
    }

    /// Renames a container, carrying its item list along.
    ///
    /// Returns false if `old == new`.
    ///
    /// # Errors
    ///
    /// Fails if `old` is unknown, `new` is blank or taken, during an
    /// interaction, or if the item list or layout cannot be saved.
    pub fn rename(&mut self, old: &str, new: &str) -> BoxGridResult<bool> {
        self.ensure_idle()?;
        if old == new {
            return Ok(false);
        }
        check_name(new)?;
        let is_leaf = self
            .tree
            .find_by_name(old)
            .map(|c| c.is_item_leaf)
            .ok_or_else(|| LayoutError::ContainerNotFound(old.to_string()))?;
        self.tree.rename(old, new)?;
        if is_leaf && let Err(error) = self.items.rename_items(old, new) {
            self.tree.rename(new, old)?;
            return Err(error.into());
        }
        if let Err(error) = self.gateway.save_staged(&self.tree) {
            if is_leaf && let Err(undo) = self.items.rename_items(new, old) {
                tracing::warn!(container = new, error = %undo, "Could not move item list back");
            }
            self.tree.rename(new, old)?;
            return Err(error.into());
        }
        self.handles.rename(old, new);
        tracing::info!(from = old, to = new, "Container renamed");
        self.notify();
        Ok(true)
    }

    /// Moves `name` with its subtree under `new_parent`.
    ///
    /// The container lands at the origin cell, or at the first free cell if
    /// its new siblings cannot be pushed aside. Returns where it was placed.
    ///
    /// # Errors
    ///
    /// Fails with `CycleViolation` if `new_parent` lies inside the moved
    /// subtree, for unknown names, item-leaf parents, a full parent, during
    /// an interaction, or if staging fails. The tree is unchanged on error.
    pub fn reparent(&mut self, name: &str, new_parent: &str) -> BoxGridResult<GridPoint> {
        self.ensure_idle()?;
        let before = self.tree.clone();
        self.tree.reparent(name, new_parent)?;
        let placed = ResizeController::make_room(&self.validator, &mut self.tree, name)
            .and_then(|position| self.tree.validate(&self.validator).map(|()| position));
        let position = match placed {
            Ok(position) => position,
            Err(error) => {
                self.tree = before;
                return Err(error.into());
            }
        };
        if let Err(error) = self.gateway.save_staged(&self.tree) {
            self.tree = before;
            return Err(error.into());
        }
        tracing::info!(container = name, new_parent, ?position, "Container reparented");
        self.notify();
        Ok(position)
    }

    /// Sets the fill color of `name`.
    ///
    /// Returns false if the color is unchanged.
    ///
    /// # Errors
    ///
    /// Fails for invalid colors or unknown names, during an interaction, or
    /// if staging fails.
    pub fn edit_color(&mut self, name: &str, color: &str) -> BoxGridResult<bool> {
        self.ensure_idle()?;
        if !is_valid_color(color) {
            return Err(LayoutError::InvalidColor(color.to_string()).into());
        }
        let container = self
            .tree
            .find_by_name_mut(name)
            .ok_or_else(|| LayoutError::ContainerNotFound(name.to_string()))?;
        if container.color == color {
            return Ok(false);
        }
        let previous = std::mem::replace(&mut container.color, color.to_string());
        if let Err(error) = self.gateway.save_staged(&self.tree) {
            if let Some(container) = self.tree.find_by_name_mut(name) {
                container.color = previous;
            }
            return Err(error.into());
        }
        self.notify();
        Ok(true)
    }

    /// Items held by `name`.
    ///
    /// # Errors
    ///
    /// Fails for unknown names, containers that are not item leaves, or
    /// unreadable item lists.
    pub fn items(&self, name: &str) -> BoxGridResult<Vec<Item>> {
        self.require_item_leaf(name)?;
        Ok(self.items.load_items(name)?)
    }

    /// Replaces the items held by `name`.
    ///
    /// # Errors
    ///
    /// Fails for unknown names, containers that are not item leaves, or if the
    /// list cannot be written.
    pub fn set_items(&mut self, name: &str, items: &[Item]) -> BoxGridResult<()> {
        self.require_item_leaf(name)?;
        self.items.save_items(name, items)?;
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Persistence
    // ---------------------------------------------------------------------

    /// Promotes the current tree to the committed copy.
    ///
    /// # Errors
    ///
    /// Fails during an interaction or if the gateway fails.
    pub fn commit(&mut self) -> BoxGridResult<()> {
        self.ensure_idle()?;
        self.gateway.commit(&self.tree)?;
        Ok(())
    }

    /// Discards staged changes and reloads the committed tree.
    ///
    /// # Errors
    ///
    /// Returns an error if the staged copy cannot be removed.
    pub fn revert_staged(&mut self) -> BoxGridResult<()> {
        self.gateway.revert()?;
        self.reload_all();
        Ok(())
    }

    /// Reloads the tree from the gateway, abandoning any active interaction.
    pub fn reload_all(&mut self) {
        self.cancel_interaction();
        self.tree = self.gateway.load();
        self.handles.rebuild(&self.tree);
        self.notify();
    }

    // ---------------------------------------------------------------------
    // Pointer events
    // ---------------------------------------------------------------------

    /// Starts resizing `name` from `handle`.
    ///
    /// # Errors
    ///
    /// Fails if an interaction is active or the name is unknown.
    pub fn press_resize_handle(
        &mut self,
        name: &str,
        handle: ResizeHandle,
        pointer: PointerPosition,
    ) -> BoxGridResult<()> {
        self.ensure_idle()?;
        let id = self.handles.register(name);
        self.resize
            .begin(&self.tree, name, handle, pointer, &self.surface, id)?;
        Ok(())
    }

    /// Starts dragging `name`.
    ///
    /// # Errors
    ///
    /// Fails if an interaction is active, for the root, or for unknown names.
    pub fn press_container(&mut self, name: &str, pointer: PointerPosition) -> BoxGridResult<()> {
        self.ensure_idle()?;
        let id = self.handles.register(name);
        self.drag
            .begin(&self.tree, name, pointer, &self.surface, id)?;
        Ok(())
    }

    /// Forwards a pointer move to the active interaction.
    ///
    /// # Errors
    ///
    /// Fails with `NoActiveInteraction` when nothing is pressed.
    pub fn pointer_moved(&mut self, pointer: PointerPosition) -> BoxGridResult<PointerFeedback> {
        if self.resize.is_active() {
            let frame = self.resize.update(&mut self.tree, pointer)?;
            if matches!(frame, FrameOutcome::Applied { .. } | FrameOutcome::RolledBack(_)) {
                self.notify();
            }
            return Ok(PointerFeedback::Resize(frame));
        }
        if self.drag.is_active() {
            let accepted = self.drag.pointer_moved(pointer)?;
            return Ok(PointerFeedback::Drag {
                accepted,
                preview: self.drag.preview_cell(),
            });
        }
        Err(LayoutError::NoActiveInteraction.into())
    }

    /// Ends the active interaction at `pointer`.
    ///
    /// # Errors
    ///
    /// Fails with `NoActiveInteraction` when nothing is pressed.
    pub fn pointer_released(
        &mut self,
        pointer: PointerPosition,
        confirm: &dyn ConfirmDrop,
    ) -> BoxGridResult<InteractionOutcome> {
        let outcome = if self.resize.is_active() {
            self.resize.update(&mut self.tree, pointer)?;
            InteractionOutcome::Resize(self.resize.finish(&mut self.tree, self.gateway.as_mut())?)
        } else if self.drag.is_active() {
            let outcome = self.drag.finish(
                &mut self.tree,
                pointer,
                confirm,
                self.gateway.as_mut(),
                self.items.as_mut(),
            )?;
            if let DragOutcome::Merged { source, .. } = &outcome {
                self.handles.unregister(source);
            }
            InteractionOutcome::Drag(outcome)
        } else {
            return Err(LayoutError::NoActiveInteraction.into());
        };
        self.notify();
        Ok(outcome)
    }

    /// Abandons the active interaction, restoring the pre-press layout.
    ///
    /// Returns false if nothing was active.
    pub fn cancel_interaction(&mut self) -> bool {
        let cancelled = self.resize.cancel(&mut self.tree) || self.drag.cancel(&mut self.tree);
        if cancelled {
            self.notify();
        }
        cancelled
    }

    fn ensure_idle(&self) -> Result<(), LayoutError> {
        if self.is_interacting() {
            Err(LayoutError::InteractionInProgress)
        } else {
            Ok(())
        }
    }

    fn require_item_leaf(&self, name: &str) -> Result<(), LayoutError> {
        let container = self
            .tree
            .find_by_name(name)
            .ok_or_else(|| LayoutError::ContainerNotFound(name.to_string()))?;
        if container.is_item_leaf {
            Ok(())
        } else {
            Err(LayoutError::NotItemLeaf(name.to_string()))
        }
    }

    fn notify(&mut self) {
        if let Some(callback) = self.refresh.as_mut() {
            callback(&self.tree);
        }
    }
}

fn check_name(name: &str) -> Result<(), LayoutError> {
    if name.trim().is_empty() {
        Err(LayoutError::InvalidName(name.to_string()))
    } else {
        Ok(())
    }
}

fn subtree_names(node: &Container) -> Vec<String> {
    let mut names = vec![node.name.clone()];
    for child in &node.children {
        names.extend(subtree_names(child));
    }
    names
}

fn item_leaves(node: &Container) -> Vec<String> {
    if node.is_item_leaf {
        return vec![node.name.clone()];
    }
    node.children.iter().flat_map(item_leaves).collect()
}
