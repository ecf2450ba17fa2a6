//! `BoxGrid` Core Library
//!
//! This crate provides the layout engine for the `BoxGrid` inventory
//! organizer: a tree of named containers placed on integer grids, with
//! pointer-driven resize and drag interactions that keep every sibling group
//! inside its grid and free of overlaps.
//!
//! # Crate Structure
//!
//! - [`models`] - Grid geometry, containers, items
//! - [`layout`] - The container tree and the layout validator
//! - [`interaction`] - Resize (chain push/pull) and drag (merge, reparent)
//! - [`persistence`] - Staged/committed layout storage and item lists
//! - [`editor`] - The façade host UIs and the CLI drive
//! - [`config`] - Settings and data directory resolution
//! - [`tracing`] - Structured logging setup

// Enable missing_docs warning for public API documentation
#![warn(missing_docs)]

pub mod config;
pub mod editor;
pub mod error;
pub mod interaction;
pub mod layout;
pub mod models;
pub mod persistence;
pub mod tracing;

pub use config::{ConfigManager, DropSettings, GridSettings, LayoutSettings, PointerSettings};
pub use editor::{InteractionOutcome, LayoutEditor, PointerFeedback, RefreshCallback};
pub use error::{
    BoxGridError, BoxGridResult, ConfigError, ConfigResult, LayoutError, LayoutResult,
    PersistenceError, PersistenceResult,
};
pub use interaction::{
    AlwaysConfirm, ConfirmDrop, ConfirmWith, DragController, DragOutcome, DragPhase, DropAction,
    DropCandidate, DropMetrics, DropThresholds, FrameOutcome, HandleId, HandleRegistry,
    HiddenHandle, InteractionSurface, LayoutSnapshot, NeverConfirm, NullSurface, PointerCapture,
    PointerPosition, RecordingSurface, ResizeController, ResizeHandle, ResizeOutcome, ResizePhase,
    RevertReason, SnapshotEntry, intersection_over_union, propagate_resize, resolve_drop_target,
};
pub use layout::{ContainerTree, GridBounds, LayoutValidator, ROOT_NAME, adjust_depth};
pub use models::{
    Axis, Container, DEFAULT_COLOR, GridPoint, GridRect, GridSize, Item, is_valid_color,
    merge_items,
};
pub use persistence::{
    COMMITTED_FILE, FileItemStore, FilePersistence, ITEMS_DIR, ItemStore, LAYOUT_FORMAT_VERSION,
    LayoutDocument, MemoryItemStore, MemoryPersistence, PersistenceGateway, STAGED_FILE,
};
pub use tracing::{
    TracingConfig, TracingError, TracingLevel, TracingResult, init_tracing,
    is_tracing_initialized, span_names,
};
