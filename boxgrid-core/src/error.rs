//! Error types for `BoxGrid`
//!
//! Every failure is recovered locally by the operation that produced it. The
//! interactive controllers turn these errors into snap-back outcomes; the
//! editor façade and the CLI surface them to the caller.

use std::path::PathBuf;

use thiserror::Error;

use crate::models::GridRect;

/// Errors raised by layout queries, validation, and interactive edits.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LayoutError {
    /// A rectangle does not fit the grid or is smaller than the minimum size.
    #[error("container '{name}' out of bounds at {rect}")]
    BoundsViolation {
        /// Container whose rectangle was rejected
        name: String,
        /// The rejected rectangle
        rect: GridRect,
    },

    /// Two same-depth siblings would overlap.
    #[error("containers '{first}' and '{second}' overlap")]
    OverlapConflict {
        /// First container of the overlapping pair
        first: String,
        /// Second container of the overlapping pair
        second: String,
    },

    /// Reparenting would make a container its own ancestor.
    #[error("cannot move '{dragged}' into its own descendant '{target}'")]
    CycleViolation {
        /// Container being moved
        dragged: String,
        /// Requested new parent
        target: String,
    },

    /// No container with this name exists in the tree.
    #[error("container not found: {0}")]
    ContainerNotFound(String),

    /// A container with this name already exists.
    #[error("container name already in use: {0}")]
    DuplicateName(String),

    /// The operation needs a parent but the container is the root.
    #[error("container '{0}' has no parent")]
    NoParent(String),

    /// Item-leaf containers hold items, not sub-containers.
    #[error("item container '{0}' cannot hold sub-containers")]
    ItemLeafChildren(String),

    /// The container holds sub-containers, not items.
    #[error("container '{0}' does not hold items")]
    NotItemLeaf(String),

    /// Container names must not be empty or blank.
    #[error("invalid container name: '{0}'")]
    InvalidName(String),

    /// Color value is not `#RGB`, `#RRGGBB` or `#AARRGGBB`.
    #[error("invalid color value: {0}")]
    InvalidColor(String),

    /// A child's depth is not its parent's depth plus one.
    #[error("container '{name}' has depth {actual}, expected {expected}")]
    InvalidDepth {
        /// Offending container
        name: String,
        /// Depth implied by the parent
        expected: u32,
        /// Depth found on the container
        actual: u32,
    },

    /// Another resize or drag already owns the tree.
    #[error("another interaction is already in progress")]
    InteractionInProgress,

    /// A pointer event arrived with no interaction in progress.
    #[error("no interaction in progress")]
    NoActiveInteraction,
}

/// Result type for layout operations
pub type LayoutResult<T> = std::result::Result<T, LayoutError>;

/// Errors raised by the persistence gateway and item store.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// I/O error while reading or writing a persisted file
    #[error("I/O error at {path}: {source}")]
    Io {
        /// File that failed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Failed to serialize the tree or an item list
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Failed to parse a persisted document
    #[error("Deserialization error: {0}")]
    Deserialization(String),

    /// A persisted document parsed but violates the layout invariants
    #[error("Malformed persisted state: {0}")]
    MalformedPersistedState(String),

    /// Failure injected by an in-memory test double
    #[error("Injected persistence failure: {0}")]
    Injected(String),
}

/// Result type for persistence operations
pub type PersistenceResult<T> = std::result::Result<T, PersistenceError>;

/// Errors raised while loading or saving settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error on the settings file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The settings file is not valid TOML for `LayoutSettings`
    #[error("Failed to parse settings: {0}")]
    Parse(String),

    /// Settings could not be serialized
    #[error("Failed to serialize settings: {0}")]
    Serialize(String),

    /// A setting has an invalid value
    #[error("Invalid setting '{field}': {reason}")]
    Validation {
        /// Setting key
        field: String,
        /// Why the value was rejected
        reason: String,
    },

    /// No platform configuration directory could be determined
    #[error("Could not determine configuration directory")]
    NoConfigDir,
}

/// Result type for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Umbrella error for the `BoxGrid` core library
#[derive(Debug, Error)]
pub enum BoxGridError {
    /// Layout rejected the operation
    #[error(transparent)]
    Layout(#[from] LayoutError),

    /// Persistence failed
    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    /// Configuration failed
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Raw I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for façade operations
pub type BoxGridResult<T> = std::result::Result<T, BoxGridError>;
