//! Tracing integration for structured logging
//!
//! Logs go to stderr so that command output on stdout (`show --format json`)
//! stays machine readable. Spans are named after the interactive layout
//! operations (resize, drag, drop) and the persistence calls they trigger.

use std::sync::atomic::{AtomicBool, Ordering};

use thiserror::Error;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Set by the first call to [`init_tracing`]
static TRACING_INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Errors that can occur during tracing initialization
#[derive(Debug, Error)]
pub enum TracingError {
    /// Another subscriber is already installed
    #[error("Failed to initialize tracing: {0}")]
    InitializationFailed(String),

    /// `init_tracing` was called twice
    #[error("Tracing has already been initialized")]
    AlreadyInitialized,
}

/// Result type for tracing operations
pub type TracingResult<T> = Result<T, TracingError>;

/// Log level for the `BoxGrid` crates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TracingLevel {
    /// Only errors
    Error,
    /// Errors plus failed saves and skipped layout files
    #[default]
    Warn,
    /// Committed edits, resizes and drops
    Info,
    /// Rejected frames and repositioning
    Debug,
    /// Per-frame propagation and phase changes
    Trace,
}

impl TracingLevel {
    /// Maps a `-v` count to a level (0 = warn, 1 = info, 2 = debug, 3+ = trace)
    #[must_use]
    pub const fn from_verbosity(count: u8) -> Self {
        match count {
            0 => Self::Warn,
            1 => Self::Info,
            2 => Self::Debug,
            _ => Self::Trace,
        }
    }
}

impl std::fmt::Display for TracingLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warn => write!(f, "warn"),
            Self::Info => write!(f, "info"),
            Self::Debug => write!(f, "debug"),
            Self::Trace => write!(f, "trace"),
        }
    }
}

/// Configuration for tracing initialization
#[derive(Debug, Clone, Default)]
pub struct TracingConfig {
    /// Level applied to `boxgrid_core` and `boxgrid_cli`
    pub level: TracingLevel,
}

impl TracingConfig {
    /// Creates a configuration at the default (`warn`) level
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the log level
    #[must_use]
    pub const fn with_level(mut self, level: TracingLevel) -> Self {
        self.level = level;
        self
    }

    /// Filter directive used when `RUST_LOG` is not set.
    #[must_use]
    pub fn directive(&self) -> String {
        format!("boxgrid_cli={0},boxgrid_core={0}", self.level)
    }
}

/// Installs a stderr subscriber for the process.
///
/// A non-empty `RUST_LOG` replaces the configured level.
///
/// # Errors
///
/// Returns `AlreadyInitialized` on a second call and
/// `InitializationFailed` if another global subscriber is installed.
pub fn init_tracing(config: &TracingConfig) -> TracingResult<()> {
    if TRACING_INITIALIZED.swap(true, Ordering::SeqCst) {
        return Err(TracingError::AlreadyInitialized);
    }

    let filter = std::env::var("RUST_LOG")
        .ok()
        .filter(|value| !value.trim().is_empty())
        .and_then(|value| EnvFilter::try_new(value).ok())
        .unwrap_or_else(|| EnvFilter::new(config.directive()));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_writer(std::io::stderr),
        )
        .try_init()
        .map_err(|e| TracingError::InitializationFailed(e.to_string()))?;

    tracing::debug!(level = %config.level, "Tracing initialized");
    Ok(())
}

/// Checks if tracing has been initialized
#[must_use]
pub fn is_tracing_initialized() -> bool {
    TRACING_INITIALIZED.load(Ordering::SeqCst)
}

/// Opens an info-level span for a layout operation
///
/// ```ignore
/// let _span = boxgrid_core::trace_operation!(span_names::RESIZE_END, container = %name);
/// ```
#[macro_export]
macro_rules! trace_operation {
    ($name:expr) => {
        tracing::info_span!($name)
    };
    ($name:expr, $($field:tt)*) => {
        tracing::info_span!($name, $($field)*)
    };
}

/// Same as `trace_operation!` at debug level, for per-frame work
#[macro_export]
macro_rules! trace_operation_debug {
    ($name:expr) => {
        tracing::debug_span!($name)
    };
    ($name:expr, $($field:tt)*) => {
        tracing::debug_span!($name, $($field)*)
    };
}

/// Span names for `BoxGrid` operations
pub mod span_names {
    /// Resize handle pressed
    pub const RESIZE_BEGIN: &str = "resize.begin";
    /// Resize pointer frame
    pub const RESIZE_UPDATE: &str = "resize.update";
    /// Resize handle released
    pub const RESIZE_END: &str = "resize.end";
    /// Container press for drag
    pub const DRAG_BEGIN: &str = "drag.begin";
    /// Container released
    pub const DRAG_DROP: &str = "drag.drop";
    /// Post-drop repositioning
    pub const MAKE_ROOM: &str = "layout.make_room";
    /// Staged save
    pub const SAVE_STAGED: &str = "persistence.save_staged";
    /// Commit staged copy
    pub const COMMIT: &str = "persistence.commit";
    /// Layout load
    pub const LOAD: &str = "persistence.load";
    /// Settings load
    pub const CONFIG_LOAD: &str = "config.load";
    /// Settings save
    pub const CONFIG_SAVE: &str = "config.save";
}
