//! CLI error types and exit codes.

use boxgrid_core::{BoxGridError, LayoutError};

/// Exit codes for CLI operations
pub mod exit_codes {
    /// General error - configuration, storage, or I/O
    pub const GENERAL_ERROR: i32 = 1;
    /// The layout refused the edit: bounds, overlap, cycle, unknown name, or
    /// a reverted drop
    pub const LAYOUT_REJECTED: i32 = 2;
}

/// CLI error type
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// The layout rejected the edit
    #[error("{0}")]
    Layout(#[from] LayoutError),

    /// A resize or drop was rolled back
    #[error("Reverted: {0}")]
    Reverted(String),

    /// Layout or item storage failed
    #[error("Storage error: {0}")]
    Storage(String),

    /// Output could not be produced
    #[error("Output error: {0}")]
    Output(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<BoxGridError> for CliError {
    fn from(err: BoxGridError) -> Self {
        match err {
            BoxGridError::Layout(e) => Self::Layout(e),
            BoxGridError::Persistence(e) => Self::Storage(e.to_string()),
            BoxGridError::Config(e) => Self::Config(e.to_string()),
            BoxGridError::Io(e) => Self::Io(e),
        }
    }
}

impl CliError {
    /// Returns the appropriate exit code for this error type.
    ///
    /// Exit codes:
    /// - 0: Success (not an error)
    /// - 1: General error (configuration, storage, output, IO)
    /// - 2: Layout rejection (invalid edit, reverted resize or drop)
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Layout(_) | Self::Reverted(_) => exit_codes::LAYOUT_REJECTED,
            Self::Config(_) | Self::Storage(_) | Self::Output(_) | Self::Io(_) => {
                exit_codes::GENERAL_ERROR
            }
        }
    }
}
