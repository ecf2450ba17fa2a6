//! Shared utility functions used across command modules.

use std::io::{BufRead, Write};
use std::path::Path;

use boxgrid_core::{ConfigManager, DropAction, LayoutEditor, PointerPosition};

use crate::error::CliError;

/// Creates a `ConfigManager` using the optional custom config directory
/// from CLI args.
pub fn create_config_manager(config_path: Option<&Path>) -> Result<ConfigManager, CliError> {
    match config_path {
        Some(path) => Ok(ConfigManager::with_config_dir(path.to_path_buf())),
        None => ConfigManager::new()
            .map_err(|e| CliError::Config(format!("Failed to initialize config: {e}"))),
    }
}

/// Opens the layout editor for the configured data directory.
pub fn open_editor(config_path: Option<&Path>) -> Result<LayoutEditor, CliError> {
    let config_manager = create_config_manager(config_path)?;
    Ok(LayoutEditor::open(&config_manager)?)
}

/// Pointer offset equivalent to moving by whole cells.
pub fn cells_to_pointer(editor: &LayoutEditor, dx: i32, dy: i32) -> PointerPosition {
    let cell = editor.settings().pointer.cell_px;
    PointerPosition::new(f64::from(dx) * cell, f64::from(dy) * cell)
}

/// Asks a yes/no question on stderr and reads the answer from stdin.
///
/// Anything but `y`/`yes` (including end of input) counts as no.
pub fn ask_confirmation(action: &DropAction<'_>) -> bool {
    eprint!("{action} [y/N] ");
    let _ = std::io::stderr().flush();
    let mut answer = String::new();
    if std::io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
