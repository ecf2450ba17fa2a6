//! Commit and revert of staged layout changes.

use std::path::Path;

use crate::error::CliError;
use crate::util::open_editor;

/// Commit command handler
pub fn cmd_commit(config_path: Option<&Path>, quiet: bool) -> Result<(), CliError> {
    let mut editor = open_editor(config_path)?;
    if !editor.has_staged_changes() {
        if !quiet {
            println!("Nothing to commit");
        }
        return Ok(());
    }
    editor.commit()?;
    if !quiet {
        println!("Layout committed");
    }
    Ok(())
}

/// Revert command handler
pub fn cmd_revert(config_path: Option<&Path>, quiet: bool) -> Result<(), CliError> {
    let mut editor = open_editor(config_path)?;
    if !editor.has_staged_changes() {
        if !quiet {
            println!("Nothing to revert");
        }
        return Ok(());
    }
    editor.revert_staged()?;
    if !quiet {
        println!("Staged changes discarded");
    }
    Ok(())
}
