//! Resize and move commands.
//!
//! Each command replays a press, one pointer move and a release through the
//! editor, so the layout rules are exactly those of an interactive session.

use std::path::Path;

use boxgrid_core::{
    AlwaysConfirm, ConfirmDrop, ConfirmWith, DragOutcome, FrameOutcome, InteractionOutcome,
    PointerFeedback, PointerPosition, ResizeHandle, ResizeOutcome,
};

use crate::error::CliError;
use crate::util::{ask_confirmation, cells_to_pointer, open_editor};

/// Resize command handler
pub fn cmd_resize(
    config_path: Option<&Path>,
    name: &str,
    handle: ResizeHandle,
    dx: i32,
    dy: i32,
    quiet: bool,
) -> Result<(), CliError> {
    let mut editor = open_editor(config_path)?;
    let target = cells_to_pointer(&editor, dx, dy);

    editor.press_resize_handle(name, handle, PointerPosition::default())?;
    if let PointerFeedback::Resize(FrameOutcome::Rejected(e) | FrameOutcome::RolledBack(e)) =
        editor.pointer_moved(target)?
    {
        editor.cancel_interaction();
        return Err(e.into());
    }

    match editor.pointer_released(target, &AlwaysConfirm)? {
        InteractionOutcome::Resize(ResizeOutcome::Unchanged { name }) => {
            if !quiet {
                println!("'{name}' keeps its size");
            }
        }
        InteractionOutcome::Resize(ResizeOutcome::Committed {
            name,
            size,
            displaced,
        }) => {
            if !quiet {
                println!("Resized '{name}' to {}x{}", size.width, size.height);
                if !displaced.is_empty() {
                    println!("Moved to make room: {}", displaced.join(", "));
                }
            }
        }
        InteractionOutcome::Resize(ResizeOutcome::RolledBack { warning, .. }) => {
            return Err(CliError::Reverted(warning));
        }
        InteractionOutcome::Drag(_) => {}
    }
    Ok(())
}

/// Move command handler
///
/// Dropping onto another container asks for confirmation unless `yes` is set.
pub fn cmd_move(
    config_path: Option<&Path>,
    name: &str,
    dx: i32,
    dy: i32,
    yes: bool,
    quiet: bool,
) -> Result<(), CliError> {
    let mut editor = open_editor(config_path)?;
    let target = cells_to_pointer(&editor, dx, dy);

    let prompt = ConfirmWith(ask_confirmation);
    let confirm: &dyn ConfirmDrop = if yes { &AlwaysConfirm } else { &prompt };

    editor.press_container(name, PointerPosition::default())?;
    editor.pointer_moved(target)?;
    let InteractionOutcome::Drag(outcome) = editor.pointer_released(target, confirm)? else {
        return Ok(());
    };

    match outcome {
        DragOutcome::Unchanged { name } => {
            if !quiet {
                println!("'{name}' stays where it is");
            }
        }
        DragOutcome::Moved { name, to } => {
            if !quiet {
                println!("Moved '{name}' to {},{}", to.x, to.y);
            }
        }
        DragOutcome::Merged {
            source,
            target,
            items,
        } => {
            if !quiet {
                println!("Merged '{source}' into '{target}' ({items} item(s))");
            }
        }
        DragOutcome::Reparented {
            name,
            new_parent,
            position,
        } => {
            if !quiet {
                println!(
                    "Moved '{name}' into '{new_parent}' at {},{}",
                    position.x, position.y
                );
            }
        }
        DragOutcome::Reverted { name, reason } => {
            return Err(CliError::Reverted(format!("'{name}' was not moved: {reason}")));
        }
    }
    Ok(())
}
