//! Command handler modules for the CLI.

mod completions;
mod edit;
mod interact;
mod items;
mod show;
mod staging;

use std::path::Path;

use crate::cli::{Commands, ItemsCommands};
use crate::error::CliError;

/// Dispatch a CLI command to the appropriate handler.
pub fn dispatch(config_path: Option<&Path>, command: Commands, quiet: bool) -> Result<(), CliError> {
    match command {
        Commands::Show { name, format } => show::cmd_show(config_path, name.as_deref(), format),
        Commands::Add {
            name,
            parent,
            x,
            y,
            width,
            height,
            kind,
            color,
            categories,
            items,
        } => edit::cmd_add(
            config_path,
            &edit::AddParams {
                name: &name,
                parent: &parent,
                x,
                y,
                width,
                height,
                kind: kind.as_deref(),
                color: color.as_deref(),
                categories: &categories,
                item_leaf: items,
            },
            quiet,
        ),
        Commands::Remove { name } => edit::cmd_remove(config_path, &name, quiet),
        Commands::Rename { old, new } => edit::cmd_rename(config_path, &old, &new, quiet),
        Commands::Reparent { name, parent } => {
            edit::cmd_reparent(config_path, &name, &parent, quiet)
        }
        Commands::Color { name, color } => edit::cmd_color(config_path, &name, &color, quiet),
        Commands::Resize {
            name,
            handle,
            dx,
            dy,
        } => interact::cmd_resize(config_path, &name, handle, dx, dy, quiet),
        Commands::Move { name, dx, dy, yes } => {
            interact::cmd_move(config_path, &name, dx, dy, yes, quiet)
        }
        Commands::Items(ItemsCommands::List { container, format }) => {
            items::cmd_items_list(config_path, &container, format)
        }
        Commands::Items(ItemsCommands::Set {
            container,
            id,
            qty,
            description,
        }) => items::cmd_items_set(
            config_path,
            &container,
            &id,
            qty,
            description.as_deref(),
            quiet,
        ),
        Commands::Commit => staging::cmd_commit(config_path, quiet),
        Commands::Revert => staging::cmd_revert(config_path, quiet),
        Commands::Completions { shell } => completions::cmd_completions(shell),
    }
}
