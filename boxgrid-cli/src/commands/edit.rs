//! Structural edit commands: add, remove, rename, reparent, color.

use std::path::Path;

use boxgrid_core::Container;

use crate::error::CliError;
use crate::util::open_editor;

/// Parameters for the add command
pub struct AddParams<'a> {
    pub name: &'a str,
    pub parent: &'a str,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub kind: Option<&'a str>,
    pub color: Option<&'a str>,
    pub categories: &'a [String],
    pub item_leaf: bool,
}

impl AddParams<'_> {
    fn to_container(&self) -> Container {
        let mut container = if self.item_leaf {
            Container::item_leaf(self.name)
        } else {
            Container::new(self.name)
        }
        .at(self.x, self.y)
        .sized(self.width, self.height);
        if let Some(kind) = self.kind {
            container = container.with_kind(kind);
        }
        if let Some(color) = self.color {
            container = container.with_color(color);
        }
        for category in self.categories {
            container = container.with_category(category.as_str());
        }
        container
    }
}

/// Add command handler
pub fn cmd_add(config_path: Option<&Path>, params: &AddParams<'_>, quiet: bool) -> Result<(), CliError> {
    let mut editor = open_editor(config_path)?;
    let added = editor.add_box(params.parent, params.to_container())?;
    if !quiet {
        if added {
            println!("Added '{}' to '{}'", params.name, params.parent);
        } else {
            println!("'{}' already exists in '{}'; nothing to do", params.name, params.parent);
        }
    }
    Ok(())
}

/// Remove command handler
pub fn cmd_remove(config_path: Option<&Path>, name: &str, quiet: bool) -> Result<(), CliError> {
    let mut editor = open_editor(config_path)?;
    let removed = editor.remove(name)?;
    if !quiet {
        let inner = boxgrid_core::ContainerTree::count_descendants(&removed);
        if inner == 0 {
            println!("Removed '{name}'");
        } else {
            println!("Removed '{name}' and {inner} container(s) inside it");
        }
    }
    Ok(())
}

/// Rename command handler
pub fn cmd_rename(
    config_path: Option<&Path>,
    old: &str,
    new: &str,
    quiet: bool,
) -> Result<(), CliError> {
    let mut editor = open_editor(config_path)?;
    if editor.rename(old, new)? && !quiet {
        println!("Renamed '{old}' to '{new}'");
    }
    Ok(())
}

/// Reparent command handler
pub fn cmd_reparent(
    config_path: Option<&Path>,
    name: &str,
    parent: &str,
    quiet: bool,
) -> Result<(), CliError> {
    let mut editor = open_editor(config_path)?;
    let position = editor.reparent(name, parent)?;
    if !quiet {
        println!(
            "Moved '{name}' into '{parent}' at {},{}",
            position.x, position.y
        );
    }
    Ok(())
}

/// Color command handler
pub fn cmd_color(
    config_path: Option<&Path>,
    name: &str,
    color: &str,
    quiet: bool,
) -> Result<(), CliError> {
    let mut editor = open_editor(config_path)?;
    if editor.edit_color(name, color)? && !quiet {
        println!("Set color of '{name}' to {color}");
    }
    Ok(())
}
