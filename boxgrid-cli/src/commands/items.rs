//! Item list commands.

use std::path::Path;

use boxgrid_core::Item;

use crate::cli::OutputFormat;
use crate::error::CliError;
use crate::util::open_editor;

/// Items list command handler
pub fn cmd_items_list(
    config_path: Option<&Path>,
    container: &str,
    format: OutputFormat,
) -> Result<(), CliError> {
    let editor = open_editor(config_path)?;
    let items = editor.items(container)?;

    match format {
        OutputFormat::Tree => {
            if items.is_empty() {
                println!("'{container}' holds no items");
            }
            for item in &items {
                match &item.description {
                    Some(description) => {
                        println!("{} x{} - {description}", item.id, item.quantity);
                    }
                    None => println!("{} x{}", item.id, item.quantity),
                }
            }
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&items)
                .map_err(|e| CliError::Output(format!("Failed to serialize: {e}")))?;
            println!("{json}");
        }
    }
    Ok(())
}

/// Items set command handler
///
/// A quantity of zero removes the item.
pub fn cmd_items_set(
    config_path: Option<&Path>,
    container: &str,
    id: &str,
    qty: u32,
    description: Option<&str>,
    quiet: bool,
) -> Result<(), CliError> {
    let mut editor = open_editor(config_path)?;
    let items = upsert(editor.items(container)?, id, qty, description);
    editor.set_items(container, &items)?;
    if !quiet {
        if qty == 0 {
            println!("Removed '{id}' from '{container}'");
        } else {
            println!("'{container}' now holds {qty} of '{id}'");
        }
    }
    Ok(())
}

fn upsert(mut items: Vec<Item>, id: &str, qty: u32, description: Option<&str>) -> Vec<Item> {
    if qty == 0 {
        items.retain(|item| item.id != id);
        return items;
    }
    if let Some(item) = items.iter_mut().find(|item| item.id == id) {
        item.quantity = qty;
        if let Some(description) = description {
            item.description = Some(description.to_string());
        }
    } else {
        let mut item = Item::new(id, qty);
        item.description = description.map(str::to_string);
        items.push(item);
    }
    items
}
