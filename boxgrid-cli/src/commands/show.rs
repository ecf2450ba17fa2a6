//! Show the container tree.

use std::fmt::Write as _;
use std::path::Path;

use boxgrid_core::{Container, LayoutError};

use crate::cli::OutputFormat;
use crate::error::CliError;
use crate::util::open_editor;

/// Show command handler
pub fn cmd_show(
    config_path: Option<&Path>,
    name: Option<&str>,
    format: OutputFormat,
) -> Result<(), CliError> {
    let editor = open_editor(config_path)?;
    let tree = editor.tree();
    let node = match name {
        Some(name) => tree
            .find_by_name(name)
            .ok_or_else(|| LayoutError::ContainerNotFound(name.to_string()))?,
        None => tree.root(),
    };

    match format {
        OutputFormat::Tree => {
            print!("{}", render_tree(node));
            if editor.has_staged_changes() {
                println!("(uncommitted changes: run `boxgrid-cli commit` to keep them)");
            }
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(node)
                .map_err(|e| CliError::Output(format!("Failed to serialize: {e}")))?;
            println!("{json}");
        }
    }
    Ok(())
}

/// Renders `node` and its subtree, one container per line.
pub fn render_tree(node: &Container) -> String {
    let mut out = String::new();
    render_node(node, 0, &mut out);
    out
}

fn render_node(node: &Container, indent: usize, out: &mut String) {
    let _ = write!(
        out,
        "{:indent$}{} {}",
        "",
        node.name,
        node.rect(),
        indent = indent * 2
    );
    if !node.kind.is_empty() {
        let _ = write!(out, " [{}]", node.kind);
    }
    if node.is_item_leaf {
        out.push_str(" (items)");
    }
    let _ = writeln!(out, " {}", node.color);
    for child in &node.children {
        render_node(child, indent + 1, out);
    }
}
