//! CLI argument parsing types using `clap`.

use std::path::PathBuf;

use boxgrid_core::{ROOT_NAME, ResizeHandle};
use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

/// `BoxGrid` command-line interface for editing container layouts
#[derive(Parser)]
#[command(name = "boxgrid-cli")]
#[command(author, version, about = "BoxGrid command-line interface")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the configuration directory (holds settings and layout data)
    #[arg(short, long, global = true, env = "BOXGRID_CONFIG_DIR")]
    pub config: Option<PathBuf>,

    /// Increase output verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Show the container tree
    #[command(about = "Show the container tree or one subtree")]
    Show {
        /// Container to show (defaults to the root)
        name: Option<String>,

        /// Output format
        #[arg(short, long, default_value = "tree", value_enum)]
        format: OutputFormat,
    },

    /// Add a container
    #[command(about = "Add a container to a parent")]
    Add {
        /// Name of the new container
        name: String,

        /// Parent container
        #[arg(short, long, default_value = ROOT_NAME)]
        parent: String,

        /// Column of the top-left cell
        #[arg(short, long, default_value_t = 0)]
        x: i32,

        /// Row of the top-left cell
        #[arg(short, long, default_value_t = 0)]
        y: i32,

        /// Width in cells
        #[arg(short = 'W', long, default_value_t = 1)]
        width: i32,

        /// Height in cells
        #[arg(short = 'H', long, default_value_t = 1)]
        height: i32,

        /// Free-form kind (drawer, shelf, bin, ...)
        #[arg(short, long)]
        kind: Option<String>,

        /// Fill color (#RGB, #RRGGBB or #AARRGGBB)
        #[arg(long)]
        color: Option<String>,

        /// Accepted item category (repeatable)
        #[arg(long = "category", value_name = "CATEGORY")]
        categories: Vec<String>,

        /// Make the container hold items instead of sub-containers
        #[arg(long)]
        items: bool,
    },

    /// Remove a container with everything inside it
    #[command(about = "Remove a container and its subtree")]
    Remove {
        /// Container name
        name: String,
    },

    /// Rename a container
    #[command(about = "Rename a container")]
    Rename {
        /// Current name
        old: String,

        /// New name
        new: String,
    },

    /// Move a container into another one
    #[command(about = "Move a container and its subtree into another container")]
    Reparent {
        /// Container name
        name: String,

        /// New parent container
        parent: String,
    },

    /// Change a container's color
    #[command(about = "Change a container's fill color")]
    Color {
        /// Container name
        name: String,

        /// New color (#RGB, #RRGGBB or #AARRGGBB)
        color: String,
    },

    /// Resize a container, pushing or pulling its neighbours
    #[command(about = "Resize a container by whole cells")]
    Resize {
        /// Container name
        name: String,

        /// Handle to drag
        #[arg(long, default_value = "bottom-right", value_parser = parse_handle)]
        handle: ResizeHandle,

        /// Columns to add (negative to shrink)
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        dx: i32,

        /// Rows to add (negative to shrink)
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        dy: i32,
    },

    /// Drag a container by whole cells
    #[command(about = "Move a container; dropping onto a sibling merges or nests it")]
    Move {
        /// Container name
        name: String,

        /// Columns to move (negative for left)
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        dx: i32,

        /// Rows to move (negative for up)
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        dy: i32,

        /// Confirm merges and moves without asking
        #[arg(short = 'Y', long)]
        yes: bool,
    },

    /// Manage the items of an item container
    #[command(subcommand)]
    Items(ItemsCommands),

    /// Make the staged layout permanent
    #[command(about = "Commit staged layout changes")]
    Commit,

    /// Discard staged layout changes
    #[command(about = "Discard staged layout changes")]
    Revert,

    /// Generate shell completions
    #[command(about = "Generate shell completion scripts")]
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Item subcommands
#[derive(Subcommand)]
pub enum ItemsCommands {
    /// List the items of a container
    List {
        /// Item container name
        container: String,

        /// Output format
        #[arg(short, long, default_value = "tree", value_enum)]
        format: OutputFormat,
    },

    /// Set the quantity of one item (0 removes it)
    Set {
        /// Item container name
        container: String,

        /// Item identifier
        id: String,

        /// Quantity on hand
        qty: u32,

        /// Free-text note
        #[arg(short, long)]
        description: Option<String>,
    },
}

/// Output format options
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum OutputFormat {
    /// Indented, human-readable
    #[default]
    Tree,
    /// JSON
    Json,
}

fn parse_handle(value: &str) -> Result<ResizeHandle, String> {
    value.parse()
}
