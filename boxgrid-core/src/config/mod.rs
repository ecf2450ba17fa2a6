//! Configuration management for `BoxGrid`
//!
//! This module provides the `ConfigManager` for loading and saving
//! layout settings in TOML format.

mod manager;
pub mod settings;

pub use manager::{ConfigManager, SETTINGS_FILE};
pub use settings::{DropSettings, GridSettings, LayoutSettings, PointerSettings};
