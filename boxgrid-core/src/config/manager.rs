//! Settings and data directory resolution

use std::path::{Path, PathBuf};

use crate::error::{ConfigError, ConfigResult};
use crate::trace_operation_debug;
use crate::tracing::span_names;

use super::settings::LayoutSettings;

/// Settings file name inside the configuration directory.
pub const SETTINGS_FILE: &str = "settings.toml";

const APP_DIR: &str = "boxgrid";

/// Loads and saves [`LayoutSettings`] and tells the persistence layer where
/// the layout data lives.
///
/// By default settings live under the platform configuration directory and
/// data under the platform data directory. With an explicit directory both
/// live there, which is what tests and the CLI's `--config` use.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_dir: PathBuf,
    data_dir: PathBuf,
}

impl ConfigManager {
    /// Creates a manager using the platform directories.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NoConfigDir` if the platform has no config dir.
    pub fn new() -> ConfigResult<Self> {
        let config_dir = dirs::config_dir()
            .ok_or(ConfigError::NoConfigDir)?
            .join(APP_DIR);
        let data_dir = dirs::data_dir()
            .map(|d| d.join(APP_DIR))
            .unwrap_or_else(|| config_dir.clone());
        Ok(Self {
            config_dir,
            data_dir,
        })
    }

    /// Creates a manager rooted at `dir` for both settings and data.
    #[must_use]
    pub fn with_config_dir(dir: PathBuf) -> Self {
        Self {
            data_dir: dir.clone(),
            config_dir: dir,
        }
    }

    /// Directory holding `settings.toml`.
    #[must_use]
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Directory holding the layout documents and item lists.
    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Full path of the settings file.
    #[must_use]
    pub fn settings_path(&self) -> PathBuf {
        self.config_dir.join(SETTINGS_FILE)
    }

    /// Loads settings; a missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read, parsed, or
    /// validated.
    pub fn load_settings(&self) -> ConfigResult<LayoutSettings> {
        let _span = trace_operation_debug!(span_names::CONFIG_LOAD).entered();
        let path = self.settings_path();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No settings file, using defaults");
            return Ok(LayoutSettings::default());
        }
        let text = std::fs::read_to_string(&path)?;
        LayoutSettings::from_toml(&text)
    }

    /// Validates and writes settings, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if validation, serialization, or writing fails.
    pub fn save_settings(&self, settings: &LayoutSettings) -> ConfigResult<()> {
        let _span = trace_operation_debug!(span_names::CONFIG_SAVE).entered();
        settings.validate()?;
        let text = settings.to_toml()?;
        std::fs::create_dir_all(&self.config_dir)?;
        std::fs::write(self.settings_path(), text)?;
        Ok(())
    }
}
