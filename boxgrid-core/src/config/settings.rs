//! Layout settings
//!
//! Settings are stored as TOML. Every section and field has a default, so a
//! partial (or empty) file is valid.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};
use crate::interaction::DropThresholds;
use crate::layout::GridBounds;

/// Grid extent and minimum container size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSettings {
    /// Number of columns on every container's grid
    pub max_width: i32,
    /// Number of rows on every container's grid
    pub max_height: i32,
    /// Smallest width/height a container may have
    pub min_size: i32,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            max_width: 12,
            max_height: 8,
            min_size: 1,
        }
    }
}

/// Pointer-to-grid conversion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointerSettings {
    /// Pixels per grid cell
    pub cell_px: f64,
    /// Pointer movement (pixels) below which drag updates are ignored
    pub jitter_px: f64,
}

impl Default for PointerSettings {
    fn default() -> Self {
        Self {
            cell_px: 48.0,
            jitter_px: 3.0,
        }
    }
}

/// Drop-target acceptance thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DropSettings {
    /// IoU at or above which a candidate is always accepted
    pub min_iou: f64,
    /// Share of the dragged area that must lie on the candidate
    pub min_overlap_dragged: f64,
    /// Share of the candidate area that must be covered
    pub min_overlap_target: f64,
}

impl Default for DropSettings {
    fn default() -> Self {
        Self {
            min_iou: 0.5,
            min_overlap_dragged: 0.65,
            min_overlap_target: 0.25,
        }
    }
}

/// All layout settings.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutSettings {
    /// Grid extent
    pub grid: GridSettings,
    /// Pointer conversion
    pub pointer: PointerSettings,
    /// Drop detection
    #[serde(rename = "drop")]
    pub drop_target: DropSettings,
}

impl LayoutSettings {
    /// Bounds used by the layout validator.
    #[must_use]
    pub const fn bounds(&self) -> GridBounds {
        GridBounds {
            max_width: self.grid.max_width,
            max_height: self.grid.max_height,
            min_size: self.grid.min_size,
        }
    }

    /// Thresholds used by drop-target resolution.
    #[must_use]
    pub const fn drop_thresholds(&self) -> DropThresholds {
        DropThresholds {
            min_iou: self.drop_target.min_iou,
            min_overlap_dragged: self.drop_target.min_overlap_dragged,
            min_overlap_target: self.drop_target.min_overlap_target,
        }
    }

    /// Parses settings from TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML or a value is invalid.
    pub fn from_toml(text: &str) -> ConfigResult<Self> {
        let settings: Self = toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Serializes settings to TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml(&self) -> ConfigResult<String> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    /// Checks that every value is usable.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` naming the first bad field.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.grid.min_size < 1 {
            return Err(invalid("grid.min_size", "must be at least 1"));
        }
        if self.grid.max_width < self.grid.min_size {
            return Err(invalid("grid.max_width", "must be at least grid.min_size"));
        }
        if self.grid.max_height < self.grid.min_size {
            return Err(invalid("grid.max_height", "must be at least grid.min_size"));
        }
        if !(self.pointer.cell_px.is_finite() && self.pointer.cell_px > 0.0) {
            return Err(invalid("pointer.cell_px", "must be a positive number"));
        }
        if !(self.pointer.jitter_px.is_finite() && self.pointer.jitter_px >= 0.0) {
            return Err(invalid("pointer.jitter_px", "must not be negative"));
        }
        for (field, value) in [
            ("drop.min_iou", self.drop_target.min_iou),
            ("drop.min_overlap_dragged", self.drop_target.min_overlap_dragged),
            ("drop.min_overlap_target", self.drop_target.min_overlap_target),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(invalid(field, "must be in (0, 1]"));
            }
        }
        Ok(())
    }
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::Validation {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}
