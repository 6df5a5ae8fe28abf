//! Configuration and settings management for LayerKit
//!
//! Provides configuration file handling and validation.
//! Supports JSON and TOML file formats stored in the platform config
//! directory.
//!
//! Configuration is organized into logical sections:
//! - History settings (undo depth)
//! - Editing preferences (nudge distances, zoom step, paste naming)

use crate::error::{ConfigError, SettingsError, SettingsResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default number of undo entries kept per document.
pub const DEFAULT_MAX_HISTORY_ENTRIES: usize = 50;

/// Undo/redo history settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistorySettings {
    /// Maximum number of actions kept per document; the oldest is evicted
    /// once this is exceeded.
    pub max_entries: usize,
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_MAX_HISTORY_ENTRIES,
        }
    }
}

/// Editing preferences used by keyboard-driven edits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditingSettings {
    /// Arrow-key nudge distance in document pixels
    pub nudge_step: f64,
    /// Nudge distance while Shift is held
    pub nudge_step_large: f64,
    /// Multiplicative zoom factor per zoom step
    pub zoom_step: f64,
    /// Prefix prepended to the name of pasted layers
    #[serde(default = "default_paste_prefix")]
    pub paste_name_prefix: String,
}

fn default_paste_prefix() -> String {
    "Copy of ".to_string()
}

impl Default for EditingSettings {
    fn default() -> Self {
        Self {
            nudge_step: 1.0,
            nudge_step_large: 10.0,
            zoom_step: 1.1,
            paste_name_prefix: default_paste_prefix(),
        }
    }
}

/// Complete application configuration
///
/// Aggregates all settings sections and provides file I/O operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    /// History settings
    #[serde(default)]
    pub history: HistorySettings,
    /// Editing preferences
    #[serde(default)]
    pub editing: EditingSettings,
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Platform config file location (`<config dir>/layerkit/config.toml`)
    pub fn default_path() -> SettingsResult<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("layerkit").join("config.toml"))
            .ok_or_else(|| {
                ConfigError::UnsupportedPlatform(std::env::consts::OS.to_string()).into()
            })
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| SettingsError::LoadError(format!("{}: {}", path.display(), e)))?;

        let config: Self = match extension(path) {
            Some("json") => serde_json::from_str(&content)?,
            Some("toml") => toml::from_str(&content)?,
            other => {
                return Err(ConfigError::UnsupportedFormat(other.unwrap_or("").to_string()).into())
            }
        };

        config.validate()?;
        tracing::info!("Loaded settings from {}", path.display());
        Ok(config)
    }

    /// Load config from file, falling back to defaults when the file does
    /// not exist yet.
    pub fn load_or_default(path: &Path) -> SettingsResult<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            tracing::debug!("No settings at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match extension(path) {
            Some("json") => serde_json::to_string_pretty(self)?,
            Some("toml") => toml::to_string_pretty(self)?,
            other => {
                return Err(ConfigError::UnsupportedFormat(other.unwrap_or("").to_string()).into())
            }
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)
            .map_err(|e| SettingsError::SaveError(format!("{}: {}", path.display(), e)))?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.history.max_entries == 0 {
            return Err(out_of_range("history.max_entries", self.history.max_entries));
        }

        let editing = &self.editing;
        if !(editing.nudge_step.is_finite() && editing.nudge_step > 0.0) {
            return Err(out_of_range("editing.nudge_step", editing.nudge_step));
        }
        if !(editing.nudge_step_large.is_finite() && editing.nudge_step_large > 0.0) {
            return Err(out_of_range(
                "editing.nudge_step_large",
                editing.nudge_step_large,
            ));
        }
        if !(editing.zoom_step.is_finite() && editing.zoom_step > 1.0) {
            return Err(out_of_range("editing.zoom_step", editing.zoom_step));
        }

        Ok(())
    }
}

fn extension(path: &Path) -> Option<&str> {
    path.extension().and_then(|ext| ext.to_str())
}

fn out_of_range(key: &str, value: impl ToString) -> ConfigError {
    ConfigError::ValueOutOfRange {
        key: key.to_string(),
        value: value.to_string(),
    }
}
