//! LayerKit Settings Crate
//!
//! Handles application configuration and settings persistence.

pub mod config;
pub mod error;

pub use config::{Config, EditingSettings, HistorySettings, DEFAULT_MAX_HISTORY_ENTRIES};
pub use error::{ConfigError, SettingsError, SettingsResult};
