//! # LayerKit
//!
//! Core of a layered image and vector editor: raster, text, rectangle and
//! ellipse layers with a snapshot-driven undo/redo engine.
//!
//! ## Architecture
//!
//! LayerKit is organized as a workspace with multiple crates:
//!
//! 1. **layerkit-core** - Identifiers, geometry, colors, pixel buffers, errors, events
//! 2. **layerkit-settings** - Configuration file handling and validation
//! 3. **layerkit-history** - Layer/document model, action history, replay, editor
//! 4. **layerkit** - This facade, which re-exports the public API
//!
//! ## History model
//!
//! Tools mutate live layers during a gesture and commit the new state once.
//! The old state is reconstructed from a per-layer snapshot cache, so every
//! recorded action can be reverted and re-applied. Each document keeps a
//! bounded linear log; committing after an undo discards the redo branch.

pub use layerkit_core::{
    Bounds, Color, DocumentError, DocumentId, EventDispatcher, GeometryError, HistoryEvent, LayerId,
    Matrix, PixelBuffer, Point, TransformComponents,
};

pub use layerkit_history::{
    post_action_to_action, Action, ChangeHandle, Direction, Document, DocumentField,
    DocumentPatch, Editor, History, HistoryEntry, HistoryError, HistoryResult, HistoryService,
    HistoryStatus, Layer, LayerField, LayerKind, LayerPatch, LayerType, Nudge, PostAction,
    PropertyValue, SelectionState, ShapeLayer, SnapshotCache, StrokeAlign, TextLayer, Workspace,
};

pub use layerkit_settings::{
    Config, ConfigError, EditingSettings, HistorySettings, SettingsError, SettingsResult,
};

use std::path::Path;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output with pretty formatting
/// - RUST_LOG environment variable support
///
/// Fails if a global subscriber is already installed.
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(true)
        .with_level(true)
        .with_thread_ids(true)
        .with_thread_names(true)
        .with_line_number(true)
        .pretty();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}

/// Builds an editor from the settings file at `path`, using defaults when
/// the file does not exist yet.
pub fn editor_from_config_file(path: &Path) -> anyhow::Result<Editor> {
    let config = Config::load_or_default(path)?;
    tracing::info!(
        "LayerKit {} (built {}), history depth {}",
        VERSION,
        BUILD_DATE,
        config.history.max_entries
    );
    Ok(Editor::new(config))
}
