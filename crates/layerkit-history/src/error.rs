//! Error types for the history crate.
//!
//! The engine itself degrades silently (dropped commits, no-op undo at the
//! history boundary); these errors surface only through the explicit
//! two-phase change API and the editor facade.

use layerkit_core::{DocumentError, LayerId};
use thiserror::Error;

/// Errors that can occur during history operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HistoryError {
    /// The cursor is at the start of the history.
    #[error("Nothing to undo")]
    NothingToUndo,

    /// The cursor is at the end of the history.
    #[error("Nothing to redo")]
    NothingToRedo,

    /// The layer has no committed state to derive the old half from.
    #[error("No snapshot for {layer}; change was not recorded")]
    MissingSnapshot { layer: LayerId },

    /// A change on this layer has begun and not been committed or cancelled.
    #[error("Layer {layer} is already performing a change")]
    ChangeInProgress { layer: LayerId },

    /// The change handle is unknown or was already consumed.
    #[error("No matching begin for change on {layer}")]
    NoMatchingBegin { layer: LayerId },

    /// The committed change does not reference the layer that was begun.
    #[error("Change begun on {expected} does not reference that layer")]
    LayerMismatch { expected: LayerId },

    /// A document or layer lookup failed.
    #[error(transparent)]
    Document(#[from] DocumentError),
}

/// Result type alias for history operations.
pub type HistoryResult<T> = Result<T, HistoryError>;
