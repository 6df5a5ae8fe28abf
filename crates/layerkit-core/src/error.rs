//! Error handling for LayerKit
//!
//! Provides the error types shared by every layer of the editor:
//! - Geometry errors (matrix math)
//! - Document errors (layer/document lookups)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Geometry error type
///
/// Raised by matrix helpers when a computation has no defined result.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// The matrix has a zero determinant and cannot be inverted
    #[error("Matrix is not invertible (determinant {determinant})")]
    NonInvertible {
        /// The determinant of the linear part.
        determinant: f64,
    },
}

/// Document error type
///
/// Represents failed lookups against the document/layer store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DocumentError {
    /// No open document has the requested id
    #[error("Document not found: {id}")]
    DocumentNotFound {
        /// The id that was looked up.
        id: String,
    },

    /// The document has no layer with the requested id
    #[error("Layer {layer} not found in {document}")]
    LayerNotFound {
        /// The layer id that was looked up.
        layer: String,
        /// The document that was searched.
        document: String,
    },

    /// An operation needed the active document but none is selected
    #[error("No document selected")]
    NoActiveDocument,
}
