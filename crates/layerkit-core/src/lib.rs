//! # LayerKit Core
//!
//! Core value types, errors and events for LayerKit.
//! Provides the vocabulary shared by the settings and history crates:
//! identifiers, affine matrices, colors, pixel buffers and selection bounds.

pub mod color;
pub mod error;
pub mod event;
pub mod geometry;
pub mod ids;
pub mod pixels;

pub use color::Color;
pub use error::{DocumentError, GeometryError};
pub use event::{EventDispatcher, HistoryEvent};
pub use geometry::{Bounds, Matrix, Point, TransformComponents};
pub use ids::{DocumentId, LayerId};
pub use pixels::PixelBuffer;
