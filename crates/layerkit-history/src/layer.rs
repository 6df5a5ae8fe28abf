//! Layer model.
//!
//! A document is an ordered stack of layers. Every layer shares a common set
//! of properties (name, visibility, opacity, transform, colors) and carries
//! kind-specific data: raster pixels, text, or a parametric shape.
//!
//! `Clone` on a [`Layer`] is a deep copy: raster content is duplicated into
//! a fresh [`PixelBuffer`] and the transform matrix is copied by value, so a
//! clone can be stored as a snapshot and never observes later live edits.

use layerkit_core::{Color, LayerId, Matrix, PixelBuffer, Point};
use serde::{Deserialize, Serialize};

/// Where a shape's stroke sits relative to its outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrokeAlign {
    #[default]
    Center,
    Inside,
    Outside,
}

/// Text content and typography.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLayer {
    pub text: String,
    pub font_family: String,
    pub font_size: f64,
    pub line_height: f64,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub width: f64,
    pub height: f64,
}

impl Default for TextLayer {
    fn default() -> Self {
        let font_size = 24.0;
        Self {
            text: "Text".to_string(),
            font_family: "sans-serif".to_string(),
            font_size,
            line_height: 1.2,
            bold: false,
            italic: false,
            underline: false,
            width: font_size * 5.0,
            height: font_size * 1.2,
        }
    }
}

/// Geometry and stroke of a rectangle or ellipse.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeLayer {
    pub width: f64,
    pub height: f64,
    pub stroke_width: f64,
    pub stroke_align: StrokeAlign,
    pub corner_radius: f64,
}

impl ShapeLayer {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            stroke_width: 2.0,
            stroke_align: StrokeAlign::Center,
            corner_radius: 0.0,
        }
    }
}

/// Kind-specific layer data.
#[derive(Debug, Clone, PartialEq)]
pub enum LayerKind {
    Canvas { content: PixelBuffer },
    Text(TextLayer),
    Rectangle(ShapeLayer),
    Ellipse(ShapeLayer),
}

/// Discriminant of [`LayerKind`], used for display and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerType {
    Canvas,
    Text,
    Rectangle,
    Ellipse,
}

impl std::fmt::Display for LayerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LayerType::Canvas => write!(f, "canvas"),
            LayerType::Text => write!(f, "text"),
            LayerType::Rectangle => write!(f, "rectangle"),
            LayerType::Ellipse => write!(f, "ellipse"),
        }
    }
}

/// A single layer in a document.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub id: LayerId,
    pub name: String,
    pub visible: bool,
    pub opacity: f64,
    pub transform: Matrix,
    pub foreground_color: Color,
    pub background_color: Color,
    pub kind: LayerKind,
}

impl Layer {
    fn with_kind(name: impl Into<String>, kind: LayerKind) -> Self {
        Self {
            id: LayerId::new(),
            name: name.into(),
            visible: true,
            opacity: 1.0,
            transform: Matrix::identity(),
            foreground_color: Color::BLACK,
            background_color: Color::WHITE,
            kind,
        }
    }

    /// Creates a transparent raster layer of the given size.
    pub fn canvas(name: impl Into<String>, width: u32, height: u32) -> Self {
        Self::with_kind(
            name,
            LayerKind::Canvas {
                content: PixelBuffer::new(width, height),
            },
        )
    }

    pub fn text(name: impl Into<String>, text: TextLayer) -> Self {
        Self::with_kind(name, LayerKind::Text(text))
    }

    pub fn rectangle(name: impl Into<String>, width: f64, height: f64) -> Self {
        Self::with_kind(name, LayerKind::Rectangle(ShapeLayer::new(width, height)))
    }

    pub fn ellipse(name: impl Into<String>, width: f64, height: f64) -> Self {
        Self::with_kind(name, LayerKind::Ellipse(ShapeLayer::new(width, height)))
    }

    /// Replaces the id; used when duplicating a layer.
    pub fn with_id(mut self, id: LayerId) -> Self {
        self.id = id;
        self
    }

    pub fn with_transform(mut self, transform: Matrix) -> Self {
        self.transform = transform;
        self
    }

    pub fn layer_type(&self) -> LayerType {
        match self.kind {
            LayerKind::Canvas { .. } => LayerType::Canvas,
            LayerKind::Text(_) => LayerType::Text,
            LayerKind::Rectangle(_) => LayerType::Rectangle,
            LayerKind::Ellipse(_) => LayerType::Ellipse,
        }
    }

    /// Raster content, for canvas layers.
    pub fn content(&self) -> Option<&PixelBuffer> {
        match &self.kind {
            LayerKind::Canvas { content } => Some(content),
            _ => None,
        }
    }

    pub fn content_mut(&mut self) -> Option<&mut PixelBuffer> {
        match &mut self.kind {
            LayerKind::Canvas { content } => Some(content),
            _ => None,
        }
    }

    /// Untransformed width and height in layer space.
    pub fn size(&self) -> Point {
        match &self.kind {
            LayerKind::Canvas { content } => {
                Point::new(content.width() as f64, content.height() as f64)
            }
            LayerKind::Text(text) => Point::new(text.width, text.height),
            LayerKind::Rectangle(shape) | LayerKind::Ellipse(shape) => {
                Point::new(shape.width, shape.height)
            }
        }
    }

    /// The four corners of the layer mapped through its transform
    /// (top-left, top-right, bottom-right, bottom-left).
    pub fn corners(&self) -> [Point; 4] {
        let size = self.size();
        [
            Point::new(0.0, 0.0),
            Point::new(size.x, 0.0),
            Point::new(size.x, size.y),
            Point::new(0.0, size.y),
        ]
        .map(|corner| self.transform.transform_point(corner))
    }

    /// Moves the layer by a screen-space delta.
    pub fn translate_by(&mut self, dx: f64, dy: f64) {
        self.transform = self.transform.translated_in_parent(dx, dy);
    }
}
