//! Partial layer and document records.
//!
//! Property edits are recorded as patches: an ordered map from field key to
//! value covering an arbitrary subset of fields. Update actions keep an old
//! and a new patch with identical key sets, so applying either side touches
//! exactly the same fields.

use crate::document::Document;
use crate::layer::{Layer, LayerKind, StrokeAlign};
use layerkit_core::{Color, DocumentId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Addressable layer fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LayerField {
    Name,
    Visible,
    Opacity,
    ForegroundColor,
    BackgroundColor,
    Text,
    FontFamily,
    FontSize,
    LineHeight,
    Bold,
    Italic,
    Underline,
    Width,
    Height,
    StrokeWidth,
    StrokeAlign,
    CornerRadius,
}

/// Addressable document fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DocumentField {
    Name,
    Width,
    Height,
}

/// A field value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PropertyValue {
    Number(f64),
    String(String),
    Bool(bool),
    Color(Color),
    StrokeAlign(StrokeAlign),
}

impl PropertyValue {
    /// True when both values are of the same variant.
    pub fn same_kind(&self, other: &PropertyValue) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

impl Layer {
    /// Reads a field, or `None` when this kind of layer has no such field.
    pub fn field(&self, key: LayerField) -> Option<PropertyValue> {
        use PropertyValue as V;

        let common = match key {
            LayerField::Name => Some(V::String(self.name.clone())),
            LayerField::Visible => Some(V::Bool(self.visible)),
            LayerField::Opacity => Some(V::Number(self.opacity)),
            LayerField::ForegroundColor => Some(V::Color(self.foreground_color)),
            LayerField::BackgroundColor => Some(V::Color(self.background_color)),
            _ => None,
        };
        if common.is_some() {
            return common;
        }

        match &self.kind {
            LayerKind::Canvas { .. } => None,
            LayerKind::Text(text) => match key {
                LayerField::Text => Some(V::String(text.text.clone())),
                LayerField::FontFamily => Some(V::String(text.font_family.clone())),
                LayerField::FontSize => Some(V::Number(text.font_size)),
                LayerField::LineHeight => Some(V::Number(text.line_height)),
                LayerField::Bold => Some(V::Bool(text.bold)),
                LayerField::Italic => Some(V::Bool(text.italic)),
                LayerField::Underline => Some(V::Bool(text.underline)),
                LayerField::Width => Some(V::Number(text.width)),
                LayerField::Height => Some(V::Number(text.height)),
                _ => None,
            },
            LayerKind::Rectangle(shape) | LayerKind::Ellipse(shape) => match key {
                LayerField::Width => Some(V::Number(shape.width)),
                LayerField::Height => Some(V::Number(shape.height)),
                LayerField::StrokeWidth => Some(V::Number(shape.stroke_width)),
                LayerField::StrokeAlign => Some(V::StrokeAlign(shape.stroke_align)),
                LayerField::CornerRadius => Some(V::Number(shape.corner_radius)),
                _ => None,
            },
        }
    }

    /// Writes a field. Returns `false` (leaving the layer untouched) when the
    /// layer has no such field or the value has the wrong type.
    pub fn set_field(&mut self, key: LayerField, value: &PropertyValue) -> bool {
        use PropertyValue as V;

        match (key, value) {
            (LayerField::Name, V::String(v)) => self.name = v.clone(),
            (LayerField::Visible, V::Bool(v)) => self.visible = *v,
            (LayerField::Opacity, V::Number(v)) => self.opacity = *v,
            (LayerField::ForegroundColor, V::Color(v)) => self.foreground_color = *v,
            (LayerField::BackgroundColor, V::Color(v)) => self.background_color = *v,
            _ => {
                return match &mut self.kind {
                    LayerKind::Canvas { .. } => false,
                    LayerKind::Text(text) => match (key, value) {
                        (LayerField::Text, V::String(v)) => assign(&mut text.text, v.clone()),
                        (LayerField::FontFamily, V::String(v)) => {
                            assign(&mut text.font_family, v.clone())
                        }
                        (LayerField::FontSize, V::Number(v)) => assign(&mut text.font_size, *v),
                        (LayerField::LineHeight, V::Number(v)) => {
                            assign(&mut text.line_height, *v)
                        }
                        (LayerField::Bold, V::Bool(v)) => assign(&mut text.bold, *v),
                        (LayerField::Italic, V::Bool(v)) => assign(&mut text.italic, *v),
                        (LayerField::Underline, V::Bool(v)) => assign(&mut text.underline, *v),
                        (LayerField::Width, V::Number(v)) => assign(&mut text.width, *v),
                        (LayerField::Height, V::Number(v)) => assign(&mut text.height, *v),
                        _ => false,
                    },
                    LayerKind::Rectangle(shape) | LayerKind::Ellipse(shape) => {
                        match (key, value) {
                            (LayerField::Width, V::Number(v)) => assign(&mut shape.width, *v),
                            (LayerField::Height, V::Number(v)) => assign(&mut shape.height, *v),
                            (LayerField::StrokeWidth, V::Number(v)) => {
                                assign(&mut shape.stroke_width, *v)
                            }
                            (LayerField::StrokeAlign, V::StrokeAlign(v)) => {
                                assign(&mut shape.stroke_align, *v)
                            }
                            (LayerField::CornerRadius, V::Number(v)) => {
                                assign(&mut shape.corner_radius, *v)
                            }
                            _ => false,
                        }
                    }
                };
            }
        }
        true
    }
}

fn assign<T>(slot: &mut T, value: T) -> bool {
    *slot = value;
    true
}

/// A partial layer: values for an arbitrary subset of [`LayerField`]s.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LayerPatch {
    values: BTreeMap<LayerField, PropertyValue>,
}

impl LayerPatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: LayerField, value: PropertyValue) -> Self {
        self.values.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: LayerField, value: PropertyValue) -> Option<PropertyValue> {
        self.values.insert(key, value)
    }

    pub fn get(&self, key: LayerField) -> Option<&PropertyValue> {
        self.values.get(&key)
    }

    /// Keys in stable order.
    pub fn keys(&self) -> impl Iterator<Item = LayerField> + '_ {
        self.values.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (LayerField, &PropertyValue)> {
        self.values.iter().map(|(k, v)| (*k, v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// True when both patches cover exactly the same fields.
    pub fn same_keys(&self, other: &LayerPatch) -> bool {
        self.keys().eq(other.keys())
    }

    /// Reads the given keys from `layer`. Fails if any key is not a field of
    /// that layer, since a partial capture could not restore every field the
    /// other side writes.
    pub fn capture_from<I>(layer: &Layer, keys: I) -> Option<LayerPatch>
    where
        I: IntoIterator<Item = LayerField>,
    {
        let mut patch = LayerPatch::new();
        for key in keys {
            patch.insert(key, layer.field(key)?);
        }
        Some(patch)
    }

    /// True when every field in the patch exists on `layer` and holds a
    /// value of the same type, i.e. `apply_to` would write all of them.
    pub fn fits(&self, layer: &Layer) -> bool {
        !self.is_empty()
            && self.values.iter().all(|(key, value)| {
                layer
                    .field(*key)
                    .is_some_and(|current| current.same_kind(value))
            })
    }

    /// Shallow-merges the patch onto `layer`, returning how many fields were
    /// written. Fields the layer does not have are skipped with a warning.
    pub fn apply_to(&self, layer: &mut Layer) -> usize {
        let mut written = 0;
        for (key, value) in &self.values {
            if layer.set_field(*key, value) {
                written += 1;
            } else {
                tracing::warn!("Layer {} has no field {:?} for {:?}", layer.id, key, value);
            }
        }
        written
    }
}

impl FromIterator<(LayerField, PropertyValue)> for LayerPatch {
    fn from_iter<T: IntoIterator<Item = (LayerField, PropertyValue)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// A partial document record, tagged with the document it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentPatch {
    pub document_id: DocumentId,
    values: BTreeMap<DocumentField, PropertyValue>,
}

impl DocumentPatch {
    pub fn new(document_id: DocumentId) -> Self {
        Self {
            document_id,
            values: BTreeMap::new(),
        }
    }

    pub fn with(mut self, key: DocumentField, value: PropertyValue) -> Self {
        self.values.insert(key, value);
        self
    }

    pub fn get(&self, key: DocumentField) -> Option<&PropertyValue> {
        self.values.get(&key)
    }

    pub fn keys(&self) -> impl Iterator<Item = DocumentField> + '_ {
        self.values.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (DocumentField, &PropertyValue)> {
        self.values.iter().map(|(k, v)| (*k, v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Shallow-merges the patch onto `document`; returns the number of
    /// fields written.
    pub fn apply_to(&self, document: &mut Document) -> usize {
        if document.id != self.document_id {
            tracing::warn!(
                "Patch for {} applied to {}; skipping",
                self.document_id,
                document.id
            );
            return 0;
        }
        self.iter()
            .filter(|(key, value)| {
                let ok = document.set_field(*key, value);
                if !ok {
                    tracing::warn!("Invalid value {:?} for document field {:?}", value, key);
                }
                ok
            })
            .count()
    }
}
