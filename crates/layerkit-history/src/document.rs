//! Documents: a named canvas with an ordered layer stack.
//!
//! Index 0 is the bottom of the stack. All mutation goes through id or
//! index lookups so the replay engine never holds references across edits.

use crate::layer::Layer;
use crate::patch::{DocumentField, PropertyValue};
use layerkit_core::{DocumentId, LayerId};

/// An open document.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: DocumentId,
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub layers: Vec<Layer>,
}

impl Document {
    pub fn new(name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            id: DocumentId::new(),
            name: name.into(),
            width,
            height,
            layers: Vec::new(),
        }
    }

    pub fn with_layers(mut self, layers: Vec<Layer>) -> Self {
        self.layers = layers;
        self
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn layer_ids(&self) -> Vec<LayerId> {
        self.layers.iter().map(|l| l.id).collect()
    }

    pub fn index_of(&self, id: LayerId) -> Option<usize> {
        self.layers.iter().position(|l| l.id == id)
    }

    pub fn layer(&self, id: LayerId) -> Option<&Layer> {
        self.layers.iter().find(|l| l.id == id)
    }

    pub fn layer_mut(&mut self, id: LayerId) -> Option<&mut Layer> {
        self.layers.iter_mut().find(|l| l.id == id)
    }

    /// Inserts at `position`, or appends when `position` is past the end.
    /// Returns the index the layer ended up at.
    pub fn insert_layer(&mut self, layer: Layer, position: usize) -> usize {
        if position <= self.layers.len() {
            self.layers.insert(position, layer);
            position
        } else {
            self.layers.push(layer);
            self.layers.len() - 1
        }
    }

    /// Removes a layer by id, returning its former index and value.
    pub fn remove_layer(&mut self, id: LayerId) -> Option<(usize, Layer)> {
        let index = self.index_of(id)?;
        Some((index, self.layers.remove(index)))
    }

    /// Moves a layer to `position` (clamped to the top of the stack).
    pub fn move_layer(&mut self, id: LayerId, position: usize) -> bool {
        match self.remove_layer(id) {
            Some((_, layer)) => {
                let position = position.min(self.layers.len());
                self.layers.insert(position, layer);
                true
            }
            None => false,
        }
    }

    pub fn field(&self, key: DocumentField) -> PropertyValue {
        match key {
            DocumentField::Name => PropertyValue::String(self.name.clone()),
            DocumentField::Width => PropertyValue::Number(self.width as f64),
            DocumentField::Height => PropertyValue::Number(self.height as f64),
        }
    }

    /// Writes a document field; dimensions must be non-negative numbers.
    pub fn set_field(&mut self, key: DocumentField, value: &PropertyValue) -> bool {
        match (key, value) {
            (DocumentField::Name, PropertyValue::String(name)) => {
                self.name = name.clone();
                true
            }
            (DocumentField::Width, PropertyValue::Number(n)) => match to_dimension(*n) {
                Some(w) => {
                    self.width = w;
                    true
                }
                None => false,
            },
            (DocumentField::Height, PropertyValue::Number(n)) => match to_dimension(*n) {
                Some(h) => {
                    self.height = h;
                    true
                }
                None => false,
            },
            _ => false,
        }
    }
}

pub(crate) fn to_dimension(n: f64) -> Option<u32> {
    (n.is_finite() && n >= 0.0 && n <= u32::MAX as f64).then(|| n.round() as u32)
}
