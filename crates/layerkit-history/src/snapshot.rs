//! Last-committed state per layer and per document.
//!
//! The cache holds exactly one state per key and is overwritten on every
//! commit, undo and redo. It is what lets a caller describe only the new
//! half of a change: the old half is read from here.
//!
//! No validation is performed. Callers set each touched key exactly once per
//! committed transition.

use crate::document::Document;
use crate::layer::Layer;
use crate::patch::{DocumentField, PropertyValue};
use layerkit_core::{Bounds, DocumentId, LayerId};
use std::collections::HashMap;

/// Committed document-level record: the patchable fields plus layer order.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentSnapshot {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub layer_order: Vec<LayerId>,
}

impl DocumentSnapshot {
    pub fn of(document: &Document) -> Self {
        Self {
            name: document.name.clone(),
            width: document.width,
            height: document.height,
            layer_order: document.layer_ids(),
        }
    }

    pub fn field(&self, key: DocumentField) -> PropertyValue {
        match key {
            DocumentField::Name => PropertyValue::String(self.name.clone()),
            DocumentField::Width => PropertyValue::Number(self.width as f64),
            DocumentField::Height => PropertyValue::Number(self.height as f64),
        }
    }

    pub fn set_field(&mut self, key: DocumentField, value: &PropertyValue) {
        match (key, value) {
            (DocumentField::Name, PropertyValue::String(name)) => self.name = name.clone(),
            (DocumentField::Width, PropertyValue::Number(n)) => {
                if let Some(w) = crate::document::to_dimension(*n) {
                    self.width = w;
                }
            }
            (DocumentField::Height, PropertyValue::Number(n)) => {
                if let Some(h) = crate::document::to_dimension(*n) {
                    self.height = h;
                }
            }
            _ => {}
        }
    }

    pub fn position_of(&self, id: LayerId) -> Option<usize> {
        self.layer_order.iter().position(|l| *l == id)
    }

    /// Moves or inserts `id` to `position`, clamped like [`Document::move_layer`].
    pub(crate) fn place(&mut self, id: LayerId, position: usize) {
        self.layer_order.retain(|l| *l != id);
        let position = position.min(self.layer_order.len());
        self.layer_order.insert(position, id);
    }

    pub(crate) fn forget(&mut self, id: LayerId) {
        self.layer_order.retain(|l| *l != id);
    }
}

/// Snapshot cache shared by all documents.
#[derive(Debug, Default)]
pub struct SnapshotCache {
    layers: HashMap<LayerId, Layer>,
    bounds: HashMap<DocumentId, Bounds>,
    documents: HashMap<DocumentId, DocumentSnapshot>,
}

impl SnapshotCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: LayerId) -> Option<&Layer> {
        self.layers.get(&id)
    }

    pub fn get_mut(&mut self, id: LayerId) -> Option<&mut Layer> {
        self.layers.get_mut(&id)
    }

    /// Stores a layer snapshot, or removes it when `layer` is `None`.
    pub fn set(&mut self, id: LayerId, layer: Option<Layer>) {
        match layer {
            Some(layer) => {
                self.layers.insert(id, layer);
            }
            None => {
                self.layers.remove(&id);
            }
        }
    }

    pub fn contains(&self, id: LayerId) -> bool {
        self.layers.contains_key(&id)
    }

    /// Seeds the cache with deep copies of `layers`.
    pub fn populate(&mut self, layers: &[Layer]) {
        for layer in layers {
            self.layers.insert(layer.id, layer.clone());
        }
    }

    pub fn get_bounds(&self, id: DocumentId) -> Option<&Bounds> {
        self.bounds.get(&id)
    }

    /// `None` clears the entry: "no selection" rather than a stored sentinel.
    pub fn set_bounds(&mut self, id: DocumentId, bounds: Option<Bounds>) {
        match bounds {
            Some(bounds) => {
                self.bounds.insert(id, bounds);
            }
            None => {
                self.bounds.remove(&id);
            }
        }
    }

    pub fn get_document(&self, id: DocumentId) -> Option<&DocumentSnapshot> {
        self.documents.get(&id)
    }

    pub fn get_document_mut(&mut self, id: DocumentId) -> Option<&mut DocumentSnapshot> {
        self.documents.get_mut(&id)
    }

    pub fn set_document(&mut self, id: DocumentId, snapshot: Option<DocumentSnapshot>) {
        match snapshot {
            Some(snapshot) => {
                self.documents.insert(id, snapshot);
            }
            None => {
                self.documents.remove(&id);
            }
        }
    }

    /// Seeds the layers and the document record of `document`.
    pub fn populate_document(&mut self, document: &Document) {
        self.populate(&document.layers);
        self.documents
            .insert(document.id, DocumentSnapshot::of(document));
    }
}
