//! Per-document selection state.
//!
//! Tracks which layers are selected, the selection bounding box shown around
//! them, and the view zoom. Transform actions read and restore the bounds
//! through this type.

use crate::document::Document;
use layerkit_core::{Bounds, LayerId, Matrix, Point};

/// Rotations closer than this (degrees) count as equal when deciding
/// whether a multi-selection box can keep a shared rotation.
const ROTATION_TOLERANCE: f64 = 0.01;

/// Selection and view state of one document.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionState {
    pub selected_layers: Vec<LayerId>,
    pub bounds: Option<Bounds>,
    pub zoom: f64,
    previous_selection: Vec<LayerId>,
    previous_rotation: f64,
}

impl Default for SelectionState {
    fn default() -> Self {
        Self {
            selected_layers: Vec::new(),
            bounds: None,
            zoom: 1.0,
            previous_selection: Vec::new(),
            previous_rotation: 0.0,
        }
    }
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the selection.
    pub fn select<I: IntoIterator<Item = LayerId>>(&mut self, layers: I) {
        self.selected_layers = layers.into_iter().collect();
    }

    pub fn clear(&mut self) {
        self.selected_layers.clear();
    }

    pub fn is_selected(&self, id: LayerId) -> bool {
        self.selected_layers.contains(&id)
    }

    /// Selected ids that still exist in `document`, in selection order.
    pub fn selected_in<'a>(&'a self, document: &'a Document) -> impl Iterator<Item = LayerId> + 'a {
        self.selected_layers
            .iter()
            .copied()
            .filter(move |id| document.index_of(*id).is_some())
    }

    /// Recomputes the bounding box around the selected layers.
    ///
    /// When the selection changed since the last call, the box adopts the
    /// layers' common rotation if they all share one, and is axis-aligned
    /// otherwise. With an unchanged selection the previous rotation is kept
    /// so the box does not snap while the user rotates it.
    pub fn refresh_bounds(&mut self, document: &Document) {
        let layers: Vec<_> = self
            .selected_layers
            .iter()
            .filter_map(|id| document.layer(*id))
            .collect();

        if self.previous_selection != self.selected_layers {
            let rotations: Vec<f64> = layers
                .iter()
                .map(|layer| layer.transform.decompose().rotate)
                .collect();
            self.previous_rotation = match rotations.first() {
                Some(first)
                    if rotations
                        .iter()
                        .all(|rot| (rot - first).abs() < ROTATION_TOLERANCE) =>
                {
                    *first
                }
                _ => 0.0,
            };
        }
        self.previous_selection = self.selected_layers.clone();

        if layers.is_empty() {
            self.previous_rotation = 0.0;
            self.bounds = None;
            return;
        }

        let unrotate = Matrix::rotation(-self.previous_rotation);
        let (mut min, mut max) = (
            Point::new(f64::INFINITY, f64::INFINITY),
            Point::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
        );
        for corner in layers.iter().flat_map(|layer| layer.corners()) {
            let p = unrotate.transform_point(corner);
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }

        let top_left = Matrix::rotation(self.previous_rotation).transform_point(min);
        self.bounds = Some(Bounds::new(
            top_left,
            Point::new(max.x - min.x, max.y - min.y),
            self.previous_rotation,
        ));
    }
}
