//! Replay engine.
//!
//! Applies an [`Action`] to live document and selection state in either
//! direction, and refreshes the [`SnapshotCache`] to the side just applied.
//! Missing layers are logged and skipped; replay never fails.

use crate::action::Action;
use crate::document::Document;
use crate::layer::Layer;
use crate::selection::SelectionState;
use crate::snapshot::SnapshotCache;
use layerkit_core::{Bounds, DocumentId, LayerId};

/// Which side of an action to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Restore the old side.
    Undo,
    /// Apply the new side. Commits refresh snapshots in this direction.
    Redo,
}

impl Direction {
    fn pick<'a, T>(self, old: &'a T, new: &'a T) -> &'a T {
        match self {
            Direction::Undo => old,
            Direction::Redo => new,
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Undo => write!(f, "undo"),
            Direction::Redo => write!(f, "redo"),
        }
    }
}

/// Reverts `action` on the live document.
pub fn apply_undo(action: &Action, document: &mut Document, selection: &mut SelectionState) {
    apply(action, Direction::Undo, document, selection);
}

/// Re-applies `action` on the live document.
pub fn apply_redo(action: &Action, document: &mut Document, selection: &mut SelectionState) {
    apply(action, Direction::Redo, document, selection);
}

/// Applies one side of `action`.
///
/// Compound members are applied in their recorded order in both directions.
pub fn apply(
    action: &Action,
    direction: Direction,
    document: &mut Document,
    selection: &mut SelectionState,
) {
    match action {
        Action::Create { layer, position } => match direction {
            Direction::Redo => insert(document, layer.clone(), *position),
            Direction::Undo => remove(document, selection, layer.id),
        },
        Action::Delete { layer, position } => match direction {
            Direction::Redo => remove(document, selection, layer.id),
            Direction::Undo => insert(document, layer.clone(), *position),
        },
        Action::Transform {
            layer_id,
            old_matrix,
            new_matrix,
            old_bounds,
            new_bounds,
        } => {
            if let Some(layer) = find_layer(document, *layer_id) {
                layer.transform = *direction.pick(old_matrix, new_matrix);
            }
            restore_bounds(document, selection, *direction.pick(old_bounds, new_bounds));
        }
        Action::Content {
            layer_id,
            old_content,
            new_content,
        } => {
            let pixels = direction.pick(old_content, new_content);
            match find_layer(document, *layer_id).and_then(|l| l.content_mut()) {
                Some(content) => content.write_at_origin(pixels),
                None => tracing::warn!("No raster content on {} to {}", layer_id, direction),
            }
        }
        Action::Update {
            layer_id,
            old_layer,
            new_layer,
        } => {
            if let Some(layer) = find_layer(document, *layer_id) {
                direction.pick(old_layer, new_layer).apply_to(layer);
            }
        }
        Action::Reorder {
            layer_id,
            old_position,
            new_position,
        } => {
            if !document.move_layer(*layer_id, *direction.pick(old_position, new_position)) {
                tracing::warn!("Cannot reorder missing layer {}", layer_id);
            }
        }
        Action::Document {
            old_document,
            new_document,
        } => {
            direction.pick(old_document, new_document).apply_to(document);
        }
        Action::Compound { actions } => {
            for member in actions.iter().flatten() {
                apply(member, direction, document, selection);
            }
        }
    }
}

fn find_layer(document: &mut Document, id: LayerId) -> Option<&mut Layer> {
    let found = document.layer_mut(id);
    if found.is_none() {
        tracing::warn!("Layer {} not found during replay", id);
    }
    found
}

fn insert(document: &mut Document, layer: Layer, position: usize) {
    let id = layer.id;
    let index = document.insert_layer(layer, position);
    tracing::debug!("Restored {} at {}", id, index);
}

fn remove(document: &mut Document, selection: &mut SelectionState, id: LayerId) {
    if document.remove_layer(id).is_none() {
        tracing::warn!("Cannot remove missing layer {}", id);
    }
    selection.selected_layers.retain(|selected| *selected != id);
}

/// Restores the selection box. With exactly one layer selected, the box
/// rotation follows that layer's own transform.
fn restore_bounds(document: &Document, selection: &mut SelectionState, bounds: Option<Bounds>) {
    selection.bounds = bounds;

    if let ([only], Some(bounds)) = (selection.selected_layers.as_slice(), selection.bounds.as_mut()) {
        if let Some(layer) = document.layer(*only) {
            bounds.rot = layer.transform.decompose().rotate;
        }
    }
}

/// Sets every cache entry touched by `action` to the side just applied.
pub fn refresh_snapshot(
    action: &Action,
    direction: Direction,
    document_id: DocumentId,
    cache: &mut SnapshotCache,
) {
    match action {
        Action::Create { layer, position } | Action::Delete { layer, position } => {
            let present = matches!(
                (action, direction),
                (Action::Create { .. }, Direction::Redo) | (Action::Delete { .. }, Direction::Undo)
            );
            if present {
                cache.set(layer.id, Some(layer.clone()));
            } else {
                cache.set(layer.id, None);
            }
            if let Some(snapshot) = cache.get_document_mut(document_id) {
                if present {
                    snapshot.place(layer.id, *position);
                } else {
                    snapshot.forget(layer.id);
                }
            }
        }
        Action::Transform {
            layer_id,
            old_matrix,
            new_matrix,
            old_bounds,
            new_bounds,
        } => {
            if let Some(layer) = cached(cache, *layer_id) {
                layer.transform = *direction.pick(old_matrix, new_matrix);
            }
            cache.set_bounds(document_id, *direction.pick(old_bounds, new_bounds));
        }
        Action::Content {
            layer_id,
            old_content,
            new_content,
        } => {
            if let Some(content) = cached(cache, *layer_id).and_then(|l| l.content_mut()) {
                content.write_at_origin(direction.pick(old_content, new_content));
            }
        }
        Action::Update {
            layer_id,
            old_layer,
            new_layer,
        } => {
            if let Some(layer) = cached(cache, *layer_id) {
                direction.pick(old_layer, new_layer).apply_to(layer);
            }
        }
        Action::Reorder {
            layer_id,
            old_position,
            new_position,
        } => {
            if let Some(snapshot) = cache.get_document_mut(document_id) {
                snapshot.place(*layer_id, *direction.pick(old_position, new_position));
            }
        }
        Action::Document {
            old_document,
            new_document,
        } => {
            let patch = direction.pick(old_document, new_document);
            if let Some(snapshot) = cache.get_document_mut(patch.document_id) {
                for (key, value) in patch.iter() {
                    snapshot.set_field(key, value);
                }
            }
        }
        Action::Compound { actions } => {
            for member in actions.iter().flatten() {
                refresh_snapshot(member, direction, document_id, cache);
            }
        }
    }
}

fn cached(cache: &mut SnapshotCache, id: LayerId) -> Option<&mut Layer> {
    let found = cache.get_mut(id);
    if found.is_none() {
        tracing::debug!("No snapshot for {} to refresh", id);
    }
    found
}
