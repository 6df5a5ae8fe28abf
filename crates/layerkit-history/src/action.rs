//! Action model.
//!
//! An [`Action`] is the immutable record of one committed change and carries
//! both the old and the new state, so it can be reverted and re-applied.
//! A [`PostAction`] is what tool code hands in: the same shape with every old
//! field omitted. [`post_action_to_action`] derives the old half from the
//! [`SnapshotCache`].

use crate::layer::Layer;
use crate::patch::{DocumentPatch, LayerPatch};
use crate::snapshot::SnapshotCache;
use layerkit_core::{Bounds, DocumentId, LayerId, Matrix, PixelBuffer};

/// A committed, reversible change.
#[derive(Debug, Clone, PartialEq)]
#[allow(clippy::large_enum_variant)]
pub enum Action {
    Create {
        layer: Layer,
        position: usize,
    },
    Delete {
        layer: Layer,
        position: usize,
    },
    Transform {
        layer_id: LayerId,
        old_matrix: Matrix,
        new_matrix: Matrix,
        old_bounds: Option<Bounds>,
        new_bounds: Option<Bounds>,
    },
    Content {
        layer_id: LayerId,
        old_content: PixelBuffer,
        new_content: PixelBuffer,
    },
    Update {
        layer_id: LayerId,
        old_layer: LayerPatch,
        new_layer: LayerPatch,
    },
    Reorder {
        layer_id: LayerId,
        old_position: usize,
        new_position: usize,
    },
    Document {
        old_document: DocumentPatch,
        new_document: DocumentPatch,
    },
    /// Applied and reverted as one step. `None` members are placeholders for
    /// sub-changes that could not be converted; they keep positions aligned.
    Compound { actions: Vec<Option<Action>> },
}

/// The new-state-only description of a change, as produced by tools.
#[derive(Debug, Clone, PartialEq)]
#[allow(clippy::large_enum_variant)]
pub enum PostAction {
    Create {
        layer: Layer,
        position: usize,
    },
    Delete {
        layer: Layer,
        position: usize,
    },
    Transform {
        layer_id: LayerId,
        new_matrix: Matrix,
        new_bounds: Option<Bounds>,
    },
    Content {
        layer_id: LayerId,
        new_content: PixelBuffer,
    },
    Update {
        layer_id: LayerId,
        new_layer: LayerPatch,
    },
    Reorder {
        layer_id: LayerId,
        new_position: usize,
    },
    Document {
        new_document: DocumentPatch,
    },
    Compound {
        actions: Vec<PostAction>,
    },
}

impl Action {
    /// Short description for history panels and events.
    pub fn label(&self) -> String {
        match self {
            Action::Create { layer, .. } => format!("Create {}", layer.name),
            Action::Delete { layer, .. } => format!("Delete {}", layer.name),
            Action::Transform { .. } => "Transform".to_string(),
            Action::Content { .. } => "Paint".to_string(),
            Action::Update { .. } => "Edit properties".to_string(),
            Action::Reorder { .. } => "Reorder".to_string(),
            Action::Document { .. } => "Edit document".to_string(),
            Action::Compound { actions } => format!("Multiple changes ({})", actions.len()),
        }
    }

    /// Every layer id this action refers to, compounds flattened.
    pub fn layer_ids(&self) -> Vec<LayerId> {
        let mut ids = Vec::new();
        self.collect_layer_ids(&mut ids);
        ids
    }

    fn collect_layer_ids(&self, ids: &mut Vec<LayerId>) {
        match self {
            Action::Create { layer, .. } | Action::Delete { layer, .. } => ids.push(layer.id),
            Action::Transform { layer_id, .. }
            | Action::Content { layer_id, .. }
            | Action::Update { layer_id, .. }
            | Action::Reorder { layer_id, .. } => ids.push(*layer_id),
            Action::Document { .. } => {}
            Action::Compound { actions } => {
                for action in actions.iter().flatten() {
                    action.collect_layer_ids(ids);
                }
            }
        }
    }

    /// Whether replaying this action writes the selection bounds.
    pub fn touches_bounds(&self) -> bool {
        match self {
            Action::Transform { .. } => true,
            Action::Compound { actions } => actions.iter().flatten().any(Action::touches_bounds),
            _ => false,
        }
    }
}

impl PostAction {
    pub fn label(&self) -> String {
        match self {
            PostAction::Create { layer, .. } => format!("Create {}", layer.name),
            PostAction::Delete { layer, .. } => format!("Delete {}", layer.name),
            PostAction::Transform { .. } => "Transform".to_string(),
            PostAction::Content { .. } => "Paint".to_string(),
            PostAction::Update { .. } => "Edit properties".to_string(),
            PostAction::Reorder { .. } => "Reorder".to_string(),
            PostAction::Document { .. } => "Edit document".to_string(),
            PostAction::Compound { actions } => format!("Multiple changes ({})", actions.len()),
        }
    }

    /// True if this change, or any member of a compound, targets `id`.
    pub fn references(&self, id: LayerId) -> bool {
        match self {
            PostAction::Create { layer, .. } | PostAction::Delete { layer, .. } => layer.id == id,
            PostAction::Transform { layer_id, .. }
            | PostAction::Content { layer_id, .. }
            | PostAction::Update { layer_id, .. }
            | PostAction::Reorder { layer_id, .. } => *layer_id == id,
            PostAction::Document { .. } => false,
            PostAction::Compound { actions } => actions.iter().any(|a| a.references(id)),
        }
    }
}

/// Builds a full [`Action`] by reading the old half from `cache`.
///
/// Returns `None` when a layer-targeting change has no snapshot to derive
/// its old state from; such a change cannot be made reversible and must be
/// dropped. Compound members that fail are kept as `None`.
pub fn post_action_to_action(
    document_id: DocumentId,
    post: PostAction,
    cache: &SnapshotCache,
) -> Option<Action> {
    match post {
        PostAction::Create { layer, position } => Some(Action::Create { layer, position }),
        PostAction::Delete { layer, position } => Some(Action::Delete { layer, position }),
        PostAction::Transform {
            layer_id,
            new_matrix,
            new_bounds,
        } => {
            let snapshot = cache.get(layer_id)?;
            Some(Action::Transform {
                layer_id,
                old_matrix: snapshot.transform,
                new_matrix,
                old_bounds: cache.get_bounds(document_id).copied(),
                new_bounds,
            })
        }
        PostAction::Content {
            layer_id,
            new_content,
        } => {
            let old_content = cache.get(layer_id)?.content()?.clone();
            Some(Action::Content {
                layer_id,
                old_content,
                new_content,
            })
        }
        PostAction::Update {
            layer_id,
            new_layer,
        } => {
            let old_layer = LayerPatch::capture_from(cache.get(layer_id)?, new_layer.keys())?;
            Some(Action::Update {
                layer_id,
                old_layer,
                new_layer,
            })
        }
        PostAction::Reorder {
            layer_id,
            new_position,
        } => {
            let old_position = cache.get_document(document_id)?.position_of(layer_id)?;
            Some(Action::Reorder {
                layer_id,
                old_position,
                new_position,
            })
        }
        PostAction::Document { new_document } => {
            let snapshot = cache.get_document(new_document.document_id)?;
            let old_document = new_document
                .keys()
                .fold(DocumentPatch::new(new_document.document_id), |patch, key| {
                    patch.with(key, snapshot.field(key))
                });
            Some(Action::Document {
                old_document,
                new_document,
            })
        }
        PostAction::Compound { actions } => Some(Action::Compound {
            actions: actions
                .into_iter()
                .map(|post| post_action_to_action(document_id, post, cache))
                .collect(),
        }),
    }
}
