//! Editor facade
//!
//! Ties the workspace, the history service and the configuration together
//! and implements the keyboard and menu driven edits. Every edit mutates the
//! live document first and then commits exactly once.

use crate::action::PostAction;
use crate::document::Document;
use crate::error::{HistoryError, HistoryResult};
use crate::layer::Layer;
use crate::patch::{DocumentField, DocumentPatch, LayerPatch, PropertyValue};
use crate::service::HistoryService;
use crate::status::HistoryStatus;
use crate::workspace::Workspace;
use layerkit_core::{DocumentError, DocumentId, LayerId, PixelBuffer};
use layerkit_settings::Config;

/// Arrow-key direction for [`Editor::nudge`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nudge {
    Up,
    Down,
    Left,
    Right,
}

/// Document lifecycle plus the editing operations that feed the history.
#[derive(Debug, Default)]
pub struct Editor {
    workspace: Workspace,
    history: HistoryService,
    config: Config,
    clipboard: Option<Layer>,
}

impl Editor {
    pub fn new(config: Config) -> Self {
        Self {
            workspace: Workspace::new(),
            history: HistoryService::new(&config.history),
            config,
            clipboard: None,
        }
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn history(&self) -> &HistoryService {
        &self.history
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn clipboard(&self) -> Option<&Layer> {
        self.clipboard.as_ref()
    }

    /// The selected document's id.
    pub fn active_id(&self) -> HistoryResult<DocumentId> {
        self.workspace
            .selected_id()
            .ok_or(HistoryError::Document(DocumentError::NoActiveDocument))
    }

    /// The selected document.
    pub fn active(&self) -> HistoryResult<&Document> {
        let id = self.active_id()?;
        self.workspace
            .document(id)
            .ok_or_else(|| DocumentError::DocumentNotFound { id: id.to_string() }.into())
    }

    /// Opens `document` and makes it the active one.
    pub fn open_document(&mut self, document: Document) -> DocumentId {
        let id = self.workspace.open(document);
        if let Err(err) = self.select_document(id) {
            tracing::warn!("Opened {} but could not select it: {}", id, err);
        }
        id
    }

    /// Switches to another open document and re-seeds its snapshots.
    pub fn select_document(&mut self, id: DocumentId) -> HistoryResult<()> {
        self.workspace.select(id)?;
        self.activate(id);
        Ok(())
    }

    fn activate(&mut self, id: DocumentId) {
        if let (Some(document), Some(selection)) =
            (self.workspace.document(id), self.workspace.selection(id))
        {
            self.history.activate(document, selection);
        }
    }

    /// Closes a document. Its history stays with the service.
    pub fn close_document(&mut self, id: DocumentId) -> Option<Document> {
        let was_selected = self.workspace.selected_id() == Some(id);
        let closed = self.workspace.close(id)?;
        if was_selected {
            if let Some(next) = self.workspace.selected_id() {
                self.activate(next);
            }
        }
        Some(closed)
    }

    pub fn undo(&mut self) -> HistoryResult<()> {
        self.active_id()?;
        if self.history.undo_in(&mut self.workspace) {
            Ok(())
        } else {
            Err(HistoryError::NothingToUndo)
        }
    }

    pub fn redo(&mut self) -> HistoryResult<()> {
        self.active_id()?;
        if self.history.redo_in(&mut self.workspace) {
            Ok(())
        } else {
            Err(HistoryError::NothingToRedo)
        }
    }

    pub fn status(&self) -> HistoryResult<HistoryStatus> {
        Ok(self.history.status(self.active_id()?))
    }

    /// Called by the save handler once the active document is persisted.
    pub fn mark_saved(&mut self) -> HistoryResult<()> {
        let id = self.active_id()?;
        self.history.mark_saved(id);
        Ok(())
    }

    /// Replaces the layer selection of the active document.
    pub fn select_layers<I: IntoIterator<Item = LayerId>>(&mut self, ids: I) -> HistoryResult<()> {
        let (document, selection) = self.workspace.selected_mut()?;
        selection.select(ids);
        selection.refresh_bounds(document);
        self.history.sync_bounds(document.id, selection);
        Ok(())
    }

    /// Inserts `layer` at `position` (appended when out of range) and
    /// returns the index it landed at.
    pub fn add_layer(&mut self, layer: Layer, position: usize) -> HistoryResult<usize> {
        let (document, _) = self.workspace.selected_mut()?;
        let index = document.insert_layer(layer.clone(), position);
        self.history.commit(
            document.id,
            PostAction::Create {
                layer,
                position: index,
            },
        );
        Ok(index)
    }

    /// Copies the first selected layer to the clipboard.
    pub fn copy_selected(&mut self) -> HistoryResult<bool> {
        let document = self.active()?;
        let selection = self.workspace.selection(document.id);
        let copied = selection
            .and_then(|s| s.selected_in(document).next())
            .and_then(|id| document.layer(id))
            .cloned();

        let found = copied.is_some();
        if found {
            self.clipboard = copied;
        }
        Ok(found)
    }

    /// Pastes the clipboard layer on top of the active document under a new
    /// id and selects it.
    pub fn paste(&mut self) -> HistoryResult<Option<LayerId>> {
        let Some(source) = self.clipboard.as_ref() else {
            return Ok(None);
        };
        let id = LayerId::new();
        let mut layer = source.clone().with_id(id);
        layer.name = format!("{}{}", self.config.editing.paste_name_prefix, source.name);

        let (document, selection) = self.workspace.selected_mut()?;
        let position = document.insert_layer(layer.clone(), document.layer_count());
        selection.select([id]);
        selection.refresh_bounds(document);

        self.history
            .commit(document.id, PostAction::Create { layer, position });
        self.history.sync_bounds(document.id, selection);
        Ok(Some(id))
    }

    /// Removes the selected layers as one undoable step. Returns how many
    /// layers were removed.
    pub fn delete_selected(&mut self) -> HistoryResult<usize> {
        let (document, selection) = self.workspace.selected_mut()?;

        let mut actions = Vec::new();
        for id in selection.selected_layers.clone() {
            if let Some((position, layer)) = document.remove_layer(id) {
                actions.push(PostAction::Delete { layer, position });
            }
        }
        selection.clear();
        selection.refresh_bounds(document);

        let removed = actions.len();
        if removed > 0 {
            self.history
                .commit(document.id, PostAction::Compound { actions });
        }
        self.history.sync_bounds(document.id, selection);
        Ok(removed)
    }

    /// Moves every selected layer by a screen-space delta.
    pub fn nudge_selected(&mut self, dx: f64, dy: f64) -> HistoryResult<bool> {
        let (document, selection) = self.workspace.selected_mut()?;

        let mut moved = Vec::new();
        for id in selection.selected_layers.iter() {
            if let Some(layer) = document.layer_mut(*id) {
                layer.translate_by(dx, dy);
                moved.push((layer.id, layer.transform));
            }
        }
        if moved.is_empty() {
            return Ok(false);
        }
        selection.refresh_bounds(document);

        let new_bounds = selection.bounds;
        let actions = moved
            .into_iter()
            .map(|(layer_id, new_matrix)| PostAction::Transform {
                layer_id,
                new_matrix,
                new_bounds,
            })
            .collect();
        Ok(self
            .history
            .commit(document.id, PostAction::Compound { actions }))
    }

    /// Arrow-key nudge using the configured step sizes.
    pub fn nudge(&mut self, direction: Nudge, large: bool) -> HistoryResult<bool> {
        let editing = &self.config.editing;
        let step = if large {
            editing.nudge_step_large
        } else {
            editing.nudge_step
        };
        let (dx, dy) = match direction {
            Nudge::Up => (0.0, -step),
            Nudge::Down => (0.0, step),
            Nudge::Left => (-step, 0.0),
            Nudge::Right => (step, 0.0),
        };
        self.nudge_selected(dx, dy)
    }

    /// Moves a layer within the stack.
    pub fn move_layer(&mut self, id: LayerId, position: usize) -> HistoryResult<bool> {
        let (document, _) = self.workspace.selected_mut()?;
        if !document.move_layer(id, position) {
            return Err(missing_layer(id, document.id));
        }
        let new_position = document.index_of(id).unwrap_or(position);
        Ok(self.history.commit(
            document.id,
            PostAction::Reorder {
                layer_id: id,
                new_position,
            },
        ))
    }

    /// Applies a property patch to a layer. A patch naming a field the
    /// layer does not have, or carrying a value of the wrong type, is
    /// rejected before anything changes.
    pub fn update_layer(&mut self, id: LayerId, patch: LayerPatch) -> HistoryResult<bool> {
        let (document, _) = self.workspace.selected_mut()?;
        let document_id = document.id;
        let layer = document
            .layer_mut(id)
            .ok_or_else(|| missing_layer(id, document_id))?;

        if !patch.fits(layer) {
            tracing::warn!("Patch does not fit layer {}", id);
            return Ok(false);
        }
        patch.apply_to(layer);

        Ok(self.history.commit(
            document_id,
            PostAction::Update {
                layer_id: id,
                new_layer: patch,
            },
        ))
    }

    /// Changes the canvas size of the active document.
    pub fn resize_document(&mut self, width: u32, height: u32) -> HistoryResult<bool> {
        let (document, _) = self.workspace.selected_mut()?;
        let patch = DocumentPatch::new(document.id)
            .with(DocumentField::Width, PropertyValue::Number(width as f64))
            .with(DocumentField::Height, PropertyValue::Number(height as f64));
        patch.apply_to(document);

        Ok(self.history.commit(
            document.id,
            PostAction::Document {
                new_document: patch,
            },
        ))
    }

    /// Writes `pixels` into a canvas layer at the origin and records the
    /// resulting content.
    pub fn write_pixels(&mut self, id: LayerId, pixels: &PixelBuffer) -> HistoryResult<bool> {
        let (document, _) = self.workspace.selected_mut()?;
        let document_id = document.id;
        let layer = document
            .layer_mut(id)
            .ok_or_else(|| missing_layer(id, document_id))?;

        let Some(content) = layer.content_mut() else {
            tracing::warn!("Layer {} has no raster content", id);
            return Ok(false);
        };
        content.write_at_origin(pixels);
        let new_content = content.clone();

        Ok(self.history.commit(
            document_id,
            PostAction::Content {
                layer_id: id,
                new_content,
            },
        ))
    }

    pub fn zoom_in(&mut self) -> HistoryResult<f64> {
        let step = self.config.editing.zoom_step;
        self.zoom_by(step)
    }

    pub fn zoom_out(&mut self) -> HistoryResult<f64> {
        let step = self.config.editing.zoom_step;
        self.zoom_by(1.0 / step)
    }

    fn zoom_by(&mut self, factor: f64) -> HistoryResult<f64> {
        let (_, selection) = self.workspace.selected_mut()?;
        selection.zoom *= factor;
        Ok(selection.zoom)
    }
}

fn missing_layer(layer: LayerId, document: DocumentId) -> HistoryError {
    DocumentError::LayerNotFound {
        layer: layer.to_string(),
        document: document.to_string(),
    }
    .into()
}
