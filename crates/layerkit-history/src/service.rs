//! History service
//!
//! Owns every document's [`History`], the shared [`SnapshotCache`] and the
//! per-document status counters. Tools mutate live state for a gesture and
//! then call [`HistoryService::commit`] once with the new state; undo and
//! redo move the cursor and hand back the action to replay.
//!
//! The two-phase API ([`HistoryService::begin_change`] /
//! [`HistoryService::commit_change`]) makes the ordering contract explicit:
//! the layer is snapshotted on begin, and a commit without a matching begin
//! fails instead of recording a wrong old state.

use crate::action::{post_action_to_action, Action, PostAction};
use crate::document::Document;
use crate::error::{HistoryError, HistoryResult};
use crate::history::History;
use crate::layer::Layer;
use crate::replay::{apply, refresh_snapshot, Direction};
use crate::selection::SelectionState;
use crate::snapshot::SnapshotCache;
use crate::status::{HistoryStatus, TabStatus};
use crate::workspace::Workspace;
use layerkit_core::{DocumentId, EventDispatcher, HistoryEvent, LayerId};
use layerkit_settings::HistorySettings;
use std::collections::HashMap;
use tokio::sync::broadcast;

/// Proof that a change was begun on a layer. Consumed by
/// [`HistoryService::commit_change`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeHandle {
    document_id: DocumentId,
    layer_id: LayerId,
    token: u64,
}

impl ChangeHandle {
    pub fn document_id(&self) -> DocumentId {
        self.document_id
    }

    pub fn layer_id(&self) -> LayerId {
        self.layer_id
    }
}

#[derive(Debug, Clone, Copy)]
struct PendingChange {
    document_id: DocumentId,
    token: u64,
}

/// Undo/redo engine for all open documents.
#[derive(Debug)]
pub struct HistoryService {
    histories: HashMap<DocumentId, History>,
    snapshots: SnapshotCache,
    tabs: HashMap<DocumentId, TabStatus>,
    pending: HashMap<LayerId, PendingChange>,
    next_tab_index: usize,
    next_token: u64,
    capacity: usize,
    events: EventDispatcher,
}

impl Default for HistoryService {
    fn default() -> Self {
        Self::new(&HistorySettings::default())
    }
}

impl HistoryService {
    pub fn new(settings: &HistorySettings) -> Self {
        Self::with_capacity(settings.max_entries)
    }

    /// Creates a service whose logs keep at most `capacity` actions.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            histories: HashMap::new(),
            snapshots: SnapshotCache::new(),
            tabs: HashMap::new(),
            pending: HashMap::new(),
            next_tab_index: 0,
            next_token: 0,
            capacity,
            events: EventDispatcher::default(),
        }
    }

    pub fn events(&self) -> &EventDispatcher {
        &self.events
    }

    pub fn subscribe(&self) -> broadcast::Receiver<HistoryEvent> {
        self.events.subscribe()
    }

    pub fn snapshots(&self) -> &SnapshotCache {
        &self.snapshots
    }

    pub fn history(&self, document_id: DocumentId) -> Option<&History> {
        self.histories.get(&document_id)
    }

    /// Order in which the document was first seen by the service.
    pub fn tab_index(&self, document_id: DocumentId) -> Option<usize> {
        self.tabs.get(&document_id).map(|tab| tab.tab_index)
    }

    fn tab_mut(&mut self, document_id: DocumentId) -> &mut TabStatus {
        let next = &mut self.next_tab_index;
        self.tabs.entry(document_id).or_insert_with(|| {
            let tab = TabStatus {
                actions_since_save: 0,
                tab_index: *next,
            };
            *next += 1;
            tab
        })
    }

    /// Seeds the snapshot cache from the live document when it becomes the
    /// active one.
    pub fn activate(&mut self, document: &Document, selection: &SelectionState) {
        self.snapshots.populate_document(document);
        self.snapshots.set_bounds(document.id, selection.bounds);
        self.tab_mut(document.id);

        tracing::info!(
            "Activated {} ({} layers)",
            document.id,
            document.layer_count()
        );
        self.events.publish(HistoryEvent::Activated(document.id));
    }

    /// Stores the live selection box as the committed one. Called when the
    /// selection changes outside of a transform, so the next transform
    /// records the box the user actually saw as its old bounds.
    pub fn sync_bounds(&mut self, document_id: DocumentId, selection: &SelectionState) {
        self.snapshots.set_bounds(document_id, selection.bounds);
    }

    /// Records a change whose new state is already live.
    ///
    /// Returns `false` when the old half cannot be derived from the snapshot
    /// cache. Nothing is recorded in that case and the redo tail survives.
    pub fn commit(&mut self, document_id: DocumentId, post: PostAction) -> bool {
        let label = post.label();
        let Some(action) = post_action_to_action(document_id, post, &self.snapshots) else {
            tracing::warn!("No snapshot for {} on {}; not recorded", label, document_id);
            self.events.publish(HistoryEvent::Dropped {
                document: document_id,
                label,
            });
            return false;
        };

        let capacity = self.capacity;
        let history = self
            .histories
            .entry(document_id)
            .or_insert_with(|| History::new(capacity));
        history.push(action);
        if let Some(entry) = history.current() {
            refresh_snapshot(&entry.action, Direction::Redo, document_id, &mut self.snapshots);
        }
        tracing::debug!(
            "Committed {} on {} (cursor {}, {} entries)",
            label,
            document_id,
            history.cursor(),
            history.len()
        );

        self.tab_mut(document_id).actions_since_save += 1;
        self.events.publish(HistoryEvent::Committed {
            document: document_id,
            label,
        });
        true
    }

    /// Steps the cursor back and returns the action to revert.
    pub fn undo(&mut self, document_id: DocumentId) -> Option<Action> {
        let history = self.histories.get_mut(&document_id)?;
        let action = history.undo()?.clone();
        tracing::debug!("Undo on {} (cursor {})", document_id, history.cursor());

        self.tab_mut(document_id).actions_since_save -= 1;
        self.events.publish(HistoryEvent::Undone {
            document: document_id,
            label: action.label(),
        });
        Some(action)
    }

    /// Steps the cursor forward and returns the action to re-apply.
    pub fn redo(&mut self, document_id: DocumentId) -> Option<Action> {
        let history = self.histories.get_mut(&document_id)?;
        let action = history.redo()?.clone();
        tracing::debug!("Redo on {} (cursor {})", document_id, history.cursor());

        self.tab_mut(document_id).actions_since_save += 1;
        self.events.publish(HistoryEvent::Redone {
            document: document_id,
            label: action.label(),
        });
        Some(action)
    }

    /// Refreshes the snapshot cache for `action` and applies it to the live
    /// document and selection.
    pub fn replay(
        &mut self,
        action: &Action,
        direction: Direction,
        document: &mut Document,
        selection: &mut SelectionState,
    ) {
        refresh_snapshot(action, direction, document.id, &mut self.snapshots);
        apply(action, direction, document, selection);
        if action.touches_bounds() {
            // the live box may differ from the stored one (single-selection rotation)
            self.snapshots.set_bounds(document.id, selection.bounds);
        }
    }

    /// Undo on the selected document of `workspace`, replaying the result.
    /// Returns `false` when there was nothing to undo.
    pub fn undo_in(&mut self, workspace: &mut Workspace) -> bool {
        self.step_in(workspace, Direction::Undo)
    }

    /// Redo on the selected document of `workspace`, replaying the result.
    pub fn redo_in(&mut self, workspace: &mut Workspace) -> bool {
        self.step_in(workspace, Direction::Redo)
    }

    fn step_in(&mut self, workspace: &mut Workspace, direction: Direction) -> bool {
        let Some(document_id) = workspace.selected_id() else {
            return false;
        };
        let action = match direction {
            Direction::Undo => self.undo(document_id),
            Direction::Redo => self.redo(document_id),
        };
        let Some(action) = action else {
            return false;
        };

        match workspace.document_and_selection_mut(document_id) {
            Some((document, selection)) => self.replay(&action, direction, document, selection),
            None => tracing::warn!("Document {} is not open; {} not replayed", document_id, direction),
        }
        true
    }

    pub fn status(&self, document_id: DocumentId) -> HistoryStatus {
        self.tabs
            .get(&document_id)
            .copied()
            .unwrap_or_default()
            .project(self.histories.get(&document_id))
    }

    /// Resets the edits-since-save counter after the document was saved.
    pub fn mark_saved(&mut self, document_id: DocumentId) {
        self.tab_mut(document_id).actions_since_save = 0;
        tracing::info!("Saved {}", document_id);
        self.events.publish(HistoryEvent::Saved(document_id));
    }

    /// Starts a change on `layer`, snapshotting its current state.
    ///
    /// Only one change per layer may be in progress at a time.
    pub fn begin_change(
        &mut self,
        document_id: DocumentId,
        layer: &Layer,
    ) -> HistoryResult<ChangeHandle> {
        if self.pending.contains_key(&layer.id) {
            return Err(HistoryError::ChangeInProgress { layer: layer.id });
        }

        self.snapshots.set(layer.id, Some(layer.clone()));
        self.next_token += 1;
        let token = self.next_token;
        self.pending
            .insert(layer.id, PendingChange { document_id, token });

        Ok(ChangeHandle {
            document_id,
            layer_id: layer.id,
            token,
        })
    }

    /// Commits the change begun with `handle`.
    ///
    /// `post` must reference the handle's layer. On a mismatch the change
    /// stays in progress so the caller can retry or cancel.
    pub fn commit_change(&mut self, handle: ChangeHandle, post: PostAction) -> HistoryResult<()> {
        if !self.is_pending(&handle) {
            return Err(HistoryError::NoMatchingBegin {
                layer: handle.layer_id,
            });
        }
        if !post.references(handle.layer_id) {
            return Err(HistoryError::LayerMismatch {
                expected: handle.layer_id,
            });
        }

        self.pending.remove(&handle.layer_id);
        if self.commit(handle.document_id, post) {
            Ok(())
        } else {
            Err(HistoryError::MissingSnapshot {
                layer: handle.layer_id,
            })
        }
    }

    /// Abandons a change without recording anything. Live state may differ
    /// from the snapshot until the next commit on the layer.
    pub fn cancel_change(&mut self, handle: &ChangeHandle) -> bool {
        if self.is_pending(handle) {
            self.pending.remove(&handle.layer_id);
            tracing::debug!("Cancelled change on {}", handle.layer_id);
            true
        } else {
            false
        }
    }

    pub fn is_changing(&self, layer_id: LayerId) -> bool {
        self.pending.contains_key(&layer_id)
    }

    fn is_pending(&self, handle: &ChangeHandle) -> bool {
        self.pending
            .get(&handle.layer_id)
            .is_some_and(|p| p.token == handle.token && p.document_id == handle.document_id)
    }
}
