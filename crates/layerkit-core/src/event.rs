//! Event system for history notifications
//!
//! Provides:
//! - Event types emitted whenever a document's history changes
//! - Event dispatcher for publishing events to subscribers
//!
//! Observers (renderers, tab strips, autosave) subscribe instead of polling
//! document state after every edit.

use crate::ids::DocumentId;
use tokio::sync::broadcast;

/// History event types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryEvent {
    /// A document became the active one and its snapshots were seeded
    Activated(DocumentId),
    /// An action was recorded
    Committed {
        document: DocumentId,
        /// Short description of the recorded action.
        label: String,
    },
    /// A commit could not be made reversible and was not recorded
    Dropped {
        document: DocumentId,
        label: String,
    },
    /// An action was reverted
    Undone {
        document: DocumentId,
        label: String,
    },
    /// An action was re-applied
    Redone {
        document: DocumentId,
        label: String,
    },
    /// The document was saved and its dirty counter reset
    Saved(DocumentId),
}

impl HistoryEvent {
    /// The document this event belongs to.
    pub fn document(&self) -> DocumentId {
        match self {
            HistoryEvent::Activated(id) | HistoryEvent::Saved(id) => *id,
            HistoryEvent::Committed { document, .. }
            | HistoryEvent::Dropped { document, .. }
            | HistoryEvent::Undone { document, .. }
            | HistoryEvent::Redone { document, .. } => *document,
        }
    }
}

impl std::fmt::Display for HistoryEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HistoryEvent::Activated(id) => write!(f, "Activated {}", id),
            HistoryEvent::Committed { document, label } => {
                write!(f, "Committed {} on {}", label, document)
            }
            HistoryEvent::Dropped { document, label } => {
                write!(f, "Dropped {} on {}", label, document)
            }
            HistoryEvent::Undone { document, label } => write!(f, "Undo {} on {}", label, document),
            HistoryEvent::Redone { document, label } => write!(f, "Redo {} on {}", label, document),
            HistoryEvent::Saved(id) => write!(f, "Saved {}", id),
        }
    }
}

/// Event dispatcher for publishing events to subscribers
#[derive(Debug, Clone)]
pub struct EventDispatcher {
    /// Broadcast sender channel for history events.
    tx: broadcast::Sender<HistoryEvent>,
}

impl EventDispatcher {
    /// Create a new event dispatcher
    ///
    /// # Arguments
    /// * `buffer_size` - Size of the broadcast buffer (default 100)
    pub fn new(buffer_size: usize) -> Self {
        let (tx, _) = broadcast::channel(buffer_size.max(1));
        Self { tx }
    }

    /// Create a new event dispatcher with default buffer size
    pub fn default_with_buffer() -> Self {
        Self::new(100)
    }

    /// Subscribe to events
    pub fn subscribe(&self) -> broadcast::Receiver<HistoryEvent> {
        self.tx.subscribe()
    }

    /// Publish an event to all subscribers.
    ///
    /// Returns the number of subscribers that received it; having no
    /// subscribers is not an error.
    pub fn publish(&self, event: HistoryEvent) -> usize {
        self.tx.send(event).unwrap_or(0)
    }
}

impl Default for EventDispatcher {
    fn default() -> Self {
        Self::default_with_buffer()
    }
}
