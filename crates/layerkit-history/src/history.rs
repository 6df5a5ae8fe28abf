//! Per-document action log with a cursor.
//!
//! `cursor` is the index of the most recently committed or redone action,
//! `-1` at the beginning. Entries past the cursor are the redoable tail and
//! are discarded by the next push. The log never grows past its capacity:
//! the oldest entry is evicted and the cursor shifted down with it.

use crate::action::Action;
use chrono::{DateTime, Utc};
use layerkit_settings::DEFAULT_MAX_HISTORY_ENTRIES;

/// A recorded action with its commit time.
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub action: Action,
    pub committed_at: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn new(action: Action) -> Self {
        Self {
            action,
            committed_at: Utc::now(),
        }
    }

    pub fn label(&self) -> String {
        self.action.label()
    }
}

/// Linear undo log for one document.
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<HistoryEntry>,
    cursor: isize,
    capacity: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_HISTORY_ENTRIES)
    }
}

impl History {
    /// Creates an empty log. A zero capacity is treated as one.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            cursor: -1,
            capacity: capacity.max(1),
        }
    }

    /// Discards the redo tail, appends `action` and evicts past capacity.
    pub fn push(&mut self, action: Action) {
        self.entries.truncate((self.cursor + 1) as usize);
        self.entries.push(HistoryEntry::new(action));
        self.cursor += 1;

        if self.entries.len() > self.capacity {
            let evicted = self.entries.remove(0);
            self.cursor -= 1;
            tracing::debug!("History full, evicted {}", evicted.label());
        }
    }

    /// Returns the action at the cursor and steps back, or `None` at the start.
    pub fn undo(&mut self) -> Option<&Action> {
        if self.cursor < 0 {
            return None;
        }
        let index = self.cursor as usize;
        self.cursor -= 1;
        self.entries.get(index).map(|e| &e.action)
    }

    /// Steps forward and returns the action there, or `None` at the end.
    pub fn redo(&mut self) -> Option<&Action> {
        if !self.can_redo() {
            return None;
        }
        self.cursor += 1;
        self.entries.get(self.cursor as usize).map(|e| &e.action)
    }

    pub fn can_undo(&self) -> bool {
        self.cursor >= 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor < self.entries.len() as isize - 1
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cursor(&self) -> isize {
        self.cursor
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// The entry the next undo would revert.
    pub fn current(&self) -> Option<&HistoryEntry> {
        if self.cursor < 0 {
            None
        } else {
            self.entries.get(self.cursor as usize)
        }
    }
}
