//! Per-document history status for tab strips and menus.

use crate::history::History;

/// Undo/redo availability and the edits-since-save counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HistoryStatus {
    pub can_undo: bool,
    pub can_redo: bool,
    /// Approximate number of edits since the last save. Incremented on
    /// commit and redo, decremented on undo. Eviction can leave it non-zero
    /// (or negative) at the saved point.
    pub dirty_count: i64,
}

impl HistoryStatus {
    pub fn is_dirty(&self) -> bool {
        self.dirty_count != 0
    }
}

/// Stored per-document counters; the flags are derived from the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct TabStatus {
    pub actions_since_save: i64,
    /// Order in which the document was first activated.
    pub tab_index: usize,
}

impl TabStatus {
    pub fn project(&self, history: Option<&History>) -> HistoryStatus {
        HistoryStatus {
            can_undo: history.is_some_and(History::can_undo),
            can_redo: history.is_some_and(History::can_redo),
            dirty_count: self.actions_since_save,
        }
    }
}
