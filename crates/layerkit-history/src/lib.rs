//! # LayerKit History
//!
//! Layer and document model plus the snapshot-driven undo/redo engine.
//!
//! Tools mutate live layers for immediate feedback and then describe the
//! resulting state as a [`PostAction`]. The [`HistoryService`] derives the
//! old state from its [`SnapshotCache`], records a reversible [`Action`] in
//! the document's bounded [`History`], and refreshes the cache. Undo and redo
//! replay recorded actions through the [`replay`] engine.
//!
//! The [`Editor`] facade owns the open documents and implements the edits
//! that need no pointer geometry (paste, delete, nudge, reorder, resize).

pub mod action;
pub mod document;
pub mod editor;
pub mod error;
pub mod history;
pub mod layer;
pub mod patch;
pub mod replay;
pub mod selection;
pub mod service;
pub mod snapshot;
pub mod status;
pub mod workspace;

pub use action::{post_action_to_action, Action, PostAction};
pub use document::Document;
pub use editor::{Editor, Nudge};
pub use error::{HistoryError, HistoryResult};
pub use history::{History, HistoryEntry};
pub use layer::{Layer, LayerKind, LayerType, ShapeLayer, StrokeAlign, TextLayer};
pub use patch::{DocumentField, DocumentPatch, LayerField, LayerPatch, PropertyValue};
pub use replay::{apply_redo, apply_undo, refresh_snapshot, Direction};
pub use selection::SelectionState;
pub use service::{ChangeHandle, HistoryService};
pub use snapshot::{DocumentSnapshot, SnapshotCache};
pub use status::HistoryStatus;
pub use workspace::Workspace;
