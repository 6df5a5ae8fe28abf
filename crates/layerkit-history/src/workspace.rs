//! Open documents and their selection state.

use crate::document::Document;
use crate::selection::SelectionState;
use layerkit_core::{DocumentError, DocumentId};
use std::collections::HashMap;

/// The set of open documents, one of which may be selected.
#[derive(Debug, Default)]
pub struct Workspace {
    documents: Vec<Document>,
    selections: HashMap<DocumentId, SelectionState>,
    selected: Option<DocumentId>,
}

impl Workspace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a document and returns its id. Does not change the selection.
    pub fn open(&mut self, document: Document) -> DocumentId {
        let id = document.id;
        self.selections.entry(id).or_default();
        self.documents.push(document);
        id
    }

    /// Removes a document. If it was selected, the last remaining document
    /// becomes selected.
    pub fn close(&mut self, id: DocumentId) -> Option<Document> {
        let index = self.documents.iter().position(|d| d.id == id)?;
        let document = self.documents.remove(index);
        self.selections.remove(&id);
        if self.selected == Some(id) {
            self.selected = self.documents.last().map(|d| d.id);
        }
        Some(document)
    }

    pub fn select(&mut self, id: DocumentId) -> Result<(), DocumentError> {
        if self.document(id).is_none() {
            return Err(DocumentError::DocumentNotFound { id: id.to_string() });
        }
        self.selected = Some(id);
        Ok(())
    }

    pub fn selected_id(&self) -> Option<DocumentId> {
        self.selected
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn document(&self, id: DocumentId) -> Option<&Document> {
        self.documents.iter().find(|d| d.id == id)
    }

    pub fn document_mut(&mut self, id: DocumentId) -> Option<&mut Document> {
        self.documents.iter_mut().find(|d| d.id == id)
    }

    pub fn selection(&self, id: DocumentId) -> Option<&SelectionState> {
        self.selections.get(&id)
    }

    pub fn selection_mut(&mut self, id: DocumentId) -> Option<&mut SelectionState> {
        self.selections.get_mut(&id)
    }

    /// Mutable access to a document and its selection at the same time.
    pub fn document_and_selection_mut(
        &mut self,
        id: DocumentId,
    ) -> Option<(&mut Document, &mut SelectionState)> {
        let document = self.documents.iter_mut().find(|d| d.id == id)?;
        let selection = self.selections.entry(id).or_default();
        Some((document, selection))
    }

    /// The selected document and its selection.
    pub fn selected_mut(&mut self) -> Result<(&mut Document, &mut SelectionState), DocumentError> {
        let id = self.selected.ok_or(DocumentError::NoActiveDocument)?;
        self.document_and_selection_mut(id)
            .ok_or_else(|| DocumentError::DocumentNotFound { id: id.to_string() })
    }
}
