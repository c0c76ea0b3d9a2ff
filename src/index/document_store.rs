//! Document store: document id to the original document.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::document::{DocId, Document};
use crate::error::{Result, TridexError};

/// Verbatim documents of one schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentStore {
    documents: BTreeMap<DocId, Document>,
    /// Next id handed out when the caller supplies none
    next_id: DocId,
    /// Set once `DocId::MAX` has been used and the counter cannot advance
    #[serde(default)]
    exhausted: bool,
}

impl DocumentStore {
    /// Create an empty store.
    pub fn new() -> Self {
        DocumentStore {
            documents: BTreeMap::new(),
            next_id: 0,
            exhausted: false,
        }
    }

    /// Reserve an id one past the largest id seen so far.
    ///
    /// # Errors
    ///
    /// [`TridexError::Storage`] once `DocId::MAX` has been handed out or
    /// stored, since no larger id is left.
    pub fn assign_id(&mut self) -> Result<DocId> {
        if self.exhausted {
            return Err(TridexError::storage(
                "document ids exhausted: no id is left past the largest stored id",
            ));
        }

        let id = self.next_id;
        self.advance_past(id);
        Ok(id)
    }

    /// The id [`assign_id`](Self::assign_id) would return next.
    pub fn next_id(&self) -> DocId {
        self.next_id
    }

    /// Insert or replace a document, returning the previous one.
    pub fn insert(&mut self, id: DocId, doc: Document) -> Option<Document> {
        self.advance_past(id);
        self.documents.insert(id, doc)
    }

    fn advance_past(&mut self, id: DocId) {
        match id.checked_add(1) {
            Some(next) => self.next_id = self.next_id.max(next),
            None => self.exhausted = true,
        }
    }

    /// Get a document.
    pub fn get(&self, id: DocId) -> Option<&Document> {
        self.documents.get(&id)
    }

    /// Remove a document.
    pub fn remove(&mut self, id: DocId) -> Option<Document> {
        self.documents.remove(&id)
    }

    /// Check if a document exists.
    pub fn contains(&self, id: DocId) -> bool {
        self.documents.contains_key(&id)
    }

    /// Stored ids in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = DocId> + '_ {
        self.documents.keys().copied()
    }

    /// Number of stored documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Check if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}
