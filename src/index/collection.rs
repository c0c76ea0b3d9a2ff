//! A collection: one schema with its documents and postings.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::document::{DocId, Document};
use crate::error::{Result, TridexError};
use crate::index::document_store::DocumentStore;
use crate::index::indexer::Indexer;
use crate::index::posting::{Matches, PostingStore};
use crate::query::Query;
use crate::schema::{FieldKind, Schema};

/// Everything stored under one schema name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    schema: Arc<Schema>,
    documents: DocumentStore,
    postings: PostingStore,
}

impl Collection {
    /// Create an empty collection for a schema.
    pub fn new(schema: Arc<Schema>) -> Self {
        let postings = PostingStore::new(schema.len());
        Collection {
            schema,
            documents: DocumentStore::new(),
            postings,
        }
    }

    /// Get the schema.
    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Get the document store.
    pub fn documents(&self) -> &DocumentStore {
        &self.documents
    }

    /// Get the posting store.
    pub fn postings(&self) -> &PostingStore {
        &self.postings
    }

    /// Add a document, returning its id.
    ///
    /// When `id` is `None` the next free id is assigned. Re-adding an
    /// existing id replaces the document and retracts its old postings
    /// before the new value is indexed. A document that fails validation
    /// leaves the collection untouched.
    pub fn add(&mut self, doc: Document, id: Option<DocId>) -> Result<DocId> {
        doc.validate(&self.schema)?;

        let id = match id {
            Some(id) => id,
            None => self.documents.assign_id()?,
        };

        let indexer = Indexer::new(&self.schema);
        if let Some(previous) = self.documents.get(id) {
            log::debug!(
                "re-indexing document {} of schema '{}'",
                id,
                self.schema.name()
            );
            indexer.unindex(&mut self.postings, id, previous);
        }

        indexer.index(&mut self.postings, id, &doc);
        self.documents.insert(id, doc);
        Ok(id)
    }

    /// Get a document.
    ///
    /// # Errors
    ///
    /// [`TridexError::NotFound`] if no document has this id.
    pub fn get(&self, id: DocId) -> Result<&Document> {
        self.documents.get(id).ok_or_else(|| self.missing(id))
    }

    /// Delete a document and retract its postings.
    ///
    /// # Errors
    ///
    /// [`TridexError::NotFound`] if no document has this id.
    pub fn delete(&mut self, id: DocId) -> Result<Document> {
        let doc = self.documents.remove(id).ok_or_else(|| self.missing(id))?;
        Indexer::new(&self.schema).unindex(&mut self.postings, id, &doc);
        Ok(doc)
    }

    /// Execute a query against this collection's postings.
    pub fn search(&self, query: &Query) -> Result<Matches> {
        query.execute(&self.schema, &self.postings)
    }

    /// Number of stored documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Check if the collection holds no documents.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Check that the postings line up with the schema's fields.
    pub fn check(&self) -> Result<()> {
        if self.postings.field_count() != self.schema.len() {
            return Err(TridexError::storage(format!(
                "schema '{}' declares {} fields but its postings cover {}",
                self.schema.name(),
                self.schema.len(),
                self.postings.field_count()
            )));
        }
        Ok(())
    }

    /// Per-field statistics.
    pub fn stats(&self) -> CollectionStats {
        let fields = self
            .schema
            .fields()
            .iter()
            .enumerate()
            .map(|(idx, field)| {
                let stats = self.postings.stats(idx);
                FieldStats {
                    name: field.name().to_string(),
                    kind: field.kind(),
                    indexed: field.is_indexed(),
                    keys: stats.keys,
                    postings: stats.postings,
                    ranges: stats.ranges,
                }
            })
            .collect();

        CollectionStats {
            schema: self.schema.name().to_string(),
            documents: self.documents.len(),
            next_id: self.documents.next_id(),
            fields,
        }
    }

    fn missing(&self, id: DocId) -> TridexError {
        TridexError::not_found(format!(
            "document {} in schema '{}'",
            id,
            self.schema.name()
        ))
    }
}

/// Statistics for one collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionStats {
    pub schema: String,
    pub documents: usize,
    pub next_id: DocId,
    pub fields: Vec<FieldStats>,
}

/// Statistics for one field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldStats {
    pub name: String,
    pub kind: FieldKind,
    pub indexed: bool,
    pub keys: usize,
    pub postings: usize,
    pub ranges: usize,
}
