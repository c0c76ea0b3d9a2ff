//! Indexer: turns field values into postings.
//!
//! Text fields are indexed by trigram with one range per occurrence, every
//! other kind by its whole normalized value. Fields that are not indexed are
//! skipped. The indexer only ever touches the posting store.

use crate::analysis::{Tokenizer, TrigramTokenizer, normalize};
use crate::document::{DocId, Document, FieldValue};
use crate::index::posting::{MatchRange, PostingStore};
use crate::schema::{Field, FieldKind, Schema};

/// The `(key, range)` entries a value contributes to its field's postings,
/// in order of discovery.
///
/// # Examples
///
/// ```
/// use tridex::document::FieldValue;
/// use tridex::index::indexer::postings_for;
/// use tridex::index::MatchRange;
/// use tridex::schema::Field;
///
/// let entries = postings_for(&Field::text(), &FieldValue::from("John"));
/// assert_eq!(entries, vec![
///     ("joh".to_string(), MatchRange::new(0, 3)),
///     ("ohn".to_string(), MatchRange::new(1, 4)),
/// ]);
///
/// let entries = postings_for(&Field::int().indexed(true), &FieldValue::Int(30));
/// assert_eq!(entries, vec![("30".to_string(), MatchRange::new(0, 2))]);
/// ```
pub fn postings_for(field: &Field, value: &FieldValue) -> Vec<(String, MatchRange)> {
    if !field.is_indexed() {
        return Vec::new();
    }

    let normalized = normalize(field.kind(), value);
    match field.kind() {
        FieldKind::Text => TrigramTokenizer::new()
            .tokenize(&normalized)
            .map(|token| {
                let range = MatchRange::new(token.start_offset, token.end_offset());
                (token.text.to_string(), range)
            })
            .collect(),
        _ => {
            let range = MatchRange::new(0, normalized.len());
            vec![(normalized, range)]
        }
    }
}

/// Writes and retracts the postings of documents of one schema.
#[derive(Debug, Clone, Copy)]
pub struct Indexer<'a> {
    schema: &'a Schema,
}

impl<'a> Indexer<'a> {
    /// Create an indexer for a schema.
    pub fn new(schema: &'a Schema) -> Self {
        Indexer { schema }
    }

    /// Index one field value of a document.
    ///
    /// Values for fields the schema does not declare are ignored; documents
    /// are validated before they reach the indexer.
    pub fn index_field(
        &self,
        store: &mut PostingStore,
        field_name: &str,
        doc_id: DocId,
        value: &FieldValue,
    ) {
        let Ok((idx, field)) = self.schema.resolve(field_name) else {
            return;
        };
        let Some(postings) = store.field_mut(idx) else {
            return;
        };

        for (key, range) in postings_for(field, value) {
            postings.add(&key, doc_id, range);
        }
    }

    /// Remove the postings one field value produced for a document.
    pub fn unindex_field(
        &self,
        store: &mut PostingStore,
        field_name: &str,
        doc_id: DocId,
        value: &FieldValue,
    ) {
        let Ok((idx, field)) = self.schema.resolve(field_name) else {
            return;
        };
        let Some(postings) = store.field_mut(idx) else {
            return;
        };

        for (key, _) in postings_for(field, value) {
            postings.remove(&key, doc_id);
        }
    }

    /// Index every field of a document.
    pub fn index(&self, store: &mut PostingStore, doc_id: DocId, doc: &Document) {
        for (name, value) in doc.iter() {
            self.index_field(store, name, doc_id, value);
        }
    }

    /// Retract every posting a document produced.
    pub fn unindex(&self, store: &mut PostingStore, doc_id: DocId, doc: &Document) {
        for (name, value) in doc.iter() {
            self.unindex_field(store, name, doc_id, value);
        }
    }
}
