//! Posting lists and the per-collection posting store.
//!
//! For every indexed field the store maps a key (a normalized scalar value or
//! a text trigram) to the documents containing it, together with the byte
//! ranges where the key occurs in each document's normalized value.

use std::collections::BTreeMap;
use std::fmt;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::analysis::{Tokenizer, TrigramTokenizer, lowercase};
use crate::document::DocId;

/// A half-open byte range `[start, end)` inside a normalized field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MatchRange {
    /// Start offset (inclusive)
    pub start: usize,
    /// End offset (exclusive)
    pub end: usize,
}

impl MatchRange {
    /// Create a new range.
    pub fn new(start: usize, end: usize) -> Self {
        MatchRange { start, end }
    }

    /// Length of the range in bytes.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Check if the range is empty.
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// The slice of `text` covered by this range, if it lies on char boundaries.
    pub fn slice<'a>(&self, text: &'a str) -> Option<&'a str> {
        text.get(self.start..self.end)
    }
}

impl From<(usize, usize)> for MatchRange {
    fn from((start, end): (usize, usize)) -> Self {
        MatchRange::new(start, end)
    }
}

impl fmt::Display for MatchRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.start, self.end)
    }
}

/// Documents matched by a key or query, with the ranges that matched.
pub type Matches = BTreeMap<DocId, Vec<MatchRange>>;

/// The documents containing one key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostingList {
    /// Document id to occurrence ranges, in order of discovery
    postings: Matches,
}

impl PostingList {
    /// Create a new empty posting list.
    pub fn new() -> Self {
        PostingList {
            postings: Matches::new(),
        }
    }

    /// Append one occurrence for a document.
    pub fn add(&mut self, doc_id: DocId, range: MatchRange) {
        self.postings.entry(doc_id).or_default().push(range);
    }

    /// Remove a document from this list, returning its ranges.
    pub fn remove(&mut self, doc_id: DocId) -> Option<Vec<MatchRange>> {
        self.postings.remove(&doc_id)
    }

    /// Ranges recorded for a document.
    pub fn get(&self, doc_id: DocId) -> Option<&[MatchRange]> {
        self.postings.get(&doc_id).map(|r| r.as_slice())
    }

    /// Iterate over `(doc_id, ranges)` in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (DocId, &[MatchRange])> {
        self.postings.iter().map(|(id, r)| (*id, r.as_slice()))
    }

    /// Number of documents in this list.
    pub fn doc_frequency(&self) -> usize {
        self.postings.len()
    }

    /// Number of occurrences across all documents.
    pub fn total_frequency(&self) -> usize {
        self.postings.values().map(|r| r.len()).sum()
    }

    /// Get the number of documents.
    pub fn len(&self) -> usize {
        self.postings.len()
    }

    /// Check if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }

    /// Copy the list into a match map.
    pub fn to_matches(&self) -> Matches {
        self.postings.clone()
    }
}

/// Postings of one field: key to posting list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldPostings {
    keys: AHashMap<String, PostingList>,
}

impl FieldPostings {
    /// Create empty field postings.
    pub fn new() -> Self {
        FieldPostings {
            keys: AHashMap::new(),
        }
    }

    /// Append an occurrence of `key` in `doc_id`.
    pub fn add(&mut self, key: &str, doc_id: DocId, range: MatchRange) {
        match self.keys.get_mut(key) {
            Some(list) => list.add(doc_id, range),
            None => {
                let mut list = PostingList::new();
                list.add(doc_id, range);
                self.keys.insert(key.to_string(), list);
            }
        }
    }

    /// Remove `doc_id` from the list of `key`, dropping the key once empty.
    pub fn remove(&mut self, key: &str, doc_id: DocId) {
        if let Some(list) = self.keys.get_mut(key) {
            list.remove(doc_id);
            if list.is_empty() {
                self.keys.remove(key);
            }
        }
    }

    /// Get the posting list of a key.
    pub fn get(&self, key: &str) -> Option<&PostingList> {
        self.keys.get(key)
    }

    /// Iterate over the keys of this field.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.keys.keys().map(|k| k.as_str())
    }

    /// Number of distinct keys.
    pub fn key_count(&self) -> usize {
        self.keys.len()
    }

    /// Number of `(key, document)` postings.
    pub fn posting_count(&self) -> usize {
        self.keys.values().map(|l| l.doc_frequency()).sum()
    }

    /// Number of recorded ranges.
    pub fn range_count(&self) -> usize {
        self.keys.values().map(|l| l.total_frequency()).sum()
    }
}

/// Statistics over one field's postings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostingStats {
    /// Distinct keys
    pub keys: usize,
    /// `(key, document)` pairs
    pub postings: usize,
    /// Recorded ranges
    pub ranges: usize,
}

/// Postings of every field of one schema, addressed by field index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostingStore {
    fields: Vec<FieldPostings>,
}

impl PostingStore {
    /// Create a store with one empty slot per field.
    pub fn new(field_count: usize) -> Self {
        PostingStore {
            fields: vec![FieldPostings::new(); field_count],
        }
    }

    /// Number of field slots.
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Get the postings of a field.
    pub fn field(&self, field_idx: usize) -> Option<&FieldPostings> {
        self.fields.get(field_idx)
    }

    /// Get the postings of a field for writing.
    pub fn field_mut(&mut self, field_idx: usize) -> Option<&mut FieldPostings> {
        self.fields.get_mut(field_idx)
    }

    /// Exact lookup of `key` in a field. Unseen keys yield an empty map.
    pub fn lookup(&self, field_idx: usize, key: &str) -> Matches {
        self.field(field_idx)
            .and_then(|f| f.get(key))
            .map(|list| list.to_matches())
            .unwrap_or_default()
    }

    /// Substring lookup in a text field.
    ///
    /// The substring is lower-cased and cut into trigrams; the result is the
    /// union of every trigram's postings with range lists concatenated per
    /// document in trigram order. Substrings shorter than three characters
    /// match nothing.
    pub fn lookup_text(&self, field_idx: usize, substring: &str) -> Matches {
        let mut matches = Matches::new();
        let Some(field) = self.field(field_idx) else {
            return matches;
        };

        let normalized = lowercase(substring);
        for token in TrigramTokenizer::new().tokenize(&normalized) {
            if let Some(list) = field.get(token.text) {
                for (doc_id, ranges) in list.iter() {
                    matches.entry(doc_id).or_default().extend_from_slice(ranges);
                }
            }
        }
        matches
    }

    /// Statistics for one field.
    pub fn stats(&self, field_idx: usize) -> PostingStats {
        match self.field(field_idx) {
            Some(f) => PostingStats {
                keys: f.key_count(),
                postings: f.posting_count(),
                ranges: f.range_count(),
            },
            None => PostingStats {
                keys: 0,
                postings: 0,
                ranges: 0,
            },
        }
    }
}
