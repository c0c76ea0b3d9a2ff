//! Search results and hits.

use std::cmp::Reverse;

use serde::{Deserialize, Serialize};

use crate::document::{DocId, Document};
use crate::index::posting::{MatchRange, Matches};

/// The documents matched by a query, with the ranges that matched in each.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SearchResults {
    matches: Matches,
}

impl SearchResults {
    /// Wrap a match mapping.
    pub fn new(matches: Matches) -> Self {
        SearchResults { matches }
    }

    /// Get the underlying mapping.
    pub fn matches(&self) -> &Matches {
        &self.matches
    }

    /// Consume the results, returning the mapping.
    pub fn into_matches(self) -> Matches {
        self.matches
    }

    /// Matched document ids in ascending order.
    pub fn ids(&self) -> Vec<DocId> {
        self.matches.keys().copied().collect()
    }

    /// Ranges matched in one document.
    pub fn get(&self, id: DocId) -> Option<&[MatchRange]> {
        self.matches.get(&id).map(Vec::as_slice)
    }

    /// Check whether a document matched.
    pub fn contains(&self, id: DocId) -> bool {
        self.matches.contains_key(&id)
    }

    /// Number of matched documents.
    pub fn len(&self) -> usize {
        self.matches.len()
    }

    /// Check if nothing matched.
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// Total number of ranges over all documents.
    pub fn total_ranges(&self) -> usize {
        self.matches.values().map(Vec::len).sum()
    }

    /// Hits ordered by match frequency: most ranges first, ties by ascending id.
    pub fn ranked(&self) -> Vec<(DocId, &[MatchRange])> {
        let mut hits: Vec<(DocId, &[MatchRange])> = self
            .matches
            .iter()
            .map(|(id, ranges)| (*id, ranges.as_slice()))
            .collect();
        hits.sort_by_key(|(id, ranges)| (Reverse(ranges.len()), *id));
        hits
    }
}

impl From<Matches> for SearchResults {
    fn from(matches: Matches) -> Self {
        SearchResults::new(matches)
    }
}

impl IntoIterator for SearchResults {
    type Item = (DocId, Vec<MatchRange>);
    type IntoIter = std::collections::btree_map::IntoIter<DocId, Vec<MatchRange>>;

    fn into_iter(self) -> Self::IntoIter {
        self.matches.into_iter()
    }
}

/// A matched document resolved through the document store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    /// Document id.
    pub id: DocId,
    /// Ranges that matched, in query operand order.
    pub ranges: Vec<MatchRange>,
    /// The stored document.
    pub document: Document,
}

impl SearchHit {
    /// Raw match frequency of this hit.
    pub fn frequency(&self) -> usize {
        self.ranges.len()
    }
}
