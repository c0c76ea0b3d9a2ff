//! Index module for Tridex.
//!
//! This module holds the per-schema data: the posting store and the
//! indexer that fills it, the document store, and the [`Collection`] that
//! ties them to a schema.

pub mod collection;
pub mod document_store;
pub mod indexer;
pub mod posting;

// Re-export commonly used types
pub use collection::{Collection, CollectionStats, FieldStats};
pub use document_store::DocumentStore;
pub use indexer::Indexer;
pub use posting::{FieldPostings, MatchRange, Matches, PostingList, PostingStats, PostingStore};
