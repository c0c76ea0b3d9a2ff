//! Storage abstraction trait and common types.

use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::document::{DocId, Document};
use crate::error::{Result, TridexError};
use crate::index::Collection;
use crate::schema::Schema;

/// A backend that keeps one [`Collection`] per schema name.
///
/// The engine never touches documents or postings except through the
/// collections a backend hands out, so a backend decides where they live
/// (memory, a snapshot file) and when they are flushed.
pub trait Storage: Send + Sync + std::fmt::Debug {
    /// Create an empty collection for a schema.
    fn create_collection(&mut self, schema: Arc<Schema>) -> Result<()>;

    /// Drop a collection and everything stored in it.
    fn drop_collection(&mut self, name: &str) -> Result<()>;

    /// Get a collection for reading.
    fn collection(&self, name: &str) -> Result<&Collection>;

    /// Get a collection for writing.
    ///
    /// Backends that track changes treat every call as a change, since they
    /// cannot see what the caller does with the collection.
    fn collection_mut(&mut self, name: &str) -> Result<&mut Collection>;

    /// Add a document to a collection, returning its id.
    fn add_document(&mut self, name: &str, doc: Document, id: Option<DocId>) -> Result<DocId> {
        self.collection_mut(name)?.add(doc, id)
    }

    /// Delete a document from a collection.
    fn delete_document(&mut self, name: &str, id: DocId) -> Result<Document> {
        self.collection_mut(name)?.delete(id)
    }

    /// Names of all collections, sorted.
    fn collection_names(&self) -> Vec<String>;

    /// Flush pending changes, if the backend persists anything.
    fn commit(&mut self) -> Result<()>;

    /// Flush and release the backend. Later calls fail.
    fn close(&mut self) -> Result<()>;

    /// Get the name of this storage type.
    fn storage_type(&self) -> &'static str;
}

/// Configuration for storage backends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StorageConfig {
    /// Keep everything in memory.
    Memory,
    /// Keep everything in memory and snapshot it to a JSON file on commit.
    Json {
        /// Snapshot file path.
        path: PathBuf,
        /// Pretty-print the snapshot.
        #[serde(default)]
        pretty: bool,
    },
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig::Memory
    }
}

/// Error types specific to storage operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// Storage is closed.
    StorageClosed,

    /// Snapshot file is malformed.
    CorruptSnapshot(String),
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::StorageClosed => write!(f, "Storage is closed"),
            StorageError::CorruptSnapshot(msg) => write!(f, "Corrupt snapshot: {msg}"),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<StorageError> for TridexError {
    fn from(err: StorageError) -> Self {
        TridexError::storage(err.to_string())
    }
}
