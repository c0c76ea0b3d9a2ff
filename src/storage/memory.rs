//! In-memory storage implementation.

use std::sync::Arc;

use ahash::AHashMap;

use crate::error::{Result, TridexError};
use crate::index::Collection;
use crate::schema::Schema;
use crate::storage::traits::{Storage, StorageError};

/// An in-memory storage implementation.
///
/// Nothing is persisted; commit is a no-op.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    /// Collections keyed by schema name.
    collections: AHashMap<String, Collection>,
    /// Whether the storage is closed.
    closed: bool,
}

impl MemoryStorage {
    /// Create a new memory storage.
    pub fn new() -> Self {
        MemoryStorage {
            collections: AHashMap::new(),
            closed: false,
        }
    }

    /// Build a storage from existing collections.
    pub fn from_collections<I: IntoIterator<Item = Collection>>(collections: I) -> Self {
        MemoryStorage {
            collections: collections
                .into_iter()
                .map(|c| (c.schema().name().to_string(), c))
                .collect(),
            closed: false,
        }
    }

    /// Check if the storage is closed.
    fn check_closed(&self) -> Result<()> {
        if self.closed {
            Err(StorageError::StorageClosed.into())
        } else {
            Ok(())
        }
    }

    /// Get the number of collections.
    pub fn collection_count(&self) -> usize {
        self.collections.len()
    }

    /// All collections, sorted by name.
    pub fn collections(&self) -> Vec<&Collection> {
        let mut collections: Vec<&Collection> = self.collections.values().collect();
        collections.sort_by(|a, b| a.schema().name().cmp(b.schema().name()));
        collections
    }

    fn missing(name: &str) -> TridexError {
        TridexError::not_found(format!("schema '{name}'"))
    }
}

impl Storage for MemoryStorage {
    fn create_collection(&mut self, schema: Arc<Schema>) -> Result<()> {
        self.check_closed()?;

        let name = schema.name().to_string();
        if self.collections.contains_key(&name) {
            return Err(TridexError::SchemaExists(name));
        }
        self.collections.insert(name, Collection::new(schema));
        Ok(())
    }

    fn drop_collection(&mut self, name: &str) -> Result<()> {
        self.check_closed()?;

        self.collections
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| Self::missing(name))
    }

    fn collection(&self, name: &str) -> Result<&Collection> {
        self.check_closed()?;
        self.collections.get(name).ok_or_else(|| Self::missing(name))
    }

    fn collection_mut(&mut self, name: &str) -> Result<&mut Collection> {
        self.check_closed()?;
        self.collections
            .get_mut(name)
            .ok_or_else(|| Self::missing(name))
    }

    fn collection_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.collections.keys().cloned().collect();
        names.sort();
        names
    }

    fn commit(&mut self) -> Result<()> {
        self.check_closed()?;
        // For memory storage, commit is a no-op
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.closed = true;
        Ok(())
    }

    fn storage_type(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Field;

    fn schema(name: &str) -> Arc<Schema> {
        Arc::new(Schema::new(name, vec![("title", Field::text())]).unwrap())
    }

    #[test]
    fn test_create_and_drop() {
        let mut storage = MemoryStorage::new();
        storage.create_collection(schema("User")).unwrap();
        storage.create_collection(schema("Profile")).unwrap();

        assert_eq!(storage.collection_names(), vec!["Profile", "User"]);
        assert!(matches!(
            storage.create_collection(schema("User")),
            Err(TridexError::SchemaExists(_))
        ));

        storage.drop_collection("User").unwrap();
        assert!(storage.collection("User").unwrap_err().is_not_found());
        assert!(storage.drop_collection("User").unwrap_err().is_not_found());
        assert_eq!(storage.collection_count(), 1);
    }

    #[test]
    fn test_closed_storage_rejects_calls() {
        let mut storage = MemoryStorage::new();
        storage.create_collection(schema("User")).unwrap();
        storage.close().unwrap();

        assert!(matches!(
            storage.collection("User"),
            Err(TridexError::Storage(_))
        ));
        assert!(storage.commit().is_err());
        assert_eq!(storage.storage_type(), "memory");
    }
}
