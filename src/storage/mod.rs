//! Storage abstraction layer for Tridex.
//!
//! A backend keeps one [`Collection`](crate::index::Collection) per schema
//! name. [`MemoryStorage`] keeps everything in memory; [`JsonStorage`] adds a
//! snapshot file that is rewritten on commit.

pub mod json;
pub mod memory;
pub mod traits;

// Re-export commonly used types
pub use json::JsonStorage;
pub use memory::MemoryStorage;
pub use traits::{Storage, StorageConfig, StorageError};

use crate::error::Result;

/// Create a storage backend from its configuration.
pub fn create_storage(config: &StorageConfig) -> Result<Box<dyn Storage>> {
    match config {
        StorageConfig::Memory => Ok(Box::new(MemoryStorage::new())),
        StorageConfig::Json { path, pretty } => {
            Ok(Box::new(JsonStorage::open(path)?.with_pretty(*pretty)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_create_storage() {
        let storage = create_storage(&StorageConfig::Memory).unwrap();
        assert_eq!(storage.storage_type(), "memory");

        let temp_dir = TempDir::new().unwrap();
        let config = StorageConfig::Json {
            path: temp_dir.path().join("store.json"),
            pretty: true,
        };
        let storage = create_storage(&config).unwrap();
        assert_eq!(storage.storage_type(), "json");
        assert!(storage.collection_names().is_empty());
    }
}
