//! JSON snapshot storage.
//!
//! Collections live in memory like [`MemoryStorage`]; `commit` writes all of
//! them to one JSON file when anything changed since the last commit. The
//! file is written to a temporary sibling and renamed into place.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::document::{DocId, Document};
use crate::error::Result;
use crate::index::Collection;
use crate::schema::Schema;
use crate::storage::memory::MemoryStorage;
use crate::storage::traits::{Storage, StorageError};

/// Current snapshot format version.
const SNAPSHOT_VERSION: u32 = 1;

#[derive(Serialize)]
struct SnapshotRef<'a> {
    version: u32,
    collections: Vec<&'a Collection>,
}

#[derive(Deserialize)]
struct Snapshot {
    version: u32,
    collections: Vec<Collection>,
}

/// A storage that snapshots its collections to a JSON file.
#[derive(Debug)]
pub struct JsonStorage {
    path: PathBuf,
    pretty: bool,
    inner: MemoryStorage,
    /// Whether anything changed since the last commit.
    dirty: bool,
}

impl JsonStorage {
    /// Open a snapshot file, starting empty if it does not exist yet.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let inner = if path.exists() {
            let file = File::open(&path)?;
            let snapshot: Snapshot = serde_json::from_reader(BufReader::new(file))?;
            if snapshot.version != SNAPSHOT_VERSION {
                return Err(StorageError::CorruptSnapshot(format!(
                    "unsupported version {} in {}",
                    snapshot.version,
                    path.display()
                ))
                .into());
            }
            for collection in &snapshot.collections {
                collection.check()?;
            }
            log::info!(
                "loaded {} collection(s) from {}",
                snapshot.collections.len(),
                path.display()
            );
            MemoryStorage::from_collections(snapshot.collections)
        } else {
            log::debug!("no snapshot at {}, starting empty", path.display());
            MemoryStorage::new()
        };

        Ok(JsonStorage {
            path,
            pretty: false,
            inner,
            dirty: false,
        })
    }

    /// Pretty-print snapshots.
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Get the snapshot path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether there are uncommitted changes.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn write_snapshot(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let snapshot = SnapshotRef {
            version: SNAPSHOT_VERSION,
            collections: self.inner.collections(),
        };

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        let mut writer = BufWriter::new(File::create(&tmp)?);
        if self.pretty {
            serde_json::to_writer_pretty(&mut writer, &snapshot)?;
        } else {
            serde_json::to_writer(&mut writer, &snapshot)?;
        }
        writer.flush()?;
        writer.get_ref().sync_all()?;
        drop(writer);

        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl Storage for JsonStorage {
    fn create_collection(&mut self, schema: Arc<Schema>) -> Result<()> {
        self.inner.create_collection(schema)?;
        self.dirty = true;
        Ok(())
    }

    fn drop_collection(&mut self, name: &str) -> Result<()> {
        self.inner.drop_collection(name)?;
        self.dirty = true;
        Ok(())
    }

    fn collection(&self, name: &str) -> Result<&Collection> {
        self.inner.collection(name)
    }

    fn collection_mut(&mut self, name: &str) -> Result<&mut Collection> {
        let collection = self.inner.collection_mut(name)?;
        self.dirty = true;
        Ok(collection)
    }

    fn add_document(&mut self, name: &str, doc: Document, id: Option<DocId>) -> Result<DocId> {
        let id = self.inner.add_document(name, doc, id)?;
        self.dirty = true;
        Ok(id)
    }

    fn delete_document(&mut self, name: &str, id: DocId) -> Result<Document> {
        let doc = self.inner.delete_document(name, id)?;
        self.dirty = true;
        Ok(doc)
    }

    fn collection_names(&self) -> Vec<String> {
        self.inner.collection_names()
    }

    fn commit(&mut self) -> Result<()> {
        self.inner.commit()?;
        if !self.dirty {
            return Ok(());
        }

        self.write_snapshot()?;
        self.dirty = false;
        log::info!("committed snapshot to {}", self.path.display());
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.commit()?;
        self.inner.close()
    }

    fn storage_type(&self) -> &'static str {
        "json"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use crate::query::Query;
    use crate::schema::Field;
    use tempfile::TempDir;

    fn schema() -> Arc<Schema> {
        Arc::new(
            Schema::new(
                "Profile",
                vec![
                    ("name", Field::text()),
                    ("age", Field::int().indexed(true)),
                    ("score", Field::float()),
                ],
            )
            .unwrap(),
        )
    }

    #[test]
    fn test_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("store.json");

        let doc = Document::builder()
            .add_text("name", "John Smith")
            .add_integer("age", 30)
            .add_float("score", 0.5)
            .build();

        {
            let mut storage = JsonStorage::open(&path).unwrap();
            storage.create_collection(schema()).unwrap();
            storage
                .collection_mut("Profile")
                .unwrap()
                .add(doc.clone(), Some(1))
                .unwrap();
            storage.close().unwrap();
        }

        let storage = JsonStorage::open(&path).unwrap();
        let collection = storage.collection("Profile").unwrap();
        assert_eq!(collection.schema().field_names(), vec!["name", "age", "score"]);
        assert_eq!(collection.get(1).unwrap(), &doc);

        let matches = collection.search(&Query::term("name", "ohn")).unwrap();
        assert_eq!(matches.keys().copied().collect::<Vec<_>>(), vec![1]);

        let rebuilt = {
            let mut fresh = Collection::new(schema());
            fresh.add(doc, Some(1)).unwrap();
            fresh
        };
        assert_eq!(collection, &rebuilt);
    }

    #[test]
    fn test_commit_only_when_dirty() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("store.json");

        let mut storage = JsonStorage::open(&path).unwrap().with_pretty(true);
        assert!(!storage.is_dirty());
        storage.commit().unwrap();
        assert!(!path.exists());

        storage.create_collection(schema()).unwrap();
        assert!(storage.is_dirty());
        storage.commit().unwrap();
        assert!(path.exists());
        assert!(!storage.is_dirty());
        assert_eq!(storage.storage_type(), "json");
    }

    #[test]
    fn test_failed_changes_leave_storage_clean() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("store.json");

        let mut storage = JsonStorage::open(&path).unwrap();
        storage.create_collection(schema()).unwrap();
        let doc = Document::builder().add_text("name", "Bob Jobs").build();
        storage.add_document("Profile", doc, Some(1)).unwrap();
        storage.commit().unwrap();
        let committed = fs::read_to_string(&path).unwrap();

        let bad = Document::builder().add_text("age", "forty").build();
        assert!(storage.add_document("Profile", bad, Some(2)).is_err());
        assert!(storage.delete_document("Profile", 7).unwrap_err().is_not_found());
        assert!(storage.delete_document("Missing", 1).unwrap_err().is_not_found());
        assert!(!storage.is_dirty());

        storage.delete_document("Profile", 1).unwrap();
        assert!(storage.is_dirty());
        storage.commit().unwrap();
        assert_ne!(fs::read_to_string(&path).unwrap(), committed);
    }

    #[test]
    fn test_rejects_unknown_version() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("store.json");
        fs::write(&path, r#"{"version": 99, "collections": []}"#).unwrap();

        assert!(JsonStorage::open(&path).is_err());
    }
}
