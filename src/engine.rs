//! The search engine: schema catalog plus a storage backend.
//!
//! # Examples
//!
//! ```
//! use tridex::document::Document;
//! use tridex::engine::Engine;
//! use tridex::query::Query;
//! use tridex::schema::Field;
//!
//! let mut engine = Engine::memory();
//! engine
//!     .create_schema("Profile", vec![("name", Field::text()), ("age", Field::int())])
//!     .unwrap();
//!
//! let doc = Document::builder()
//!     .add_text("name", "John Smith")
//!     .add_integer("age", 30)
//!     .build();
//! engine.add("Profile", doc, Some(1)).unwrap();
//!
//! let results = engine.search("Profile", &Query::term("name", "ohn")).unwrap();
//! assert_eq!(results.ids(), vec![1]);
//! ```

use std::sync::Arc;

use ahash::AHashMap;
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::config::EngineConfig;
use crate::document::{DocId, Document};
use crate::error::{Result, TridexError};
use crate::index::CollectionStats;
use crate::query::Query;
use crate::schema::{Field, Schema};
use crate::search::{SearchHit, SearchResults};
use crate::storage::{MemoryStorage, Storage, create_storage};

/// Owns the schema catalog and the storage backend holding every
/// collection.
#[derive(Debug)]
pub struct Engine {
    config: EngineConfig,
    storage: Box<dyn Storage>,
    /// Registered schemas by name.
    catalog: AHashMap<String, Arc<Schema>>,
}

impl Engine {
    /// Open an engine with the configured storage backend.
    ///
    /// Schemas already present in the backend (a loaded snapshot) are
    /// registered in the catalog.
    pub fn new(config: EngineConfig) -> Result<Self> {
        let storage = create_storage(&config.storage)?;
        Self::with_storage(config, storage)
    }

    /// Create an in-memory engine.
    pub fn memory() -> Self {
        Engine {
            config: EngineConfig::memory(),
            storage: Box::new(MemoryStorage::new()),
            catalog: AHashMap::new(),
        }
    }

    /// Create an engine over an existing storage backend.
    pub fn with_storage(config: EngineConfig, storage: Box<dyn Storage>) -> Result<Self> {
        let mut catalog = AHashMap::new();
        for name in storage.collection_names() {
            let schema = storage.collection(&name)?.schema().clone();
            catalog.insert(name, schema);
        }

        log::info!(
            "opened {} engine with {} schema(s)",
            storage.storage_type(),
            catalog.len()
        );

        Ok(Engine {
            config,
            storage,
            catalog,
        })
    }

    /// Get the configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Get the storage backend.
    pub fn storage(&self) -> &dyn Storage {
        self.storage.as_ref()
    }

    /// Register a schema from ordered `(name, field)` declarations.
    ///
    /// # Errors
    ///
    /// [`TridexError::SchemaExists`] if the name is taken,
    /// [`TridexError::Schema`] for invalid declarations.
    pub fn create_schema<S, N, I>(&mut self, name: S, declarations: I) -> Result<Arc<Schema>>
    where
        S: Into<String>,
        N: Into<String>,
        I: IntoIterator<Item = (N, Field)>,
    {
        let name = name.into();
        if self.catalog.contains_key(&name) {
            return Err(TridexError::SchemaExists(name));
        }

        let schema = Arc::new(Schema::new(name.clone(), declarations)?);
        self.storage.create_collection(schema.clone())?;
        self.catalog.insert(name, schema.clone());

        log::info!(
            "created schema '{}' with fields {:?}",
            schema.name(),
            schema.field_names()
        );
        self.auto_commit()?;
        Ok(schema)
    }

    /// Drop a schema with all its documents and postings.
    pub fn drop_schema(&mut self, name: &str) -> Result<()> {
        if !self.catalog.contains_key(name) {
            return Err(Self::missing_schema(name));
        }

        self.storage.drop_collection(name)?;
        self.catalog.remove(name);

        log::info!("dropped schema '{name}'");
        self.auto_commit()
    }

    /// Get a registered schema.
    pub fn schema(&self, name: &str) -> Result<Arc<Schema>> {
        self.catalog
            .get(name)
            .cloned()
            .ok_or_else(|| Self::missing_schema(name))
    }

    /// Names of all registered schemas, sorted.
    pub fn schema_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.catalog.keys().cloned().collect();
        names.sort();
        names
    }

    /// Store and index a document, returning its id.
    ///
    /// With `id == None` the next free id of the schema is assigned. Adding
    /// under an existing id replaces that document.
    pub fn add(&mut self, schema: &str, doc: Document, id: Option<DocId>) -> Result<DocId> {
        let id = self.storage.add_document(schema, doc, id)?;
        log::debug!("added document {id} to schema '{schema}'");
        self.auto_commit()?;
        Ok(id)
    }

    /// Add a document given as a plain JSON object.
    pub fn add_json(
        &mut self,
        schema: &str,
        value: &serde_json::Value,
        id: Option<DocId>,
    ) -> Result<DocId> {
        let schema_ref = self.schema(schema)?;
        let doc = Document::from_json(&schema_ref, value)?;
        self.add(schema, doc, id)
    }

    /// Get a stored document.
    ///
    /// # Errors
    ///
    /// [`TridexError::NotFound`] for an unknown schema or id.
    pub fn get(&self, schema: &str, id: DocId) -> Result<Document> {
        self.storage.collection(schema)?.get(id).cloned()
    }

    /// Delete a document and its postings.
    ///
    /// # Errors
    ///
    /// [`TridexError::NotFound`] for an unknown schema or id.
    pub fn delete(&mut self, schema: &str, id: DocId) -> Result<()> {
        self.storage.delete_document(schema, id)?;
        log::debug!("deleted document {id} from schema '{schema}'");
        self.auto_commit()
    }

    /// Execute a query, returning matched ids with their ranges.
    pub fn search(&self, schema: &str, query: &Query) -> Result<SearchResults> {
        let matches = self.storage.collection(schema)?.search(query)?;
        log::debug!(
            "query {} on schema '{}' matched {} document(s)",
            query,
            schema,
            matches.len()
        );
        Ok(SearchResults::new(matches))
    }

    /// Execute a query and resolve every hit to its stored document.
    ///
    /// Hits come back in ascending id order.
    pub fn search_documents(&self, schema: &str, query: &Query) -> Result<Vec<SearchHit>> {
        let collection = self.storage.collection(schema)?;
        collection
            .search(query)?
            .into_iter()
            .map(|(id, ranges)| {
                Ok(SearchHit {
                    id,
                    ranges,
                    document: collection.get(id)?.clone(),
                })
            })
            .collect()
    }

    /// Statistics for one schema.
    pub fn stats(&self, schema: &str) -> Result<CollectionStats> {
        Ok(self.storage.collection(schema)?.stats())
    }

    /// Flush pending changes to the storage backend.
    pub fn commit(&mut self) -> Result<()> {
        self.storage.commit()
    }

    /// Flush and close the storage backend.
    pub fn close(&mut self) -> Result<()> {
        log::info!("closing {} engine", self.storage.storage_type());
        self.storage.close()
    }

    fn auto_commit(&mut self) -> Result<()> {
        if self.config.auto_commit {
            self.storage.commit()?;
        }
        Ok(())
    }

    fn missing_schema(name: &str) -> TridexError {
        TridexError::not_found(format!("schema '{name}'"))
    }
}

/// An [`Engine`] shared between threads.
///
/// Writers take the write lock; readers share the read lock.
#[derive(Debug, Clone)]
pub struct SharedEngine {
    inner: Arc<RwLock<Engine>>,
}

impl SharedEngine {
    /// Wrap an engine.
    pub fn new(engine: Engine) -> Self {
        SharedEngine {
            inner: Arc::new(RwLock::new(engine)),
        }
    }

    /// Acquire shared read access.
    pub fn read(&self) -> RwLockReadGuard<'_, Engine> {
        self.inner.read()
    }

    /// Acquire exclusive write access.
    pub fn write(&self) -> RwLockWriteGuard<'_, Engine> {
        self.inner.write()
    }

    /// Add a document under the write lock.
    pub fn add(&self, schema: &str, doc: Document, id: Option<DocId>) -> Result<DocId> {
        self.inner.write().add(schema, doc, id)
    }

    /// Search under the read lock.
    pub fn search(&self, schema: &str, query: &Query) -> Result<SearchResults> {
        self.inner.read().search(schema, query)
    }
}

impl From<Engine> for SharedEngine {
    fn from(engine: Engine) -> Self {
        SharedEngine::new(engine)
    }
}
