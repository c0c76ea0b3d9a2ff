//! # Tridex
//!
//! A minimal full-text search engine over typed documents.
//!
//! ## Features
//!
//! - Named schemas of typed fields (bool, int, float, string, text)
//! - Exact-match postings for scalar fields, trigram postings for text
//! - AND/OR/XOR query trees returning matched byte ranges per document
//! - In-memory or JSON snapshot storage
//!
//! ```
//! use tridex::prelude::*;
//!
//! let mut engine = Engine::memory();
//! engine
//!     .create_schema("Profile", vec![("name", Field::text()), ("age", Field::int())])
//!     .unwrap();
//! engine
//!     .add_json("Profile", &serde_json::json!({"name": "John Timber", "age": 30}), Some(1))
//!     .unwrap();
//!
//! let query = Query::and([Query::term("name", "ohn"), Query::term("name", "mbe")]);
//! let results = engine.search("Profile", &query).unwrap();
//! assert_eq!(results.get(1), Some(&[MatchRange::new(1, 4), MatchRange::new(7, 10)][..]));
//! ```

pub mod analysis;
pub mod cli;
pub mod config;
pub mod document;
pub mod engine;
pub mod error;
pub mod index;
pub mod query;
pub mod schema;
pub mod search;
pub mod storage;

pub mod prelude {
    pub use crate::config::EngineConfig;
    pub use crate::document::{DocId, Document, FieldValue};
    pub use crate::engine::{Engine, SharedEngine};
    pub use crate::error::{Result, TridexError};
    pub use crate::index::MatchRange;
    pub use crate::query::{Operator, Query};
    pub use crate::schema::{Field, FieldKind, Schema};
    pub use crate::search::{Highlighter, SearchHit, SearchResults};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
