//! Schema module for Tridex.
//!
//! A schema ("model") is a named, ordered set of typed fields. It owns no
//! data itself; documents and postings live in the storage backend.

pub mod field;
#[allow(clippy::module_inception)]
pub mod schema;

// Re-export commonly used types
pub use field::{Field, FieldKind};
pub use schema::{Schema, SchemaBuilder};
