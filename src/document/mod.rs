//! Document module.
//!
//! Documents are mappings from field name to a typed [`FieldValue`].

#[allow(clippy::module_inception)]
pub mod document;
pub mod field_value;

// Re-export commonly used types
pub use document::{Document, DocumentBuilder};
pub use field_value::FieldValue;

/// Identifier of a document within one schema.
pub type DocId = u64;
