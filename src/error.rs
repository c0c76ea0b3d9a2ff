//! Error types for the Tridex library.
//!
//! All fallible operations return [`Result`], whose error side is the
//! [`TridexError`] enum. Structural errors (unknown schema, unknown field,
//! missing document) are reported immediately and never retried.
//!
//! # Examples
//!
//! ```
//! use tridex::error::{Result, TridexError};
//!
//! fn lookup() -> Result<()> {
//!     Err(TridexError::not_found("document 7 in schema 'Profile'"))
//! }
//!
//! let err = lookup().unwrap_err();
//! assert_eq!(err.to_string(), "Not found: document 7 in schema 'Profile'");
//! ```

use std::io;

use thiserror::Error;

/// The main error type for Tridex operations.
#[derive(Error, Debug)]
pub enum TridexError {
    /// I/O errors (snapshot files)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A document id or schema name that does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// A query term or document names a field the schema does not declare
    #[error("Unknown field '{field}' in schema '{schema}'")]
    UnknownField { schema: String, field: String },

    /// A value whose type does not conform to its field's kind
    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),

    /// A schema with the same name is already registered
    #[error("Schema already exists: {0}")]
    SchemaExists(String),

    /// Schema declaration errors
    #[error("Schema error: {0}")]
    Schema(String),

    /// Storage backend errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),
}

/// Result type alias for operations that may fail with TridexError.
pub type Result<T> = std::result::Result<T, TridexError>;

impl TridexError {
    /// Create a new not found error.
    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        TridexError::NotFound(msg.into())
    }

    /// Create a new unknown field error.
    pub fn unknown_field<S: Into<String>, F: Into<String>>(schema: S, field: F) -> Self {
        TridexError::UnknownField {
            schema: schema.into(),
            field: field.into(),
        }
    }

    /// Create a new schema mismatch error.
    pub fn schema_mismatch<S: Into<String>>(msg: S) -> Self {
        TridexError::SchemaMismatch(msg.into())
    }

    /// Create a new schema error.
    pub fn schema<S: Into<String>>(msg: S) -> Self {
        TridexError::Schema(msg.into())
    }

    /// Create a new storage error.
    pub fn storage<S: Into<String>>(msg: S) -> Self {
        TridexError::Storage(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        TridexError::Other(msg.into())
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        TridexError::Other(format!("Invalid argument: {}", msg.into()))
    }

    /// Whether this error reports a missing document or schema.
    pub fn is_not_found(&self) -> bool {
        matches!(self, TridexError::NotFound(_))
    }
}
