//! Field types for schema definition.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The kind of value a field holds.
///
/// The kind decides how a value is normalized and indexed: `Text` values are
/// split into trigrams for substring search, every other kind is indexed as
/// one exact key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// Boolean values
    Bool,
    /// 64-bit signed integers
    Int,
    /// 64-bit floating-point numbers
    Float,
    /// Short strings matched exactly (case-insensitive)
    String,
    /// Free text matched by substring through trigrams
    Text,
}

impl FieldKind {
    /// Get the name of this field kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Bool => "bool",
            FieldKind::Int => "int",
            FieldKind::Float => "float",
            FieldKind::String => "string",
            FieldKind::Text => "text",
        }
    }

    /// Whether values of this kind are lower-cased before indexing.
    pub fn is_string_like(&self) -> bool {
        matches!(self, FieldKind::String | FieldKind::Text)
    }

    /// Whether this kind is indexed when the declaration says nothing.
    pub fn indexed_by_default(&self) -> bool {
        matches!(self, FieldKind::Text)
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FieldKind {
    type Err = crate::error::TridexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bool" | "boolean" => Ok(FieldKind::Bool),
            "int" | "integer" => Ok(FieldKind::Int),
            "float" => Ok(FieldKind::Float),
            "string" | "str" => Ok(FieldKind::String),
            "text" => Ok(FieldKind::Text),
            other => Err(crate::error::TridexError::schema(format!(
                "Unknown field kind '{other}'"
            ))),
        }
    }
}

/// One attribute of a schema.
///
/// A field is anonymous until it is declared inside a schema; the schema
/// back-fills the name from its declaration key.
///
/// # Examples
///
/// ```
/// use tridex::schema::{Field, FieldKind};
///
/// let name = Field::text();
/// assert!(name.is_indexed());
///
/// let age = Field::int();
/// assert!(!age.is_indexed());
///
/// let age = Field::int().indexed(true);
/// assert!(age.is_indexed());
/// assert_eq!(age.kind(), FieldKind::Int);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Field name, filled in when the schema is created
    #[serde(default)]
    name: String,
    /// Value kind
    kind: FieldKind,
    /// Whether the field is indexed for searching
    indexed: bool,
}

impl Field {
    /// Create a field of the given kind with the kind's default indexing.
    pub fn new(kind: FieldKind) -> Self {
        Field {
            name: String::new(),
            kind,
            indexed: kind.indexed_by_default(),
        }
    }

    /// Create a boolean field.
    pub fn bool() -> Self {
        Self::new(FieldKind::Bool)
    }

    /// Create an integer field.
    pub fn int() -> Self {
        Self::new(FieldKind::Int)
    }

    /// Create a float field.
    pub fn float() -> Self {
        Self::new(FieldKind::Float)
    }

    /// Create an exact-match string field.
    pub fn string() -> Self {
        Self::new(FieldKind::String)
    }

    /// Create a text field (indexed by default).
    pub fn text() -> Self {
        Self::new(FieldKind::Text)
    }

    /// Set whether this field is indexed.
    pub fn indexed(mut self, indexed: bool) -> Self {
        self.indexed = indexed;
        self
    }

    pub(crate) fn with_name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = name.into();
        self
    }

    /// Get the field name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the field kind.
    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Check if this field is indexed (searchable).
    pub fn is_indexed(&self) -> bool {
        self.indexed
    }
}
