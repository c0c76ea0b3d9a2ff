//! Field value types for documents.
//!
//! [`FieldValue`] is a tagged union whose variants mirror the schema's
//! [`FieldKind`]s. Values are checked against their field's kind when a
//! document is added or a query term is executed.
//!
//! ```
//! use tridex::document::FieldValue;
//! use tridex::schema::FieldKind;
//!
//! let value = FieldValue::from("John Smith");
//! assert_eq!(value.as_str(), Some("John Smith"));
//! assert!(value.conforms_to(FieldKind::Text));
//! assert!(!value.conforms_to(FieldKind::Int));
//!
//! // Integers widen into float fields.
//! assert!(FieldValue::Int(3).conforms_to(FieldKind::Float));
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::schema::FieldKind;

/// Represents a value for a field in a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldValue {
    /// Boolean value
    Bool(bool),
    /// Integer value
    Int(i64),
    /// Floating point value
    Float(f64),
    /// Exact-match string value
    Str(String),
    /// Free text value
    Text(String),
}

impl FieldValue {
    /// Name of this value's variant, for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldValue::Bool(_) => "bool",
            FieldValue::Int(_) => "int",
            FieldValue::Float(_) => "float",
            FieldValue::Str(_) => "string",
            FieldValue::Text(_) => "text",
        }
    }

    /// Check whether this value may be stored in a field of `kind`.
    pub fn conforms_to(&self, kind: FieldKind) -> bool {
        matches!(
            (kind, self),
            (FieldKind::Bool, FieldValue::Bool(_))
                | (FieldKind::Int, FieldValue::Int(_))
                | (FieldKind::Float, FieldValue::Float(_) | FieldValue::Int(_))
                | (
                    FieldKind::String | FieldKind::Text,
                    FieldValue::Str(_) | FieldValue::Text(_)
                )
        )
    }

    /// False for NaN and infinite floats, which JSON snapshots cannot carry.
    pub fn is_finite(&self) -> bool {
        match self {
            FieldValue::Float(f) => f.is_finite(),
            _ => true,
        }
    }

    /// Get the string content of a string or text value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Str(s) | FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Get the value as an integer.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            FieldValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Get the value as a float, widening integers.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            FieldValue::Float(f) => Some(*f),
            FieldValue::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Get the value as a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Convert a JSON value into a field value of the given kind.
    ///
    /// Returns `None` when the JSON value cannot represent that kind.
    pub fn from_json(kind: FieldKind, value: &serde_json::Value) -> Option<Self> {
        match kind {
            FieldKind::Bool => value.as_bool().map(FieldValue::Bool),
            FieldKind::Int => value.as_i64().map(FieldValue::Int),
            FieldKind::Float => value.as_f64().map(FieldValue::Float),
            FieldKind::String => value.as_str().map(|s| FieldValue::Str(s.to_string())),
            FieldKind::Text => value.as_str().map(|s| FieldValue::Text(s.to_string())),
        }
    }

    /// Convert this value into a plain JSON value.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            FieldValue::Bool(b) => serde_json::Value::from(*b),
            FieldValue::Int(i) => serde_json::Value::from(*i),
            FieldValue::Float(f) => serde_json::Value::from(*f),
            FieldValue::Str(s) | FieldValue::Text(s) => serde_json::Value::from(s.as_str()),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Bool(b) => write!(f, "{b}"),
            FieldValue::Int(i) => write!(f, "{i}"),
            FieldValue::Float(x) => write!(f, "{x}"),
            FieldValue::Str(s) | FieldValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Int(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Int(value as i64)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}
