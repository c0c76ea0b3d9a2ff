//! Document structure.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::document::field_value::FieldValue;
use crate::error::{Result, TridexError};
use crate::schema::Schema;

/// A document is a mapping from field name to value.
///
/// Documents are stored verbatim; postings are derived from them.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    /// The field values for this document
    fields: BTreeMap<String, FieldValue>,
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Document {
            fields: BTreeMap::new(),
        }
    }

    /// Add a field value to the document.
    pub fn add_field<S: Into<String>>(&mut self, name: S, value: FieldValue) {
        self.fields.insert(name.into(), value);
    }

    /// Get a field value from the document.
    pub fn get_field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Check if the document has a field.
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Remove a field from the document.
    pub fn remove_field(&mut self, name: &str) -> Option<FieldValue> {
        self.fields.remove(name)
    }

    /// Get all field names.
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.keys().map(|s| s.as_str()).collect()
    }

    /// Get all field values.
    pub fn fields(&self) -> &BTreeMap<String, FieldValue> {
        &self.fields
    }

    /// Iterate over `(name, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Get the number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the document is empty.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Create a builder for constructing documents.
    pub fn builder() -> DocumentBuilder {
        DocumentBuilder::new()
    }

    /// Check every value against the schema.
    ///
    /// # Errors
    ///
    /// [`TridexError::UnknownField`] for a field the schema does not declare,
    /// [`TridexError::SchemaMismatch`] for a value of the wrong kind.
    pub fn validate(&self, schema: &Schema) -> Result<()> {
        for (name, value) in &self.fields {
            let (_, field) = schema.resolve(name)?;
            if !value.conforms_to(field.kind()) {
                return Err(TridexError::schema_mismatch(format!(
                    "field '{}' of schema '{}' expects {}, got {}",
                    name,
                    schema.name(),
                    field.kind(),
                    value.type_name()
                )));
            }
            if !value.is_finite() {
                return Err(TridexError::schema_mismatch(format!(
                    "field '{}' of schema '{}' holds non-finite float {}",
                    name,
                    schema.name(),
                    value
                )));
            }
        }
        Ok(())
    }

    /// Build a document from a plain JSON object, typing values by the schema.
    ///
    /// # Examples
    ///
    /// ```
    /// use serde_json::json;
    /// use tridex::document::{Document, FieldValue};
    /// use tridex::schema::{Field, Schema};
    ///
    /// let schema = Schema::new("Profile", vec![
    ///     ("name", Field::text()),
    ///     ("age", Field::int()),
    /// ]).unwrap();
    ///
    /// let doc = Document::from_json(&schema, &json!({"name": "John Smith", "age": 30})).unwrap();
    /// assert_eq!(doc.get_field("age"), Some(&FieldValue::Int(30)));
    /// ```
    pub fn from_json(schema: &Schema, value: &serde_json::Value) -> Result<Self> {
        let object = value.as_object().ok_or_else(|| {
            TridexError::invalid_argument("document must be a JSON object")
        })?;

        let mut document = Document::new();
        for (name, raw) in object {
            let (_, field) = schema.resolve(name)?;
            let value = FieldValue::from_json(field.kind(), raw).ok_or_else(|| {
                TridexError::schema_mismatch(format!(
                    "field '{}' of schema '{}' expects {}, got {}",
                    name,
                    schema.name(),
                    field.kind(),
                    raw
                ))
            })?;
            document.add_field(name.clone(), value);
        }
        Ok(document)
    }

    /// Render the document as a plain JSON object.
    pub fn to_json(&self) -> serde_json::Value {
        let object = self
            .fields
            .iter()
            .map(|(name, value)| (name.clone(), value.to_json()))
            .collect::<serde_json::Map<_, _>>();
        serde_json::Value::Object(object)
    }
}

/// A builder for constructing documents in a fluent manner.
#[derive(Debug, Default)]
pub struct DocumentBuilder {
    document: Document,
}

impl DocumentBuilder {
    /// Create a new document builder.
    pub fn new() -> Self {
        DocumentBuilder {
            document: Document::new(),
        }
    }

    /// Add a text field to the document.
    pub fn add_text<S: Into<String>, T: Into<String>>(mut self, name: S, value: T) -> Self {
        self.document.add_field(name, FieldValue::Text(value.into()));
        self
    }

    /// Add an exact-match string field to the document.
    pub fn add_string<S: Into<String>, T: Into<String>>(mut self, name: S, value: T) -> Self {
        self.document.add_field(name, FieldValue::Str(value.into()));
        self
    }

    /// Add an integer field to the document.
    pub fn add_integer<S: Into<String>>(mut self, name: S, value: i64) -> Self {
        self.document.add_field(name, FieldValue::Int(value));
        self
    }

    /// Add a float field to the document.
    pub fn add_float<S: Into<String>>(mut self, name: S, value: f64) -> Self {
        self.document.add_field(name, FieldValue::Float(value));
        self
    }

    /// Add a boolean field to the document.
    pub fn add_boolean<S: Into<String>>(mut self, name: S, value: bool) -> Self {
        self.document.add_field(name, FieldValue::Bool(value));
        self
    }

    /// Build the document.
    pub fn build(self) -> Document {
        self.document
    }
}
