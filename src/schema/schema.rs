//! Schema management for document structure definition.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TridexError};
use crate::schema::field::Field;

/// A named, ordered collection of fields describing one kind of document.
///
/// Every field receives a stable integer index (its declaration position),
/// which the posting store uses to address per-field postings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "SchemaDef", into = "SchemaDef")]
pub struct Schema {
    /// Schema name
    name: String,
    /// Fields in declaration order
    fields: Vec<Field>,
    /// Field name to position in `fields`
    index: AHashMap<String, usize>,
}

/// Serialized form of a schema: name plus ordered fields.
#[derive(Serialize, Deserialize)]
struct SchemaDef {
    name: String,
    fields: Vec<Field>,
}

impl TryFrom<SchemaDef> for Schema {
    type Error = TridexError;

    fn try_from(def: SchemaDef) -> Result<Self> {
        let declarations = def
            .fields
            .into_iter()
            .map(|field| (field.name().to_string(), field))
            .collect::<Vec<_>>();
        Schema::new(def.name, declarations)
    }
}

impl From<Schema> for SchemaDef {
    fn from(schema: Schema) -> Self {
        SchemaDef {
            name: schema.name,
            fields: schema.fields,
        }
    }
}

impl PartialEq for Schema {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.fields == other.fields
    }
}

impl Schema {
    /// Create a schema from ordered `(name, field)` declarations.
    ///
    /// Each field's name is taken from its declaration key.
    ///
    /// # Errors
    ///
    /// Fails when the schema name or a field name is empty, or when a field
    /// name is declared twice.
    pub fn new<S, N, I>(name: S, declarations: I) -> Result<Self>
    where
        S: Into<String>,
        N: Into<String>,
        I: IntoIterator<Item = (N, Field)>,
    {
        let name = name.into();
        if name.is_empty() {
            return Err(TridexError::schema("Schema name cannot be empty"));
        }

        let mut fields = Vec::new();
        let mut index = AHashMap::new();

        for (field_name, field) in declarations {
            let field_name = field_name.into();

            if field_name.is_empty() {
                return Err(TridexError::schema("Field name cannot be empty"));
            }
            if index.contains_key(&field_name) {
                return Err(TridexError::schema(format!(
                    "Field '{field_name}' already exists in schema '{name}'"
                )));
            }

            index.insert(field_name.clone(), fields.len());
            fields.push(field.with_name(field_name));
        }

        Ok(Schema {
            name,
            fields,
            index,
        })
    }

    /// Create a builder for constructing schemas.
    pub fn builder<S: Into<String>>(name: S) -> SchemaBuilder {
        SchemaBuilder::new(name)
    }

    /// Get the schema name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get a field definition by name.
    pub fn get_field(&self, name: &str) -> Option<&Field> {
        self.index.get(name).map(|&idx| &self.fields[idx])
    }

    /// Get the stable index of a field.
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Resolve a field name to its index and definition.
    ///
    /// # Errors
    ///
    /// Returns [`TridexError::UnknownField`] when the schema has no such field.
    pub fn resolve(&self, name: &str) -> Result<(usize, &Field)> {
        self.index
            .get(name)
            .map(|&idx| (idx, &self.fields[idx]))
            .ok_or_else(|| TridexError::unknown_field(&self.name, name))
    }

    /// Check if a field exists.
    pub fn has_field(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Get all fields in declaration order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Get all field names in declaration order.
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name()).collect()
    }

    /// Get all indexed field names.
    pub fn indexed_fields(&self) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|f| f.is_indexed())
            .map(|f| f.name())
            .collect()
    }

    /// Get the number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the schema has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// A builder for constructing schemas in a fluent manner.
///
/// # Examples
///
/// ```
/// use tridex::schema::{Field, Schema};
///
/// let schema = Schema::builder("Profile")
///     .field("user_id", Field::int())
///     .field("name", Field::text())
///     .field("age", Field::int())
///     .build()
///     .unwrap();
///
/// assert_eq!(schema.field_names(), vec!["user_id", "name", "age"]);
/// assert_eq!(schema.indexed_fields(), vec!["name"]);
/// ```
#[derive(Debug)]
pub struct SchemaBuilder {
    name: String,
    declarations: Vec<(String, Field)>,
}

impl SchemaBuilder {
    /// Create a new schema builder.
    pub fn new<S: Into<String>>(name: S) -> Self {
        SchemaBuilder {
            name: name.into(),
            declarations: Vec::new(),
        }
    }

    /// Declare a field.
    pub fn field<S: Into<String>>(mut self, name: S, field: Field) -> Self {
        self.declarations.push((name.into(), field));
        self
    }

    /// Build the schema.
    pub fn build(self) -> Result<Schema> {
        Schema::new(self.name, self.declarations)
    }
}
