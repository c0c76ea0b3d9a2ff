//! Term query: one field tested against one value.

use serde::{Deserialize, Serialize};

use crate::analysis::normalize;
use crate::document::FieldValue;
use crate::error::{Result, TridexError};
use crate::index::posting::{Matches, PostingStore};
use crate::schema::{FieldKind, Schema};

/// A leaf query matching documents whose `field` contains `value`.
///
/// On text fields the value is a substring (matched through its trigrams);
/// on every other kind it must equal the stored value after normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermQuery {
    /// The field to search in.
    field: String,
    /// The value to search for.
    #[serde(with = "plain_value")]
    value: FieldValue,
}

impl TermQuery {
    /// Create a new term query.
    pub fn new<F, V>(field: F, value: V) -> Self
    where
        F: Into<String>,
        V: Into<FieldValue>,
    {
        TermQuery {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Get the field name.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Get the value.
    pub fn value(&self) -> &FieldValue {
        &self.value
    }

    /// Check that the field exists and the value fits its kind.
    pub fn validate(&self, schema: &Schema) -> Result<()> {
        let (_, field) = schema.resolve(&self.field)?;
        if !self.value.conforms_to(field.kind()) {
            return Err(TridexError::schema_mismatch(format!(
                "term on field '{}' of schema '{}' expects {}, got {}",
                self.field,
                schema.name(),
                field.kind(),
                self.value.type_name()
            )));
        }
        if !self.value.is_finite() {
            return Err(TridexError::schema_mismatch(format!(
                "term on field '{}' of schema '{}' has non-finite float {}",
                self.field,
                schema.name(),
                self.value
            )));
        }
        Ok(())
    }

    /// Validate the term, then look it up.
    pub fn execute(&self, schema: &Schema, postings: &PostingStore) -> Result<Matches> {
        self.validate(schema)?;
        Ok(self.lookup(schema, postings))
    }

    /// Look the term up in the posting store, dispatching on the field kind.
    ///
    /// Assumes the term was validated; an unknown field matches nothing.
    pub(crate) fn lookup(&self, schema: &Schema, postings: &PostingStore) -> Matches {
        let Ok((idx, field)) = schema.resolve(&self.field) else {
            return Matches::new();
        };

        if !field.is_indexed() {
            log::debug!(
                "term on unindexed field '{}' of schema '{}' matches nothing",
                self.field,
                schema.name()
            );
            return Matches::new();
        }

        match field.kind() {
            FieldKind::Text => postings.lookup_text(idx, self.value.as_str().unwrap_or_default()),
            kind => postings.lookup(idx, &normalize(kind, &self.value)),
        }
    }
}

/// Term values are written as plain JSON scalars (`"ohn"`, `30`, `true`).
mod plain_value {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use serde_json::Value;

    use crate::document::FieldValue;

    pub fn serialize<S: Serializer>(value: &FieldValue, serializer: S) -> Result<S::Ok, S::Error> {
        value.to_json().serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<FieldValue, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Bool(b) => Ok(FieldValue::Bool(b)),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Ok(FieldValue::Int(i)),
                None => n
                    .as_f64()
                    .map(FieldValue::Float)
                    .ok_or_else(|| D::Error::custom(format!("unsupported number {n}"))),
            },
            Value::String(s) => Ok(FieldValue::Str(s)),
            other => Err(D::Error::custom(format!(
                "term value must be a bool, number or string, got {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::posting::MatchRange;
    use crate::schema::Field;
    use serde_json::json;

    fn setup() -> (Schema, PostingStore) {
        let schema = Schema::new(
            "Profile",
            vec![
                ("name", Field::text()),
                ("age", Field::int().indexed(true)),
                ("user_id", Field::int()),
            ],
        )
        .unwrap();
        let mut postings = PostingStore::new(schema.len());
        let name = postings.field_mut(0).unwrap();
        name.add("joh", 1, MatchRange::new(0, 3));
        name.add("ohn", 1, MatchRange::new(1, 4));
        postings
            .field_mut(1)
            .unwrap()
            .add("30", 1, MatchRange::new(0, 2));
        (schema, postings)
    }

    #[test]
    fn test_text_term() {
        let (schema, postings) = setup();
        let matches = TermQuery::new("name", "OHN").execute(&schema, &postings).unwrap();
        assert_eq!(matches.get(&1), Some(&vec![MatchRange::new(1, 4)]));
    }

    #[test]
    fn test_scalar_term() {
        let (schema, postings) = setup();
        let matches = TermQuery::new("age", 30).execute(&schema, &postings).unwrap();
        assert_eq!(matches.len(), 1);

        let matches = TermQuery::new("age", 31).execute(&schema, &postings).unwrap();
        assert!(matches.is_empty());
    }

    #[test]
    fn test_unindexed_field_matches_nothing() {
        let (schema, postings) = setup();
        let matches = TermQuery::new("user_id", 1).execute(&schema, &postings).unwrap();
        assert!(matches.is_empty());
    }

    #[test]
    fn test_errors() {
        let (schema, postings) = setup();
        assert!(matches!(
            TermQuery::new("email", "x").execute(&schema, &postings),
            Err(TridexError::UnknownField { .. })
        ));
        assert!(matches!(
            TermQuery::new("age", "thirty").execute(&schema, &postings),
            Err(TridexError::SchemaMismatch(_))
        ));
    }

    #[test]
    fn test_non_finite_float_term_is_rejected() {
        let schema = Schema::new("Reading", vec![("score", Field::float().indexed(true))]).unwrap();
        let postings = PostingStore::new(schema.len());

        for value in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(matches!(
                TermQuery::new("score", value).execute(&schema, &postings),
                Err(TridexError::SchemaMismatch(_))
            ));
        }
        assert!(TermQuery::new("score", 1.5).execute(&schema, &postings).is_ok());
    }

    #[test]
    fn test_plain_value_serialization() {
        let term = TermQuery::new("age", 30);
        let value = serde_json::to_value(&term).unwrap();
        assert_eq!(value, json!({"field": "age", "value": 30}));

        let parsed: TermQuery = serde_json::from_value(json!({"field": "name", "value": "ohn"})).unwrap();
        assert_eq!(parsed.value(), &FieldValue::Str("ohn".into()));

        let parsed: TermQuery = serde_json::from_value(json!({"field": "x", "value": 1.5})).unwrap();
        assert_eq!(parsed.value(), &FieldValue::Float(1.5));

        assert!(serde_json::from_value::<TermQuery>(json!({"field": "x", "value": null})).is_err());
    }
}
