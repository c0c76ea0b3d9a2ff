//! The query expression tree.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::document::FieldValue;
use crate::error::Result;
use crate::index::posting::{Matches, PostingStore};
use crate::query::boolean::{Combiner, Operator};
use crate::query::term::TermQuery;
use crate::schema::Schema;

/// A combinator node: an operator over an ordered list of sub-queries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BooleanQuery {
    /// The set operator.
    operator: Operator,
    /// Sub-queries in declaration order.
    operands: Vec<Query>,
}

impl BooleanQuery {
    /// Create a new combinator.
    pub fn new<I: IntoIterator<Item = Query>>(operator: Operator, operands: I) -> Self {
        BooleanQuery {
            operator,
            operands: operands.into_iter().collect(),
        }
    }

    /// Get the operator.
    pub fn operator(&self) -> Operator {
        self.operator
    }

    /// Get the operands.
    pub fn operands(&self) -> &[Query] {
        &self.operands
    }

    /// Append an operand.
    pub fn add(&mut self, query: Query) {
        self.operands.push(query);
    }
}

/// A query expression: a term leaf or a boolean combinator.
///
/// # Examples
///
/// ```
/// use tridex::query::Query;
///
/// let query = Query::and([
///     Query::term("name", "ohn"),
///     Query::or([Query::term("name", "mbe"), Query::term("age", 30)]),
/// ]);
/// assert_eq!(query.to_string(), "AND(name:ohn, OR(name:mbe, age:30))");
/// assert_eq!(query.term_count(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Query {
    /// Leaf testing one field against one value.
    Term(TermQuery),
    /// AND/OR/XOR over sub-queries.
    Bool(BooleanQuery),
}

impl Query {
    /// Create a term query.
    pub fn term<F: Into<String>, V: Into<FieldValue>>(field: F, value: V) -> Self {
        Query::Term(TermQuery::new(field, value))
    }

    /// Create a combinator.
    pub fn boolean<I: IntoIterator<Item = Query>>(operator: Operator, operands: I) -> Self {
        Query::Bool(BooleanQuery::new(operator, operands))
    }

    /// Intersection of the operands' documents.
    pub fn and<I: IntoIterator<Item = Query>>(operands: I) -> Self {
        Self::boolean(Operator::And, operands)
    }

    /// Union of the operands' documents.
    pub fn or<I: IntoIterator<Item = Query>>(operands: I) -> Self {
        Self::boolean(Operator::Or, operands)
    }

    /// Symmetric difference of the operands' documents, folded left to right.
    pub fn xor<I: IntoIterator<Item = Query>>(operands: I) -> Self {
        Self::boolean(Operator::Xor, operands)
    }

    /// Check every term of the tree against the schema.
    ///
    /// # Errors
    ///
    /// The first unknown field or mismatched value in depth-first order.
    pub fn validate(&self, schema: &Schema) -> Result<()> {
        match self {
            Query::Term(term) => term.validate(schema),
            Query::Bool(boolean) => boolean
                .operands
                .iter()
                .try_for_each(|operand| operand.validate(schema)),
        }
    }

    /// Execute the whole tree against one schema's postings.
    ///
    /// The tree is validated before any lookup, so an AND whose running
    /// intersection is already empty may skip its remaining operands without
    /// changing which errors are reported.
    pub fn execute(&self, schema: &Schema, postings: &PostingStore) -> Result<Matches> {
        self.validate(schema)?;
        Ok(self.evaluate(schema, postings))
    }

    fn evaluate(&self, schema: &Schema, postings: &PostingStore) -> Matches {
        match self {
            Query::Term(term) => term.lookup(schema, postings),
            Query::Bool(boolean) => {
                let mut combiner = Combiner::new(boolean.operator);
                for operand in &boolean.operands {
                    combiner.push(operand.evaluate(schema, postings));
                    if combiner.is_settled() {
                        break;
                    }
                }
                combiner.finish()
            }
        }
    }

    /// Number of term leaves in the tree.
    pub fn term_count(&self) -> usize {
        match self {
            Query::Term(_) => 1,
            Query::Bool(boolean) => boolean.operands.iter().map(|q| q.term_count()).sum(),
        }
    }
}

impl From<TermQuery> for Query {
    fn from(term: TermQuery) -> Self {
        Query::Term(term)
    }
}

impl From<BooleanQuery> for Query {
    fn from(boolean: BooleanQuery) -> Self {
        Query::Bool(boolean)
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Query::Term(term) => write!(f, "{}:{}", term.field(), term.value()),
            Query::Bool(boolean) => {
                write!(f, "{}(", boolean.operator)?;
                for (i, operand) in boolean.operands.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{operand}")?;
                }
                f.write_str(")")
            }
        }
    }
}
