//! Query system for searching documents.
//!
//! Queries are expression trees built in code (or read from their JSON
//! form): [`TermQuery`] leaves combined with AND/OR/XOR. Executing a tree
//! yields the matching document ids with the byte ranges that matched.

pub mod boolean;
#[allow(clippy::module_inception)]
pub mod query;
pub mod term;

pub use boolean::{Combiner, Operator};
pub use query::{BooleanQuery, Query};
pub use term::TermQuery;
