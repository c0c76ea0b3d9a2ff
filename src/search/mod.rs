//! Search results, hit materialization and highlighting.

pub mod highlight;
pub mod results;

pub use self::highlight::Highlighter;
pub use self::results::{SearchHit, SearchResults};
