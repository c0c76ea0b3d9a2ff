//! Text analysis module for Tridex.
//!
//! Analysis is deliberately small: values are normalized (lower-cased for
//! string kinds) and text values are cut into fixed-width character
//! trigrams, each carrying the byte range it covers.

pub mod normalizer;
pub mod token;
pub mod tokenizer;

pub use normalizer::{lowercase, normalize};
pub use token::{Token, TokenStream};
pub use tokenizer::{TRIGRAM_SIZE, Tokenizer, TrigramTokenizer, trigrams};
