//! Tokenizers cutting normalized text into indexable windows.

use crate::analysis::token::TokenStream;

/// Splits text into tokens that borrow from it.
pub trait Tokenizer: Send + Sync {
    /// Tokenize `text` left to right.
    fn tokenize<'a>(&self, text: &'a str) -> TokenStream<'a>;

    /// Name used in logs.
    fn name(&self) -> &'static str;
}

pub mod trigram;

pub use trigram::{TRIGRAM_SIZE, TrigramTokenizer, trigrams};
