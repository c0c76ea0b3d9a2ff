//! Trigram tokenizer implementation.

use crate::analysis::token::{Token, TokenStream};
use crate::analysis::tokenizer::Tokenizer;

/// Width of every indexing window, in characters.
pub const TRIGRAM_SIZE: usize = 3;

/// Produce every contiguous 3-character window of `text`, left to right.
///
/// Each window is returned as a slice of `text` together with its starting
/// byte offset, so `&text[offset..offset + gram.len()] == gram` always holds.
/// Text of `L` characters yields `L - 2` windows; anything shorter than three
/// characters yields none. Repeated windows are reported once per occurrence.
///
/// # Examples
///
/// ```
/// use tridex::analysis::tokenizer::trigrams;
///
/// let grams = trigrams("john");
/// assert_eq!(grams, vec![("joh", 0), ("ohn", 1)]);
/// assert!(trigrams("jo").is_empty());
/// ```
pub fn trigrams(text: &str) -> Vec<(&str, usize)> {
    // Char boundaries plus the end of the string.
    let boundaries: Vec<usize> = text
        .char_indices()
        .map(|(offset, _)| offset)
        .chain(std::iter::once(text.len()))
        .collect();

    if boundaries.len() <= TRIGRAM_SIZE {
        return Vec::new();
    }

    boundaries
        .windows(TRIGRAM_SIZE + 1)
        .map(|w| (&text[w[0]..w[TRIGRAM_SIZE]], w[0]))
        .collect()
}

/// A tokenizer that emits character trigrams with byte offsets.
///
/// Both indexing and text lookup go through this tokenizer, so stored and
/// queried trigrams are always cut the same way.
///
/// # Examples
///
/// ```
/// use tridex::analysis::tokenizer::{Tokenizer, TrigramTokenizer};
///
/// let tokens: Vec<_> = TrigramTokenizer::new()
///     .tokenize("hello")
///     .map(|t| (t.text, t.start_offset))
///     .collect();
/// assert_eq!(tokens, vec![("hel", 0), ("ell", 1), ("llo", 2)]);
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct TrigramTokenizer;

impl TrigramTokenizer {
    /// Create a new trigram tokenizer.
    pub fn new() -> Self {
        TrigramTokenizer
    }
}

impl Tokenizer for TrigramTokenizer {
    fn tokenize<'a>(&self, text: &'a str) -> TokenStream<'a> {
        Box::new(
            trigrams(text)
                .into_iter()
                .enumerate()
                .map(|(position, (gram, start))| Token::new(gram, position, start)),
        )
    }

    fn name(&self) -> &'static str {
        "trigram"
    }
}
