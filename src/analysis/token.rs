//! Tokens produced by text analysis.
//!
//! A [`Token`] borrows its text from the analyzed input and records where in
//! that input it sits, so postings can carry the exact byte range.
//!
//! ```
//! use tridex::analysis::token::Token;
//!
//! let text = "john";
//! let token = Token::new(&text[1..], 1, 1);
//! assert_eq!(token.text, "ohn");
//! assert_eq!(token.range(), 1..4);
//! ```

use std::fmt;
use std::ops::Range;

/// One window of analyzed text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Token<'a> {
    /// Slice of the analyzed text
    pub text: &'a str,
    /// Index of the token in its stream (0-based)
    pub position: usize,
    /// Byte offset of `text` in the analyzed input
    pub start_offset: usize,
}

impl<'a> Token<'a> {
    /// Create a token for `text` found at byte `start_offset`.
    pub fn new(text: &'a str, position: usize, start_offset: usize) -> Self {
        Token {
            text,
            position,
            start_offset,
        }
    }

    /// Byte offset one past the end of the token.
    pub fn end_offset(&self) -> usize {
        self.start_offset + self.text.len()
    }

    /// Byte range the token covers in the analyzed input.
    pub fn range(&self) -> Range<usize> {
        self.start_offset..self.end_offset()
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text)
    }
}

/// Tokens of one input, in order.
pub type TokenStream<'a> = Box<dyn Iterator<Item = Token<'a>> + 'a>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offsets() {
        let text = "café olé";
        // "fé " starts at byte 2; 'é' is two bytes wide
        let token = Token::new(&text[2..6], 0, 2);
        assert_eq!(token.end_offset(), 6);
        assert_eq!(&text[token.range()], token.text);
        assert_eq!(token.to_string(), "fé ");
    }
}
