//! Highlighting of matched ranges.
//!
//! Ranges are byte offsets into the normalized field value, so highlighting
//! works on that value (lower-cased for string kinds), not the stored one.

use crate::analysis::normalize;
use crate::document::FieldValue;
use crate::index::posting::MatchRange;
use crate::schema::FieldKind;

/// Wraps matched ranges of a text in open/close markers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Highlighter {
    open: String,
    close: String,
}

impl Default for Highlighter {
    fn default() -> Self {
        Highlighter::new("<mark>", "</mark>")
    }
}

impl Highlighter {
    /// Create a highlighter with the given markers.
    pub fn new<O: Into<String>, C: Into<String>>(open: O, close: C) -> Self {
        Highlighter {
            open: open.into(),
            close: close.into(),
        }
    }

    /// The opening marker.
    pub fn open(&self) -> &str {
        &self.open
    }

    /// The closing marker.
    pub fn close(&self) -> &str {
        &self.close
    }

    /// Sort ranges and merge the ones that overlap or touch.
    ///
    /// Empty ranges are dropped.
    pub fn merge(ranges: &[MatchRange]) -> Vec<MatchRange> {
        let mut sorted: Vec<MatchRange> =
            ranges.iter().copied().filter(|r| !r.is_empty()).collect();
        sorted.sort();

        let mut merged: Vec<MatchRange> = Vec::with_capacity(sorted.len());
        for range in sorted {
            match merged.last_mut() {
                Some(last) if range.start <= last.end => last.end = last.end.max(range.end),
                _ => merged.push(range),
            }
        }
        merged
    }

    /// Wrap the merged ranges of `text` in markers.
    ///
    /// Ranges that fall outside `text` or off a char boundary are skipped.
    pub fn highlight(&self, text: &str, ranges: &[MatchRange]) -> String {
        let mut out = String::with_capacity(text.len());
        let mut cursor = 0;

        for range in Self::merge(ranges) {
            let Some(matched) = range.slice(text) else {
                continue;
            };
            // merged ranges are sorted and disjoint, so the prefix is always valid
            out.push_str(&text[cursor..range.start]);
            out.push_str(&self.open);
            out.push_str(matched);
            out.push_str(&self.close);
            cursor = range.end;
        }

        out.push_str(&text[cursor..]);
        out
    }

    /// Normalize a field value and highlight it.
    pub fn highlight_value(
        &self,
        kind: FieldKind,
        value: &FieldValue,
        ranges: &[MatchRange],
    ) -> String {
        self.highlight(&normalize(kind, value), ranges)
    }
}
