//! Locate a quoted snippet inside an answer.
//!
//! Matching is literal, case-sensitive and first-occurrence only. Analysis
//! output often wraps quotes in quotation marks, so one leading and one
//! trailing mark are removed before searching.

use crate::offsets::OffsetMap;
use std::ops::Range;

/// Straight and curly quotation marks stripped from the ends of a quote.
pub const QUOTE_MARKS: [char; 6] = ['"', '\'', '\u{201C}', '\u{201D}', '\u{2018}', '\u{2019}'];

fn is_quote_mark(c: char) -> bool {
    QUOTE_MARKS.contains(&c)
}

/// Outcome of searching for a quote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuoteMatch {
    Found(Range<usize>),
    NotFound,
}

impl QuoteMatch {
    pub fn is_found(&self) -> bool {
        matches!(self, QuoteMatch::Found(_))
    }

    pub fn range(&self) -> Option<Range<usize>> {
        match self {
            QuoteMatch::Found(range) => Some(range.clone()),
            QuoteMatch::NotFound => None,
        }
    }

    /// The same match expressed in UTF-16 code units of `text`.
    pub fn to_utf16(&self, text: &str) -> QuoteMatch {
        match self {
            QuoteMatch::Found(range) => OffsetMap::new(text)
                .range_to_utf16(range.clone())
                .map_or(QuoteMatch::NotFound, QuoteMatch::Found),
            QuoteMatch::NotFound => QuoteMatch::NotFound,
        }
    }

    /// `(start, end)`, with `(-1, -1)` standing in for "not found".
    pub fn to_pair(&self) -> (i64, i64) {
        match self {
            QuoteMatch::Found(range) => (range.start as i64, range.end as i64),
            QuoteMatch::NotFound => (-1, -1),
        }
    }
}

/// Remove at most one leading and one trailing quotation mark.
pub fn strip_quote_marks(quote: &str) -> &str {
    let trimmed = quote.strip_prefix(is_quote_mark).unwrap_or(quote);
    trimmed.strip_suffix(is_quote_mark).unwrap_or(trimmed)
}

/// Find the first occurrence of `quote` (after stripping quote marks) in `text`.
///
/// A quote that is empty once stripped never matches.
pub fn locate_quote(text: &str, quote: &str) -> QuoteMatch {
    let needle = strip_quote_marks(quote);
    if needle.is_empty() {
        return QuoteMatch::NotFound;
    }

    match text.find(needle) {
        Some(start) => QuoteMatch::Found(start..start + needle.len()),
        None => QuoteMatch::NotFound,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_surrounding_quotes() {
        let text = "She said \"hello world\" to me";
        assert_eq!(
            locate_quote(text, "\"hello world\""),
            QuoteMatch::Found(10..21)
        );
        assert_eq!(&text[10..21], "hello world");
    }

    #[test]
    fn test_not_found() {
        let result = locate_quote("abc", "xyz");
        assert_eq!(result, QuoteMatch::NotFound);
        assert_eq!(result.to_pair(), (-1, -1));
        assert!(result.range().is_none());
    }

    #[test]
    fn test_strip_only_one_mark_each_end() {
        assert_eq!(strip_quote_marks("\"\"double\"\""), "\"double\"");
        assert_eq!(strip_quote_marks("'single'"), "single");
        assert_eq!(strip_quote_marks("it's fine"), "it's fine");
        assert_eq!(strip_quote_marks("no marks"), "no marks");
    }

    #[test]
    fn test_strip_curly_marks() {
        assert_eq!(strip_quote_marks("\u{201C}curly\u{201D}"), "curly");
        assert_eq!(strip_quote_marks("\u{2018}single curly\u{2019}"), "single curly");
    }

    #[test]
    fn test_interior_marks_kept() {
        let text = "He called it a \"quick fix\" today";
        let result = locate_quote(text, "'called it a \"quick fix\"'");
        assert_eq!(result.range().map(|r| &text[r]), Some("called it a \"quick fix\""));
    }

    #[test]
    fn test_only_leading_mark() {
        let text = "alpha beta gamma";
        assert_eq!(locate_quote(text, "\"beta"), QuoteMatch::Found(6..10));
    }

    #[test]
    fn test_first_occurrence_only() {
        assert_eq!(locate_quote("ab ab ab", "ab"), QuoteMatch::Found(0..2));
    }

    #[test]
    fn test_case_sensitive() {
        assert_eq!(locate_quote("Hello", "hello"), QuoteMatch::NotFound);
    }

    #[test]
    fn test_empty_after_strip() {
        assert_eq!(locate_quote("anything", "\"\""), QuoteMatch::NotFound);
        assert_eq!(locate_quote("anything", "\""), QuoteMatch::NotFound);
        assert_eq!(locate_quote("anything", ""), QuoteMatch::NotFound);
    }

    #[test]
    fn test_multibyte_offsets_are_byte_offsets() {
        let text = "café au lait";
        let result = locate_quote(text, "au");
        let range = result.range().unwrap();
        assert_eq!(range, 6..8);
        assert_eq!(&text[range], "au");
        assert_eq!(result.to_utf16(text), QuoteMatch::Found(5..7));
    }

    #[test]
    fn test_utf16_match_counts_surrogate_pairs() {
        let text = "ok \u{1F600} then done";
        let result = locate_quote(text, "\"then\"");
        assert_eq!(result, QuoteMatch::Found(8..12));
        assert_eq!(result.to_utf16(text), QuoteMatch::Found(6..10));
        assert_eq!(QuoteMatch::NotFound.to_utf16(text), QuoteMatch::NotFound);
    }
}
