//! Find and replace over the text buffer
//!
//! A search produces every non-overlapping match of a literal query, in
//! ascending order. The matcher remembers the list and a current index that
//! cycles through it in either direction.

use std::ops::Range;

use regex::{Regex, RegexBuilder};

/// Parameters for a single search operation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    /// Literal text to look for; never interpreted as a pattern
    pub text: String,
    pub case_sensitive: bool,
    pub whole_word: bool,
}

impl Query {
    pub fn new(text: impl Into<String>, case_sensitive: bool, whole_word: bool) -> Self {
        Self {
            text: text.into(),
            case_sensitive,
            whole_word,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    fn to_regex(&self) -> Option<Regex> {
        let literal = regex::escape(&self.text);
        let pattern = if self.whole_word {
            format!(r"\b{}\b", literal)
        } else {
            literal
        };
        match RegexBuilder::new(&pattern)
            .case_insensitive(!self.case_sensitive)
            .build()
        {
            Ok(regex) => Some(regex),
            Err(err) => {
                tracing::warn!(%err, "search query could not be compiled");
                None
            }
        }
    }
}

/// Byte range of one search hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchRange {
    pub start: usize,
    pub end: usize,
}

impl MatchRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Whether this range can be sliced out of `text`
    pub fn fits(&self, text: &str) -> bool {
        self.start <= self.end
            && self.end <= text.len()
            && text.is_char_boundary(self.start)
            && text.is_char_boundary(self.end)
    }
}

/// Find every match of `query` in `text`
///
/// Matches are leftmost-first and never overlap. An empty query finds
/// nothing.
pub fn search(text: &str, query: &Query) -> Vec<MatchRange> {
    if query.is_empty() {
        return Vec::new();
    }
    match query.to_regex() {
        Some(regex) => regex
            .find_iter(text)
            .map(|m| MatchRange::new(m.start(), m.end()))
            .collect(),
        None => Vec::new(),
    }
}

/// Match list plus a cyclic cursor over it
#[derive(Debug, Default)]
pub struct Matcher {
    matches: Vec<MatchRange>,
    current: Option<usize>,
}

impl Matcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run a search and reset the current index to the first match
    ///
    /// Returns the number of matches.
    pub fn search(&mut self, text: &str, query: &Query) -> usize {
        self.matches = search(text, query);
        self.current = if self.matches.is_empty() { None } else { Some(0) };
        self.matches.len()
    }

    /// Search again after the text changed, keeping the current index
    /// where it still points at a match
    pub fn refresh(&mut self, text: &str, query: &Query) -> usize {
        let previous = self.current;
        self.matches = search(text, query);
        self.current = match (previous, self.matches.len()) {
            (_, 0) => None,
            (Some(index), count) => Some(index.min(count - 1)),
            (None, _) => Some(0),
        };
        self.matches.len()
    }

    /// Forget all matches
    pub fn clear(&mut self) {
        self.matches.clear();
        self.current = None;
    }

    pub fn matches(&self) -> &[MatchRange] {
        &self.matches
    }

    pub fn count(&self) -> usize {
        self.matches.len()
    }

    /// Index of the current match; `None` when there are no matches
    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current(&self) -> Option<MatchRange> {
        self.current.and_then(|i| self.matches.get(i).copied())
    }

    /// Move `step` matches forward (negative for backward), wrapping around
    pub fn advance(&mut self, step: isize) -> Option<MatchRange> {
        let count = self.matches.len() as isize;
        let index = self.current? as isize;
        let next = (index + step).rem_euclid(count) as usize;
        self.current = Some(next);
        self.current()
    }

    /// Replace the current match in `text`
    ///
    /// Returns the new text and the range the replacement occupies. The match
    /// list is dropped afterwards since every later range is now stale; the
    /// caller runs a fresh search.
    pub fn replace_current(&mut self, text: &str, replacement: &str) -> Option<(String, MatchRange)> {
        let range = self.current()?;
        if !range.fits(text) {
            tracing::warn!(start = range.start, end = range.end, len = text.len(), "stale match range");
            self.clear();
            return None;
        }
        let mut replaced = String::with_capacity(text.len() + replacement.len());
        replaced.push_str(&text[..range.start]);
        replaced.push_str(replacement);
        replaced.push_str(&text[range.end..]);
        self.clear();
        Some((replaced, MatchRange::new(range.start, range.start + replacement.len())))
    }

    /// Replace every current match in `text`
    ///
    /// Returns the new text and the number of replacements. Like
    /// [`Matcher::replace_current`], this drops the match list.
    pub fn replace_all(&mut self, text: &str, replacement: &str) -> Option<(String, usize)> {
        if self.matches.is_empty() {
            return None;
        }
        if !self.matches.iter().all(|m| m.fits(text)) {
            tracing::warn!(len = text.len(), "stale match ranges");
            self.clear();
            return None;
        }
        let mut replaced = String::with_capacity(text.len());
        let mut last = 0;
        for m in &self.matches {
            replaced.push_str(&text[last..m.start]);
            replaced.push_str(replacement);
            last = m.end;
        }
        replaced.push_str(&text[last..]);
        let count = self.matches.len();
        self.clear();
        Some((replaced, count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn starts(matches: &[MatchRange]) -> Vec<usize> {
        matches.iter().map(|m| m.start).collect()
    }

    #[test]
    fn test_case_insensitive_scenario() {
        let matches = search("Hello World", &Query::new("o", false, false));
        assert_eq!(starts(&matches), vec![4, 7]);
    }

    #[test]
    fn test_whole_word_scenario() {
        let text = "concatenate cat";
        assert_eq!(search(text, &Query::new("cat", true, false)).len(), 2);
        let whole = search(text, &Query::new("cat", true, true));
        assert_eq!(whole, vec![MatchRange::new(12, 15)]);
    }

    #[test]
    fn test_empty_query_finds_nothing() {
        assert!(search("anything", &Query::new("", false, false)).is_empty());
        let mut matcher = Matcher::new();
        assert_eq!(matcher.search("anything", &Query::default()), 0);
        assert_eq!(matcher.current_index(), None);
    }

    #[test]
    fn test_query_is_literal() {
        assert!(search("axb", &Query::new("a.b", true, false)).is_empty());
        assert_eq!(search("(a.b)", &Query::new("a.b", true, false)).len(), 1);
        assert_eq!(search("x*[y]", &Query::new("*[y]", true, false)).len(), 1);
    }

    #[test]
    fn test_matches_are_ordered_and_disjoint() {
        let cases = [
            ("aaaaa", "aa"),
            ("abababab", "aba"),
            ("Mississippi", "ss"),
            ("ééé é", "é"),
        ];
        for (text, q) in cases {
            for case_sensitive in [true, false] {
                for whole_word in [true, false] {
                    let matches = search(text, &Query::new(q, case_sensitive, whole_word));
                    for pair in matches.windows(2) {
                        assert!(pair[0].start < pair[1].start);
                        assert!(pair[0].end <= pair[1].start);
                    }
                }
            }
        }
        assert_eq!(starts(&search("aaaaa", &Query::new("aa", true, false))), vec![0, 2]);
    }

    #[test]
    fn test_case_folding_never_finds_fewer() {
        let cases = [("Cat cat CAT", "cat"), ("aAa", "aa"), ("Straße STRASSE", "straße")];
        for (text, q) in cases {
            for whole_word in [true, false] {
                let sensitive = search(text, &Query::new(q, true, whole_word)).len();
                let folded = search(text, &Query::new(q, false, whole_word)).len();
                assert!(folded >= sensitive, "{text:?} / {q:?}");
            }
        }
        assert_eq!(search("Cat cat CAT", &Query::new("cat", false, false)).len(), 3);
    }

    #[test]
    fn test_whole_word_never_finds_more() {
        let cases = [("cat concat cats cat", "cat"), ("a-a a_a", "a"), ("x", "x")];
        for (text, q) in cases {
            for case_sensitive in [true, false] {
                let plain = search(text, &Query::new(q, case_sensitive, false)).len();
                let whole = search(text, &Query::new(q, case_sensitive, true)).len();
                assert!(whole <= plain, "{text:?} / {q:?}");
            }
        }
    }

    #[test]
    fn test_advance_wraps_both_ways() {
        let mut matcher = Matcher::new();
        assert_eq!(matcher.search("a b a b a", &Query::new("a", true, false)), 3);
        assert_eq!(matcher.current_index(), Some(0));

        assert_eq!(matcher.advance(1), Some(MatchRange::new(4, 5)));
        assert_eq!(matcher.advance(1), Some(MatchRange::new(8, 9)));
        assert_eq!(matcher.advance(1), Some(MatchRange::new(0, 1)));
        assert_eq!(matcher.advance(-1), Some(MatchRange::new(8, 9)));
        assert_eq!(matcher.advance(-4), Some(MatchRange::new(4, 5)));
    }

    #[test]
    fn test_advance_without_matches() {
        let mut matcher = Matcher::new();
        matcher.search("abc", &Query::new("z", true, false));
        assert_eq!(matcher.advance(1), None);
        assert_eq!(matcher.current_index(), None);
    }

    #[test]
    fn test_replace_current_then_search_again() {
        let text = "one two one";
        let query = Query::new("one", true, false);
        let mut matcher = Matcher::new();
        matcher.search(text, &query);
        matcher.advance(1);

        let (replaced, range) = matcher.replace_current(text, "three").unwrap();
        assert_eq!(replaced, "one two three");
        assert_eq!(range, MatchRange::new(8, 13));
        assert_eq!(matcher.count(), 0);

        assert_eq!(matcher.search(&replaced, &query), 1);
    }

    #[test]
    fn test_replace_current_rejects_stale_range() {
        let mut matcher = Matcher::new();
        matcher.search("hello world", &Query::new("world", true, false));
        assert!(matcher.replace_current("hello", "there").is_none());
        assert_eq!(matcher.current_index(), None);
    }

    #[test]
    fn test_refresh_keeps_position() {
        let query = Query::new("ab", true, false);
        let mut matcher = Matcher::new();
        matcher.search("ab ab ab", &query);
        matcher.advance(2);
        assert_eq!(matcher.refresh("xx ab ab ab", &query), 3);
        assert_eq!(matcher.current(), Some(MatchRange::new(9, 11)));
        assert_eq!(matcher.refresh("ab", &query), 1);
        assert_eq!(matcher.current_index(), Some(0));
        assert_eq!(matcher.refresh("", &query), 0);
        assert_eq!(matcher.current(), None);
    }

    #[test]
    fn test_replace_all() {
        let text = "Cat cat concat";
        let mut matcher = Matcher::new();
        matcher.search(text, &Query::new("cat", false, true));
        let (replaced, count) = matcher.replace_all(text, "dog").unwrap();
        assert_eq!(replaced, "dog dog concat");
        assert_eq!(count, 2);
        assert!(matcher.replace_all(&replaced, "x").is_none());
    }
}
