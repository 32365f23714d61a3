//! Whole-buffer tokenizer
//!
//! Runs four passes over the entire text in fixed priority order:
//! string literals, line comments, block comments, keywords. Each pass is
//! an independent scan; how overlapping results are combined depends on the
//! [`OverlapMode`]. This is an approximation for coloring, not a lexer.

use std::collections::{BTreeMap, HashSet};
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::rules::RuleSet;
use super::tokens::{Category, Span};

/// Escape character inside string literals
const ESCAPE: char = '\\';

/// Raw multi-line delimiter; its body has no escapes
const RAW_DELIMITER: &str = "\"\"\"";

/// How spans from different passes are combined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlapMode {
    /// Keep every span in registration order; later spans paint over
    /// earlier ones where they overlap
    Layered,
    /// Clip each span against spans placed by earlier (higher priority)
    /// passes; a lower pass skips matches that start inside placed spans.
    /// The result is sorted and non-overlapping.
    #[default]
    Exclusive,
}

impl OverlapMode {
    pub fn name(&self) -> &'static str {
        match self {
            OverlapMode::Layered => "layered",
            OverlapMode::Exclusive => "exclusive",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "layered" => Some(OverlapMode::Layered),
            "exclusive" => Some(OverlapMode::Exclusive),
            _ => None,
        }
    }
}

/// Tokenize with the default overlap mode
pub fn tokenize(text: &str, rules: &RuleSet) -> Vec<Span> {
    Tokenizer::new(rules, OverlapMode::default()).tokenize(text)
}

/// Scanner for delimiter-bounded string literals
///
/// Delimiters are tried in declared order at every candidate position, so a
/// longer delimiter declared first (e.g. `"""`) wins over its prefix.
struct StringScanner {
    /// Finds the next position where any delimiter opens
    opener: Regex,
    delimiters: Vec<String>,
}

impl StringScanner {
    fn new(delimiters: &[String]) -> Option<Self> {
        let delimiters: Vec<String> = delimiters.iter().filter(|d| !d.is_empty()).cloned().collect();
        if delimiters.is_empty() {
            return None;
        }
        let alternation = delimiters
            .iter()
            .map(|d| regex::escape(d))
            .collect::<Vec<_>>()
            .join("|");
        let opener = compile("strings", &alternation)?;
        Some(Self { opener, delimiters })
    }

    fn scan(&self, text: &str, out: &mut Vec<Span>) {
        let mut pos = 0;
        while let Some(m) = self.opener.find_at(text, pos) {
            let start = m.start();
            let literal_end = self.delimiters.iter().find_map(|d| {
                text[start..]
                    .starts_with(d.as_str())
                    .then(|| find_closing(text, start + d.len(), d))
                    .flatten()
            });
            match literal_end {
                Some(end) => {
                    out.push(Span::new(Category::StringLiteral, start, end));
                    pos = end;
                }
                // Unterminated: no span, resume after the opening character
                None => pos = start + char_len_at(text, start),
            }
            if pos >= text.len() {
                break;
            }
        }
    }
}

/// Find the end of a literal whose body starts at `from`
///
/// A backslash escapes whatever character follows it, including the
/// delimiter, except in raw `"""` literals. Returns the offset just past the
/// closing delimiter.
fn find_closing(text: &str, from: usize, delimiter: &str) -> Option<usize> {
    if delimiter == RAW_DELIMITER {
        return text[from..].find(delimiter).map(|i| from + i + delimiter.len());
    }
    let mut chars = text[from..].char_indices().peekable();
    while let Some((offset, ch)) = chars.next() {
        if ch == ESCAPE && chars.peek().is_some() {
            chars.next();
            continue;
        }
        if text[from + offset..].starts_with(delimiter) {
            return Some(from + offset + delimiter.len());
        }
    }
    None
}

fn char_len_at(text: &str, pos: usize) -> usize {
    text[pos..].chars().next().map_or(1, char::len_utf8)
}

fn compile(name: &str, pattern: &str) -> Option<Regex> {
    match Regex::new(pattern) {
        Ok(regex) => Some(regex),
        Err(err) => {
            tracing::warn!(rule = name, %err, "skipping rule that does not compile");
            None
        }
    }
}

fn identifier() -> &'static Regex {
    static IDENTIFIER: OnceLock<Regex> = OnceLock::new();
    IDENTIFIER.get_or_init(|| {
        Regex::new(r"\b[_A-Za-z][_A-Za-z0-9]*\b").expect("identifier pattern is valid")
    })
}

/// A rule set compiled for repeated whole-buffer passes
///
/// Holds no state between calls: tokenizing the same text twice yields the
/// same spans.
pub struct Tokenizer {
    mode: OverlapMode,
    strings: Option<StringScanner>,
    line_comments: Vec<Regex>,
    block_comments: Vec<Regex>,
    keywords: HashSet<String>,
}

impl Tokenizer {
    /// Compile a rule set
    pub fn new(rules: &RuleSet, mode: OverlapMode) -> Self {
        let line_comments = rules
            .line_comments()
            .iter()
            .filter(|marker| !marker.is_empty())
            .filter_map(|marker| compile("line_comment", &format!("{}[^\r\n]*", regex::escape(marker))))
            .collect();

        let block_comments = rules
            .block_comments()
            .iter()
            .filter(|pair| pair.is_usable())
            .filter_map(|pair| {
                let pattern = format!(
                    "{}(?s:.*?){}",
                    regex::escape(&pair.start),
                    regex::escape(&pair.end)
                );
                compile("block_comment", &pattern)
            })
            .collect();

        Self {
            mode,
            strings: StringScanner::new(rules.string_delimiters()),
            line_comments,
            block_comments,
            keywords: rules.keywords().iter().cloned().collect(),
        }
    }

    /// Produce highlight spans for the whole text
    pub fn tokenize(&self, text: &str) -> Vec<Span> {
        let spans = match self.mode {
            OverlapMode::Layered => self.layered(text),
            OverlapMode::Exclusive => self.exclusive(text),
        };
        tracing::debug!(bytes = text.len(), spans = spans.len(), mode = self.mode.name(), "tokenized");
        spans
    }

    fn layered(&self, text: &str) -> Vec<Span> {
        let mut spans = Vec::new();
        if let Some(strings) = &self.strings {
            strings.scan(text, &mut spans);
        }
        for regex in self.line_comments.iter().chain(&self.block_comments) {
            spans.extend(regex.find_iter(text).map(|m| Span::new(Category::Comment, m.start(), m.end())));
        }
        if !self.keywords.is_empty() {
            spans.extend(
                identifier()
                    .find_iter(text)
                    .filter(|m| self.keywords.contains(m.as_str()))
                    .map(|m| Span::new(Category::Keyword, m.start(), m.end())),
            );
        }
        spans
    }

    fn exclusive(&self, text: &str) -> Vec<Span> {
        let mut placed = Placed::default();
        if let Some(strings) = &self.strings {
            let mut literals = Vec::new();
            strings.scan(text, &mut literals);
            for span in literals {
                placed.insert(span);
            }
        }
        for regex in self.line_comments.iter().chain(&self.block_comments) {
            placed.scan(regex, text, Category::Comment, |_| true);
        }
        if !self.keywords.is_empty() {
            placed.scan(identifier(), text, Category::Keyword, |word| self.keywords.contains(word));
        }
        placed.into_spans()
    }
}

/// Non-overlapping spans keyed by start offset
#[derive(Default)]
struct Placed {
    spans: BTreeMap<usize, Span>,
}

impl Placed {
    /// Insert the parts of `span` not already covered
    ///
    /// Keywords are all-or-nothing: a keyword touching any placed span is
    /// dropped rather than split.
    fn insert(&mut self, span: Span) {
        if span.is_empty() {
            return;
        }
        let mut cursor = span.start;
        if let Some((_, prev)) = self.spans.range(..span.start).next_back() {
            cursor = cursor.max(prev.end);
        }
        let mut pieces = Vec::new();
        for placed in self.spans.range(span.start..span.end).map(|(_, s)| s) {
            if placed.start > cursor {
                pieces.push(Span::new(span.category, cursor, placed.start));
            }
            cursor = cursor.max(placed.end);
        }
        if cursor < span.end {
            pieces.push(Span::new(span.category, cursor, span.end));
        }

        let untouched = pieces.len() == 1 && pieces[0] == span;
        if span.category == Category::Keyword && !untouched {
            return;
        }
        for piece in pieces {
            self.spans.insert(piece.start, piece);
        }
    }

    /// End offset of the placed span covering `pos`, if any
    fn covering(&self, pos: usize) -> Option<usize> {
        self.spans
            .range(..=pos)
            .next_back()
            .map(|(_, s)| s)
            .filter(|s| s.contains(pos))
            .map(|s| s.end)
    }

    /// Place every accepted match of `regex`
    ///
    /// A match that starts inside an already placed span is discarded and
    /// the scan resumes where that span ends, so a marker hidden inside a
    /// string does not swallow a real one later on the line.
    fn scan(&mut self, regex: &Regex, text: &str, category: Category, accept: impl Fn(&str) -> bool) {
        let mut pos = 0;
        while pos <= text.len() {
            let Some(m) = regex.find_at(text, pos) else {
                break;
            };
            if let Some(end) = self.covering(m.start()) {
                pos = end;
                continue;
            }
            if accept(m.as_str()) {
                self.insert(Span::new(category, m.start(), m.end()));
            }
            pos = m.end().max(m.start() + char_len_at(text, m.start()));
        }
    }

    fn into_spans(self) -> Vec<Span> {
        self.spans.into_values().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::rules::BlockComment;

    fn let_rules() -> RuleSet {
        RuleSet::builder().keyword("let").line_comment("//").build()
    }

    fn spans_of(spans: &[Span], category: Category) -> Vec<(usize, usize)> {
        spans
            .iter()
            .filter(|s| s.category == category)
            .map(|s| (s.start, s.end))
            .collect()
    }

    #[test]
    fn test_keyword_and_line_comment() {
        let text = "let x = 5 // note";
        let spans = tokenize(text, &let_rules());
        assert_eq!(
            spans,
            vec![
                Span::new(Category::Keyword, 0, 3),
                Span::new(Category::Comment, text.find("//").unwrap(), text.len()),
            ]
        );
    }

    #[test]
    fn test_block_comment() {
        let rules = RuleSet::builder()
            .block_comment(BlockComment::new("/*", "*/"))
            .build();
        let spans = tokenize("/* hi */code", &rules);
        assert_eq!(spans, vec![Span::new(Category::Comment, 0, 8)]);
    }

    #[test]
    fn test_block_comment_spans_lines_and_does_not_nest() {
        let rules = RuleSet::builder()
            .block_comment(BlockComment::new("/*", "*/"))
            .build();
        let text = "a /* one\n /* two */ b */";
        let spans = tokenize(text, &rules);
        assert_eq!(spans, vec![Span::new(Category::Comment, 2, 19)]);
    }

    #[test]
    fn test_unterminated_constructs_produce_no_span() {
        let rules = RuleSet::builder()
            .string_delimiter("\"")
            .block_comment(BlockComment::new("/*", "*/"))
            .build();
        assert!(tokenize("x = \"abc", &rules).is_empty());
        assert!(tokenize("x /* abc", &rules).is_empty());
    }

    #[test]
    fn test_unterminated_string_does_not_hide_later_strings() {
        let rules = RuleSet::builder().string_delimiter("'").build();
        let spans = tokenize("it's 'ok'", &rules);
        // The apostrophe pairs with the next quote; the remainder is unterminated
        assert_eq!(spans_of(&spans, Category::StringLiteral), vec![(2, 6)]);
    }

    #[test]
    fn test_escaped_delimiter_stays_inside_string() {
        let rules = RuleSet::builder().string_delimiter("\"").build();
        let text = r#"s = "a\"b" + c"#;
        assert_eq!(tokenize(text, &rules), vec![Span::new(Category::StringLiteral, 4, 10)]);
    }

    #[test]
    fn test_multi_character_delimiter() {
        let rules = RuleSet::builder().string_delimiter("<<").build();
        assert_eq!(
            tokenize("x <<abc<< y", &rules),
            vec![Span::new(Category::StringLiteral, 2, 9)]
        );
    }

    #[test]
    fn test_builtin_triple_quoted_string() {
        let text = "val s = \"\"\"line \"one\"\nline two\"\"\"\nval t = 1";
        let spans = tokenize(text, RuleSet::builtin());
        let close = text.find("\"\"\"\n").unwrap() + 3;
        assert_eq!(spans_of(&spans, Category::StringLiteral), vec![(8, close)]);
        assert_eq!(spans_of(&spans, Category::Keyword), vec![(0, 3), (close + 1, close + 4)]);
    }

    #[test]
    fn test_triple_quoted_string_ignores_backslashes() {
        let text = "val p = \"\"\"C:\\\"\"\"";
        let spans = tokenize(text, RuleSet::builtin());
        assert_eq!(spans_of(&spans, Category::StringLiteral), vec![(8, 17)]);
        assert_eq!(text.len(), 17);
    }

    #[test]
    fn test_keyword_must_be_whole_token() {
        let spans = tokenize("letter let _let let2 let", &let_rules());
        assert_eq!(spans_of(&spans, Category::Keyword), vec![(7, 10), (21, 24)]);
    }

    #[test]
    fn test_keyword_after_multibyte_text() {
        let spans = tokenize("é let", &let_rules());
        assert_eq!(spans_of(&spans, Category::Keyword), vec![(3, 6)]);
    }

    #[test]
    fn test_exclusive_mode_drops_keywords_inside_strings_and_comments() {
        let rules = RuleSet::builder()
            .keyword("if")
            .string_delimiter("\"")
            .line_comment("#")
            .build();
        let text = "\"if\" if # if";
        let spans = Tokenizer::new(&rules, OverlapMode::Exclusive).tokenize(text);
        assert_eq!(
            spans,
            vec![
                Span::new(Category::StringLiteral, 0, 4),
                Span::new(Category::Keyword, 5, 7),
                Span::new(Category::Comment, 8, 12),
            ]
        );
    }

    #[test]
    fn test_layered_mode_keeps_every_pass() {
        let rules = RuleSet::builder()
            .keyword("if")
            .string_delimiter("\"")
            .line_comment("#")
            .build();
        let text = "\"if\" if # if";
        let spans = Tokenizer::new(&rules, OverlapMode::Layered).tokenize(text);
        assert_eq!(
            spans,
            vec![
                Span::new(Category::StringLiteral, 0, 4),
                Span::new(Category::Comment, 8, 12),
                Span::new(Category::Keyword, 1, 3),
                Span::new(Category::Keyword, 5, 7),
                Span::new(Category::Keyword, 10, 12),
            ]
        );
    }

    #[test]
    fn test_exclusive_mode_clips_comment_marker_inside_string() {
        let text = "val u = \"http://x\" // c";
        let spans = tokenize(text, RuleSet::builtin());
        assert_eq!(
            spans,
            vec![
                Span::new(Category::Keyword, 0, 3),
                Span::new(Category::StringLiteral, 8, 18),
                Span::new(Category::Comment, 19, text.len()),
            ]
        );
    }

    #[test]
    fn test_exclusive_mode_clips_partial_overlap() {
        // The string opens inside the comment and closes on the next line
        let rules = RuleSet::builder().string_delimiter("'").line_comment("#").build();
        let text = "# it's\nok' x";
        let spans = tokenize(text, &rules);
        assert_eq!(
            spans,
            vec![
                Span::new(Category::Comment, 0, 4),
                Span::new(Category::StringLiteral, 4, 10),
            ]
        );
    }

    #[test]
    fn test_exclusive_spans_never_overlap() {
        let text = "/* \"a */ \"b /* c\" */ // \"d\"\nval x = \"\"\"e\"\"\" // f";
        let spans = tokenize(text, RuleSet::builtin());
        for pair in spans.windows(2) {
            assert!(pair[0].end <= pair[1].start, "{:?} overlaps {:?}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_tokenize_is_idempotent() {
        let text = "fun main() {\n  val s = \"x\" // c\n  /* b */ return\n}";
        let tokenizer = Tokenizer::new(RuleSet::builtin(), OverlapMode::Exclusive);
        assert_eq!(tokenizer.tokenize(text), tokenizer.tokenize(text));
        assert_eq!(tokenize(text, RuleSet::builtin()), tokenize(text, RuleSet::builtin()));
    }

    #[test]
    fn test_empty_rule_set_highlights_nothing() {
        assert!(tokenize("let x = \"y\" // z", &RuleSet::empty()).is_empty());
    }

    #[test]
    fn test_overlap_mode_names() {
        assert_eq!(OverlapMode::from_name("Layered"), Some(OverlapMode::Layered));
        assert_eq!(OverlapMode::from_name(OverlapMode::Exclusive.name()), Some(OverlapMode::Exclusive));
        assert_eq!(OverlapMode::from_name("strict"), None);
    }
}
