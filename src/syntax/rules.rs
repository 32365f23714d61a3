//! Rule sets for syntax highlighting
//!
//! A rule set is the declarative description of a language's lexical
//! categories: keywords, string delimiters, line-comment markers and
//! block-comment delimiter pairs. Rule sets are immutable once built;
//! switching languages replaces the whole value.

use std::sync::OnceLock;

/// Name given to rule sets whose source does not name them
pub const DEFAULT_RULESET_NAME: &str = "Custom";

/// A block comment delimiter pair (non-nesting)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockComment {
    pub start: String,
    pub end: String,
}

impl BlockComment {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    /// A pair with an empty marker can never match anything
    pub fn is_usable(&self) -> bool {
        !self.start.is_empty() && !self.end.is_empty()
    }
}

/// Immutable lexical description of a language
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSet {
    name: String,
    keywords: Vec<String>,
    string_delimiters: Vec<String>,
    line_comments: Vec<String>,
    block_comments: Vec<BlockComment>,
}

impl RuleSet {
    /// Start building a rule set
    pub fn builder() -> RuleSetBuilder {
        RuleSetBuilder::default()
    }

    /// A rule set that highlights nothing
    pub fn empty() -> Self {
        RuleSetBuilder::default().build()
    }

    /// The built-in default (Kotlin) rule set
    pub fn builtin() -> &'static RuleSet {
        static BUILTIN: OnceLock<RuleSet> = OnceLock::new();
        BUILTIN.get_or_init(|| {
            RuleSet::builder()
                .name(BUILTIN_NAME)
                .keywords(BUILTIN_KEYWORDS.iter().copied())
                // Triple quotes first so raw strings win over plain ones
                .string_delimiter("\"\"\"")
                .string_delimiter("\"")
                .line_comment("//")
                .block_comment(BlockComment::new("/*", "*/"))
                .build()
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Keywords in first-seen order, without duplicates
    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn is_keyword(&self, word: &str) -> bool {
        self.keywords.iter().any(|k| k == word)
    }

    pub fn string_delimiters(&self) -> &[String] {
        &self.string_delimiters
    }

    pub fn line_comments(&self) -> &[String] {
        &self.line_comments
    }

    pub fn block_comments(&self) -> &[BlockComment] {
        &self.block_comments
    }

    /// True when no pass could ever produce a span
    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
            && self.string_delimiters.iter().all(String::is_empty)
            && self.line_comments.iter().all(String::is_empty)
            && !self.block_comments.iter().any(BlockComment::is_usable)
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::empty()
    }
}

/// Accumulates rule set fields from any source encoding
///
/// Singular and plural forms of a field merge into one list; keywords
/// collapse duplicates while keeping first-seen order.
#[derive(Debug, Default)]
pub struct RuleSetBuilder {
    name: Option<String>,
    keywords: Vec<String>,
    string_delimiters: Vec<String>,
    line_comments: Vec<String>,
    block_comments: Vec<BlockComment>,
}

impl RuleSetBuilder {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn keyword(mut self, keyword: impl Into<String>) -> Self {
        let keyword = keyword.into();
        if !self.keywords.contains(&keyword) {
            self.keywords.push(keyword);
        }
        self
    }

    pub fn keywords<I, S>(self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        keywords.into_iter().fold(self, |b, k| b.keyword(k))
    }

    pub fn string_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.string_delimiters.push(delimiter.into());
        self
    }

    pub fn string_delimiters<I, S>(self, delimiters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        delimiters.into_iter().fold(self, |b, d| b.string_delimiter(d))
    }

    pub fn line_comment(mut self, marker: impl Into<String>) -> Self {
        self.line_comments.push(marker.into());
        self
    }

    pub fn line_comments<I, S>(self, markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        markers.into_iter().fold(self, |b, m| b.line_comment(m))
    }

    pub fn block_comment(mut self, pair: BlockComment) -> Self {
        self.block_comments.push(pair);
        self
    }

    pub fn block_comments<I>(self, pairs: I) -> Self
    where
        I: IntoIterator<Item = BlockComment>,
    {
        pairs.into_iter().fold(self, |b, p| b.block_comment(p))
    }

    pub fn build(self) -> RuleSet {
        RuleSet {
            name: self.name.unwrap_or_else(|| DEFAULT_RULESET_NAME.to_string()),
            keywords: self.keywords,
            string_delimiters: self.string_delimiters,
            line_comments: self.line_comments,
            block_comments: self.block_comments,
        }
    }
}

/// The rule set currently driving the highlighter
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ActiveRules {
    /// The built-in default rule set
    #[default]
    BuiltIn,
    /// A rule set loaded from a file
    Loaded(RuleSet),
}

impl ActiveRules {
    pub fn rules(&self) -> &RuleSet {
        match self {
            ActiveRules::BuiltIn => RuleSet::builtin(),
            ActiveRules::Loaded(rules) => rules,
        }
    }

    pub fn name(&self) -> &str {
        self.rules().name()
    }

    /// Language tag sent to the compile service
    pub fn language_tag(&self) -> String {
        match self {
            ActiveRules::BuiltIn => BUILTIN_NAME.to_lowercase(),
            ActiveRules::Loaded(rules) => rules.name().to_string(),
        }
    }
}

const BUILTIN_NAME: &str = "Kotlin";

const BUILTIN_KEYWORDS: &[&str] = &[
    "val", "var", "fun", "class", "object", "interface", "if", "else", "when", "for", "while",
    "return", "break", "continue", "try", "catch", "finally", "is", "in", "as", "this", "super",
    "package", "import", "private", "public", "protected", "internal", "data", "sealed", "enum",
    "companion", "null", "true", "false",
];
