//! Token categories and highlight spans
//!
//! A span is a categorized half-open byte range over the buffer. Spans are
//! recomputed wholesale on every tokenizer pass and never patched.

use std::ops::Range;

use super::style::{Palette, Style};

/// Lexical categories a rule set can describe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    /// Delimiter-bounded string literals
    StringLiteral,
    /// Line and block comments
    Comment,
    /// Exact keyword tokens
    Keyword,
}

impl Category {
    /// Style for this category under a palette
    pub fn style(&self, palette: &Palette) -> Style {
        match self {
            Category::StringLiteral => palette.string,
            Category::Comment => palette.comment,
            Category::Keyword => palette.keyword,
        }
    }

    /// Get a human-readable name for this category
    pub fn name(&self) -> &'static str {
        match self {
            Category::StringLiteral => "String",
            Category::Comment => "Comment",
            Category::Keyword => "Keyword",
        }
    }

    /// Parse a category from its name
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "String" => Some(Category::StringLiteral),
            "Comment" => Some(Category::Comment),
            "Keyword" => Some(Category::Keyword),
            _ => None,
        }
    }
}

/// A categorized span of text in the buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    /// What the span highlights
    pub category: Category,
    /// Byte offset where this span starts (inclusive)
    pub start: usize,
    /// Byte offset where this span ends (exclusive)
    pub end: usize,
}

impl Span {
    /// Create a new span
    pub fn new(category: Category, start: usize, end: usize) -> Self {
        Self { category, start, end }
    }

    /// Check if this span contains a byte position
    pub fn contains(&self, pos: usize) -> bool {
        pos >= self.start && pos < self.end
    }

    /// Check whether two spans share at least one byte
    pub fn intersects(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Get the length of this span in bytes
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Check if span is empty
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// The byte range covered by this span
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}
