//! Rule set loading from external files
//!
//! Three encodings describe the same fields and produce identical rule sets
//! for equivalent input:
//!
//! JSON:
//! ```text
//! { "name": "Python", "keywords": ["def", "if"], "strings": ["\"", "'"],
//!   "lineComment": "#", "blockComment": { "start": "\"\"\"", "end": "\"\"\"" } }
//! ```
//!
//! XML:
//! ```text
//! <language name="Python">
//!   <keywords>def, if</keywords>
//!   <strings>", '</strings>
//!   <lineComment>#</lineComment>
//!   <blockComment start="&quot;&quot;&quot;" end="&quot;&quot;&quot;"/>
//! </language>
//! ```
//!
//! TOML uses the JSON field names. Singular and plural comment fields may
//! appear together; their entries are merged.

use std::fs;
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde::Deserialize;

use super::rules::{BlockComment, RuleSet, RuleSetBuilder};
use crate::error::RuleSetError;

/// Rule file encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Json,
    Xml,
    Toml,
}

impl Encoding {
    /// Guess the encoding from the content, falling back to the file extension
    pub fn sniff(text: &str, path: Option<&Path>) -> Option<Self> {
        match text.trim_start_matches('\u{feff}').trim_start().chars().next() {
            Some('{') => Some(Encoding::Json),
            Some('<') => Some(Encoding::Xml),
            _ => {
                let ext = path?.extension()?.to_str()?.to_lowercase();
                (ext == "toml").then_some(Encoding::Toml)
            }
        }
    }
}

/// Load a rule set from a file
pub fn load_file(path: &Path) -> Result<RuleSet, RuleSetError> {
    let text = fs::read_to_string(path)?;
    let rules = load_str(&text, Some(path))?;
    tracing::info!(path = %path.display(), name = rules.name(), "rule set loaded");
    Ok(rules)
}

/// Load a rule set from text, sniffing its encoding
pub fn load_str(text: &str, path: Option<&Path>) -> Result<RuleSet, RuleSetError> {
    let encoding = Encoding::sniff(text, path).ok_or(RuleSetError::UnrecognizedEncoding)?;
    parse(text, encoding)
}

/// Parse a rule set in a known encoding
pub fn parse(text: &str, encoding: Encoding) -> Result<RuleSet, RuleSetError> {
    let text = text.trim_start_matches('\u{feff}');
    match encoding {
        Encoding::Json => Ok(serde_json::from_str::<RuleFile>(text)?.into_rules()),
        Encoding::Toml => Ok(toml::from_str::<RuleFile>(text)?.into_rules()),
        Encoding::Xml => parse_xml(text),
    }
}

/// Shared shape of the JSON and TOML encodings
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RuleFile {
    name: Option<String>,
    #[serde(default)]
    keywords: Vec<String>,
    #[serde(default)]
    strings: Vec<String>,
    line_comment: Option<String>,
    #[serde(default)]
    line_comments: Vec<String>,
    block_comment: Option<PairEntry>,
    #[serde(default)]
    block_comments: Vec<PairEntry>,
}

#[derive(Debug, Deserialize)]
struct PairEntry {
    #[serde(default)]
    start: String,
    #[serde(default)]
    end: String,
}

impl From<PairEntry> for BlockComment {
    fn from(pair: PairEntry) -> Self {
        BlockComment::new(pair.start, pair.end)
    }
}

impl RuleFile {
    fn into_rules(self) -> RuleSet {
        let mut builder = RuleSet::builder()
            .keywords(self.keywords)
            .string_delimiters(self.strings)
            .line_comments(self.line_comment)
            .line_comments(self.line_comments)
            .block_comments(self.block_comment.map(BlockComment::from))
            .block_comments(self.block_comments.into_iter().map(BlockComment::from));
        if let Some(name) = self.name {
            builder = builder.name(name);
        }
        builder.build()
    }
}

/// Elements whose text content carries a field
#[derive(Debug, Clone, Copy)]
enum TextField {
    Keywords,
    Strings,
    LineComment,
    LineComments,
}

impl TextField {
    fn from_tag(tag: &[u8]) -> Option<Self> {
        match tag {
            b"keywords" => Some(TextField::Keywords),
            b"strings" => Some(TextField::Strings),
            b"lineComment" => Some(TextField::LineComment),
            b"lineComments" => Some(TextField::LineComments),
            _ => None,
        }
    }

    fn apply(self, builder: RuleSetBuilder, text: &str) -> RuleSetBuilder {
        match self {
            TextField::Keywords => builder.keywords(split_list(text)),
            TextField::Strings => builder.string_delimiters(split_list(text)),
            TextField::LineComment => builder.line_comment(text.trim()),
            TextField::LineComments => builder.line_comments(split_list(text)),
        }
    }
}

fn parse_xml(text: &str) -> Result<RuleSet, RuleSetError> {
    let mut reader = Reader::from_str(text);
    let mut builder = RuleSet::builder();
    let mut field: Option<TextField> = None;
    let mut content = String::new();
    let mut depth = 0usize;
    let mut seen_element = false;

    loop {
        match reader.read_event().map_err(xml_error)? {
            Event::Start(e) => {
                depth += 1;
                seen_element = true;
                builder = apply_attributes(builder, &e)?;
                field = TextField::from_tag(e.name().as_ref());
                content.clear();
            }
            Event::Empty(e) => {
                seen_element = true;
                builder = apply_attributes(builder, &e)?;
                if let Some(f) = TextField::from_tag(e.name().as_ref()) {
                    builder = f.apply(builder, "");
                }
            }
            Event::Text(t) => {
                if field.is_some() {
                    content.push_str(&t.unescape().map_err(xml_error)?);
                }
            }
            Event::CData(c) => {
                if field.is_some() {
                    content.push_str(&String::from_utf8_lossy(&c));
                }
            }
            Event::End(_) => {
                depth = depth.saturating_sub(1);
                if let Some(f) = field.take() {
                    builder = f.apply(builder, &content);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !seen_element {
        return Err(RuleSetError::Xml("no elements".to_string()));
    }
    if depth != 0 {
        return Err(RuleSetError::Xml("unexpected end of document".to_string()));
    }
    Ok(builder.build())
}

/// Handle the attribute-carrying elements: `<language name>` and
/// `<blockComment start end>`
fn apply_attributes(
    builder: RuleSetBuilder,
    element: &BytesStart<'_>,
) -> Result<RuleSetBuilder, RuleSetError> {
    match element.name().as_ref() {
        b"language" => Ok(match attribute(element, "name")? {
            Some(name) => builder.name(name),
            None => builder,
        }),
        b"blockComment" => {
            let start = attribute(element, "start")?.unwrap_or_default();
            let end = attribute(element, "end")?.unwrap_or_default();
            Ok(builder.block_comment(BlockComment::new(start, end)))
        }
        _ => Ok(builder),
    }
}

fn attribute(element: &BytesStart<'_>, key: &str) -> Result<Option<String>, RuleSetError> {
    match element.try_get_attribute(key).map_err(xml_error)? {
        Some(attr) => Ok(Some(attr.unescape_value().map_err(xml_error)?.into_owned())),
        None => Ok(None),
    }
}

fn xml_error(err: impl std::fmt::Display) -> RuleSetError {
    RuleSetError::Xml(err.to_string())
}

/// Split a comma-separated list, dropping blank entries
fn split_list(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
