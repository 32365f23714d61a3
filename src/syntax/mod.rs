//! Syntax highlighting
//!
//! - `rules`: declarative rule sets and the built-in default
//! - `loader`: reading rule sets from JSON, XML or TOML files
//! - `tokenizer`: whole-buffer passes producing categorized spans
//! - `style`/`tokens`: colors, palettes, categories and spans

mod loader;
mod rules;
mod style;
mod tokenizer;
mod tokens;

pub use loader::{load_file, load_str, parse, Encoding};
pub use rules::{ActiveRules, BlockComment, RuleSet, RuleSetBuilder, DEFAULT_RULESET_NAME};
pub use style::{Color, Palette, Style};
pub use tokenizer::{tokenize, OverlapMode, Tokenizer};
pub use tokens::{Category, Span};
