//! lexpad - a small code editor core
//!
//! Whole-buffer syntax highlighting driven by loadable rule sets, literal
//! find/replace, bounded undo/redo, and a client for a remote compile
//! service. The terminal front end lives in the binary.

pub mod compile;
pub mod config;
pub mod debounce;
pub mod decorate;
pub mod document;
pub mod error;
pub mod history;
pub mod search;
pub mod session;
pub mod syntax;

pub use error::{EditorError, Result};
pub use session::Session;
