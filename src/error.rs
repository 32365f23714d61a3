//! Error types for lexpad

use thiserror::Error;

/// Result type alias for lexpad operations
pub type Result<T> = std::result::Result<T, EditorError>;

/// Editor error types
#[derive(Error, Debug)]
pub enum EditorError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to load syntax rules: {0}")]
    RuleSet(#[from] RuleSetError),

    #[error("Compile error: {0}")]
    Compile(#[from] CompileError),

    #[error("No file name")]
    NoFileName,
}

/// Why a rule set could not be loaded
///
/// A failed load never yields a partially populated rule set.
#[derive(Error, Debug)]
pub enum RuleSetError {
    #[error("cannot read rules: {0}")]
    Unreadable(#[from] std::io::Error),

    #[error("unrecognized encoding")]
    UnrecognizedEncoding,

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed XML: {0}")]
    Xml(String),

    #[error("malformed TOML: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Failures talking to the remote compile service
#[derive(Error, Debug)]
pub enum CompileError {
    #[error("transport failure: {0}")]
    Transport(String),

    #[error("request timed out")]
    Timeout,

    #[error("response is not valid JSON: {0}")]
    BadResponse(#[from] serde_json::Error),

    #[error("cannot read response body: {0}")]
    Body(#[from] std::io::Error),
}
