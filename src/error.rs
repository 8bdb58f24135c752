//! Application error types.
//!
//! Provides unified error handling with actionable context for debugging.

use std::path::PathBuf;

use thiserror::Error;

/// Application result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Application error types with specific context for actionable debugging
#[derive(Debug, Error)]
pub enum Error {
    /// IO error with path context
    #[error("IO error at {path:?}: {source}")]
    Io {
        /// The underlying IO error.
        source: std::io::Error,
        /// File path where the error occurred, if known.
        path: Option<PathBuf>,
    },

    /// Lyric or metadata document that could not be decoded as a whole
    #[error("Parse error in {file:?}: {message}")]
    Parse {
        /// File that failed to parse, if known.
        file: Option<PathBuf>,
        /// Description of the parse failure.
        message: String,
    },

    /// Format tag with no registered parser
    #[error("Unsupported lyric format: {0}")]
    UnsupportedFormat(String),

    /// Configuration error with guidance
    #[error("Configuration error: {message}. {hint}")]
    Config {
        /// Description of the configuration problem.
        message: String,
        /// Actionable guidance for fixing the issue.
        hint: &'static str,
    },

    /// Morphological tokenizer could not be built or failed on input
    #[error("Tokenizer error: {0}")]
    Tokenizer(String),

    /// Song catalog error
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// Generic message error (escape hatch)
    #[error("{0}")]
    Msg(String),
}

impl Error {
    /// Create an IO error with path context
    pub fn io(source: std::io::Error, path: impl Into<Option<PathBuf>>) -> Self {
        Self::Io { source, path: path.into() }
    }

    /// Create a config error with actionable hint
    pub fn config(message: impl Into<String>, hint: &'static str) -> Self {
        Self::Config { message: message.into(), hint }
    }

    /// Create a parse error with file context
    pub fn parse(message: impl Into<String>, file: impl Into<Option<PathBuf>>) -> Self {
        Self::Parse { file: file.into(), message: message.into() }
    }

    /// Attach a file path to an error that was raised without one.
    #[must_use]
    pub fn with_path(self, path: impl Into<PathBuf>) -> Self {
        match self {
            Self::Io { source, path: None } => Self::Io { source, path: Some(path.into()) },
            Self::Parse { file: None, message } => Self::Parse { file: Some(path.into()), message },
            other => other,
        }
    }
}

// Convenience conversions
impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io { source: e, path: None }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse { file: None, message: e.to_string() }
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Self::Msg(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Self::Msg(s.to_string())
    }
}
