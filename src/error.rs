//! Error types for the cleaning pipeline and its drivers.
//!
//! Content problems (odd characters, malformed dictionary lines, non-string
//! cells) never surface here. Only structural failures do.

use std::path::PathBuf;

/// Errors raised while reading a slang dictionary.
///
/// A missing file is not an error; see [`crate::dictionary::DictionaryWarning`].
#[derive(Debug, thiserror::Error)]
pub enum DictionaryError {
    /// The file exists but could not be read (permissions, invalid UTF-8, ...).
    #[error("Failed to read slang dictionary {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised while compiling redaction patterns.
#[derive(Debug, thiserror::Error)]
pub enum PatternError {
    /// A PII pattern's regular expression failed to compile.
    #[error("Invalid regex for PII pattern '{label}': {source}")]
    InvalidRegex {
        label: String,
        #[source]
        source: regex::Error,
    },

    /// The sentinel matcher could not be built.
    #[error("Failed to build sentinel matcher: {0}")]
    Automaton(#[from] aho_corasick::BuildError),
}

/// Errors raised by the batch driver.
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    /// The input dataset has no column with the expected name.
    #[error("Input column '{column}' not found (available: {})", available.join(", "))]
    MissingColumn {
        column: String,
        available: Vec<String>,
    },

    /// A delimited row carried more fields than the header.
    #[error("Line {line}: expected at most {expected} fields, found {found}")]
    RaggedRow {
        line: u64,
        expected: usize,
        found: usize,
    },

    /// A JSON-lines record was not a JSON object.
    #[error("Line {line}: expected a JSON object, found {found}")]
    InvalidRecord { line: usize, found: &'static str },

    /// CSV reader/writer error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON parse or encode error.
    #[error("JSON error on line {line}: {source}")]
    Json {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An environment variable or flag carried an unusable value.
    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Top-level error for library consumers.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Dictionary(#[from] DictionaryError),

    #[error(transparent)]
    Pattern(#[from] PatternError),

    #[error(transparent)]
    Batch(#[from] BatchError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result type for library operations.
pub type Result<T> = std::result::Result<T, Error>;
