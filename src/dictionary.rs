//! Slang dictionary loading.
//!
//! The resource is a UTF-8 text file with one `key : value` entry per line.
//! Blank lines, lines without a `:` and `[source ...]` header lines are
//! ignored. Keys and values are trimmed and lowercased; the first `:` is the
//! delimiter so values may themselves contain colons.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::DictionaryError;

/// Lines starting with this marker are headers, not entries.
pub const HEADER_MARKER: &str = "[source";

/// Separator between the informal token and its standard form.
pub const SEPARATOR: char = ':';

/// Immutable mapping from informal token to standard-form replacement.
///
/// An empty replacement deletes the token during normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlangDictionary {
    entries: HashMap<String, String>,
}

/// Non-fatal condition reported while loading a dictionary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DictionaryWarning {
    /// The resource does not exist; normalization becomes a no-op.
    MissingResource { path: PathBuf },
}

impl std::fmt::Display for DictionaryWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingResource { path } => {
                write!(f, "Slang dictionary not found at {}", path.display())
            }
        }
    }
}

/// Outcome of loading a dictionary resource.
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    /// The parsed dictionary (empty if the resource was missing).
    pub dictionary: SlangDictionary,
    /// Set when the load degraded instead of failing.
    pub warning: Option<DictionaryWarning>,
    /// Lines accepted as entries, duplicates included.
    pub accepted: usize,
    /// Non-blank lines that were not entries.
    pub skipped: usize,
    /// Entries that replaced an earlier value for the same key.
    pub overwritten: usize,
}

impl SlangDictionary {
    /// Create an empty dictionary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a dictionary from literal pairs, lowercasing both sides.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let entries = pairs
            .into_iter()
            .map(|(k, v)| (k.as_ref().trim().to_lowercase(), v.as_ref().trim().to_lowercase()))
            .collect();
        Self { entries }
    }

    /// Load a dictionary from a file.
    ///
    /// A missing file yields an empty dictionary plus a warning. Any other
    /// read failure is returned as an error.
    pub fn load(path: impl AsRef<Path>) -> Result<LoadReport, DictionaryError> {
        let path = path.as_ref();

        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let warning = DictionaryWarning::MissingResource {
                    path: path.to_path_buf(),
                };
                tracing::warn!("{}; slang normalization disabled", warning);
                return Ok(LoadReport {
                    warning: Some(warning),
                    ..LoadReport::default()
                });
            }
            Err(source) => {
                return Err(DictionaryError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let report = Self::parse(&text);
        tracing::debug!(
            path = %path.display(),
            entries = report.dictionary.len(),
            skipped = report.skipped,
            overwritten = report.overwritten,
            "Loaded slang dictionary"
        );
        Ok(report)
    }

    /// Parse dictionary text already in memory.
    pub fn parse(text: &str) -> LoadReport {
        let mut report = LoadReport::default();

        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            match parse_entry(line) {
                Some((key, value)) => {
                    report.accepted += 1;
                    if report.dictionary.entries.insert(key, value).is_some() {
                        report.overwritten += 1;
                    }
                }
                None => report.skipped += 1,
            }
        }

        report
    }

    /// Look up the replacement for a token.
    pub fn get(&self, token: &str) -> Option<&str> {
        self.entries.get(token).map(String::as_str)
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the dictionary has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries sorted by key.
    pub fn entries(&self) -> Vec<(&str, &str)> {
        let mut all: Vec<(&str, &str)> = self
            .entries
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        all.sort_unstable_by(|a, b| a.0.cmp(b.0));
        all
    }
}

/// Parse one trimmed, non-empty line into a `(key, value)` pair.
fn parse_entry(line: &str) -> Option<(String, String)> {
    if line.starts_with(HEADER_MARKER) {
        return None;
    }

    let (key, value) = line.split_once(SEPARATOR)?;
    let key = key.trim().to_lowercase();

    // Tokens never contain whitespace, so such keys could never match.
    if key.is_empty() || key.chars().any(char::is_whitespace) {
        return None;
    }

    Some((key, value.trim().to_lowercase()))
}
