//! Text cleaning pipeline.
//!
//! Turns uncurated user text into an analytics-ready field:
//! - Lowercases the input
//! - Redacts emails, Indonesian phone numbers and NIKs with sentinel tags
//! - Strips characters outside the allowed set, keeping the tags
//! - Normalizes slang tokens through a [`SlangDictionary`]
//! - Collapses whitespace
//!
//! Every stage is permissive: malformed content never produces an error.

pub mod normalizer;
pub mod redactor;
pub mod sanitizer;

pub use normalizer::normalize;
pub use redactor::{PiiKind, PiiPattern, PiiRedactor, SentinelStyle};
pub use sanitizer::Sanitizer;

use crate::dictionary::SlangDictionary;
use crate::error::PatternError;

/// Deterministic cleaning pipeline combining redactor, sanitizer and
/// normalizer.
///
/// Immutable after construction; share it freely across workers.
#[derive(Debug, Clone)]
pub struct Pipeline {
    redactor: PiiRedactor,
    sanitizer: Sanitizer,
    dictionary: SlangDictionary,
}

impl Pipeline {
    /// Create a pipeline with the built-in PII rules.
    pub fn new(dictionary: SlangDictionary, style: SentinelStyle) -> Result<Self, PatternError> {
        let redactor = PiiRedactor::new(style)?;
        let mut sanitizer = Sanitizer::new(&redactor.sentinels())?;
        if style == SentinelStyle::Decorated {
            sanitizer = sanitizer.allow_glyphs(PiiKind::ORDER.iter().map(PiiKind::glyph));
        }

        Ok(Self {
            redactor,
            sanitizer,
            dictionary,
        })
    }

    /// Assemble a pipeline from custom parts.
    ///
    /// The sanitizer should preserve every sentinel the redactor emits.
    pub fn from_parts(redactor: PiiRedactor, sanitizer: Sanitizer, dictionary: SlangDictionary) -> Self {
        Self {
            redactor,
            sanitizer,
            dictionary,
        }
    }

    /// Clean one piece of raw text.
    pub fn clean(&self, raw: &str) -> String {
        let lowered = raw.to_lowercase();
        let redacted = self.redactor.redact(&lowered);
        let sanitized = self.sanitizer.sanitize(&redacted);
        let normalized = normalize(&sanitized, &self.dictionary);

        // Empty replacements leave gaps behind.
        normalized.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// Clean a possibly missing value; missing input yields an empty string.
    pub fn clean_value(&self, raw: Option<&str>) -> String {
        raw.map(|text| self.clean(text)).unwrap_or_default()
    }

    /// Clean a JSON value. Anything but a string yields an empty string.
    pub fn clean_json(&self, raw: &serde_json::Value) -> String {
        self.clean_value(raw.as_str())
    }

    /// Get the redactor for direct access.
    pub fn redactor(&self) -> &PiiRedactor {
        &self.redactor
    }

    /// Get the sanitizer for direct access.
    pub fn sanitizer(&self) -> &Sanitizer {
        &self.sanitizer
    }

    /// Get the dictionary for direct access.
    pub fn dictionary(&self) -> &SlangDictionary {
        &self.dictionary
    }
}
