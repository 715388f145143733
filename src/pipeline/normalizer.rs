//! Dictionary-driven slang normalization.

use crate::dictionary::SlangDictionary;

/// Replace every whitespace-separated token found in the dictionary.
///
/// Lookups are verbatim, so the text is expected to be lowercased already.
/// A token mapped to the empty string leaves an empty slot that the caller's
/// whitespace collapse removes.
pub fn normalize(text: &str, dictionary: &SlangDictionary) -> String {
    text.split_whitespace()
        .map(|token| dictionary.get(token).unwrap_or(token))
        .collect::<Vec<_>>()
        .join(" ")
}
