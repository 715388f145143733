//! Character sanitizer.

use aho_corasick::{AhoCorasick, MatchKind};

use crate::error::PatternError;

/// Lowercases text and strips characters outside the allowed set.
///
/// Allowed: ASCII letters and digits, whitespace, `[`, `]` and `_`, plus any
/// extra glyphs configured with [`Sanitizer::allow_glyphs`]. Registered
/// sentinel tags are copied through untouched, case included.
#[derive(Debug, Clone, Default)]
pub struct Sanitizer {
    /// Fast matcher for sentinel tags (`None` when no tags are registered).
    sentinel_matcher: Option<AhoCorasick>,
    /// Extra characters allowed in addition to the base set.
    extra_glyphs: Vec<char>,
}

impl Sanitizer {
    /// Sanitizer that preserves the given sentinel tags verbatim.
    pub fn new<S: AsRef<str>>(sentinels: &[S]) -> Result<Self, PatternError> {
        let sentinels: Vec<&str> = sentinels
            .iter()
            .map(AsRef::as_ref)
            .filter(|s| !s.is_empty())
            .collect();

        let sentinel_matcher = if sentinels.is_empty() {
            None
        } else {
            // Leftmost-longest so a decorated tag wins over its plain suffix.
            Some(
                AhoCorasick::builder()
                    .match_kind(MatchKind::LeftmostLongest)
                    .build(&sentinels)?,
            )
        };

        Ok(Self {
            sentinel_matcher,
            extra_glyphs: Vec::new(),
        })
    }

    /// Also allow these characters to survive sanitization.
    pub fn allow_glyphs(mut self, glyphs: impl IntoIterator<Item = char>) -> Self {
        self.extra_glyphs.extend(glyphs);
        self
    }

    /// Lowercase and filter the text, keeping sentinel tags intact.
    pub fn sanitize(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());

        let Some(matcher) = &self.sentinel_matcher else {
            self.filter_into(text, &mut out);
            return out;
        };

        let mut last = 0;
        for mat in matcher.find_iter(text) {
            self.filter_into(&text[last..mat.start()], &mut out);
            out.push_str(&text[mat.start()..mat.end()]);
            last = mat.end();
        }
        self.filter_into(&text[last..], &mut out);

        out
    }

    /// Check if a character survives sanitization.
    pub fn is_allowed(&self, c: char) -> bool {
        c.is_ascii_alphanumeric()
            || c.is_whitespace()
            || matches!(c, '[' | ']' | '_')
            || self.extra_glyphs.contains(&c)
    }

    fn filter_into(&self, segment: &str, out: &mut String) {
        out.extend(
            segment
                .chars()
                .flat_map(char::to_lowercase)
                .filter(|c| self.is_allowed(*c)),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sanitizer() -> Sanitizer {
        Sanitizer::new(&["[EMAIL_SENSOR]", "[HP_SENSOR]", "[NIK_SENSOR]"]).unwrap()
    }

    #[test]
    fn test_strips_punctuation() {
        let s = Sanitizer::default();
        assert_eq!(s.sanitize("min, saldo saya blm masuk!!"), "min saldo saya blm masuk");
        assert_eq!(s.sanitize("rp 50.000"), "rp 50000");
    }

    #[test]
    fn test_lowercases() {
        let s = Sanitizer::default();
        assert_eq!(s.sanitize("Tolong CEK"), "tolong cek");
    }

    #[test]
    fn test_keeps_brackets_underscore_and_whitespace() {
        let s = Sanitizer::default();
        assert_eq!(s.sanitize("a_b [c]\td\ne"), "a_b [c]\td\ne");
    }

    #[test]
    fn test_strips_non_ascii_letters_and_emoji() {
        let s = Sanitizer::default();
        assert_eq!(s.sanitize("café 😡 mantap"), "caf  mantap");
    }

    #[test]
    fn test_preserves_sentinels_verbatim() {
        let s = sanitizer();
        assert_eq!(
            s.sanitize("Email [EMAIL_SENSOR]. HP: [HP_SENSOR]!"),
            "email [EMAIL_SENSOR] hp [HP_SENSOR]"
        );
    }

    #[test]
    fn test_unregistered_tags_are_lowercased() {
        let s = sanitizer();
        assert_eq!(s.sanitize("[OTHER_TAG]"), "[other_tag]");
    }

    #[test]
    fn test_decorated_sentinels_and_glyphs() {
        let s = Sanitizer::new(&["📱[HP_SENSOR]", "[HP_SENSOR]"])
            .unwrap()
            .allow_glyphs(['📱']);
        assert_eq!(s.sanitize("wa: 📱[HP_SENSOR]!"), "wa 📱[HP_SENSOR]");
        assert_eq!(s.sanitize("📱 🔥"), "📱 ");
    }

    #[test]
    fn test_empty_sentinel_list() {
        let s = Sanitizer::new::<&str>(&[]).unwrap();
        assert_eq!(s.sanitize("OK!"), "ok");
    }
}
