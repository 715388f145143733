//! PII redaction rules.
//!
//! Each rule is a `(label, regex, sentinel)` triple. Rules run in table order
//! and every match is replaced by the rule's sentinel tag. The original value
//! is discarded.

use std::borrow::Cow;

use regex::Regex;

use crate::error::PatternError;

/// Optional capture group written back before the sentinel.
///
/// Lets a pattern assert what precedes a match without swallowing it.
const LEAD_GROUP: &str = "lead";

/// Optional capture group written back after the sentinel.
const KEEP_GROUP: &str = "keep";

/// Built-in PII categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PiiKind {
    Email,
    Phone,
    Nik,
}

impl PiiKind {
    /// Built-in categories in the order they are applied.
    ///
    /// NIK runs before PHONE so an exact 16-digit run is always tagged NIK,
    /// even when it starts with `08` or `62`.
    pub const ORDER: [PiiKind; 3] = [PiiKind::Email, PiiKind::Nik, PiiKind::Phone];

    /// Short label used in logs and summaries.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Email => "EMAIL",
            Self::Phone => "HP",
            Self::Nik => "NIK",
        }
    }

    /// Plain sentinel tag.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Email => "[EMAIL_SENSOR]",
            Self::Phone => "[HP_SENSOR]",
            Self::Nik => "[NIK_SENSOR]",
        }
    }

    /// Glyph prefixed to the tag in decorated output.
    pub fn glyph(&self) -> char {
        match self {
            Self::Email => '📧',
            Self::Phone => '📱',
            Self::Nik => '🆔',
        }
    }

    /// Sentinel for the given style.
    pub fn sentinel(&self, style: SentinelStyle) -> String {
        match style {
            SentinelStyle::Plain => self.tag().to_string(),
            SentinelStyle::Decorated => format!("{}{}", self.glyph(), self.tag()),
        }
    }

    fn pattern(&self) -> &'static str {
        match self {
            Self::Email => r"(?i)\b[a-z0-9._%+-]+@[a-z0-9.-]+\.[a-z]{2,}\b",
            Self::Nik => r"\b[0-9]{16}\b",
            // Prefix not preceded by a digit, then 8-15 chars from {digit,
            // whitespace, hyphen} ending on a digit not followed by another digit.
            Self::Phone => {
                r"(?P<lead>^|[^0-9])(?:\+62|62|08)[0-9\-\s]{7,14}[0-9](?P<keep>[^0-9]|$)"
            }
        }
    }
}

/// How sentinel tags are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SentinelStyle {
    /// `[EMAIL_SENSOR]`
    #[default]
    Plain,
    /// `📧[EMAIL_SENSOR]`, for the interactive tester.
    Decorated,
}

impl std::str::FromStr for SentinelStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "plain" => Ok(SentinelStyle::Plain),
            "decorated" | "emoji" => Ok(SentinelStyle::Decorated),
            _ => Err(format!(
                "invalid sentinel style '{}', expected 'plain' or 'decorated'",
                s
            )),
        }
    }
}

/// A single redaction rule.
#[derive(Debug, Clone)]
pub struct PiiPattern {
    /// Rule label (e.g. `EMAIL`).
    label: String,
    /// Matcher for the PII span.
    regex: Regex,
    /// Replacement for every match.
    sentinel: String,
    /// Whether the regex carries a `lead` or `keep` group.
    has_context: bool,
}

impl PiiPattern {
    /// Create a new rule from a regex source.
    ///
    /// Named groups `lead` and `keep`, if present, are written back around
    /// the sentinel instead of being redacted.
    pub fn new(
        label: impl Into<String>,
        pattern: &str,
        sentinel: impl Into<String>,
    ) -> Result<Self, PatternError> {
        let label = label.into();
        let regex = Regex::new(pattern).map_err(|source| PatternError::InvalidRegex {
            label: label.clone(),
            source,
        })?;
        let has_context = regex
            .capture_names()
            .any(|n| n == Some(LEAD_GROUP) || n == Some(KEEP_GROUP));

        Ok(Self {
            label,
            regex,
            sentinel: sentinel.into(),
            has_context,
        })
    }

    /// Built-in rule for a PII category.
    pub fn builtin(kind: PiiKind, style: SentinelStyle) -> Result<Self, PatternError> {
        Self::new(kind.label(), kind.pattern(), kind.sentinel(style))
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn sentinel(&self) -> &str {
        &self.sentinel
    }

    /// Check if the text contains a span this rule would redact.
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    /// Replace every match with the sentinel.
    pub fn apply<'t>(&self, text: &'t str) -> Cow<'t, str> {
        if !self.has_context {
            return self.regex.replace_all(text, regex::NoExpand(&self.sentinel));
        }

        let mut out = String::new();
        let mut copied = 0;
        let mut at = 0;
        while let Some(caps) = self.regex.captures_at(text, at) {
            let Some(whole) = caps.get(0) else { break };
            let start = caps.name(LEAD_GROUP).map_or(whole.start(), |m| m.end());
            let end = caps.name(KEEP_GROUP).map_or(whole.end(), |m| m.start());

            out.push_str(&text[copied..start]);
            out.push_str(&self.sentinel);
            copied = end;

            // Resume at the kept tail: it may be the lead of the next match.
            if end > at {
                at = end;
            } else {
                match text[at..].chars().next() {
                    Some(c) => at += c.len_utf8(),
                    None => break,
                }
            }
        }

        if out.is_empty() && copied == 0 {
            return Cow::Borrowed(text);
        }
        out.push_str(&text[copied..]);
        Cow::Owned(out)
    }
}

/// Ordered table of redaction rules.
#[derive(Debug, Clone, Default)]
pub struct PiiRedactor {
    patterns: Vec<PiiPattern>,
}

impl PiiRedactor {
    /// Redactor with the built-in EMAIL, NIK and PHONE rules.
    pub fn new(style: SentinelStyle) -> Result<Self, PatternError> {
        let patterns = PiiKind::ORDER
            .iter()
            .map(|kind| PiiPattern::builtin(*kind, style))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// Redactor with no rules.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Append a rule. It runs after all existing rules.
    pub fn with_pattern(mut self, pattern: PiiPattern) -> Self {
        self.patterns.push(pattern);
        self
    }

    /// Replace every PII span with its sentinel.
    pub fn redact(&self, text: &str) -> String {
        let mut out = text.to_string();
        for pattern in &self.patterns {
            let replaced = match pattern.apply(&out) {
                Cow::Borrowed(_) => continue,
                Cow::Owned(replaced) => replaced,
            };
            out = replaced;
        }
        out
    }

    /// Rules in application order.
    pub fn patterns(&self) -> &[PiiPattern] {
        &self.patterns
    }

    /// Every sentinel this redactor can emit.
    pub fn sentinels(&self) -> Vec<&str> {
        self.patterns.iter().map(PiiPattern::sentinel).collect()
    }

    /// Count sentinel occurrences per rule label in already-cleaned text.
    pub fn count_sentinels<'a>(&'a self, text: &str) -> Vec<(&'a str, usize)> {
        self.patterns
            .iter()
            .map(|p| (p.label(), text.matches(p.sentinel()).count()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn redactor() -> PiiRedactor {
        PiiRedactor::new(SentinelStyle::Plain).unwrap()
    }

    #[test]
    fn test_email_replaced_exactly() {
        let r = redactor();
        assert_eq!(
            r.redact("email gw budi_geming@gmail.com ya"),
            "email gw [EMAIL_SENSOR] ya"
        );
        assert_eq!(
            r.redact("kirim ke siti.cantik123@yahoo.com."),
            "kirim ke [EMAIL_SENSOR]."
        );
    }

    #[test]
    fn test_email_case_insensitive() {
        let r = redactor();
        assert_eq!(r.redact("Admin.Fake@Hack.ID"), "[EMAIL_SENSOR]");
    }

    #[test]
    fn test_email_requires_tld_of_two_letters() {
        let r = redactor();
        assert_eq!(r.redact("user@host.x"), "user@host.x");
    }

    #[test]
    fn test_phone_formats() {
        let r = redactor();
        for input in [
            "08123456789",
            "+62 812-3456-789",
            "62812345678",
            "0857-1122-3344",
            "0813 4455 6677",
            "+62818000999",
        ] {
            assert_eq!(r.redact(input), "[HP_SENSOR]", "input: {input}");
        }
    }

    #[test]
    fn test_phone_keeps_trailing_text() {
        let r = redactor();
        assert_eq!(
            r.redact("wa ke 081234567890 urgent"),
            "wa ke [HP_SENSOR] urgent"
        );
        assert_eq!(r.redact("no hp saya 0857-1122-3344."), "no hp saya [HP_SENSOR].");
    }

    #[test]
    fn test_short_numbers_untouched() {
        let r = redactor();
        assert_eq!(r.redact("tiket 1234567"), "tiket 1234567");
        assert_eq!(r.redact("kode 0812345"), "kode 0812345");
        assert_eq!(r.redact("topup rp 50.000"), "topup rp 50.000");
    }

    #[test]
    fn test_phone_prefix_inside_number_is_ignored() {
        let r = redactor();
        assert_eq!(r.redact("ref 1208123456789"), "ref 1208123456789");
    }

    #[test]
    fn test_phone_glued_to_word() {
        let r = redactor();
        assert_eq!(r.redact("hp08123456789"), "hp[HP_SENSOR]");
        assert_eq!(r.redact("tlp081234567890 ya"), "tlp[HP_SENSOR] ya");
        assert_eq!(r.redact("no_08123456789"), "no_[HP_SENSOR]");
        assert_eq!(r.redact("wa+62812345678"), "wa[HP_SENSOR]");
        assert_eq!(r.redact("ab08123456789cd"), "ab[HP_SENSOR]cd");
    }

    #[test]
    fn test_adjacent_phones_both_replaced() {
        let r = redactor();
        assert_eq!(
            r.redact("08123456789 08129876543"),
            "[HP_SENSOR] [HP_SENSOR]"
        );
        assert_eq!(r.redact("a08123456789,08129876543"), "a[HP_SENSOR],[HP_SENSOR]");
    }

    #[test]
    fn test_phone_with_tab_separators() {
        let r = redactor();
        assert_eq!(r.redact("0812\t3456\t7890"), "[HP_SENSOR]");
    }

    #[test]
    fn test_nik_replaced() {
        let r = redactor();
        assert_eq!(
            r.redact("nik 3171234567890001 mohon dihapus"),
            "nik [NIK_SENSOR] mohon dihapus"
        );
    }

    #[test]
    fn test_nik_takes_precedence_over_phone_prefix() {
        let r = redactor();
        assert_eq!(r.redact("6281234567890123"), "[NIK_SENSOR]");
        assert_eq!(r.redact("0812345678901234"), "[NIK_SENSOR]");
    }

    #[test]
    fn test_mixed_pii() {
        let r = redactor();
        assert_eq!(
            r.redact("reset ke a.b@c.id atau wa 0813 4455 6677, nik 3201123456780005"),
            "reset ke [EMAIL_SENSOR] atau wa [HP_SENSOR], nik [NIK_SENSOR]"
        );
    }

    #[test]
    fn test_no_pii_is_identity() {
        let r = redactor();
        let text = "aplikasi error trus nih, kecewa bgt 500rb!!";
        assert_eq!(r.redact(text), text);
    }

    #[test]
    fn test_idempotent() {
        let r = redactor();
        for input in [
            "wa 08123456789+62812345678 ya",
            "budi@mail.com 3171234567890001 0812-3456-7890",
            "08123456789012345081234567890",
            "no hp 0812 3456 7890 0812 3456",
        ] {
            let once = r.redact(input);
            assert_eq!(r.redact(&once), once, "input: {input}");
        }
    }

    #[test]
    fn test_decorated_sentinels() {
        let r = PiiRedactor::new(SentinelStyle::Decorated).unwrap();
        assert_eq!(r.redact("hp 08123456789"), "hp 📱[HP_SENSOR]");
        assert_eq!(r.redact("x@y.com"), "📧[EMAIL_SENSOR]");
    }

    #[test]
    fn test_custom_pattern() {
        let r = redactor()
            .with_pattern(PiiPattern::new("REKENING", r"\brek [0-9]{10}\b", "[REK_SENSOR]").unwrap());
        assert_eq!(r.redact("rek 1234567890 bca"), "[REK_SENSOR] bca");
        assert_eq!(r.sentinels().last(), Some(&"[REK_SENSOR]"));
    }

    #[test]
    fn test_invalid_custom_pattern() {
        let err = PiiPattern::new("BROKEN", r"([0-9]", "[X]").unwrap_err();
        assert!(matches!(err, PatternError::InvalidRegex { ref label, .. } if label == "BROKEN"));
    }

    #[test]
    fn test_count_sentinels() {
        let r = redactor();
        let counts = r.count_sentinels("[HP_SENSOR] dan [HP_SENSOR] [EMAIL_SENSOR]");
        assert_eq!(counts, vec![("EMAIL", 1), ("NIK", 0), ("HP", 2)]);
    }

    #[test]
    fn test_sentinel_style_from_str() {
        assert_eq!("plain".parse::<SentinelStyle>(), Ok(SentinelStyle::Plain));
        assert_eq!("Decorated".parse::<SentinelStyle>(), Ok(SentinelStyle::Decorated));
        assert!("fancy".parse::<SentinelStyle>().is_err());
    }
}
