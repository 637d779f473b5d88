//! Regex helpers shared by every extractor: email matching and validation,
//! whitespace normalization.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").unwrap());
static EMAIL_SCAN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").unwrap());
static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
/// Plain addresses, or the local part and domain around an escaped at-sign.
static MARKUP_EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"([A-Za-z0-9_.+-]+)\\",
        "u0040",
        r"([A-Za-z0-9-]+\.[A-Za-z0-9.-]+)|([A-Za-z0-9_.+-]+@[A-Za-z0-9-]+\.[A-Za-z0-9.-]+)",
    ))
    .unwrap()
});

/// JSON escape of `@` as it appears inside inline script payloads.
pub const ESCAPED_AT_SIGN: &str = concat!("\\", "u0040");

/// Returns true if `s` is a well-formed email address, with nothing before
/// or after it.
pub fn is_valid_email(s: &str) -> bool {
    EMAIL_RE.is_match(s)
}

/// Find every email address in free text.
///
/// Matches are lower-cased, validated and deduplicated in first-seen order.
pub fn find_emails(text: &str) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    dedupe_lowercase(EMAIL_SCAN_RE.find_iter(text).map(|m| m.as_str()))
}

/// Lower-case, validate and deduplicate candidate emails, keeping the order
/// in which they were first seen.
pub fn dedupe_lowercase<I, S>(candidates: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .map(|c| c.as_ref().trim().to_lowercase())
        .filter(|c| is_valid_email(c) && seen.insert(c.clone()))
        .collect()
}

/// Scan raw markup (scripts, attributes and all) for email addresses in both
/// the plain and the escaped at-sign form.
///
/// Results are lower-cased, validated and deduplicated in first-seen order.
pub fn scan_markup_emails(markup: &str) -> Vec<String> {
    let candidates = MARKUP_EMAIL_RE.captures_iter(markup).filter_map(|caps| {
        match (caps.get(1), caps.get(2), caps.get(3)) {
            (Some(local), Some(domain), _) => Some(format!("{}@{}", local.as_str(), domain.as_str())),
            (_, _, Some(plain)) => Some(plain.as_str().to_string()),
            _ => None,
        }
    });
    // The domain class allows dots, so sentence-ending periods get swallowed.
    dedupe_lowercase(candidates.map(|c| c.trim_end_matches('.').to_string()))
}

/// Collapse runs of whitespace into a single space and trim both ends.
pub fn normalize_whitespace(text: &str) -> String {
    WHITESPACE_RE.replace_all(text, " ").trim().to_string()
}

/// Replace the escaped at-sign ([`ESCAPED_AT_SIGN`]) with a literal `@`.
pub fn unescape_at_sign(s: &str) -> String {
    s.replace(ESCAPED_AT_SIGN, "@")
}
