//! Input sanitization and email-format validation for the contact form.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

/// Accepted address shape: `local@domain.tld`, ASCII local part, dotted
/// domain, TLD of at least two letters. Anchored at both ends; nothing
/// beyond a format check (no MX lookup, no length cap).
static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$")
        .expect("email pattern is a valid regex")
});

/// Trim a raw JSON field down to a plain string.
///
/// Strings come back trimmed of surrounding whitespace; anything else
/// (absent key, `null`, numbers, nested values) becomes the empty string.
#[must_use]
pub fn sanitize(value: Option<&Value>) -> String {
    value
        .and_then(Value::as_str)
        .map_or_else(String::new, |s| s.trim().to_owned())
}

/// Whether the whole string matches the accepted address shape.
#[must_use]
pub fn is_valid_email(text: &str) -> bool {
    EMAIL_PATTERN.is_match(text)
}
