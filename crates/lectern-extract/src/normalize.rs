//! Page text cleanup applied before any pattern matching.

use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static BLANK_LINE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

/// Collapse whitespace runs to one space, cap newline runs at two, trim.
///
/// Newlines count as whitespace for the first rule, so normalized text is a
/// single line. The line-oriented generators still accept multi-line input
/// when called directly.
pub fn normalize(text: &str) -> String {
    let collapsed = WHITESPACE_RUN.replace_all(text, " ");
    let capped = BLANK_LINE_RUN.replace_all(&collapsed, "\n\n");
    capped.trim().to_string()
}

/// The first `n` characters of `s` (char-aware, never splits a code point).
pub(crate) fn head(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Lowercased `n`-character prefix used to compare candidates.
pub(crate) fn prefix_key(s: &str, n: usize) -> String {
    head(s, n).to_lowercase()
}
