//! Stateless predicates deciding what a span of text is.
//!
//! All three predicates are total over string input: empty and degenerate
//! strings are rejected, never an error.

use once_cell::sync::Lazy;
use regex::Regex;

/// Shortest span (in characters) considered meaningful.
pub const MIN_MEANINGFUL_CHARS: usize = 25;
/// Longest span (in characters) considered meaningful.
pub const MAX_MEANINGFUL_CHARS: usize = 600;

static DIGITS_ONLY: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+$").unwrap());
static PAGE_LABEL: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^Page \d+").unwrap());

static HEADER_FOOTER: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)^(Chapter|Section|Page \d+|\d+)$",
        r"(?i)^(Table of Contents|Index|Bibliography)$",
        r"^\d+$",
        r"(?i)^[A-Z\s]{1,5}$",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

static FUNCTION_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(the|and|for|was|are|with|this|that|from|have)").unwrap());

static DIALOGUE_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(said|says|told|asked|replied|exclaimed|whispered|shouted)").unwrap()
});

static NUMBERED_LEAD: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+[.)]\s+[A-Z]").unwrap());

const QUOTE_DELIMITERS: [char; 4] = ['"', '\'', '«', '»'];

pub(crate) fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

pub(crate) fn starts_uppercase(text: &str) -> bool {
    text.chars().next().is_some_and(|c| c.is_ascii_uppercase())
}

pub(crate) fn is_terminal(c: char) -> bool {
    matches!(c, '.' | '!' | '?')
}

pub(crate) fn ends_with_terminal(text: &str) -> bool {
    text.chars().last().is_some_and(is_terminal)
}

/// Number of `.`, `!` and `?` characters anywhere in the text.
pub(crate) fn terminal_marks(text: &str) -> usize {
    text.chars().filter(|&c| is_terminal(c)).count()
}

fn special_char_ratio(text: &str, len: usize) -> f64 {
    let special = text
        .chars()
        .filter(|c| !c.is_ascii_alphanumeric() && !c.is_whitespace())
        .count();
    special as f64 / len as f64
}

/// Whether a span carries prose worth keeping rather than page furniture.
pub fn is_meaningful(text: &str) -> bool {
    let trimmed = text.trim();
    let len = trimmed.chars().count();

    if !(MIN_MEANINGFUL_CHARS..=MAX_MEANINGFUL_CHARS).contains(&len) {
        return false;
    }

    if DIGITS_ONLY.is_match(trimmed) || PAGE_LABEL.is_match(trimmed) {
        return false;
    }

    if HEADER_FOOTER.iter().any(|re| re.is_match(trimmed)) {
        return false;
    }

    let long_words = trimmed
        .split_whitespace()
        .filter(|w| w.chars().count() > 2)
        .count();
    if long_words < 4 {
        return false;
    }

    if special_char_ratio(trimmed, len) > 0.4 {
        return false;
    }

    FUNCTION_WORD.is_match(trimmed) || long_words >= 8
}

/// Whether a span reads like a quotation.
///
/// Either it carries a quote delimiter and ends a sentence, or it is a
/// capitalised, undialogued statement of at least ten words.
pub fn is_quotation(text: &str) -> bool {
    let trimmed = text.trim();

    let has_quotes = trimmed.contains(QUOTE_DELIMITERS);
    if has_quotes && ends_with_terminal(trimmed) {
        return true;
    }

    let has_fragment = trimmed
        .split(is_terminal)
        .any(|s| s.trim().chars().count() > 10);

    starts_uppercase(trimmed)
        && has_fragment
        && !DIALOGUE_TAG.is_match(trimmed)
        && word_count(trimmed) >= 10
}

/// Whether a span reads like a verse: numbered, stanza-shaped, or a short aphorism.
pub fn is_verse(text: &str) -> bool {
    let trimmed = text.trim();

    if NUMBERED_LEAD.is_match(trimmed) {
        return true;
    }

    if is_stanza_shaped(trimmed) {
        return true;
    }

    let len = trimmed.chars().count();
    let words = word_count(trimmed);
    (30..=200).contains(&len)
        && starts_uppercase(trimmed)
        && (5..=40).contains(&words)
        && terminal_marks(trimmed) <= 2
}

fn is_stanza_shaped(text: &str) -> bool {
    let lines: Vec<&str> = text
        .split('\n')
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    if !(2..=8).contains(&lines.len()) {
        return false;
    }

    let total: usize = lines.iter().map(|l| l.chars().count()).sum();
    let mean = total as f64 / lines.len() as f64;
    if mean <= 20.0 || mean >= 100.0 {
        return false;
    }

    let capitalized = lines.iter().filter(|l| starts_uppercase(l)).count();
    capitalized as f64 >= lines.len() as f64 * 0.7
}
