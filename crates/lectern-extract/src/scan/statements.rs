//! Standalone statement scan over paragraphs.

use once_cell::sync::Lazy;
use regex::Regex;

use super::Accumulator;
use crate::classify::{
    ends_with_terminal, is_meaningful, is_quotation, starts_uppercase, terminal_marks, word_count,
};
use crate::normalize::normalize;
use lectern_core::ItemKind;

static PARAGRAPH_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\n+").unwrap());

/// Accept short quotable paragraphs not already covered by an earlier item.
/// Quotation-shaped paragraphs become quotes, the rest verses.
/// Returns the number accepted.
pub fn scan(text: &str, page_number: u32, acc: &mut Accumulator) -> usize {
    let mut accepted = 0;
    for raw in PARAGRAPH_BREAK.split(text) {
        let para = normalize(raw);
        if !is_meaningful(&para) {
            continue;
        }

        let marks = terminal_marks(&para);
        let words = word_count(&para);
        if !(1..=3).contains(&marks)
            || !(10..=50).contains(&words)
            || !starts_uppercase(&para)
            || !ends_with_terminal(&para)
        {
            continue;
        }

        if acc.overlaps_opening(&para) {
            continue;
        }

        let kind = if is_quotation(&para) {
            ItemKind::Quote
        } else {
            ItemKind::Verse
        };
        acc.push(kind, para, page_number);
        accepted += 1;
    }
    accepted
}
