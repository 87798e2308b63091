//! Numbered verse scan: lines such as `12. Text` or `3) Text`.

use once_cell::sync::Lazy;
use regex::Regex;

use super::Accumulator;
use crate::classify::is_meaningful;
use crate::normalize::normalize;
use lectern_core::ItemKind;

const DUPLICATE_PREFIX: usize = 40;

static NUMBERED_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s*(\d+)[.)]\s+([^\n]{25,300})").unwrap());

/// Accept the text after the numbering as a verse. Returns the number accepted.
pub fn scan(text: &str, page_number: u32, acc: &mut Accumulator) -> usize {
    let mut accepted = 0;
    for caps in NUMBERED_LINE.captures_iter(text) {
        let Some(body) = caps.get(2) else { continue };
        let content = normalize(body.as_str());
        if is_meaningful(&content) && !acc.has_prefix(&content, DUPLICATE_PREFIX) {
            acc.push(ItemKind::Verse, content, page_number);
            accepted += 1;
        }
    }
    accepted
}
