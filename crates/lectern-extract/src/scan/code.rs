//! Code block scan: fenced or `<code>`-tagged spans.

use once_cell::sync::Lazy;
use regex::Regex;

use super::Accumulator;
use crate::normalize::normalize;
use lectern_core::ItemKind;

static CODE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [r"```[\s\S]{20,500}?```", r"(?i)<code>[\s\S]{20,500}?</code>"]
        .iter()
        .map(|p| Regex::new(p).unwrap())
        .collect()
});

/// Accept every delimited span of plausible size as code, delimiters included.
/// No prose filter and no duplicate check. Returns the number accepted.
pub fn scan(text: &str, page_number: u32, acc: &mut Accumulator) -> usize {
    let mut accepted = 0;
    for pattern in CODE_PATTERNS.iter() {
        for m in pattern.find_iter(text) {
            let content = normalize(m.as_str());
            let len = content.chars().count();
            if len > 20 && len < 1000 {
                acc.push(ItemKind::Code, content, page_number);
                accepted += 1;
            }
        }
    }
    accepted
}
