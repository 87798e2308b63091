//! Delimited quotation scan.

use once_cell::sync::Lazy;
use regex::Regex;

use super::Accumulator;
use crate::classify::{is_meaningful, is_quotation};
use crate::normalize::normalize;
use lectern_core::ItemKind;

/// Candidates sharing this many leading characters with an accepted item are duplicates.
const DUPLICATE_PREFIX: usize = 50;

/// Applied in order: double, single, guillemets, then double quotes again
/// with a tighter bound and no line breaks. The last pass picks up quotes
/// the first pairs wrongly after a long unquoted stretch.
static QUOTE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r#""([^"]{30,500})""#,
        r"'([^']{30,500})'",
        r"«([^»]{30,500})»",
        r#""([^"\n]{30,400})""#,
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

/// Accept quoted spans that are meaningful quotations. Returns the number accepted.
pub fn scan(text: &str, page_number: u32, acc: &mut Accumulator) -> usize {
    let mut accepted = 0;
    for pattern in QUOTE_PATTERNS.iter() {
        for caps in pattern.captures_iter(text) {
            let Some(inner) = caps.get(1) else { continue };
            let content = normalize(inner.as_str());
            if is_meaningful(&content)
                && is_quotation(&content)
                && !acc.has_prefix(&content, DUPLICATE_PREFIX)
            {
                acc.push(ItemKind::Quote, content, page_number);
                accepted += 1;
            }
        }
    }
    accepted
}

#[cfg(test)]
mod tests {
    use super::*;

    const SENTENCE: &str = "The river remembers every stone that it has ever carried from the hills.";

    #[test]
    fn test_double_quoted_sentence() {
        let mut acc = Accumulator::new();
        let text = format!("She wrote: \"{SENTENCE}\" and then left.");
        assert_eq!(scan(&text, 2, &mut acc), 1);
        assert_eq!(acc.items()[0].content, SENTENCE);
        assert_eq!(acc.items()[0].kind, ItemKind::Quote);
        assert_eq!(acc.items()[0].page_number, 2);
    }

    #[test]
    fn test_guillemets() {
        let mut acc = Accumulator::new();
        let text = "«Patience is bitter, but its fruit is sweet and worth the long wait.»";
        assert_eq!(scan(text, 1, &mut acc), 1);
        assert!(acc.items()[0].content.starts_with("Patience"));
    }

    #[test]
    fn test_curly_quotes_are_not_delimiters() {
        let mut acc = Accumulator::new();
        let text = "Note “A long quiet evening settles over the valley before the storm; truly.” and 3";
        assert_eq!(scan(text, 1, &mut acc), 0);
    }

    #[test]
    fn test_bounded_pass_recovers_quote_after_long_gap() {
        let mut acc = Accumulator::new();
        // The first pass pairs the closing quote of "no" with the opening
        // quote of the sentence and captures the filler, which is rejected.
        let filler = "x".repeat(440);
        let text = format!("He said \"no\" {filler} \"{SENTENCE}\" there.");
        assert_eq!(scan(&text, 1, &mut acc), 1);
        assert_eq!(acc.items()[0].content, SENTENCE);
    }

    #[test]
    fn test_short_quotes_ignored() {
        let mut acc = Accumulator::new();
        assert_eq!(scan("He said \"no\" and \"not today\".", 1, &mut acc), 0);
        assert!(acc.is_empty());
    }

    #[test]
    fn test_duplicate_prefix_rejected() {
        let mut acc = Accumulator::new();
        let text = format!("\"{SENTENCE}\" and again \"{SENTENCE}\"");
        assert_eq!(scan(&text, 1, &mut acc), 1);
        assert_eq!(scan(&text, 2, &mut acc), 0);
        assert_eq!(acc.len(), 1);
    }
}
