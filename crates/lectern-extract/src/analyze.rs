//! Analysis entry point: pages in, ranked and deduplicated items out.

use std::collections::HashSet;

use tracing::{debug, info};

use crate::classify::is_meaningful;
use crate::normalize::{head, normalize};
use crate::scan::{self, Accumulator};
use lectern_core::{ExtractedItem, ItemKind};

/// Upper bound on items returned for one document.
pub const MAX_ITEMS: usize = 300;

/// Characters of lowercased content kept as an item's fingerprint.
const FINGERPRINT_CHARS: usize = 60;
/// Fingerprints agreeing on this many leading characters are near-duplicates.
const NEAR_DUPLICATE_CHARS: usize = 50;

/// Extract quotes, verses and code from ordered page texts.
///
/// Pages are processed strictly in order; page `i` of the input becomes
/// `page_number == i + 1`. Output is sorted by `(page_number, position)`
/// and holds at most [`MAX_ITEMS`] entries. Identical input always yields
/// identical output.
pub fn analyze<S: AsRef<str>>(pages: &[S]) -> Vec<ExtractedItem> {
    let mut acc = Accumulator::new();
    for (index, page) in pages.iter().enumerate() {
        let page_number = index as u32 + 1;
        let text = normalize(page.as_ref());
        scan::scan_page(&text, page_number, &mut acc);
    }

    let candidates = acc.into_items();
    let candidate_count = candidates.len();

    let mut items = deduplicate(candidates);
    items.sort_by_key(|item| (item.page_number, item.position));
    items.truncate(MAX_ITEMS);

    info!(
        "Analyzed {} pages: {} candidates, {} items kept",
        pages.len(),
        candidate_count,
        items.len()
    );
    items
}

/// Global pass over all candidates in discovery order.
///
/// Drops repeated fingerprints, spans that fail the prose filter (code is
/// exempt), and near-duplicates of an already kept fingerprint.
fn deduplicate(candidates: Vec<ExtractedItem>) -> Vec<ExtractedItem> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut seen_heads: HashSet<String> = HashSet::new();
    let mut kept = Vec::with_capacity(candidates.len());

    for item in candidates {
        let lowered = item.content.to_lowercase();
        let fingerprint = head(&lowered, FINGERPRINT_CHARS);

        if seen.contains(fingerprint) {
            continue;
        }

        if item.kind != ItemKind::Code && !is_meaningful(&item.content) {
            continue;
        }

        let fingerprint_head = head(fingerprint, NEAR_DUPLICATE_CHARS);
        if seen_heads.contains(fingerprint_head) {
            debug!(
                "Dropping near-duplicate on page {}: {}",
                item.page_number, fingerprint_head
            );
            continue;
        }

        seen_heads.insert(fingerprint_head.to_string());
        seen.insert(fingerprint.to_string());
        kept.push(item);
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(kind: ItemKind, content: &str, page_number: u32, position: u32) -> ExtractedItem {
        ExtractedItem {
            kind,
            content: content.to_string(),
            page_number,
            position,
        }
    }

    #[test]
    fn test_deduplicate_keeps_first_of_near_duplicates() {
        // Identical for the first 51 characters, different fingerprints.
        let shared = "It was the best of times, it was the worst of times";
        let candidates = vec![
            item(ItemKind::Quote, &format!("{shared}, it was the age of wisdom."), 1, 0),
            item(ItemKind::Verse, &format!("{shared}; it was the age of foolishness."), 2, 1),
        ];
        let kept = deduplicate(candidates);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].page_number, 1);
    }

    #[test]
    fn test_deduplicate_is_case_insensitive() {
        let candidates = vec![
            item(ItemKind::Quote, "All happy families are alike in their quiet ways.", 1, 0),
            item(ItemKind::Quote, "ALL HAPPY FAMILIES ARE ALIKE IN THEIR QUIET WAYS.", 1, 1),
        ];
        assert_eq!(deduplicate(candidates).len(), 1);
    }

    #[test]
    fn test_deduplicate_drops_non_meaningful_prose_but_keeps_code() {
        let candidates = vec![
            item(ItemKind::Verse, "Page 7", 1, 0),
            item(ItemKind::Code, "```x += 1; y -= 2; z *= 3;```", 1, 1),
        ];
        let kept = deduplicate(candidates);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].kind, ItemKind::Code);
    }

    #[test]
    fn test_analyze_sorts_by_page_then_position() {
        let pages = [
            "The cat sat on the mat and watched the birds fly over the old oak tree.",
            "1. The sun rises in the east every single morning without fail.",
        ];
        let items = analyze(&pages);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].page_number, 1);
        assert_eq!(items[1].page_number, 2);
        assert!(items[0].position < items[1].position);
    }

    #[test]
    fn test_analyze_empty_input() {
        let pages: [&str; 0] = [];
        assert!(analyze(&pages).is_empty());
        assert!(analyze(&[""]).is_empty());
    }
}
