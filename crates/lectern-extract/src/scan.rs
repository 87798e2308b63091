//! Candidate generators.
//!
//! Five independent scans run over each normalized page in a fixed order.
//! Each scan checks its candidates against everything already accepted by
//! earlier scans and earlier pages, so the order here decides which
//! duplicate wins and which position each item receives.

pub mod code;
pub mod numbered;
pub mod quotes;
pub mod stanzas;
pub mod statements;

use tracing::debug;

use crate::normalize::{head, prefix_key};
use lectern_core::{ExtractedItem, ItemKind};

/// Items accepted so far in one analysis run, plus the run-local position counter.
#[derive(Debug, Default)]
pub struct Accumulator {
    items: Vec<ExtractedItem>,
    next_position: u32,
}

impl Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept a candidate, stamping it with the next position.
    pub fn push(&mut self, kind: ItemKind, content: String, page_number: u32) {
        self.items.push(ExtractedItem {
            kind,
            content,
            page_number,
            position: self.next_position,
        });
        self.next_position += 1;
    }

    pub fn items(&self) -> &[ExtractedItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn into_items(self) -> Vec<ExtractedItem> {
        self.items
    }

    /// Whether an accepted item shares the lowercased `n`-character prefix of `content`.
    pub fn has_prefix(&self, content: &str, n: usize) -> bool {
        let key = prefix_key(content, n);
        self.items
            .iter()
            .any(|item| prefix_key(&item.content, n) == key)
    }

    /// Whether `text` overlaps an accepted item by its opening 30 characters,
    /// in either direction.
    pub fn overlaps_opening(&self, text: &str) -> bool {
        let opening = head(text, 30);
        self.items.iter().any(|item| {
            item.content.contains(opening) || text.contains(head(&item.content, 30))
        })
    }
}

/// Run all five generators over one normalized page.
pub fn scan_page(text: &str, page_number: u32, acc: &mut Accumulator) {
    let quotes = quotes::scan(text, page_number, acc);
    let numbered = numbered::scan(text, page_number, acc);
    let stanzas = stanzas::scan(text, page_number, acc);
    let statements = statements::scan(text, page_number, acc);
    let code = code::scan(text, page_number, acc);

    debug!(
        "Page {}: {} quotes, {} numbered verses, {} stanzas, {} statements, {} code blocks",
        page_number, quotes, numbered, stanzas, statements, code
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positions_increase_across_pushes() {
        let mut acc = Accumulator::new();
        acc.push(ItemKind::Quote, "first".to_string(), 1);
        acc.push(ItemKind::Verse, "second".to_string(), 2);
        let positions: Vec<u32> = acc.items().iter().map(|i| i.position).collect();
        assert_eq!(positions, vec![0, 1]);
    }

    #[test]
    fn test_prefix_match_is_case_insensitive() {
        let mut acc = Accumulator::new();
        acc.push(
            ItemKind::Quote,
            "The River Remembers every stone".to_string(),
            1,
        );
        assert!(acc.has_prefix("the river remembers EVERY STONE it carried", 31));
        assert!(!acc.has_prefix("A river remembers", 31));
    }

    #[test]
    fn test_overlaps_opening_both_directions() {
        let mut acc = Accumulator::new();
        acc.push(
            ItemKind::Quote,
            "Freedom is the oxygen of the soul, and nothing less.".to_string(),
            1,
        );
        // The paragraph contains the item's opening.
        assert!(acc.overlaps_opening(
            "As he wrote, Freedom is the oxygen of the soul, and nothing less."
        ));
        // The item contains the paragraph's opening.
        assert!(acc.overlaps_opening("Freedom is the oxygen of the soul"));
        assert!(!acc.overlaps_opening("Something else entirely different here."));
    }
}
