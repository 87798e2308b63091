//! End-to-end analysis behaviour: page text in, items out.

use std::collections::HashSet;

use lectern_core::{ExtractedItem, ItemKind};
use lectern_extract::{analyze, extract_pages, MAX_ITEMS};

/// Exactly 80 characters.
const QUOTED: &str = "Courage is not the absence of fear, but the triumph over it in every grave hour.";

fn mixed_book() -> Vec<String> {
    vec![
        "Chapter One\n\nShe paused and said: \"Courage is not the absence of fear, \
         but the triumph over it.\" Then the room went quiet."
            .to_string(),
        "1. Blessed are the meek, for they shall inherit the earth.".to_string(),
        "Page 2".to_string(),
        "A small helper: ```fn add(a: i32, b: i32) -> i32 { a + b }``` in use.".to_string(),
        "All that glitters is not gold, and all who wander are not lost in the woods.".to_string(),
        "«Patience is bitter, but its fruit is sweet and worth the long wait.»".to_string(),
    ]
}

fn assert_sorted(items: &[ExtractedItem]) {
    for pair in items.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        assert!(
            a.page_number < b.page_number
                || (a.page_number == b.page_number && a.position < b.position),
            "out of order: {:?} before {:?}",
            a,
            b
        );
    }
}

fn assert_no_shared_prefix(items: &[ExtractedItem]) {
    let mut heads = HashSet::new();
    for item in items {
        let head: String = item.content.to_lowercase().chars().take(50).collect();
        assert!(heads.insert(head), "shared prefix: {}", item.content);
    }
}

#[test]
fn test_plain_statement_becomes_quote() {
    let items = analyze(&[
        "The cat sat on the mat and watched the birds fly over the old oak tree.",
    ]);
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].kind, ItemKind::Quote);
    assert_eq!(items[0].page_number, 1);
    assert_eq!(items[0].position, 0);
}

#[test]
fn test_numbered_line_becomes_verse() {
    let items = analyze(&["1. The sun rises in the east every single morning without fail."]);
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].kind, ItemKind::Verse);
    assert_eq!(
        items[0].content,
        "The sun rises in the east every single morning without fail."
    );
}

#[test]
fn test_repeated_quote_keeps_earliest_page() {
    assert_eq!(QUOTED.chars().count(), 80);
    let page = format!("\"{QUOTED}\"");
    let items = analyze(&[page.clone(), page]);
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].page_number, 1);
    assert_eq!(items[0].content, QUOTED);
}

#[test]
fn test_function_words_count_inside_longer_words() {
    let items = analyze(&[
        "She wrote \"Mother's garden grew there, wandering slowly homeward.\" today",
    ]);
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].kind, ItemKind::Quote);
    assert_eq!(
        items[0].content,
        "Mother's garden grew there, wandering slowly homeward."
    );
    assert_eq!((items[0].page_number, items[0].position), (1, 0));
}

#[test]
fn test_curly_quoted_span_is_not_extracted() {
    let items = analyze(&[
        "Note “A long quiet evening settles over the valley before the storm; truly.” and 3",
    ]);
    assert!(items.is_empty());
}

#[test]
fn test_page_furniture_yields_nothing() {
    assert!(analyze(&["Page 4", "1234"]).is_empty());
    assert!(analyze(&["Page 4\n1234"]).is_empty());
}

#[test]
fn test_fenced_code_survives_without_prose() {
    let fenced = "```x = y + z; q = r * s; t = u - vwx;```";
    assert_eq!(fenced.chars().count(), 40);
    let items = analyze(&[fenced]);
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].kind, ItemKind::Code);
    assert_eq!(items[0].content, fenced);
}

#[test]
fn test_mixed_book() {
    let items = analyze(&mixed_book());
    assert_sorted(&items);
    assert_no_shared_prefix(&items);

    let kinds: HashSet<ItemKind> = items.iter().map(|i| i.kind).collect();
    assert!(kinds.contains(&ItemKind::Quote));
    assert!(kinds.contains(&ItemKind::Verse));
    assert!(kinds.contains(&ItemKind::Code));

    // The quote on page 1 is not repeated as a whole-paragraph statement.
    let page_one: Vec<_> = items.iter().filter(|i| i.page_number == 1).collect();
    assert_eq!(page_one.len(), 1);
    assert!(page_one[0].content.starts_with("Courage"));

    // Page 3 is only a page label.
    assert!(items.iter().all(|i| i.page_number != 3));
}

#[test]
fn test_analysis_is_idempotent() {
    let book = mixed_book();
    let first = analyze(&book);
    let second = analyze(&book);
    assert_eq!(first, second);
}

#[test]
fn test_output_is_capped() {
    let pages: Vec<String> = (0..400)
        .map(|i| format!("Number {i} tells the story of the river and the old mill by the water."))
        .collect();
    let items = analyze(&pages);
    assert_eq!(items.len(), MAX_ITEMS);
    assert_sorted(&items);
    assert_no_shared_prefix(&items);
    assert_eq!(items[0].page_number, 1);
    assert_eq!(items[MAX_ITEMS - 1].page_number, MAX_ITEMS as u32);
}

#[test]
fn test_item_lengths_within_bounds() {
    let long_quote = format!("\"{}\"", "The long road goes on and on. ".repeat(20));
    let mut pages = mixed_book();
    pages.push(long_quote);
    for item in analyze(&pages) {
        let len = item.content.chars().count();
        match item.kind {
            ItemKind::Code => assert!(len > 20 && len < 1000),
            _ => assert!((25..=600).contains(&len), "{len}: {}", item.content),
        }
    }
}

#[test]
fn test_text_file_pages_feed_analysis() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("book.txt");
    let page = format!("\"{QUOTED}\"");
    std::fs::write(&path, format!("{page}\u{c}{page}\u{c}\u{c}Page 3")).unwrap();

    let pages = extract_pages(&path).unwrap();
    assert_eq!(pages.len(), 3);

    let items = analyze(&pages);
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].page_number, 1);
}

#[test]
fn test_blank_document_analyzes_to_nothing() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("blank.txt");
    std::fs::write(&path, "\n\u{c}   \u{c}").unwrap();

    let pages = extract_pages(&path).unwrap();
    assert_eq!(pages, vec![String::new()]);
    assert!(analyze(&pages).is_empty());
}
