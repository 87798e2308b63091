//! Poetic stanza scan over consecutive short, capitalised lines.

use super::Accumulator;
use crate::classify::{is_meaningful, is_verse, starts_uppercase};
use lectern_core::ItemKind;

const DUPLICATE_PREFIX: usize = 40;
const MAX_STANZA_LINES: usize = 6;

fn is_stanza_line(line: &str) -> bool {
    (20..=150).contains(&line.chars().count()) && starts_uppercase(line)
}

/// Group runs of 2–6 stanza lines and accept those that read as verse.
/// Returns the number accepted.
pub fn scan(text: &str, page_number: u32, acc: &mut Accumulator) -> usize {
    let lines: Vec<&str> = text
        .split('\n')
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    let mut accepted = 0;
    let mut i = 0;
    while i + 1 < lines.len() {
        let run = lines[i..]
            .iter()
            .take(MAX_STANZA_LINES)
            .take_while(|l| is_stanza_line(l))
            .count();

        if run >= 2 {
            let content = lines[i..i + run].join(" ");
            if is_verse(&content) && is_meaningful(&content) {
                // A verse run is consumed even when it repeats an earlier item.
                if !acc.has_prefix(&content, DUPLICATE_PREFIX) {
                    acc.push(ItemKind::Verse, content, page_number);
                    accepted += 1;
                }
                i += run;
                continue;
            }
        }
        i += 1;
    }
    accepted
}
