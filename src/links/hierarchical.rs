// SPDX-FileCopyrightText: 2026 the notemap authors
// SPDX-License-Identifier: MIT

//! Hierarchical links: `{prefix}-{number}` id sequences.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;

use crate::model::{GraphLink, LinkKind, Note};

fn sequence_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(.+)-(\d+)$").expect("valid pattern"))
}

fn split_sequenced_id(id: &str) -> Option<(&str, u64)> {
    let captures = sequence_pattern().captures(id)?;
    let prefix = captures.get(1).expect("group 1").as_str();
    // Absurdly long digit runs fall outside the scheme; treat as unsequenced.
    let number = captures.get(2).expect("group 2").as_str().parse().ok()?;
    Some((prefix, number))
}

/// Links every sequenced note to the immediately preceding number within
/// its prefix at strength 1.0. Notes without a `{prefix}-{number}` id, or
/// whose predecessor is absent, contribute nothing. Numbers compare by
/// value, so `proj-2` and `proj-002` are the same slot; the first note in
/// input order claims a slot.
pub fn generate(notes: &[Note]) -> Vec<GraphLink> {
    let mut by_slot = HashMap::<(&str, u64), usize>::new();
    for (idx, note) in notes.iter().enumerate() {
        if let Some((prefix, number)) = split_sequenced_id(note.id.as_str()) {
            by_slot.entry((prefix, number)).or_insert(idx);
        }
    }

    let mut links = Vec::new();
    for note in notes {
        let Some((prefix, number)) = split_sequenced_id(note.id.as_str()) else {
            continue;
        };
        if number == 0 {
            continue;
        }
        if let Some(&predecessor) = by_slot.get(&(prefix, number - 1)) {
            links.push(GraphLink::new(
                note.id.clone(),
                notes[predecessor].id.clone(),
                LinkKind::Hierarchical,
                1.0,
            ));
        }
    }
    links
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NoteId;

    fn note(id: &str) -> Note {
        Note::new(
            NoteId::new(id).expect("id"),
            id,
            "",
            Vec::<String>::new(),
            0,
            0,
        )
    }

    #[test]
    fn links_to_immediate_predecessor_at_full_strength() {
        let notes = vec![note("proj-001"), note("proj-002")];
        let links = generate(&notes);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].source.as_str(), "proj-002");
        assert_eq!(links[0].target.as_str(), "proj-001");
        assert_eq!(links[0].strength, 1.0);
    }

    #[test]
    fn missing_predecessor_yields_no_link() {
        let notes = vec![note("proj-001"), note("proj-005")];
        let links = generate(&notes);
        // proj-005 has no proj-004; only proj-001 → proj-000 could exist
        // and it does not either.
        assert!(links.is_empty());
    }

    #[test]
    fn prefixes_do_not_cross_link() {
        let notes = vec![note("proj-001"), note("zk-002")];
        assert!(generate(&notes).is_empty());
    }

    #[test]
    fn unsequenced_ids_are_ignored() {
        let notes = vec![note("inbox"), note("proj-001")];
        assert!(generate(&notes).is_empty());
    }

    #[test]
    fn zero_padding_is_insignificant() {
        let notes = vec![note("proj-1"), note("proj-002")];
        let links = generate(&notes);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].target.as_str(), "proj-1");
    }
}
