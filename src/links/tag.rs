// SPDX-FileCopyrightText: 2026 the notemap authors
// SPDX-License-Identifier: MIT

//! Tag links: Jaccard similarity over shared tag sets.

use std::collections::BTreeSet;

use crate::model::{GraphLink, LinkKind, Note};

/// Links every pair of notes sharing at least one tag, weighted by the
/// Jaccard index of their tag sets. Tags compare case-insensitively.
pub fn generate(notes: &[Note]) -> Vec<GraphLink> {
    let tag_sets: Vec<BTreeSet<String>> = notes
        .iter()
        .map(|note| note.tags.iter().map(|t| t.to_lowercase()).collect())
        .collect();

    let mut links = Vec::new();
    for i in 0..notes.len() {
        if tag_sets[i].is_empty() {
            continue;
        }
        for j in (i + 1)..notes.len() {
            let shared = tag_sets[i].intersection(&tag_sets[j]).count();
            if shared == 0 {
                continue;
            }
            let union = tag_sets[i].union(&tag_sets[j]).count();
            links.push(GraphLink::new(
                notes[i].id.clone(),
                notes[j].id.clone(),
                LinkKind::Tag,
                shared as f32 / union as f32,
            ));
        }
    }
    links
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NoteId;

    fn note(id: &str, tags: &[&str]) -> Note {
        Note::new(
            NoteId::new(id).expect("id"),
            id,
            "",
            tags.iter().copied(),
            0,
            0,
        )
    }

    #[test]
    fn jaccard_of_ab_and_bc_is_exactly_one_third() {
        let notes = vec![note("x", &["a", "b"]), note("y", &["b", "c"])];
        let links = generate(&notes);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].strength, 1.0 / 3.0);
    }

    #[test]
    fn disjoint_tag_sets_emit_nothing() {
        let notes = vec![note("x", &["a"]), note("y", &["b"]), note("z", &[])];
        assert!(generate(&notes).is_empty());
    }

    #[test]
    fn identical_tag_sets_reach_full_strength() {
        let notes = vec![note("x", &["a", "b"]), note("y", &["B", "A"])];
        let links = generate(&notes);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].strength, 1.0);
    }
}
