// SPDX-FileCopyrightText: 2026 the notemap authors
// SPDX-License-Identifier: MIT

//! Similarity links: lexical token overlap between note bodies.
//!
//! The score is the Jaccard index over stop-word-filtered lowercase token
//! sets. This is deliberately a cheap lexical heuristic; semantic or
//! embedding-based similarity is out of scope.

use std::collections::HashSet;

use rayon::prelude::*;

use super::LinkConfig;
use crate::model::{GraphLink, LinkKind, Note};

/// Common English words that carry no signal for note similarity.
const STOP_WORDS: &[&str] = &[
    "the", "and", "for", "are", "but", "not", "you", "all", "can", "had", "her", "was", "one",
    "our", "out", "day", "get", "has", "him", "his", "how", "man", "new", "now", "old", "see",
    "two", "way", "who", "with", "that", "this", "from", "they", "have", "been", "will", "into",
    "more", "some", "than", "then", "them", "these", "those", "there", "their", "about", "which",
    "would", "could", "should", "when", "what", "where", "while", "also", "just", "like", "over",
    "such", "only", "most", "very", "each", "other", "after", "before", "because",
];

/// Scores every pair of notes by token-set Jaccard and emits links at or
/// above the configured threshold.
///
/// The pair scan is O(n²) in note count, so it is skipped entirely above
/// `config.similarity_note_ceiling` — with that many notes the similarity
/// view would be unreadable anyway, and the scan would blow the frame
/// budget of the recompute. The scan itself fans out across a rayon pool
/// but the call remains synchronous.
pub fn generate(notes: &[Note], config: &LinkConfig) -> Vec<GraphLink> {
    if notes.len() < 2 || notes.len() > config.similarity_note_ceiling {
        return Vec::new();
    }

    let token_sets: Vec<HashSet<String>> = notes
        .iter()
        .map(|note| tokenize(&note.body, config.similarity_min_token_len))
        .collect();

    let mut scored: Vec<(usize, usize, f32)> = (0..notes.len())
        .into_par_iter()
        .flat_map_iter(|i| {
            let token_sets = &token_sets;
            ((i + 1)..notes.len()).filter_map(move |j| {
                let score = jaccard(&token_sets[i], &token_sets[j]);
                (score >= config.similarity_threshold).then_some((i, j, score))
            })
        })
        .collect();

    // Parallel collection order is nondeterministic; restore input order.
    scored.sort_unstable_by(|a, b| (a.0, a.1).cmp(&(b.0, b.1)));

    scored
        .into_iter()
        .map(|(i, j, score)| {
            GraphLink::new(
                notes[i].id.clone(),
                notes[j].id.clone(),
                LinkKind::Similarity,
                score,
            )
        })
        .collect()
}

fn tokenize(body: &str, min_len: usize) -> HashSet<String> {
    body.split(|c: char| !c.is_alphanumeric())
        .filter(|token| token.len() >= min_len)
        .map(str::to_lowercase)
        .filter(|token| !STOP_WORDS.contains(&token.as_str()))
        .collect()
}

fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f32 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let shared = a.intersection(b).count();
    if shared == 0 {
        return 0.0;
    }
    let union = a.len() + b.len() - shared;
    shared as f32 / union as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NoteId;

    fn note(id: &str, body: &str) -> Note {
        Note::new(
            NoteId::new(id).expect("id"),
            id,
            body,
            Vec::<String>::new(),
            0,
            0,
        )
    }

    #[test]
    fn overlapping_bodies_link_and_disjoint_bodies_do_not() {
        let notes = vec![
            note("a", "force layout physics simulation energy"),
            note("b", "force layout physics integration energy"),
            note("c", "gardening tomatoes compost watering"),
        ];
        let links = generate(&notes, &LinkConfig::default());
        assert_eq!(links.len(), 1);
        assert!(links[0].touches(&NoteId::new("a").expect("id")));
        assert!(links[0].touches(&NoteId::new("b").expect("id")));
    }

    #[test]
    fn stop_words_and_short_tokens_carry_no_signal() {
        let notes = vec![
            note("a", "the and for with that this it is a of"),
            note("b", "the and for with that this it is a of"),
        ];
        assert!(generate(&notes, &LinkConfig::default()).is_empty());
    }

    #[test]
    fn scan_is_skipped_above_the_note_ceiling() {
        let config = LinkConfig {
            similarity_note_ceiling: 3,
            ..LinkConfig::default()
        };
        let body = "identical body tokens everywhere simulation";
        let notes: Vec<Note> = (0..4).map(|i| note(&format!("n{i}"), body)).collect();
        assert!(generate(&notes, &config).is_empty());

        // Just at the ceiling the scan still runs.
        assert!(!generate(&notes[..3], &config).is_empty());
    }

    #[test]
    fn output_order_is_stable_despite_the_parallel_scan() {
        let body = "shared tokens simulation layout energy";
        let notes: Vec<Note> = (0..10).map(|i| note(&format!("n{i}"), body)).collect();
        let config = LinkConfig::default();
        let first = generate(&notes, &config);
        let second = generate(&notes, &config);
        assert_eq!(first, second);
        assert_eq!(first.len(), 45);
    }
}
