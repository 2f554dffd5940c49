// SPDX-FileCopyrightText: 2026 the notemap authors
// SPDX-License-Identifier: MIT

//! Internal wiki-reference links: `[[Title]]` mentions in note bodies.

use std::collections::{BTreeMap, HashMap};
use std::sync::OnceLock;

use memchr::memmem;
use regex::Regex;

use super::LinkConfig;
use crate::model::{GraphLink, LinkKind, Note};

fn wiki_ref_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\[\[([^\[\]]+)\]\]").expect("valid pattern"))
}

/// Scans every body for `[[Title]]` references and resolves them
/// case-insensitively against note titles.
///
/// Self references and unresolved titles are dropped. When two notes share
/// a title, the first note in input order wins — a documented ambiguity of
/// the source data, not something to repair here. Occurrences accumulate
/// per ordered pair; the two directions of a pair collapse into one link
/// carrying the stronger of the two strengths.
pub fn generate(notes: &[Note], config: &LinkConfig) -> Vec<GraphLink> {
    let mut by_title = HashMap::<String, usize>::with_capacity(notes.len());
    for (idx, note) in notes.iter().enumerate() {
        by_title.entry(note.title.to_lowercase()).or_insert(idx);
    }

    let mut occurrences = BTreeMap::<(usize, usize), u32>::new();
    for (source, note) in notes.iter().enumerate() {
        // Most bodies have no references at all; skip the regex for those.
        if memmem::find(note.body.as_bytes(), b"[[").is_none() {
            continue;
        }
        for capture in wiki_ref_pattern().captures_iter(&note.body) {
            let title = capture[1].trim().to_lowercase();
            let Some(&target) = by_title.get(&title) else {
                continue;
            };
            if target == source {
                continue;
            }
            *occurrences.entry((source, target)).or_insert(0) += 1;
        }
    }

    let saturation = config.internal_saturation.max(1) as f32;
    let mut strongest = BTreeMap::<(usize, usize), f32>::new();
    for (&(source, target), &count) in &occurrences {
        let strength = (count as f32 / saturation).min(1.0);
        let pair = (source.min(target), source.max(target));
        let entry = strongest.entry(pair).or_insert(0.0);
        if strength > *entry {
            *entry = strength;
        }
    }

    strongest
        .into_iter()
        .map(|((a, b), strength)| {
            GraphLink::new(
                notes[a].id.clone(),
                notes[b].id.clone(),
                LinkKind::Internal,
                strength,
            )
        })
        .collect()
}
