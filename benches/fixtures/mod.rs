// SPDX-FileCopyrightText: 2026 the notemap authors
// SPDX-License-Identifier: MIT

#![allow(dead_code)]

// Shared deterministic benchmark fixtures (no RNG).

use notemap::model::{Note, NoteId};

const TAG_POOL: [&str; 6] = ["project", "physics", "writing", "method", "reference", "log"];

const WORD_POOL: [&str; 12] = [
    "graph", "layout", "spring", "charge", "viewport", "filter", "zettel", "evergreen",
    "integration", "culling", "picker", "energy",
];

/// Builds `count` notes with deterministic wiki references, tags and bodies.
///
/// Every fourth note references its predecessor (`[[Note N-1]]`) so internal
/// linking has real work; bodies share tokens from a small pool so similarity
/// scoring finds overlap.
pub fn synthetic_notes(count: usize) -> Vec<Note> {
    let base = 1_700_000_000i64;
    (0..count)
        .map(|i| {
            let id = NoteId::new(format!("note-{i:04}")).expect("note id");
            let title = format!("Note {i}");

            let mut body = String::new();
            for w in 0..8 {
                body.push_str(WORD_POOL[(i * 3 + w) % WORD_POOL.len()]);
                body.push(' ');
            }
            if i % 4 == 0 && i > 0 {
                body.push_str(&format!("see [[Note {}]] for context", i - 1));
            }

            let tags: Vec<&str> = (0..(i % 3 + 1))
                .map(|t| TAG_POOL[(i + t) % TAG_POOL.len()])
                .collect();

            Note::new(
                id,
                title,
                body,
                tags,
                base - (i as i64) * 86_400,
                base - (i as i64) * 3_600,
            )
        })
        .collect()
}
