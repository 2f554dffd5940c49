// SPDX-FileCopyrightText: 2026 the notemap authors
// SPDX-License-Identifier: MIT

use super::ids::NoteId;
use super::note::Note;

fn nid(value: &str) -> NoteId {
    NoteId::new(value).expect("note id")
}

const DAY: i64 = 86_400;

/// Built-in demo notes for `--demo` runs and tests: a small knowledge base
/// with wiki references, shared tags, and a sequenced project prefix so
/// every link strategy has something to show.
pub fn demo_notes() -> Vec<Note> {
    let now = 1_760_000_000;
    vec![
        Note::new(
            nid("proj-001"),
            "Graph Engine",
            "Kickoff for the graph engine. The layout lives in [[Force Layout]] \
             and the picker in [[Hit Testing]]. See [[Force Layout]] again for tuning.",
            ["project", "engine"],
            now - 40 * DAY,
            now - 2 * DAY,
        ),
        Note::new(
            nid("proj-002"),
            "Force Layout",
            "Spring, charge, centering and collision forces with a decaying \
             energy budget. Pinned nodes sit out of integration.",
            ["project", "physics"],
            now - 35 * DAY,
            now - 3 * DAY,
        ),
        Note::new(
            nid("proj-003"),
            "Hit Testing",
            "Pointer to graph-space mapping, then first node within its radius \
             wins. Ties go to list order.",
            ["project", "input"],
            now - 30 * DAY,
            now - DAY,
        ),
        Note::new(
            nid("zk-001"),
            "Zettelkasten",
            "Atomic notes, dense links. [[Graph Engine]] is the map of this. \
             Related reading in [[Evergreen Notes]].",
            ["method", "writing"],
            now - 200 * DAY,
            now - 20 * DAY,
        ),
        Note::new(
            nid("zk-002"),
            "Evergreen Notes",
            "Notes should be atomic, concept-oriented and densely linked. \
             Contrast with [[Daily Log]].",
            ["method", "writing"],
            now - 180 * DAY,
            now - 10 * DAY,
        ),
        Note::new(
            nid("log-001"),
            "Daily Log",
            "Short scratch entries. Mostly untagged thoughts that graduate \
             into proper notes later.",
            ["log"],
            now - DAY / 2,
            now - DAY / 4,
        ),
        Note::new(
            nid("ref-001"),
            "Verlet Integration",
            "Position based integration keeps the spring forces stable at \
             large steps. The layout energy decay borrows the idea.",
            ["physics", "reference"],
            now - 90 * DAY,
            now - 60 * DAY,
        ),
        Note::new(
            nid("ref-002"),
            "Quadtree Culling",
            "Charge repulsion can be approximated beyond a cutoff distance; \
             the engine simply zeroes the force past the cutoff instead.",
            ["physics", "reference"],
            now - 80 * DAY,
            now - 50 * DAY,
        ),
    ]
}

#[cfg(test)]
pub(crate) fn notes_abc_internal() -> Vec<Note> {
    vec![
        Note::new(nid("a"), "A", "points at [[B]]", Vec::<String>::new(), 0, 0),
        Note::new(
            nid("b"),
            "B",
            "points back at [[A]] and on to [[C]]",
            Vec::<String>::new(),
            0,
            0,
        ),
        Note::new(nid("c"), "C", "a leaf", Vec::<String>::new(), 0, 0),
    ]
}
