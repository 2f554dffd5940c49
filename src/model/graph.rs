// SPDX-FileCopyrightText: 2026 the notemap authors
// SPDX-License-Identifier: MIT

use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

use memchr::memmem;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use smol_str::SmolStr;

use super::ids::NoteId;
use super::note::Note;

/// Node size bounds, graph-space units. Derived size drives the collision
/// radius, charge magnitude, and the render glyph bucket.
pub const NODE_SIZE_MIN: f32 = 20.0;
pub const NODE_SIZE_MAX: f32 = 60.0;

/// Number of entries in the node color palette. The render layer owns the
/// actual colors; the model only hands out stable indices.
pub const PALETTE_SIZE: u8 = 8;

/// The link-generation strategy that produced a link. Doubles as the render
/// mode: exactly one strategy is active per recompute.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum LinkKind {
    #[default]
    Internal,
    Tag,
    Similarity,
    Hierarchical,
}

impl LinkKind {
    pub const ALL: [LinkKind; 4] = [
        LinkKind::Internal,
        LinkKind::Tag,
        LinkKind::Similarity,
        LinkKind::Hierarchical,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Internal => "internal",
            Self::Tag => "tag",
            Self::Similarity => "similarity",
            Self::Hierarchical => "hierarchical",
        }
    }
}

impl fmt::Display for LinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LinkKind {
    type Err = ParseLinkKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "internal" => Ok(Self::Internal),
            "tag" => Ok(Self::Tag),
            "similarity" => Ok(Self::Similarity),
            "hierarchical" => Ok(Self::Hierarchical),
            _ => Err(ParseLinkKindError {
                found: s.to_owned(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseLinkKindError {
    found: String,
}

impl fmt::Display for ParseLinkKindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown link kind {:?} (expected internal, tag, similarity or hierarchical)",
            self.found
        )
    }
}

impl std::error::Error for ParseLinkKindError {}

/// A typed, weighted relationship between two notes.
///
/// `strength` is always clamped to `[0, 1]`; at most one link exists per
/// (unordered endpoint pair, kind).
#[derive(Debug, Clone, PartialEq)]
pub struct GraphLink {
    pub source: NoteId,
    pub target: NoteId,
    pub kind: LinkKind,
    pub strength: f32,
}

impl GraphLink {
    pub fn new(source: NoteId, target: NoteId, kind: LinkKind, strength: f32) -> Self {
        Self {
            source,
            target,
            kind,
            strength: strength.clamp(0.0, 1.0),
        }
    }

    /// Endpoint pair in a canonical order, for unordered-pair dedup.
    pub fn unordered_pair(&self) -> (&NoteId, &NoteId) {
        if self.source <= self.target {
            (&self.source, &self.target)
        } else {
            (&self.target, &self.source)
        }
    }

    pub fn touches(&self, id: &NoteId) -> bool {
        &self.source == id || &self.target == id
    }
}

/// One note as a visual graph node.
///
/// Positions live in the layout simulator and are copied in before render.
/// Selection and hover are *not* node fields; they are an overlay
/// (`Option<NoteId>` pair) applied at render time so cached nodes never
/// invalidate on hover changes. The trailing fields carry the note-derived
/// metadata the filter pipeline matches against.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphNode {
    pub id: NoteId,
    pub title: String,
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub color: u8,
    pub tags: SmallVec<[SmolStr; 4]>,
    pub created_at: i64,
    pub body_len: usize,
    pub has_wiki_refs: bool,
}

impl GraphNode {
    pub fn from_note(note: &Note) -> Self {
        let tags: SmallVec<[SmolStr; 4]> =
            note.tags.iter().map(|t| SmolStr::new(t)).collect();
        Self {
            id: note.id.clone(),
            title: note.title.clone(),
            x: 0.0,
            y: 0.0,
            size: derive_node_size(note.body.len(), tags.len()),
            color: derive_node_color(tags.first().map(SmolStr::as_str)),
            tags,
            created_at: note.created_at,
            body_len: note.body.len(),
            has_wiki_refs: memmem::find(note.body.as_bytes(), b"[[").is_some(),
        }
    }

    pub fn radius(&self) -> f32 {
        self.size / 2.0
    }
}

/// A render-ready node/link set. Rebuilt from scratch on every data or
/// filter change; never mutated incrementally.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NoteGraph {
    pub nodes: Vec<GraphNode>,
    pub links: Vec<GraphLink>,
}

impl NoteGraph {
    pub fn new(nodes: Vec<GraphNode>, links: Vec<GraphLink>) -> Self {
        Self { nodes, links }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: &NoteId) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| &n.id == id)
    }

    /// True when every link endpoint exists in the node set.
    pub fn links_are_consistent(&self) -> bool {
        self.links.iter().all(|link| {
            self.node(&link.source).is_some() && self.node(&link.target).is_some()
        })
    }
}

/// Node size from body length and tag count, clamped to
/// [`NODE_SIZE_MIN`, `NODE_SIZE_MAX`]. One size unit per 100 body bytes
/// plus two per tag on top of the minimum.
pub fn derive_node_size(body_len: usize, tag_count: usize) -> f32 {
    let raw = NODE_SIZE_MIN + body_len as f32 / 100.0 + tag_count as f32 * 2.0;
    raw.clamp(NODE_SIZE_MIN, NODE_SIZE_MAX)
}

/// Palette index from the primary (first) tag. Untagged notes share
/// index 0.
pub fn derive_node_color(primary_tag: Option<&str>) -> u8 {
    match primary_tag {
        Some(tag) => {
            let mut hasher = DefaultHasher::new();
            tag.hash(&mut hasher);
            (hasher.finish() % u64::from(PALETTE_SIZE)) as u8
        }
        None => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NoteId;

    fn note(id: &str, title: &str, body: &str, tags: &[&str]) -> Note {
        Note::new(
            NoteId::new(id).expect("id"),
            title,
            body,
            tags.iter().copied(),
            0,
            0,
        )
    }

    #[test]
    fn node_size_is_clamped_to_bounds() {
        assert_eq!(derive_node_size(0, 0), NODE_SIZE_MIN);
        assert_eq!(derive_node_size(1_000_000, 50), NODE_SIZE_MAX);
        let mid = derive_node_size(1000, 2);
        assert!(mid > NODE_SIZE_MIN && mid < NODE_SIZE_MAX);
    }

    #[test]
    fn node_color_is_stable_and_in_palette() {
        let a = derive_node_color(Some("rust"));
        let b = derive_node_color(Some("rust"));
        assert_eq!(a, b);
        assert!(a < PALETTE_SIZE);
        assert_eq!(derive_node_color(None), 0);
    }

    #[test]
    fn link_strength_is_clamped_on_construction() {
        let a = NoteId::new("a").expect("id");
        let b = NoteId::new("b").expect("id");
        let link = GraphLink::new(a.clone(), b.clone(), LinkKind::Tag, 2.5);
        assert_eq!(link.strength, 1.0);
        let link = GraphLink::new(a, b, LinkKind::Tag, -1.0);
        assert_eq!(link.strength, 0.0);
    }

    #[test]
    fn unordered_pair_is_canonical_both_ways() {
        let a = NoteId::new("a").expect("id");
        let b = NoteId::new("b").expect("id");
        let ab = GraphLink::new(a.clone(), b.clone(), LinkKind::Tag, 0.5);
        let ba = GraphLink::new(b, a, LinkKind::Tag, 0.5);
        assert_eq!(ab.unordered_pair(), ba.unordered_pair());
    }

    #[test]
    fn from_note_flags_wiki_refs_and_copies_metadata() {
        let n = note("n1", "First", "see [[Second]]", &["rust"]);
        let node = GraphNode::from_note(&n);
        assert!(node.has_wiki_refs);
        assert_eq!(node.body_len, "see [[Second]]".len());
        assert_eq!(node.tags.len(), 1);

        let plain = note("n2", "Second", "no refs here", &[]);
        assert!(!GraphNode::from_note(&plain).has_wiki_refs);
    }
}
