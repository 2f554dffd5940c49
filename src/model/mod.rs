// SPDX-FileCopyrightText: 2026 the notemap authors
// SPDX-License-Identifier: MIT

//! Core data model.
//!
//! Notes come from an external store (read-only); graph nodes and links are
//! derived views rebuilt on every data or filter change.

pub mod fixtures;
pub mod graph;
pub mod ids;
pub mod note;

pub use graph::{
    derive_node_color, derive_node_size, GraphLink, GraphNode, LinkKind, NoteGraph,
    ParseLinkKindError, NODE_SIZE_MAX, NODE_SIZE_MIN, PALETTE_SIZE,
};
pub use ids::{Id, IdError, NoteId};
pub use note::Note;
