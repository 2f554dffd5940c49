// SPDX-FileCopyrightText: 2026 the notemap authors
// SPDX-License-Identifier: MIT

//! Notemap — a terminal graph viewer for a personal knowledge base.
//!
//! Notes go through a pure pipeline each time data or settings change:
//! link generation ([`links`]), filtering ([`filter`]), governor truncation
//! ([`optimize`]), then a force-directed layout ([`sim`]) driven one tick
//! per frame by the [`engine`] and rasterized by [`render`]. The [`tui`]
//! shell owns the terminal and nothing else.

pub mod engine;
pub mod filter;
pub mod links;
pub mod model;
pub mod optimize;
pub mod render;
pub mod sim;
pub mod store;
pub mod tui;
pub mod viewport;
