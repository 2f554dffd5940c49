// SPDX-FileCopyrightText: 2026 the notemap authors
// SPDX-License-Identifier: MIT

//! Viewport controller: zoom/pan transform, screen↔graph coordinate
//! mapping, and hit testing.
//!
//! Graph space is centered on the origin; screen space has its origin at
//! the canvas top-left. Zoom is multiplicative and always clamped, pan is
//! additive in screen pixels.

use crate::model::{GraphNode, NoteId};

pub const ZOOM_MIN: f32 = 0.1;
pub const ZOOM_MAX: f32 = 3.0;
pub const ZOOM_STEP: f32 = 1.2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    zoom: f32,
    pub pan_x: f32,
    pub pan_y: f32,
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            zoom: 1.0,
            pan_x: 0.0,
            pan_y: 0.0,
            width: width.max(1.0),
            height: height.max(1.0),
        }
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Sets zoom directly, clamped into `[ZOOM_MIN, ZOOM_MAX]`. Invalid
    /// (non-finite) input is ignored rather than rejected.
    pub fn set_zoom(&mut self, zoom: f32) {
        if zoom.is_finite() {
            self.zoom = zoom.clamp(ZOOM_MIN, ZOOM_MAX);
        }
    }

    /// One wheel/key step in. The reference point is the canvas center,
    /// which the transform keeps fixed by construction.
    pub fn zoom_in(&mut self) {
        self.set_zoom(self.zoom * ZOOM_STEP);
    }

    pub fn zoom_out(&mut self) {
        self.set_zoom(self.zoom / ZOOM_STEP);
    }

    pub fn pan_by(&mut self, dx: f32, dy: f32) {
        self.pan_x += dx;
        self.pan_y += dy;
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width.max(1.0);
        self.height = height.max(1.0);
    }

    pub fn reset(&mut self) {
        self.zoom = 1.0;
        self.pan_x = 0.0;
        self.pan_y = 0.0;
    }

    pub fn screen_to_graph(&self, sx: f32, sy: f32) -> (f32, f32) {
        (
            (sx - self.pan_x - self.width / 2.0) / self.zoom,
            (sy - self.pan_y - self.height / 2.0) / self.zoom,
        )
    }

    pub fn graph_to_screen(&self, gx: f32, gy: f32) -> (f32, f32) {
        (
            gx * self.zoom + self.pan_x + self.width / 2.0,
            gy * self.zoom + self.pan_y + self.height / 2.0,
        )
    }

    /// Picks the node under a screen-space pointer: the first node in list
    /// order whose graph-space distance to the pointer is within its
    /// radius. First-in-list is the documented tie break for overlapping
    /// nodes.
    pub fn hit_test<'a>(&self, nodes: &'a [GraphNode], sx: f32, sy: f32) -> Option<&'a NoteId> {
        let (gx, gy) = self.screen_to_graph(sx, sy);
        nodes.iter().find_map(|node| {
            let dx = node.x - gx;
            let dy = node.y - gy;
            ((dx * dx + dy * dy).sqrt() <= node.radius()).then_some(&node.id)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{GraphNode, Note, NoteId};

    fn node_at(id: &str, x: f32, y: f32) -> GraphNode {
        let mut node = GraphNode::from_note(&Note::new(
            NoteId::new(id).expect("id"),
            id,
            "",
            Vec::<String>::new(),
            0,
            0,
        ));
        node.x = x;
        node.y = y;
        node // size 20, radius 10
    }

    #[test]
    fn twenty_zoom_in_steps_clamp_at_the_maximum() {
        let mut viewport = Viewport::new(800.0, 600.0);
        for _ in 0..20 {
            viewport.zoom_in();
        }
        assert_eq!(viewport.zoom(), ZOOM_MAX);

        for _ in 0..40 {
            viewport.zoom_out();
        }
        assert_eq!(viewport.zoom(), ZOOM_MIN);
    }

    #[test]
    fn non_finite_zoom_is_ignored() {
        let mut viewport = Viewport::new(800.0, 600.0);
        viewport.set_zoom(f32::NAN);
        assert_eq!(viewport.zoom(), 1.0);
        viewport.set_zoom(f32::INFINITY);
        assert_eq!(viewport.zoom(), 1.0);
    }

    #[test]
    fn screen_and_graph_mappings_are_inverse() {
        let mut viewport = Viewport::new(800.0, 600.0);
        viewport.set_zoom(1.5);
        viewport.pan_by(40.0, -25.0);

        let (gx, gy) = viewport.screen_to_graph(123.0, 456.0);
        let (sx, sy) = viewport.graph_to_screen(gx, gy);
        assert!((sx - 123.0).abs() < 1e-3);
        assert!((sy - 456.0).abs() < 1e-3);
    }

    #[test]
    fn canvas_center_maps_to_graph_origin_without_pan() {
        let viewport = Viewport::new(800.0, 600.0);
        assert_eq!(viewport.screen_to_graph(400.0, 300.0), (0.0, 0.0));
    }

    #[test]
    fn hit_test_respects_radius_and_list_order() {
        let viewport = Viewport::new(800.0, 600.0);
        let nodes = vec![node_at("under", 0.0, 0.0), node_at("over", 2.0, 0.0)];

        // Pointer at the canvas center = graph origin; both nodes cover
        // it, so the first in list order wins.
        let hit = viewport.hit_test(&nodes, 400.0, 300.0);
        assert_eq!(hit.map(NoteId::as_str), Some("under"));

        // Outside every radius: no hit.
        assert!(viewport.hit_test(&nodes, 600.0, 300.0).is_none());
    }

    #[test]
    fn hit_test_tracks_zoom() {
        let mut viewport = Viewport::new(800.0, 600.0);
        let nodes = vec![node_at("a", 100.0, 0.0)];

        // At zoom 1 the node sits 100px right of center.
        assert!(viewport.hit_test(&nodes, 500.0, 300.0).is_some());

        // Zoomed out it moves toward the center on screen.
        viewport.set_zoom(0.5);
        assert!(viewport.hit_test(&nodes, 450.0, 300.0).is_some());
        assert!(viewport.hit_test(&nodes, 500.0, 300.0).is_none());
    }
}
