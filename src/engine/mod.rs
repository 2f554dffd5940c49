// SPDX-FileCopyrightText: 2026 the notemap authors
// SPDX-License-Identifier: MIT

//! The engine: one instance per view, owning the full pipeline.
//!
//! Notes flow through link generation → filtering → optimization into a
//! render-ready graph; the layout simulator relaxes it continuously. Any
//! change to data, mode, criteria, or performance mode triggers a
//! synchronous full recompute followed by a simulator re-heat. All stages
//! before the simulator are pure, so the recompute is just function
//! application.

use std::collections::HashSet;

use crate::filter::{filter_links, filter_nodes, FilterCriteria};
use crate::links::{generate_links, LinkConfig};
use crate::model::{GraphNode, LinkKind, Note, NoteGraph, NoteId};
use crate::optimize::{apply, select_level, OptimizationLevel, OptimizeConfig, PerformanceMode};
use crate::sim::{LayoutSim, SimConfig};
use crate::viewport::Viewport;

pub mod positions;

pub use positions::PositionStore;

/// Interaction events the engine reports to its host. The host forwards
/// selection/hover changes to the external note store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// A node was clicked (`Some`) or the empty canvas was clicked
    /// (`None`, a deselection signal).
    Selected(Option<NoteId>),
    /// The pointer entered a node (`Some`) or left all nodes (`None`).
    Hovered(Option<NoteId>),
}

/// What the pointer is currently doing, tracked across move events.
#[derive(Debug, Clone, PartialEq)]
enum PointerDrag {
    Idle,
    /// Dragging empty canvas: panning. Remembers the last pointer position.
    Canvas { last_x: f32, last_y: f32 },
    /// Dragging a node: pinned in the simulator, driven by the pointer.
    Node { id: NoteId },
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EngineConfig {
    pub links: LinkConfig,
    pub optimize: OptimizeConfig,
    pub sim: SimConfig,
}

pub struct GraphEngine {
    notes: Vec<Note>,
    mode: LinkKind,
    performance_mode: PerformanceMode,
    criteria: FilterCriteria,
    config: EngineConfig,
    overrides: PositionStore,
    sim: LayoutSim,
    pub viewport: Viewport,
    graph: NoteGraph,
    level: OptimizationLevel,
    selected: Option<NoteId>,
    hovered: Option<NoteId>,
    drag: PointerDrag,
    now: i64,
}

impl GraphEngine {
    pub fn new(
        notes: Vec<Note>,
        mode: LinkKind,
        performance_mode: PerformanceMode,
        viewport: Viewport,
        config: EngineConfig,
        now: i64,
    ) -> Self {
        let mut engine = Self {
            notes,
            mode,
            performance_mode,
            criteria: FilterCriteria::default(),
            sim: LayoutSim::new(config.sim),
            config,
            overrides: PositionStore::default(),
            viewport,
            graph: NoteGraph::default(),
            level: OptimizationLevel::None,
            selected: None,
            hovered: None,
            drag: PointerDrag::Idle,
            now,
        };
        engine.recompute();
        engine
    }

    pub fn graph(&self) -> &NoteGraph {
        &self.graph
    }

    pub fn mode(&self) -> LinkKind {
        self.mode
    }

    pub fn performance_mode(&self) -> PerformanceMode {
        self.performance_mode
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn optimization_level(&self) -> OptimizationLevel {
        self.level
    }

    pub fn selected(&self) -> Option<&NoteId> {
        self.selected.as_ref()
    }

    pub fn hovered(&self) -> Option<&NoteId> {
        self.hovered.as_ref()
    }

    pub fn sim_idle(&self) -> bool {
        self.sim.is_idle()
    }

    pub fn note(&self, id: &NoteId) -> Option<&Note> {
        self.notes.iter().find(|n| &n.id == id)
    }

    /// Replaces the note set (the external store pushed new data).
    pub fn set_notes(&mut self, notes: Vec<Note>, now: i64) {
        self.notes = notes;
        self.now = now;
        self.recompute();
    }

    pub fn set_mode(&mut self, mode: LinkKind) {
        if self.mode != mode {
            self.mode = mode;
            self.recompute();
        }
    }

    pub fn set_performance_mode(&mut self, mode: PerformanceMode) {
        if self.performance_mode != mode {
            self.performance_mode = mode;
            self.recompute();
        }
    }

    pub fn set_criteria(&mut self, criteria: FilterCriteria) {
        if self.criteria != criteria {
            self.criteria = criteria;
            self.recompute();
        }
    }

    /// Runs the pure pipeline from scratch and re-seats the simulator.
    ///
    /// The graph is rebuilt, never patched: links from the active strategy,
    /// then the filter subset, then governor truncation. Dangling links are
    /// impossible downstream by construction.
    pub fn recompute(&mut self) {
        let links = generate_links(&self.notes, self.mode, &self.config.links);
        let nodes: Vec<GraphNode> = self.notes.iter().map(GraphNode::from_note).collect();

        let nodes = filter_nodes(&nodes, &self.criteria, self.now);
        let surviving: HashSet<&NoteId> = nodes.iter().map(|n| &n.id).collect();
        let links = filter_links(&links, &surviving);

        let filtered = NoteGraph::new(nodes, links);
        self.level = select_level(
            filtered.nodes.len(),
            filtered.links.len(),
            self.performance_mode,
            &self.config.optimize,
        );
        self.graph = apply(&filtered, self.level, &self.config.optimize);

        // Overlay ids may have been filtered or truncated away.
        if let Some(id) = self.selected.take() {
            if self.graph.node(&id).is_some() {
                self.selected = Some(id);
            }
        }
        if let Some(id) = self.hovered.take() {
            if self.graph.node(&id).is_some() {
                self.hovered = Some(id);
            }
        }

        self.sim.sync(&self.graph, &self.overrides);
        self.sim.write_positions(&mut self.graph);
    }

    /// One frame: advance the simulation a single tick and refresh node
    /// positions. Returns `true` when anything moved.
    pub fn tick(&mut self) -> bool {
        let advanced = self.sim.tick();
        if advanced {
            self.sim.write_positions(&mut self.graph);
        }
        advanced
    }

    /// Pointer press. On a node: begin a node drag (claims the node via the
    /// simulator's pin). On empty canvas: begin a pan drag.
    pub fn pointer_down(&mut self, sx: f32, sy: f32) {
        match self.viewport.hit_test(&self.graph.nodes, sx, sy) {
            Some(id) => {
                let id = id.clone();
                self.sim.pin(&id);
                self.drag = PointerDrag::Node { id };
            }
            None => {
                self.drag = PointerDrag::Canvas {
                    last_x: sx,
                    last_y: sy,
                };
            }
        }
    }

    /// Pointer move while a button is held.
    pub fn pointer_drag(&mut self, sx: f32, sy: f32) {
        match &mut self.drag {
            PointerDrag::Idle => {}
            PointerDrag::Canvas { last_x, last_y } => {
                let (dx, dy) = (sx - *last_x, sy - *last_y);
                *last_x = sx;
                *last_y = sy;
                self.viewport.pan_by(dx, dy);
            }
            PointerDrag::Node { id } => {
                let id = id.clone();
                let (gx, gy) = self.viewport.screen_to_graph(sx, sy);
                self.sim.set_position(&id, gx, gy);
                self.sim.write_positions(&mut self.graph);
            }
        }
    }

    /// Pointer release. Ends the drag; a node drag records its final
    /// position as a manual override (the node stays pinned) and emits a
    /// selection, a short canvas press is a click (select/deselect).
    pub fn pointer_up(&mut self, sx: f32, sy: f32, moved: bool) -> Option<EngineEvent> {
        let drag = std::mem::replace(&mut self.drag, PointerDrag::Idle);
        match drag {
            PointerDrag::Idle => None,
            PointerDrag::Canvas { .. } => {
                if moved {
                    None
                } else {
                    self.selected = None;
                    Some(EngineEvent::Selected(None))
                }
            }
            PointerDrag::Node { id } => {
                if moved {
                    let (gx, gy) = self.viewport.screen_to_graph(sx, sy);
                    self.overrides.set(id.clone(), (gx, gy));
                    self.sim.set_position(&id, gx, gy);
                    self.sim.reheat();
                } else if self.overrides.get(&id).is_none() {
                    // A plain click: undo the provisional pin from
                    // pointer_down. Override-pinned nodes stay pinned.
                    self.sim.release(&id);
                }
                self.selected = Some(id.clone());
                Some(EngineEvent::Selected(Some(id)))
            }
        }
    }

    /// Pointer move without a button. Emits a hover event only on change,
    /// so coalesced move batches stay cheap.
    pub fn pointer_move(&mut self, sx: f32, sy: f32) -> Option<EngineEvent> {
        let hit = self
            .viewport
            .hit_test(&self.graph.nodes, sx, sy)
            .cloned();
        if hit != self.hovered {
            self.hovered = hit.clone();
            Some(EngineEvent::Hovered(hit))
        } else {
            None
        }
    }

    /// Programmatic selection, used by the jump prompt and by Escape.
    pub fn select(&mut self, id: Option<NoteId>) {
        self.selected = id;
    }

    /// Releases a manual override so the node rejoins the simulation.
    pub fn release_override(&mut self, id: &NoteId) {
        if self.overrides.remove(id).is_some() {
            self.sim.release(id);
            self.sim.reheat();
        }
    }

    pub fn clear_overrides(&mut self) {
        self.overrides.clear();
        self.recompute();
    }

    /// Best fuzzy title match for the jump prompt; `None` below a sanity
    /// cutoff so garbage queries don't jump anywhere.
    pub fn best_title_match(&self, query: &str) -> Option<&NoteId> {
        if query.is_empty() {
            return None;
        }
        let query_lower = query.to_lowercase();
        self.graph
            .nodes
            .iter()
            .map(|node| {
                let ratio = rapidfuzz::fuzz::ratio(
                    query_lower.chars(),
                    node.title.to_lowercase().chars(),
                );
                (node, ratio)
            })
            .filter(|(_, ratio)| *ratio > 30.0)
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(node, _)| &node.id)
    }

    /// Centers the viewport on a node.
    pub fn focus_node(&mut self, id: &NoteId) {
        if let Some(node) = self.graph.node(id) {
            self.viewport.pan_x = -node.x * self.viewport.zoom();
            self.viewport.pan_y = -node.y * self.viewport.zoom();
        }
    }
}
