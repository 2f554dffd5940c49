// SPDX-FileCopyrightText: 2026 the notemap authors
// SPDX-License-Identifier: MIT

//! Force-directed layout simulator.
//!
//! One discrete tick per animation frame relaxes node positions under four
//! forces: link springs, pairwise charge repulsion, a weak centering pull,
//! and collision separation. A decaying energy budget scales the forces
//! each tick until it falls below a stop threshold and the simulator goes
//! idle; data changes re-heat the budget so the layout resettles without a
//! full restart. Graph space is centered on the origin.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

use crate::engine::positions::PositionStore;
use crate::model::{NoteGraph, NoteId};

/// Simulation constants. Named so tuning lives here and nowhere else.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimConfig {
    /// Spring stiffness per unit of link strength.
    pub spring_stiffness: f32,
    /// Spring rest length at strength 1; weaker links rest proportionally
    /// further apart.
    pub rest_length_base: f32,
    /// Upper bound on the rest length of very weak links.
    pub rest_length_max: f32,
    /// Repulsion scale, multiplied by the sum of the two node sizes.
    pub charge_strength: f32,
    /// Repulsion is zeroed beyond this distance.
    pub max_interaction_distance: f32,
    /// Pull toward the origin, preventing drift.
    pub centering_strength: f32,
    /// Extra separation on top of the two radii.
    pub collision_margin: f32,
    /// Fraction of the overlap corrected per tick; below 1 to avoid
    /// oscillation.
    pub collision_damping: f32,
    pub energy_start: f32,
    /// Multiplicative decay per tick (`energy *= 1 - energy_decay`).
    pub energy_decay: f32,
    /// Below this the simulator reports idle and ticks are no-ops.
    pub energy_stop: f32,
    /// Energy floor restored by `reheat`.
    pub reheat_energy: f32,
    pub velocity_damping: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            spring_stiffness: 0.08,
            rest_length_base: 90.0,
            rest_length_max: 320.0,
            charge_strength: 60.0,
            max_interaction_distance: 400.0,
            centering_strength: 0.015,
            collision_margin: 4.0,
            collision_damping: 0.5,
            energy_start: 1.0,
            energy_decay: 0.02,
            energy_stop: 0.005,
            reheat_energy: 0.4,
            velocity_damping: 0.6,
        }
    }
}

/// How a node moves: integrated by the forces, or pinned to pointer input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Motion {
    Free { vx: f32, vy: f32 },
    Pinned,
}

impl Motion {
    fn free() -> Self {
        Self::Free { vx: 0.0, vy: 0.0 }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimNode {
    pub id: NoteId,
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub motion: Motion,
}

impl SimNode {
    fn radius(&self) -> f32 {
        self.size / 2.0
    }

    pub fn is_pinned(&self) -> bool {
        matches!(self.motion, Motion::Pinned)
    }
}

struct Spring {
    a: usize,
    b: usize,
    strength: f32,
}

/// The layout state for one engine instance.
pub struct LayoutSim {
    nodes: Vec<SimNode>,
    index: HashMap<NoteId, usize>,
    springs: Vec<Spring>,
    energy: f32,
    config: SimConfig,
}

impl LayoutSim {
    pub fn new(config: SimConfig) -> Self {
        Self {
            nodes: Vec::new(),
            index: HashMap::new(),
            springs: Vec::new(),
            energy: 0.0,
            config,
        }
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn energy(&self) -> f32 {
        self.energy
    }

    pub fn is_idle(&self) -> bool {
        self.nodes.is_empty() || self.energy < self.config.energy_stop
    }

    pub fn nodes(&self) -> &[SimNode] {
        &self.nodes
    }

    pub fn node(&self, id: &NoteId) -> Option<&SimNode> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    /// Rebuilds the simulated set from a render-ready graph.
    ///
    /// Nodes that survive keep their current position and motion; new
    /// nodes are seeded deterministically around the origin. A manual
    /// position override wins over both and pins the node so the rest of
    /// the graph resettles around it. Always re-heats.
    pub fn sync(&mut self, graph: &NoteGraph, overrides: &PositionStore) {
        let mut nodes = Vec::with_capacity(graph.nodes.len());
        let mut index = HashMap::with_capacity(graph.nodes.len());

        for node in &graph.nodes {
            let sim_node = if let Some((x, y)) = overrides.get(&node.id) {
                SimNode {
                    id: node.id.clone(),
                    x,
                    y,
                    size: node.size,
                    motion: Motion::Pinned,
                }
            } else if let Some(&existing) = self.index.get(&node.id) {
                let prev = &self.nodes[existing];
                SimNode {
                    id: node.id.clone(),
                    x: prev.x,
                    y: prev.y,
                    size: node.size,
                    motion: prev.motion,
                }
            } else {
                let (x, y) = seeded_position(node.id.as_str());
                SimNode {
                    id: node.id.clone(),
                    x,
                    y,
                    size: node.size,
                    motion: Motion::free(),
                }
            };
            index.insert(node.id.clone(), nodes.len());
            nodes.push(sim_node);
        }

        let springs = graph
            .links
            .iter()
            .filter_map(|link| {
                let a = *index.get(&link.source)?;
                let b = *index.get(&link.target)?;
                Some(Spring {
                    a,
                    b,
                    strength: link.strength,
                })
            })
            .collect();

        let cold_start = self.nodes.is_empty();
        self.nodes = nodes;
        self.index = index;
        self.springs = springs;
        if cold_start {
            self.energy = self.config.energy_start;
        }
        self.reheat();
    }

    /// Restores enough energy for the layout to resettle after a change.
    pub fn reheat(&mut self) {
        self.energy = self.energy.max(self.config.reheat_energy);
        if self.nodes.is_empty() {
            self.energy = 0.0;
        }
    }

    /// Pins a node for manual dragging; its position is then driven by
    /// [`LayoutSim::set_position`] until [`LayoutSim::release`].
    pub fn pin(&mut self, id: &NoteId) {
        if let Some(&i) = self.index.get(id) {
            self.nodes[i].motion = Motion::Pinned;
        }
    }

    /// Returns a pinned node to force integration.
    pub fn release(&mut self, id: &NoteId) {
        if let Some(&i) = self.index.get(id) {
            self.nodes[i].motion = Motion::free();
        }
    }

    /// Drives a node from pointer input. Works for pinned and free nodes;
    /// dragging normally pins first.
    pub fn set_position(&mut self, id: &NoteId, x: f32, y: f32) {
        if let Some(&i) = self.index.get(id) {
            self.nodes[i].x = x;
            self.nodes[i].y = y;
        }
    }

    /// Advances the simulation by one discrete tick. Returns `false` when
    /// idle (nothing moved).
    pub fn tick(&mut self) -> bool {
        if self.is_idle() {
            return false;
        }

        let n = self.nodes.len();
        let cfg = self.config;
        let mut forces = vec![(0.0f32, 0.0f32); n];

        // Link attraction: spring toward a rest length inversely
        // proportional to strength, stiffness proportional to strength.
        for spring in &self.springs {
            let (ax, ay) = (self.nodes[spring.a].x, self.nodes[spring.a].y);
            let (bx, by) = (self.nodes[spring.b].x, self.nodes[spring.b].y);
            let dx = bx - ax;
            let dy = by - ay;
            let dist = (dx * dx + dy * dy).sqrt().max(0.01);
            let rest = (cfg.rest_length_base / spring.strength.max(0.1)).min(cfg.rest_length_max);
            let magnitude = cfg.spring_stiffness * spring.strength * (dist - rest);
            let fx = magnitude * dx / dist;
            let fy = magnitude * dy / dist;
            forces[spring.a].0 += fx;
            forces[spring.a].1 += fy;
            forces[spring.b].0 -= fx;
            forces[spring.b].1 -= fy;
        }

        // Charge repulsion, zeroed beyond the interaction cutoff.
        let cutoff_sq = cfg.max_interaction_distance * cfg.max_interaction_distance;
        for i in 0..n {
            for j in (i + 1)..n {
                let dx = self.nodes[i].x - self.nodes[j].x;
                let dy = self.nodes[i].y - self.nodes[j].y;
                let dist_sq = (dx * dx + dy * dy).max(0.01);
                if dist_sq > cutoff_sq {
                    continue;
                }
                let dist = dist_sq.sqrt();
                let magnitude =
                    cfg.charge_strength * (self.nodes[i].size + self.nodes[j].size) / dist_sq;
                let fx = magnitude * dx / dist;
                let fy = magnitude * dy / dist;
                forces[i].0 += fx;
                forces[i].1 += fy;
                forces[j].0 -= fx;
                forces[j].1 -= fy;
            }
        }

        // Weak centering pull toward the origin.
        for (i, node) in self.nodes.iter().enumerate() {
            forces[i].0 -= node.x * cfg.centering_strength;
            forces[i].1 -= node.y * cfg.centering_strength;
        }

        // Integrate free nodes; pinned nodes sit out entirely.
        let energy = self.energy;
        for (i, node) in self.nodes.iter_mut().enumerate() {
            let Motion::Free { vx, vy } = &mut node.motion else {
                continue;
            };
            *vx = (*vx + forces[i].0 * energy) * cfg.velocity_damping;
            *vy = (*vy + forces[i].1 * energy) * cfg.velocity_damping;
            node.x += *vx;
            node.y += *vy;
        }

        self.separate_collisions();

        self.energy *= 1.0 - cfg.energy_decay;
        true
    }

    /// Collision: enforce a minimum separation of the two radii plus a
    /// margin, correcting a damped fraction of the overlap per tick.
    fn separate_collisions(&mut self) {
        let n = self.nodes.len();
        let cfg = self.config;
        for i in 0..n {
            for j in (i + 1)..n {
                let dx = self.nodes[j].x - self.nodes[i].x;
                let dy = self.nodes[j].y - self.nodes[i].y;
                let dist = (dx * dx + dy * dy).sqrt().max(0.01);
                let min_sep =
                    self.nodes[i].radius() + self.nodes[j].radius() + cfg.collision_margin;
                if dist >= min_sep {
                    continue;
                }
                let correction = (min_sep - dist) * cfg.collision_damping;
                let ux = dx / dist;
                let uy = dy / dist;
                let (i_pinned, j_pinned) =
                    (self.nodes[i].is_pinned(), self.nodes[j].is_pinned());
                match (i_pinned, j_pinned) {
                    (true, true) => {}
                    (true, false) => {
                        self.nodes[j].x += ux * correction;
                        self.nodes[j].y += uy * correction;
                    }
                    (false, true) => {
                        self.nodes[i].x -= ux * correction;
                        self.nodes[i].y -= uy * correction;
                    }
                    (false, false) => {
                        let half = correction / 2.0;
                        self.nodes[i].x -= ux * half;
                        self.nodes[i].y -= uy * half;
                        self.nodes[j].x += ux * half;
                        self.nodes[j].y += uy * half;
                    }
                }
            }
        }
    }

    /// Copies simulated positions back onto render-ready nodes.
    pub fn write_positions(&self, graph: &mut NoteGraph) {
        for node in &mut graph.nodes {
            if let Some(&i) = self.index.get(&node.id) {
                node.x = self.nodes[i].x;
                node.y = self.nodes[i].y;
            }
        }
    }
}

/// Deterministic scatter for first-seen nodes: a hash of the id picks an
/// angle and radius around the origin, so layouts are reproducible and
/// coincident starts (which would explode the repulsion term) can't happen.
fn seeded_position(id: &str) -> (f32, f32) {
    let mut hasher = DefaultHasher::new();
    id.hash(&mut hasher);
    let hash = hasher.finish();
    let angle = ((hash & 0xffff) as f32 / 65_535.0) * std::f32::consts::TAU;
    let radius = 60.0 + (((hash >> 16) & 0xffff) as f32 / 65_535.0) * 120.0;
    (angle.cos() * radius, angle.sin() * radius)
}
