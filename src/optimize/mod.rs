// SPDX-FileCopyrightText: 2026 the notemap authors
// SPDX-License-Identifier: MIT

//! Optimization governor: truncates the render-ready graph when it grows
//! past what the frame budget can draw.
//!
//! The governor never mutates the upstream graph; it returns what flows
//! downstream. It is re-evaluated on every data change.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::model::{NoteGraph, NoteId};

/// User-selected performance preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PerformanceMode {
    Quality,
    Performance,
    #[default]
    Auto,
}

impl PerformanceMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Quality => "quality",
            Self::Performance => "performance",
            Self::Auto => "auto",
        }
    }

    /// Threshold multiplier: Quality tolerates twice the base counts,
    /// Performance truncates at half of them.
    fn threshold_scale(self) -> f32 {
        match self {
            Self::Quality => 2.0,
            Self::Auto => 1.0,
            Self::Performance => 0.5,
        }
    }
}

impl std::fmt::Display for PerformanceMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum OptimizationLevel {
    None,
    Medium,
    High,
}

/// Named truncation thresholds so tuning never touches the pipeline logic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OptimizeConfig {
    /// Node count above which Medium kicks in (before mode scaling).
    pub quality_node_threshold: usize,
    /// Link count above which Medium kicks in (before mode scaling).
    pub quality_link_threshold: usize,
    /// Node count above which High kicks in (before mode scaling).
    pub performance_node_threshold: usize,
    /// Fraction of trailing links dropped at Medium.
    pub medium_link_drop: f32,
    /// Hard node cap at High, by list order. Not scaled by mode.
    pub high_node_cap: usize,
}

impl Default for OptimizeConfig {
    fn default() -> Self {
        Self {
            quality_node_threshold: 200,
            quality_link_threshold: 400,
            performance_node_threshold: 500,
            medium_link_drop: 0.30,
            high_node_cap: 500,
        }
    }
}

/// Picks the truncation level for the current graph size and mode.
pub fn select_level(
    node_count: usize,
    link_count: usize,
    mode: PerformanceMode,
    config: &OptimizeConfig,
) -> OptimizationLevel {
    let scale = mode.threshold_scale();
    let quality_nodes = scaled(config.quality_node_threshold, scale);
    let quality_links = scaled(config.quality_link_threshold, scale);
    let performance_nodes = scaled(config.performance_node_threshold, scale);

    if node_count > performance_nodes {
        OptimizationLevel::High
    } else if node_count > quality_nodes || link_count > quality_links {
        OptimizationLevel::Medium
    } else {
        OptimizationLevel::None
    }
}

fn scaled(threshold: usize, scale: f32) -> usize {
    (threshold as f32 * scale) as usize
}

/// Applies `level` to a fresh copy of the graph.
///
/// Medium drops the trailing `medium_link_drop` fraction of links. High
/// caps nodes at `high_node_cap` by list order and keeps every link whose
/// endpoints both survive; the Medium link drop does not apply at High.
pub fn apply(graph: &NoteGraph, level: OptimizationLevel, config: &OptimizeConfig) -> NoteGraph {
    match level {
        OptimizationLevel::None => graph.clone(),
        OptimizationLevel::Medium => {
            let keep =
                (graph.links.len() as f32 * (1.0 - config.medium_link_drop)).ceil() as usize;
            NoteGraph::new(graph.nodes.clone(), graph.links[..keep.min(graph.links.len())].to_vec())
        }
        OptimizationLevel::High => {
            let nodes: Vec<_> = graph
                .nodes
                .iter()
                .take(config.high_node_cap)
                .cloned()
                .collect();
            let surviving: HashSet<&NoteId> = nodes.iter().map(|n| &n.id).collect();
            let links = graph
                .links
                .iter()
                .filter(|link| surviving.contains(&link.source) && surviving.contains(&link.target))
                .cloned()
                .collect();
            NoteGraph::new(nodes, links)
        }
    }
}
