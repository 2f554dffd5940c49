// SPDX-FileCopyrightText: 2026 the notemap authors
// SPDX-License-Identifier: MIT

//! Graph rendering.
//!
//! The renderer rasterizes a render-ready graph through the viewport into a
//! [`CellGrid`] of styled character cells: edges, node glyphs, labels, a
//! legend line and a corner minimap. It is a pure function of its inputs —
//! the shell owns the terminal and maps cell styles onto it. Failures are
//! reported as values so the shell can degrade to a recoverable
//! "visualization unavailable" state instead of crashing the view.

use std::fmt;

use crate::model::{GraphNode, LinkKind, NoteGraph, NoteId};
use crate::viewport::Viewport;

pub mod grid;

pub use grid::{Cell, CellGrid, CellStyle};

use grid::truncate_with_ellipsis;

/// Terminal cells are roughly twice as tall as wide; screen-space y is
/// divided by this when picking a cell row. The shell multiplies mouse
/// rows by the same constant so hit testing and drawing agree.
pub const CELL_ASPECT: f32 = 2.0;

/// Anything smaller cannot hold the legend line plus one node.
const MIN_GRID_WIDTH: usize = 8;
const MIN_GRID_HEIGHT: usize = 4;

const MINIMAP_WIDTH: usize = 16;
const MINIMAP_HEIGHT: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderOptions {
    pub show_legend: bool,
    pub show_minimap: bool,
    /// Node titles appear at or above this zoom (hovered/selected nodes
    /// are always labelled).
    pub label_zoom_threshold: f32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            show_legend: true,
            show_minimap: true,
            label_zoom_threshold: 0.8,
        }
    }
}

/// Render-time selection/hover overlay. Kept out of the node data so
/// hover changes never invalidate the graph itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct Overlay<'a> {
    pub selected: Option<&'a NoteId>,
    pub hovered: Option<&'a NoteId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    CanvasTooSmall { width: usize, height: usize },
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CanvasTooSmall { width, height } => {
                write!(f, "canvas too small to render ({width}x{height} cells)")
            }
        }
    }
}

impl std::error::Error for RenderError {}

/// Rasterizes `graph` through `viewport` into a fresh grid.
pub fn render_graph(
    graph: &NoteGraph,
    viewport: &Viewport,
    overlay: Overlay<'_>,
    options: &RenderOptions,
) -> Result<CellGrid, RenderError> {
    let width = viewport.width as usize;
    let height = (viewport.height / CELL_ASPECT) as usize;
    if width < MIN_GRID_WIDTH || height < MIN_GRID_HEIGHT {
        return Err(RenderError::CanvasTooSmall { width, height });
    }

    let mut grid = CellGrid::new(width, height);

    for link in &graph.links {
        let (Some(source), Some(target)) = (graph.node(&link.source), graph.node(&link.target))
        else {
            continue;
        };
        draw_edge(&mut grid, viewport, source, target, link.kind, link.strength);
    }

    for node in &graph.nodes {
        draw_node(&mut grid, viewport, node, overlay, options);
    }

    if options.show_legend {
        draw_legend(&mut grid, graph, viewport);
    }
    if options.show_minimap {
        draw_minimap(&mut grid, graph, viewport);
    }

    Ok(grid)
}

fn to_cell(viewport: &Viewport, gx: f32, gy: f32) -> (i32, i32) {
    let (sx, sy) = viewport.graph_to_screen(gx, gy);
    (sx.round() as i32, (sy / CELL_ASPECT).round() as i32)
}

/// Edge glyph from the dominant direction, with plot density standing in
/// for stroke weight: strong links draw every cell, weak ones every third.
fn draw_edge(
    grid: &mut CellGrid,
    viewport: &Viewport,
    source: &GraphNode,
    target: &GraphNode,
    kind: LinkKind,
    strength: f32,
) {
    let (x0, y0) = to_cell(viewport, source.x, source.y);
    let (x1, y1) = to_cell(viewport, target.x, target.y);

    let dx = x1 - x0;
    let dy = y1 - y0;
    let ch = if dx.abs() >= 2 * dy.abs() {
        '─'
    } else if dy.abs() >= 2 * dx.abs() {
        '│'
    } else if (dx > 0) == (dy > 0) {
        '╲'
    } else {
        '╱'
    };
    let step = if strength > 0.66 {
        1
    } else if strength > 0.33 {
        2
    } else {
        3
    };

    let style = CellStyle::Edge { kind };
    for (i, (x, y)) in bresenham(x0, y0, x1, y1).into_iter().enumerate() {
        if i % step == 0 {
            grid.set(x, y, ch, style);
        }
    }
}

fn bresenham(x0: i32, y0: i32, x1: i32, y1: i32) -> Vec<(i32, i32)> {
    let mut points = Vec::new();
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    let (mut x, mut y) = (x0, y0);
    loop {
        points.push((x, y));
        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
    points
}

fn node_glyph(size: f32) -> char {
    if size <= 25.0 {
        '•'
    } else if size <= 40.0 {
        '●'
    } else {
        '█'
    }
}

fn draw_node(
    grid: &mut CellGrid,
    viewport: &Viewport,
    node: &GraphNode,
    overlay: Overlay<'_>,
    options: &RenderOptions,
) {
    let (x, y) = to_cell(viewport, node.x, node.y);
    let selected = overlay.selected == Some(&node.id);
    let hovered = overlay.hovered == Some(&node.id);

    grid.set(
        x,
        y,
        node_glyph(node.size),
        CellStyle::Node {
            color: node.color,
            selected,
            hovered,
        },
    );

    if viewport.zoom() >= options.label_zoom_threshold || selected || hovered {
        let label = truncate_with_ellipsis(&node.title, 18);
        grid.write_str(x + 2, y, &label, CellStyle::Label);
    }
}

fn draw_legend(grid: &mut CellGrid, graph: &NoteGraph, viewport: &Viewport) {
    let kind = graph.links.first().map(|l| l.kind.as_str()).unwrap_or("-");
    let mut nodes_buf = itoa::Buffer::new();
    let mut links_buf = itoa::Buffer::new();
    let legend = format!(
        "links:{kind}  n:{}  l:{}  zoom:{:.1}x",
        nodes_buf.format(graph.nodes.len()),
        links_buf.format(graph.links.len()),
        viewport.zoom(),
    );
    grid.write_str(0, 0, &legend, CellStyle::Chrome);
}

/// A framed thumbnail of the whole graph in the bottom-right corner, with
/// the current viewport marked by its corner cells.
fn draw_minimap(grid: &mut CellGrid, graph: &NoteGraph, viewport: &Viewport) {
    if graph.nodes.is_empty()
        || grid.width() < MINIMAP_WIDTH + 2
        || grid.height() < MINIMAP_HEIGHT + 2
    {
        return;
    }

    let left = (grid.width() - MINIMAP_WIDTH) as i32 - 1;
    let top = (grid.height() - MINIMAP_HEIGHT) as i32 - 1;
    let right = left + MINIMAP_WIDTH as i32 - 1;
    let bottom = top + MINIMAP_HEIGHT as i32 - 1;

    grid.set(left, top, '┌', CellStyle::Chrome);
    grid.set(right, top, '┐', CellStyle::Chrome);
    grid.set(left, bottom, '└', CellStyle::Chrome);
    grid.set(right, bottom, '┘', CellStyle::Chrome);
    for x in (left + 1)..right {
        grid.set(x, top, '─', CellStyle::Chrome);
        grid.set(x, bottom, '─', CellStyle::Chrome);
    }
    for y in (top + 1)..bottom {
        grid.set(left, y, '│', CellStyle::Chrome);
        grid.set(right, y, '│', CellStyle::Chrome);
        for x in (left + 1)..right {
            grid.set(x, y, ' ', CellStyle::Chrome);
        }
    }

    let (min_x, max_x, min_y, max_y) = graph_bounds(graph);
    let span_x = (max_x - min_x).max(1.0);
    let span_y = (max_y - min_y).max(1.0);
    let inner_w = (MINIMAP_WIDTH - 2) as f32;
    let inner_h = (MINIMAP_HEIGHT - 2) as f32;

    let project = |gx: f32, gy: f32| -> (i32, i32) {
        let mx = left + 1 + ((gx - min_x) / span_x * (inner_w - 1.0)).round() as i32;
        let my = top + 1 + ((gy - min_y) / span_y * (inner_h - 1.0)).round() as i32;
        (mx, my)
    };

    for node in &graph.nodes {
        let (mx, my) = project(node.x, node.y);
        grid.set(mx, my, '·', CellStyle::Chrome);
    }

    // Visible-region corners.
    let (vx0, vy0) = viewport.screen_to_graph(0.0, 0.0);
    let (vx1, vy1) = viewport.screen_to_graph(viewport.width, viewport.height);
    for (gx, gy) in [(vx0, vy0), (vx1, vy0), (vx0, vy1), (vx1, vy1)] {
        let (mx, my) = project(gx.clamp(min_x, max_x), gy.clamp(min_y, max_y));
        grid.set(mx, my, '+', CellStyle::Chrome);
    }
}

fn graph_bounds(graph: &NoteGraph) -> (f32, f32, f32, f32) {
    let mut min_x = f32::MAX;
    let mut max_x = f32::MIN;
    let mut min_y = f32::MAX;
    let mut max_y = f32::MIN;
    for node in &graph.nodes {
        min_x = min_x.min(node.x);
        max_x = max_x.max(node.x);
        min_y = min_y.min(node.y);
        max_y = max_y.max(node.y);
    }
    (min_x, max_x, min_y, max_y)
}
