// SPDX-FileCopyrightText: 2026 the notemap authors
// SPDX-License-Identifier: MIT

//! End-to-end pipeline scenarios against the public API: notes in, links,
//! filter, governor, layout, and a rendered grid out.

use notemap::engine::{EngineConfig, GraphEngine};
use notemap::filter::FilterCriteria;
use notemap::model::fixtures::demo_notes;
use notemap::model::{LinkKind, Note, NoteId};
use notemap::optimize::{OptimizationLevel, PerformanceMode};
use notemap::render::{render_graph, Overlay, RenderOptions, CELL_ASPECT};
use notemap::viewport::Viewport;

fn engine() -> GraphEngine {
    GraphEngine::new(
        demo_notes(),
        LinkKind::Internal,
        PerformanceMode::Auto,
        Viewport::new(120.0, 80.0),
        EngineConfig::default(),
        1_760_000_000,
    )
}

fn settle(engine: &mut GraphEngine) {
    for _ in 0..10_000 {
        if !engine.tick() {
            return;
        }
    }
    panic!("simulation never settled");
}

#[test]
fn demo_notes_flow_through_to_a_rendered_grid() {
    let mut engine = engine();
    assert!(!engine.graph().nodes.is_empty());
    assert!(!engine.graph().links.is_empty());

    settle(&mut engine);

    let grid = render_graph(
        engine.graph(),
        &engine.viewport,
        Overlay::default(),
        &RenderOptions::default(),
    )
    .expect("render");
    let text = grid.to_text();
    assert!(text.contains("links:internal"));
    assert!(text.contains('•') || text.contains('●') || text.contains('█'));
}

#[test]
fn mode_switch_regenerates_links_wholesale() {
    let mut engine = engine();
    let internal: Vec<_> = engine.graph().links.clone();
    assert!(internal.iter().all(|l| l.kind == LinkKind::Internal));

    engine.set_mode(LinkKind::Tag);
    assert!(engine.graph().links.iter().all(|l| l.kind == LinkKind::Tag));
    assert!(!engine.graph().links.is_empty());

    engine.set_mode(LinkKind::Internal);
    assert_eq!(engine.graph().links, internal);
}

#[test]
fn filtering_never_leaves_dangling_links() {
    let mut engine = engine();
    engine.set_criteria(FilterCriteria {
        search: Some("notes".to_owned()),
        ..FilterCriteria::default()
    });

    let graph = engine.graph();
    assert!(!graph.nodes.is_empty());
    assert!(graph.links_are_consistent());

    engine.set_criteria(FilterCriteria::default());
    assert_eq!(engine.graph().nodes.len(), demo_notes().len());
}

#[test]
fn performance_mode_caps_a_large_graph() {
    let notes: Vec<Note> = (0..600)
        .map(|i| {
            Note::new(
                NoteId::new(format!("n-{i:03}")).expect("id"),
                format!("Note {i}"),
                "body",
                ["shared"],
                1_700_000_000,
                1_700_000_000,
            )
        })
        .collect();

    let mut engine = GraphEngine::new(
        notes,
        LinkKind::Internal,
        PerformanceMode::Performance,
        Viewport::new(120.0, 80.0),
        EngineConfig::default(),
        1_760_000_000,
    );

    assert_eq!(engine.optimization_level(), OptimizationLevel::High);
    assert_eq!(engine.graph().nodes.len(), 500);
    assert!(engine.graph().links_are_consistent());

    // Re-running the pipeline with the same inputs is stable.
    engine.recompute();
    assert_eq!(engine.graph().nodes.len(), 500);
}

#[test]
fn dragging_a_node_pins_it_across_recomputes() {
    let mut engine = engine();
    settle(&mut engine);

    let node = engine.graph().nodes.first().expect("node").clone();
    let (sx, sy) = engine.viewport.graph_to_screen(node.x, node.y);

    engine.pointer_down(sx, sy);
    engine.pointer_drag(sx + 30.0, sy + 20.0 * CELL_ASPECT);
    engine.pointer_up(sx + 30.0, sy + 20.0 * CELL_ASPECT, true);

    let dragged = engine.graph().node(&node.id).expect("node").clone();
    assert!((dragged.x - node.x).abs() > 1.0 || (dragged.y - node.y).abs() > 1.0);

    // Pinned position survives a full pipeline rebuild and further ticks.
    engine.set_mode(LinkKind::Tag);
    for _ in 0..50 {
        engine.tick();
    }
    let after = engine.graph().node(&node.id).expect("node");
    assert!((after.x - dragged.x).abs() < f32::EPSILON);
    assert!((after.y - dragged.y).abs() < f32::EPSILON);

    engine.release_override(&node.id);
    assert!(!engine.sim_idle(), "release reheats the simulation");
}

#[test]
fn click_selects_and_escape_style_click_clears() {
    let mut engine = engine();
    settle(&mut engine);

    let node = engine.graph().nodes.first().expect("node").clone();
    let (sx, sy) = engine.viewport.graph_to_screen(node.x, node.y);

    engine.pointer_down(sx, sy);
    engine.pointer_up(sx, sy, false);
    assert_eq!(engine.selected(), Some(&node.id));

    // A click on empty space clears the selection.
    let (far_x, far_y) = engine.viewport.graph_to_screen(5_000.0, 5_000.0);
    engine.pointer_down(far_x, far_y);
    engine.pointer_up(far_x, far_y, false);
    assert_eq!(engine.selected(), None);
}
