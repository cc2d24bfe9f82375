// Copyright 2025 the Weave Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Temporary states never leak into the live cache.

use std::panic::{AssertUnwindSafe, catch_unwind};

use kurbo::{Point, Rect};
use weave_model::{CellId, Geometry, Model, Style, StyleBuilder, keys};
use weave_view::{CellState, Direction, GraphView};

fn model() -> (Model, CellId, CellId, CellId) {
    let mut model = Model::new();
    let layer = model.default_layer();
    let group = model
        .insert_vertex(layer, Geometry::new(100.0, 100.0, 200.0, 100.0), Style::default())
        .unwrap();
    let child = model
        .insert_vertex(group, Geometry::new(10.0, 20.0, 30.0, 40.0), Style::default())
        .unwrap();
    let other = model
        .insert_vertex(
            layer,
            Geometry::new(500.0, 0.0, 50.0, 50.0),
            StyleBuilder::new().set(keys::PERIMETER, "fragile").build(),
        )
        .unwrap();
    model
        .insert_edge(layer, Some(child), Some(other), Geometry::edge(), Style::default())
        .unwrap();
    (model, group, child, other)
}

fn snapshot(view: &GraphView) -> (Vec<CellState>, f64, Rect) {
    let mut states: Vec<CellState> = view.states().cloned().collect();
    states.sort_by_key(CellState::cell);
    (states, view.scale(), view.graph_bounds())
}

fn fragile(bounds: Rect, _: Direction, _: Point, _: bool) -> Point {
    bounds.center()
}

fn failing(_: Rect, _: Direction, _: Point, _: bool) -> Point {
    panic!("perimeter failed")
}

#[test]
fn subset_is_validated_at_the_requested_scale() {
    let (model, _, child, other) = model();
    let mut view = GraphView::new();
    view.registry_mut().register_perimeter("fragile", fragile);
    view.validate(&model);
    let before = snapshot(&view);

    let (rect, bounds, count) = view
        .with_temporary_states(&model, 2.0, &[child], |v| {
            (v.get_state(child).map(CellState::rect), v.graph_bounds(), v.state_count())
        })
        .unwrap();
    // The container resolves first, so the child keeps its nested position.
    assert_eq!(rect, Some(Rect::new(220.0, 240.0, 280.0, 320.0)));
    assert_eq!(bounds, Rect::new(219.0, 239.0, 281.0, 321.0));
    assert!(count >= 2, "child and its container");

    assert_eq!(snapshot(&view), before);
    assert!(view.get_state(other).is_some());
}

#[test]
fn guard_derefs_to_the_temporary_view() {
    let (model, group, _, other) = model();
    let mut view = GraphView::new();
    view.registry_mut().register_perimeter("fragile", fragile);
    view.validate(&model);
    let before = snapshot(&view);
    {
        let temp = view.temporary_states(&model, 0.5, &[group]).unwrap();
        assert_eq!(temp.scale(), 0.5);
        assert!(temp.get_state(other).is_none(), "only the subset is validated");
        assert_eq!(
            temp.get_state(group).map(CellState::rect),
            Some(Rect::new(50.0, 50.0, 150.0, 100.0))
        );
    }
    assert_eq!(snapshot(&view), before);
}

#[test]
fn live_cache_survives_a_panicking_scope() {
    let (model, _, child, _) = model();
    let mut view = GraphView::new();
    view.registry_mut().register_perimeter("fragile", fragile);
    view.validate(&model);
    let before = snapshot(&view);

    let result = catch_unwind(AssertUnwindSafe(|| {
        view.with_temporary_states(&model, 3.0, &[child], |_| panic!("export failed"))
    }));
    assert!(result.is_err());
    assert_eq!(snapshot(&view), before);
}

#[test]
fn live_cache_survives_a_panicking_validation() {
    let (model, _, child, other) = model();
    let mut view = GraphView::new();
    view.registry_mut().register_perimeter("fragile", fragile);
    view.validate(&model);
    let before = snapshot(&view);

    // Live states keep their resolved functions until recomputed.
    view.registry_mut().register_perimeter("fragile", failing);
    let layer = model.default_layer();
    let result = catch_unwind(AssertUnwindSafe(|| {
        view.temporary_states(&model, 1.0, &[layer]).map(|_| ())
    }));
    assert!(result.is_err(), "the edge into {other:?} hits the failing perimeter");
    assert_eq!(snapshot(&view), before);
    assert!(view.get_state(child).is_some());
}

#[test]
fn invalid_scale_leaves_the_view_alone() {
    let (model, group, _, _) = model();
    let mut view = GraphView::new();
    view.registry_mut().register_perimeter("fragile", fragile);
    view.validate(&model);
    let before = snapshot(&view);
    assert!(view.temporary_states(&model, -1.0, &[group]).is_err());
    assert_eq!(snapshot(&view), before);
}
