// Copyright 2025 the Weave Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Validation, invalidation and edge geometry through the public API.

use std::cell::RefCell;
use std::rc::Rc;

use kurbo::{Point, Rect, Vec2};
use weave_model::{CellId, Geometry, Model, Style, StyleBuilder, keys, values};
use weave_view::{CellState, GraphView, ViewConfig, ViewEvent};

struct Diagram {
    model: Model,
    group: CellId,
    inner: CellId,
    deep: CellId,
    outer: CellId,
    edge: CellId,
    marker: CellId,
}

fn diagram() -> Diagram {
    let mut model = Model::new();
    let layer = model.default_layer();
    let group = model
        .insert_vertex(layer, Geometry::new(10.0, 10.0, 200.0, 100.0), Style::default())
        .unwrap();
    let inner = model
        .insert_vertex(group, Geometry::relative(0.5, 0.5, 20.0, 20.0), Style::default())
        .unwrap();
    let deep = model
        .insert_vertex(inner, Geometry::new(2.0, 3.0, 4.0, 5.0), Style::default())
        .unwrap();
    let outer = model
        .insert_vertex(
            layer,
            Geometry::new(300.0, 0.0, 50.0, 50.0),
            StyleBuilder::new().set(keys::PERIMETER, "ellipse").build(),
        )
        .unwrap();
    let edge = model
        .insert_edge(
            layer,
            Some(inner),
            Some(outer),
            Geometry::edge().with_points([Point::new(250.0, 40.0)]),
            StyleBuilder::new()
                .set(keys::EDGE_STYLE, "elbow")
                .set(keys::END_ARROW, "classic")
                .build(),
        )
        .unwrap();
    let marker = model
        .insert_vertex(edge, Geometry::relative(0.0, 0.0, 6.0, 6.0), Style::default())
        .unwrap();
    model.set_label(group, Some("Group")).unwrap();
    model.set_label(edge, Some("calls")).unwrap();
    model.take_changes();
    Diagram {
        model,
        group,
        inner,
        deep,
        outer,
        edge,
        marker,
    }
}

fn snapshot(view: &GraphView) -> Vec<CellState> {
    let mut states: Vec<CellState> = view.states().cloned().collect();
    states.sort_by_key(CellState::cell);
    states
}

#[test]
fn validate_twice_is_identical() {
    let d = diagram();
    let mut view = GraphView::new();
    view.scale_and_translate(1.5, 7.0, -3.0).unwrap();
    let first_bounds = view.validate(&d.model);
    let first = snapshot(&view);
    assert_eq!(view.validate(&d.model), first_bounds);
    assert_eq!(snapshot(&view), first);

    // Recomputing everything from scratch lands on the same numbers.
    assert_eq!(view.revalidate(&d.model), first_bounds);
    assert_eq!(snapshot(&view), first);
    assert_eq!(view.reload(&d.model), first_bounds);
    assert_eq!(snapshot(&view), first);
}

#[test]
fn absolute_geometry_maps_linearly() {
    let mut model = Model::new();
    let layer = model.default_layer();
    let v = model
        .insert_vertex(layer, Geometry::new(10.0, 20.0, 30.0, 40.0), Style::default())
        .unwrap();
    let mut view = GraphView::new();
    for &(s, dx, dy) in &[(1.0, 0.0, 0.0), (2.0, 5.0, -7.5), (0.3, 11.0, 13.0), (1.7, -100.0, 0.25)] {
        view.scale_and_translate(s, dx, dy).unwrap();
        view.validate(&model);
        let state = view.get_state(v).unwrap();
        assert_eq!(
            (state.x, state.y, state.width, state.height),
            (s * (10.0 + dx), s * (20.0 + dy), s * 30.0, s * 40.0),
            "scale {s}, translate ({dx}, {dy})"
        );
    }
}

#[test]
fn nested_and_relative_geometry() {
    let d = diagram();
    let mut view = GraphView::new();
    view.set_scale(2.0).unwrap();
    view.validate(&d.model);

    let group = view.get_state(d.group).unwrap();
    assert_eq!(group.rect(), Rect::new(20.0, 20.0, 420.0, 220.0));
    // Half of the group's size from its origin.
    let inner = view.get_state(d.inner).unwrap();
    assert_eq!(inner.origin, Point::new(110.0, 60.0));
    assert_eq!(inner.rect(), Rect::new(220.0, 120.0, 260.0, 160.0));
    let deep = view.get_state(d.deep).unwrap();
    assert_eq!(deep.origin, Point::new(112.0, 63.0));
    assert_eq!((deep.width, deep.height), (8.0, 10.0));
}

#[test]
fn invalidating_a_container_reaches_every_descendant_and_edge() {
    let mut d = diagram();
    let mut view = GraphView::new();
    view.validate(&d.model);
    let before = view.state_count();

    d.model
        .set_geometry(d.group, Some(Geometry::new(50.0, 50.0, 200.0, 100.0)))
        .unwrap();
    let changes = d.model.take_changes();
    view.process_changes(&d.model, &changes);

    assert_eq!(view.state_count(), before, "nothing is dropped before validation");
    for cell in [d.group, d.inner, d.deep, d.edge, d.marker] {
        assert!(view.get_state(cell).unwrap().is_invalid(), "{cell:?} is stale");
    }
    assert!(!view.get_state(d.outer).unwrap().is_invalid());

    view.validate(&d.model);
    assert!(view.states().all(|s| !s.is_invalid()));
    assert_eq!(view.get_state(d.deep).unwrap().origin, Point::new(152.0, 103.0));
}

#[test]
fn dangling_edges_follow_config() {
    let mut model = Model::new();
    let layer = model.default_layer();
    let a = model
        .insert_vertex(layer, Geometry::new(0.0, 0.0, 40.0, 20.0), Style::default())
        .unwrap();
    let e = model
        .insert_edge(
            layer,
            Some(a),
            None,
            Geometry::edge().with_terminal_point(Point::new(100.0, 10.0), false),
            Style::default(),
        )
        .unwrap();
    let bare = model
        .insert_edge(layer, Some(a), None, Geometry::edge(), Style::default())
        .unwrap();

    let mut view = GraphView::new();
    view.set_translate(10.0, 0.0).unwrap();
    view.validate(&model);
    let state = view.get_state(e).unwrap();
    assert_eq!(state.points, [Point::new(50.0, 10.0), Point::new(110.0, 10.0)]);
    assert!(view.get_state(bare).is_none(), "no terminal and no point");

    let mut strict = GraphView::with_config(ViewConfig {
        allow_dangling_edges: false,
        ..ViewConfig::default()
    });
    strict.validate(&model);
    assert!(strict.get_state(a).is_some());
    assert!(strict.get_state(e).is_none());
}

#[test]
fn removing_a_terminal_drops_the_edge() {
    let mut d = diagram();
    let mut view = GraphView::new();
    view.validate(&d.model);
    assert!(view.get_state(d.edge).is_some());

    d.model.remove(d.outer).unwrap();
    let changes = d.model.take_changes();
    view.process_changes(&d.model, &changes);
    view.validate(&d.model);
    assert!(view.get_state(d.outer).is_none());
    assert!(view.get_state(d.edge).is_none());
    assert!(view.get_state(d.marker).is_none(), "children of a dropped edge go too");
}

#[test]
fn perimeter_points_are_exact() {
    let mut model = Model::new();
    let layer = model.default_layer();
    let rect = model
        .insert_vertex(layer, Geometry::new(0.0, 0.0, 100.0, 50.0), Style::default())
        .unwrap();
    let ellipse = model
        .insert_vertex(
            layer,
            Geometry::new(200.0, 0.0, 80.0, 40.0),
            StyleBuilder::new().set(keys::PERIMETER, "ellipse").build(),
        )
        .unwrap();
    let mut view = GraphView::new();
    view.validate(&model);

    let r = view.get_state(rect).unwrap();
    assert_eq!(view.perimeter_point(r, Point::new(200.0, 25.0), false, 0.0), Point::new(100.0, 25.0));
    assert_eq!(view.perimeter_point(r, Point::new(50.0, -100.0), false, 0.0), Point::new(50.0, 0.0));

    let e = view.get_state(ellipse).unwrap();
    let center = e.center();
    let p = view.perimeter_point(e, center, false, 0.0);
    assert_eq!(p, center);
}

#[test]
fn perimeter_spacing_grows_the_bounds() {
    let mut model = Model::new();
    let layer = model.default_layer();
    let v = model
        .insert_vertex(
            layer,
            Geometry::new(0.0, 0.0, 100.0, 50.0),
            StyleBuilder::new().set(keys::PERIMETER_SPACING, 5).build(),
        )
        .unwrap();
    let mut view = GraphView::new();
    view.set_scale(2.0).unwrap();
    view.validate(&model);
    let s = view.get_state(v).unwrap();
    assert_eq!(view.perimeter_bounds(s, 1.0), Rect::new(-12.0, -12.0, 212.0, 112.0));
    assert_eq!(view.perimeter_point(s, Point::new(500.0, 50.0), false, 0.0), Point::new(210.0, 50.0));
}

#[test]
fn bounding_boxes_contain_shapes_and_sum_to_graph_bounds() {
    let d = diagram();
    let mut view = GraphView::new();
    view.scale_and_translate(1.25, 3.0, 4.0).unwrap();
    let bounds = view.validate(&d.model);

    let mut union: Option<Rect> = None;
    for state in view.states() {
        let Some(bbox) = state.bounding_box else {
            continue;
        };
        assert_eq!(bbox.union(state.rect()), bbox, "{:?} box holds its shape", state.cell());
        union = Some(union.map_or(bbox, |u| u.union(bbox)));
    }
    assert_eq!(Some(bounds), union);
    assert_eq!(view.graph_bounds(), bounds);
}

#[test]
fn elbow_routes_are_orthogonal() {
    let mut model = Model::new();
    let layer = model.default_layer();
    let a = model
        .insert_vertex(layer, Geometry::new(0.0, 0.0, 40.0, 20.0), Style::default())
        .unwrap();
    let b = model
        .insert_vertex(layer, Geometry::new(100.0, 60.0, 40.0, 20.0), Style::default())
        .unwrap();
    let e = model
        .insert_edge(
            layer,
            Some(a),
            Some(b),
            Geometry::edge(),
            StyleBuilder::new().set(keys::EDGE_STYLE, "elbow").build(),
        )
        .unwrap();
    let mut view = GraphView::new();
    view.validate(&model);

    let state = view.get_state(e).unwrap();
    assert!(view.is_orthogonal(state));
    assert_eq!(
        state.points,
        [
            Point::new(40.0, 10.0),
            Point::new(70.0, 10.0),
            Point::new(70.0, 70.0),
            Point::new(100.0, 70.0),
        ]
    );
    assert_eq!(state.segments, [30.0, 60.0, 30.0]);
    assert_eq!(state.length, 120.0);
}

#[test]
fn self_loops_use_the_loop_style() {
    let mut model = Model::new();
    let layer = model.default_layer();
    let a = model
        .insert_vertex(layer, Geometry::new(0.0, 0.0, 40.0, 20.0), Style::default())
        .unwrap();
    let e = model
        .insert_edge(layer, Some(a), Some(a), Geometry::edge(), Style::default())
        .unwrap();
    let mut view = GraphView::new();
    view.validate(&model);

    let state = view.get_state(e).unwrap();
    assert_eq!(state.points.len(), 4);
    assert_eq!(state.points[1], Point::new(60.0, 0.0));
    assert_eq!(state.points[2], Point::new(60.0, 20.0));
    // Both ends land on the right side of the vertex.
    assert_eq!(state.points[0].x, 40.0);
    assert_eq!(state.points[3].x, 40.0);
}

#[test]
fn connection_constraints_fix_the_ends() {
    let mut model = Model::new();
    let layer = model.default_layer();
    let a = model
        .insert_vertex(layer, Geometry::new(0.0, 0.0, 40.0, 20.0), Style::default())
        .unwrap();
    let b = model
        .insert_vertex(layer, Geometry::new(100.0, 100.0, 40.0, 20.0), Style::default())
        .unwrap();
    let e = model
        .insert_edge(
            layer,
            Some(a),
            Some(b),
            Geometry::edge(),
            StyleBuilder::new()
                .set(keys::EXIT_X, 0.5)
                .set(keys::EXIT_Y, 1)
                .set(keys::ENTRY_X, 0)
                .set(keys::ENTRY_Y, 0.5)
                .build(),
        )
        .unwrap();
    let mut view = GraphView::new();
    view.validate(&model);
    let state = view.get_state(e).unwrap();
    assert_eq!(state.points, [Point::new(20.0, 20.0), Point::new(100.0, 110.0)]);
}

#[test]
fn relative_children_ride_along_edges() {
    let d = diagram();
    let mut view = GraphView::new();
    view.validate(&d.model);
    let edge = view.get_state(d.edge).unwrap();
    let anchor = view.point_on_edge(edge, Some(&Geometry::relative(0.0, 0.0, 0.0, 0.0)));
    let marker = view.get_state(d.marker).unwrap();
    assert!((marker.x - anchor.x).abs() < 1e-9 && (marker.y - anchor.y).abs() < 1e-9);
    // The label anchor of a default edge geometry is the same midpoint.
    assert_eq!(edge.absolute_offset, anchor.to_vec2());
}

#[test]
fn relative_point_inverts_point_on_edge() {
    let mut model = Model::new();
    let layer = model.default_layer();
    let a = model
        .insert_vertex(layer, Geometry::new(0.0, 0.0, 40.0, 20.0), Style::default())
        .unwrap();
    let b = model
        .insert_vertex(layer, Geometry::new(100.0, 0.0, 40.0, 20.0), Style::default())
        .unwrap();
    let e = model
        .insert_edge(layer, Some(a), Some(b), Geometry::edge(), Style::default())
        .unwrap();
    let mut view = GraphView::new();
    view.validate(&model);
    let state = view.get_state(e).unwrap();

    let geo = Geometry::relative(0.5, 5.0, 0.0, 0.0);
    let p = view.point_on_edge(state, Some(&geo));
    assert_eq!(p, Point::new(85.0, 5.0));
    assert_eq!(view.relative_point(&model, state, p), Point::new(0.5, 5.0));
}

#[test]
fn vertex_label_positions() {
    let mut model = Model::new();
    let layer = model.default_layer();
    let v = model
        .insert_vertex(
            layer,
            Geometry::new(0.0, 0.0, 40.0, 20.0).with_offset(Vec2::new(1.0, 2.0)),
            StyleBuilder::new()
                .set(keys::LABEL_POSITION, values::RIGHT)
                .set(keys::VERTICAL_LABEL_POSITION, values::TOP)
                .build(),
        )
        .unwrap();
    let mut view = GraphView::new();
    view.set_scale(2.0).unwrap();
    view.validate(&model);
    let s = view.get_state(v).unwrap();
    assert_eq!(s.absolute_offset, Vec2::new(2.0 + 80.0, 4.0 - 40.0));
}

#[test]
fn events_report_transform_and_root_changes() {
    let d = diagram();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let mut view = GraphView::new();
    let sink = Rc::clone(&seen);
    let id = view.add_listener(move |e| sink.borrow_mut().push(*e));

    view.set_scale(2.0).unwrap();
    view.set_scale(2.0).unwrap();
    view.set_translate(1.0, 2.0).unwrap();
    view.scale_and_translate(2.0, 1.0, 2.0).unwrap();
    view.set_current_root(&d.model, Some(d.group)).unwrap();
    view.set_current_root(&d.model, Some(d.inner)).unwrap();
    view.set_current_root(&d.model, None).unwrap();
    assert!(view.remove_listener(id));
    view.set_scale(3.0).unwrap();

    assert_eq!(
        *seen.borrow(),
        [
            ViewEvent::Scale {
                previous: 1.0,
                scale: 2.0,
            },
            ViewEvent::Translate {
                previous: Vec2::ZERO,
                translate: Vec2::new(1.0, 2.0),
            },
            ViewEvent::Down {
                previous: None,
                root: Some(d.group),
            },
            ViewEvent::Down {
                previous: Some(d.group),
                root: Some(d.inner),
            },
            ViewEvent::Up {
                previous: Some(d.inner),
                root: None,
            },
        ]
    );
}

#[test]
fn current_root_sits_at_the_origin() {
    let d = diagram();
    let mut view = GraphView::new();
    view.set_current_root(&d.model, Some(d.inner)).unwrap();

    assert_eq!(view.current_root(), Some(d.inner));
    let root = view.get_state(d.inner).unwrap();
    assert_eq!(root.rect(), Rect::ZERO);
    assert_eq!(root.bounding_box, None);
    let deep = view.get_state(d.deep).unwrap();
    assert_eq!(deep.rect(), Rect::new(2.0, 3.0, 6.0, 8.0));
    assert!(view.get_state(d.group).is_none(), "cells outside the root have no state");
    assert_eq!(view.graph_bounds(), deep.bounding_box.unwrap());

    let mut other = Model::new();
    let foreign = other.insert_layer();
    other.remove(foreign).unwrap();
    assert!(view.set_current_root(&other, Some(foreign)).is_err());
}

#[test]
fn cells_moved_out_of_the_current_root_lose_their_states() {
    let mut d = diagram();
    let mut view = GraphView::new();
    view.set_current_root(&d.model, Some(d.group)).unwrap();
    assert!(view.get_state(d.inner).is_some());
    assert!(view.get_state(d.deep).is_some());

    let layer = d.model.default_layer();
    d.model.set_parent(d.inner, layer).unwrap();
    let changes = d.model.take_changes();
    view.process_changes(&d.model, &changes);
    view.validate(&d.model);

    assert!(view.get_state(d.inner).is_none());
    assert!(view.get_state(d.deep).is_none(), "descendants leave with it");
    assert!(view.states().all(|s| !s.is_invalid()));
    assert!(view.get_state(d.group).is_some());
}

#[test]
fn edges_ending_on_the_current_root_are_hidden() {
    let mut d = diagram();
    let back = d
        .model
        .insert_edge(d.group, Some(d.inner), Some(d.group), Geometry::edge(), Style::default())
        .unwrap();
    d.model.take_changes();
    let mut view = GraphView::new();
    view.validate(&d.model);
    assert!(view.get_state(back).is_some());

    view.set_current_root(&d.model, Some(d.group)).unwrap();
    assert!(view.get_state(d.inner).is_some());
    assert!(view.get_state(back).is_none());
}

#[test]
fn collapsed_containers_capture_their_edges() {
    let mut d = diagram();
    let mut view = GraphView::new();
    view.validate(&d.model);

    d.model.set_collapsed(d.group, true).unwrap();
    let changes = d.model.take_changes();
    view.process_changes(&d.model, &changes);
    view.validate(&d.model);

    assert!(view.get_state(d.inner).is_none());
    let edge = view.get_state(d.edge).unwrap();
    assert_eq!(edge.visible_source, Some(d.group));
    let group = view.get_state(d.group).unwrap();
    let start = edge.points[0];
    assert!(
        start.x >= group.x && start.x <= group.x + group.width,
        "edge starts on the collapsed group"
    );
}
