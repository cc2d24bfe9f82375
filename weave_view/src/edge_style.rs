// Copyright 2025 the Weave Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Routing functions: compute the bend points of an edge.
//!
//! A routing function receives a [`Route`] and appends device-space bend
//! points to its output. It never writes the terminal points themselves; the
//! view projects floating terminals onto their perimeters afterwards, aiming
//! at the nearest bend.

use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Point, Rect};
use weave_model::{Style, keys, values};
use weave_perimeter::Direction;

use crate::CellState;

/// Signature of a routing function.
pub type EdgeStyleFn = fn(route: &Route<'_>, out: &mut Vec<Point>);

/// Default segment length of entity-relation routes, in model units.
pub const ENTITY_SEGMENT: f64 = 30.0;

/// Built-in routing functions with their orthogonality.
pub const BUILTINS: &[(&str, EdgeStyleFn, bool)] = &[
    ("elbow", elbow, true),
    ("sideToSide", side_to_side, true),
    ("topToBottom", top_to_bottom, true),
    ("entityRelation", entity_relation, true),
    ("segment", segment, true),
    ("orthogonal", orthogonal, true),
    ("loop", loop_route, false),
    ("none", none, false),
];

/// What a routing function sees of one terminal.
#[derive(Clone, Copy, Debug)]
pub struct TerminalBox<'a> {
    /// Device-space bounds.
    pub bounds: Rect,
    /// Point routes aim at.
    pub routing_center: Point,
    /// The terminal's style, if it is a cell.
    pub style: Option<&'a Style>,
}

impl<'a> TerminalBox<'a> {
    /// Box of a terminal cell state.
    #[must_use]
    pub fn of(state: &'a CellState) -> Self {
        Self {
            bounds: state.rect(),
            routing_center: state.routing_center(),
            style: Some(&state.style.raw),
        }
    }

    /// Zero-size box at a fixed point.
    #[must_use]
    pub fn at(point: Point) -> Self {
        Self {
            bounds: Rect::from_points(point, point),
            routing_center: point,
            style: None,
        }
    }

    /// Returns `true` if `p` lies in the bounds, borders included.
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.bounds.x0 && p.x <= self.bounds.x1 && p.y >= self.bounds.y0 && p.y <= self.bounds.y1
    }

    fn port_constraint(&self) -> Option<Direction> {
        self.style
            .and_then(|s| s.text(keys::PORT_CONSTRAINT))
            .and_then(Direction::from_name)
    }
}

/// Input of a routing function.
#[derive(Clone, Copy, Debug)]
pub struct Route<'a> {
    /// The edge being routed. Its `points` are not filled in yet.
    pub edge: &'a CellState,
    /// Visible source terminal.
    pub source: Option<TerminalBox<'a>>,
    /// Visible target terminal.
    pub target: Option<TerminalBox<'a>>,
    /// Control points in device space.
    pub points: &'a [Point],
    /// Fixed source point, from a connection constraint or a dangling end.
    pub source_point: Option<Point>,
    /// Fixed target point.
    pub target_point: Option<Point>,
    /// View scale.
    pub scale: f64,
    /// Grid size in model units.
    pub grid_size: f64,
}

impl<'a> Route<'a> {
    /// The source (`is_source`) or target end as a box: the fixed point if
    /// there is one, otherwise the terminal.
    #[must_use]
    pub fn end(&self, is_source: bool) -> Option<TerminalBox<'a>> {
        let (point, terminal) = if is_source {
            (self.source_point, self.source)
        } else {
            (self.target_point, self.target)
        };
        point.map(TerminalBox::at).or(terminal)
    }

    fn hint(&self) -> Option<Point> {
        self.points.first().copied()
    }
}

/// Passes the control points through unchanged.
pub fn none(route: &Route<'_>, out: &mut Vec<Point>) {
    out.extend_from_slice(route.points);
}

/// Self-reference loop on the source terminal.
///
/// The loop is `segment` model units (default: the grid size) wide. East
/// loops hang off the left side, west loops (the default) off the right,
/// north loops above and south loops below. A control point outside the
/// terminal moves the loop there.
pub fn loop_route(route: &Route<'_>, out: &mut Vec<Point>) {
    if route.source_point.is_some() && route.target_point.is_some() {
        out.extend_from_slice(route.points);
        return;
    }
    let Some(source) = route.source else {
        return;
    };
    let s = source.bounds;
    let pt = route.hint().filter(|p| !source.contains(*p));
    let seg = route
        .edge
        .style
        .number_or(keys::SEGMENT, route.grid_size)
        * route.scale;
    let dir = route
        .edge
        .style
        .text(keys::DIRECTION)
        .and_then(Direction::from_name)
        .unwrap_or(Direction::West);

    let (mut x, mut y) = (source.routing_center.x, source.routing_center.y);
    let (mut dx, mut dy) = if dir.is_vertical() { (seg, 0.0) } else { (0.0, seg) };

    match pt {
        Some(p) if p.x < s.x0 || p.x > s.x1 => {
            x = p.x;
            dy = (y - p.y).abs().max(dy);
        }
        Some(p) => {
            dx = (x - p.x).abs().max(dy);
            y = p.y;
            dy = 0.0;
        }
        None => match dir {
            Direction::North => y = s.y0 - 2.0 * dx,
            Direction::South => y = s.y1 + 2.0 * dx,
            Direction::East => x = s.x0 - 2.0 * dy,
            Direction::West => x = s.x1 + 2.0 * dy,
        },
    }

    out.push(Point::new(x - dx, y - dy));
    out.push(Point::new(x + dx, y + dy));
}

/// Picks [`top_to_bottom`] or [`side_to_side`].
///
/// Vertical routing is used when the control point lies above or below both
/// terminals, when the terminals' horizontal extents meet exactly, or when
/// the style says `elbow=vertical`, unless the control point lies left or
/// right of both terminals.
pub fn elbow(route: &Route<'_>, out: &mut Vec<Point>) {
    let mut vertical = false;
    let mut horizontal = false;
    if let (Some(s), Some(t)) = (route.source, route.target) {
        let (s, t) = (s.bounds, t.bounds);
        if let Some(p) = route.hint() {
            let left = s.x0.min(t.x0);
            let right = s.x1.max(t.x1);
            let top = s.y0.min(t.y0);
            let bottom = s.y1.max(t.y1);
            vertical = p.y < top || p.y > bottom;
            horizontal = p.x < left || p.x > right;
        } else {
            vertical = s.x0.max(t.x0) == s.x1.min(t.x1);
            if !vertical {
                horizontal = s.y0.max(t.y0) == s.y1.min(t.y1);
            }
        }
    }
    let elbow_vertical = route.edge.style.text(keys::ELBOW) == Some(values::VERTICAL);
    if !horizontal && (vertical || elbow_vertical) {
        top_to_bottom(route, out);
    } else {
        side_to_side(route, out);
    }
}

/// One vertical channel between the terminals.
///
/// The channel runs at the control point's x, or midway between the
/// terminals. Bends that would fall inside a terminal are dropped.
pub fn side_to_side(route: &Route<'_>, out: &mut Vec<Point>) {
    let (Some(s), Some(t)) = (route.end(true), route.end(false)) else {
        return;
    };
    let pt = route.hint();
    let l = s.bounds.x0.max(t.bounds.x0);
    let r = s.bounds.x1.min(t.bounds.x1);
    let x = pt.map_or_else(|| (r + (l - r) / 2.0).round(), |p| p.x);

    let mut y1 = s.routing_center.y;
    let mut y2 = t.routing_center.y;
    if let Some(p) = pt {
        if p.y >= s.bounds.y0 && p.y <= s.bounds.y1 {
            y1 = p.y;
        }
        if p.y >= t.bounds.y0 && p.y <= t.bounds.y1 {
            y2 = p.y;
        }
    }

    let clear = |p: Point| !s.contains(p) && !t.contains(p);
    let start = out.len();
    for y in [y1, y2] {
        let p = Point::new(x, y);
        if clear(p) {
            out.push(p);
        }
    }
    if out.len() == start {
        if let Some(p) = pt {
            let p = Point::new(x, p.y);
            if clear(p) {
                out.push(p);
            }
        } else {
            let top = s.bounds.y0.max(t.bounds.y0);
            let bottom = s.bounds.y1.min(t.bounds.y1);
            out.push(Point::new(x, top + (bottom - top) / 2.0));
        }
    }
}

/// One horizontal channel between the terminals.
///
/// The channel runs at the control point's y, or midway between the
/// terminals. Bends that would fall inside a terminal are dropped.
pub fn top_to_bottom(route: &Route<'_>, out: &mut Vec<Point>) {
    let (Some(s), Some(t)) = (route.end(true), route.end(false)) else {
        return;
    };
    let pt = route.hint();
    let top = s.bounds.y0.max(t.bounds.y0);
    let bottom = s.bounds.y1.min(t.bounds.y1);

    let mut x = s.routing_center.x;
    if let Some(p) = pt
        && p.x >= s.bounds.x0
        && p.x <= s.bounds.x1
    {
        x = p.x;
    }
    let y = pt.map_or_else(|| (bottom + (top - bottom) / 2.0).round(), |p| p.y);

    let clear = |p: Point| !s.contains(p) && !t.contains(p);
    let start = out.len();
    let p = Point::new(x, y);
    if clear(p) {
        out.push(p);
    }

    x = match pt {
        Some(p) if p.x >= t.bounds.x0 && p.x <= t.bounds.x1 => p.x,
        _ => t.routing_center.x,
    };
    let p = Point::new(x, y);
    if clear(p) {
        out.push(p);
    }

    if out.len() == start {
        if let Some(p) = pt {
            let p = Point::new(p.x, y);
            if clear(p) {
                out.push(p);
            }
        } else {
            let l = s.bounds.x0.max(t.bounds.x0);
            let r = s.bounds.x1.min(t.bounds.x1);
            out.push(Point::new(l + (r - l) / 2.0, y));
        }
    }
}

/// Entity-relation connector.
///
/// Each end leaves its terminal horizontally by `segment` model units
/// (default [`ENTITY_SEGMENT`]) on the side facing the other terminal, or
/// the side named by the terminal's `portConstraint`. The two stubs are
/// joined by a vertical segment.
pub fn entity_relation(route: &Route<'_>, out: &mut Vec<Point>) {
    let seg = route.edge.style.number_or(keys::SEGMENT, ENTITY_SEGMENT) * route.scale;
    let p0 = route.source_point;
    let pe = route.target_point;

    let mut source_left = false;
    let mut target_left = true;
    if let (Some(s), Some(t)) = (route.source, route.target) {
        source_left = pe.map_or(t.bounds.x1, |p| p.x) < p0.map_or(s.bounds.x0, |p| p.x);
        target_left = p0.map_or(s.bounds.x1, |p| p.x) < pe.map_or(t.bounds.x0, |p| p.x);
    }
    if p0.is_none()
        && let Some(d) = route.source.and_then(|s| s.port_constraint())
    {
        match d {
            Direction::West => source_left = true,
            Direction::East => source_left = false,
            _ => {}
        }
    }
    if pe.is_none()
        && let Some(d) = route.target.and_then(|t| t.port_constraint())
    {
        match d {
            Direction::West => target_left = true,
            Direction::East => target_left = false,
            _ => {}
        }
    }

    let (Some(s), Some(t)) = (route.end(true), route.end(false)) else {
        return;
    };
    let x0 = if source_left { s.bounds.x0 } else { s.bounds.x1 };
    let y0 = s.routing_center.y;
    let xe = if target_left { t.bounds.x0 } else { t.bounds.x1 };
    let ye = t.routing_center.y;

    let dep = Point::new(if source_left { x0 - seg } else { x0 + seg }, y0);
    let arr = Point::new(if target_left { xe - seg } else { xe + seg }, ye);

    if source_left == target_left {
        let x = if source_left {
            x0.min(xe) - seg
        } else {
            x0.max(xe) + seg
        };
        out.push(Point::new(x, y0));
        out.push(Point::new(x, ye));
    } else if (dep.x < arr.x) == source_left {
        let mid_y = y0 + (ye - y0) / 2.0;
        out.extend([dep, Point::new(dep.x, mid_y), Point::new(arr.x, mid_y), arr]);
    } else {
        out.extend([dep, arr]);
    }
}

/// Axis-aligned segments through the control points.
///
/// Each control point fixes the position of one segment; segments alternate
/// between horizontal and vertical, starting with whichever direction the
/// first control point lies in from the source. Without control points this
/// is [`orthogonal`].
pub fn segment(route: &Route<'_>, out: &mut Vec<Point>) {
    let Some(first) = route.hint() else {
        orthogonal(route, out);
        return;
    };
    let Some(start) = route.end(true).map(|s| s.routing_center) else {
        return;
    };

    let mut cur = start;
    let mut horizontal = (first.x - cur.x).abs() >= (first.y - cur.y).abs();
    let mut push = |p: Point, cur: &mut Point| {
        if p != *cur {
            out.push(p);
            *cur = p;
        }
    };
    for &hint in route.points {
        let bend = if horizontal {
            Point::new(hint.x, cur.y)
        } else {
            Point::new(cur.x, hint.y)
        };
        push(bend, &mut cur);
        horizontal = !horizontal;
    }
    if let Some(end) = route.end(false).map(|t| t.routing_center) {
        let bend = if horizontal {
            Point::new(end.x, cur.y)
        } else {
            Point::new(cur.x, end.y)
        };
        if bend != end {
            push(bend, &mut cur);
        }
    }
}

/// Orthogonal connector.
///
/// With control points this is [`segment`]. Otherwise the route leaves the
/// source horizontally when the terminals are apart horizontally (vertically
/// when they are apart vertically) and turns twice midway, giving a Z. A
/// `portConstraint` on the source picks the exit axis; a perpendicular
/// constraint on the target turns the Z into an L.
pub fn orthogonal(route: &Route<'_>, out: &mut Vec<Point>) {
    if !route.points.is_empty() {
        segment(route, out);
        return;
    }
    let (Some(s), Some(t)) = (route.end(true), route.end(false)) else {
        return;
    };
    let (sb, tb) = (s.bounds, t.bounds);
    let (sc, tc) = (s.routing_center, t.routing_center);
    let apart_x = sb.x1 < tb.x0 || tb.x1 < sb.x0;
    let apart_y = sb.y1 < tb.y0 || tb.y1 < sb.y0;

    let source_axis = route
        .source
        .filter(|_| route.source_point.is_none())
        .and_then(|b| b.port_constraint())
        .map(|d| !d.is_vertical());
    let target_axis = route
        .target
        .filter(|_| route.target_point.is_none())
        .and_then(|b| b.port_constraint())
        .map(|d| !d.is_vertical());
    let horizontal = source_axis.unwrap_or(if apart_x {
        true
    } else if apart_y {
        false
    } else {
        (tc.x - sc.x).abs() >= (tc.y - sc.y).abs()
    });

    if target_axis == Some(!horizontal) {
        let corner = if horizontal {
            Point::new(tc.x, sc.y)
        } else {
            Point::new(sc.x, tc.y)
        };
        out.push(corner);
        return;
    }

    if horizontal {
        if sc.y == tc.y {
            return;
        }
        let mid = if sb.x1 < tb.x0 {
            (sb.x1 + tb.x0) / 2.0
        } else if tb.x1 < sb.x0 {
            (tb.x1 + sb.x0) / 2.0
        } else {
            (sc.x + tc.x) / 2.0
        };
        out.push(Point::new(mid, sc.y));
        out.push(Point::new(mid, tc.y));
    } else {
        if sc.x == tc.x {
            return;
        }
        let mid = if sb.y1 < tb.y0 {
            (sb.y1 + tb.y0) / 2.0
        } else if tb.y1 < sb.y0 {
            (tb.y1 + sb.y0) / 2.0
        } else {
            (sc.y + tc.y) / 2.0
        };
        out.push(Point::new(sc.x, mid));
        out.push(Point::new(tc.x, mid));
    }
}
