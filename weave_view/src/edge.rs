// Copyright 2025 the Weave Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Edge geometry: terminal points, routing, floating ends and metrics.

use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Affine, Line, ParamCurveNearest, Point, Rect, Vec2};
use smallvec::SmallVec;
use weave_model::{Geometry, GraphModel, keys};

use crate::edge_style::{Route, TerminalBox};
use crate::{CellState, GraphView};

type Points = SmallVec<[Option<Point>; 8]>;

impl GraphView {
    /// Computes the points, metrics and label anchor of an edge state.
    pub(crate) fn update_edge_state<M: GraphModel + ?Sized>(
        &self,
        model: &M,
        state: &mut CellState,
        geo: &Geometry,
    ) -> Result<(), &'static str> {
        let source = state.visible_source.and_then(|c| self.states.get(&c));
        let target = state.visible_target.and_then(|c| self.states.get(&c));

        for (is_source, terminal) in [(true, source), (false, target)] {
            if terminal.is_some() {
                continue;
            }
            if model.terminal(state.cell, is_source).is_some() {
                return Err("terminal has no visible state");
            }
            if !self.config.allow_dangling_edges {
                return Err("dangling edges are disallowed");
            }
            if geo.terminal_point(is_source).is_none() {
                return Err("dangling end has no terminal point");
            }
        }

        let p0 = self.fixed_terminal_point(state, source, geo, true);
        let pe = self.fixed_terminal_point(state, target, geo, false);
        let controls: SmallVec<[Point; 8]> = geo
            .points
            .iter()
            .map(|p| self.transform_control_point(state, *p))
            .collect();

        let mut pts = Points::new();
        pts.push(p0);
        let is_loop = source.is_some() && state.visible_source == state.visible_target;
        let edge_style = if is_loop && geo.points.len() < 2 {
            state.style.loop_style
        } else {
            state.style.edge_style
        };
        if let Some(edge_style) = edge_style {
            let route = Route {
                edge: state,
                source: source.map(TerminalBox::of),
                target: target.map(TerminalBox::of),
                points: &controls,
                source_point: p0,
                target_point: pe,
                scale: self.scale,
                grid_size: self.config.grid_size,
            };
            let mut bends = Vec::new();
            (edge_style.route)(&route, &mut bends);
            pts.extend(bends.into_iter().map(Some));
        } else {
            pts.extend(controls.iter().copied().map(Some));
        }
        pts.push(pe);

        let orthogonal = self.is_orthogonal(state);
        if pe.is_none()
            && let Some(t) = target
        {
            let p = self.floating_terminal_point(state, &pts, t, source, false, orthogonal);
            if let Some(last) = pts.last_mut() {
                *last = Some(p);
            }
        }
        if p0.is_none()
            && let Some(s) = source
        {
            let p = self.floating_terminal_point(state, &pts, s, target, true, orthogonal);
            pts[0] = Some(p);
        }

        let Some(points) = pts.into_iter().collect::<Option<Vec<Point>>>() else {
            return Err("unresolved terminal point");
        };
        state.points = points;
        update_edge_bounds(state);
        state.absolute_offset = edge_label_anchor(state, geo, self.scale).to_vec2();
        Ok(())
    }

    /// Fixed end of an edge: a connection constraint on the terminal, or the
    /// stored terminal point of a dangling end.
    fn fixed_terminal_point(
        &self,
        edge: &CellState,
        terminal: Option<&CellState>,
        geo: &Geometry,
        is_source: bool,
    ) -> Option<Point> {
        match terminal {
            Some(t) => self.connection_point(edge, t, is_source),
            None => geo
                .terminal_point(is_source)
                .map(|p| self.transform_control_point(edge, p)),
        }
    }

    /// Point named by `exitX`/`exitY` (source) or `entryX`/`entryY` (target).
    fn connection_point(
        &self,
        edge: &CellState,
        terminal: &CellState,
        is_source: bool,
    ) -> Option<Point> {
        let (kx, ky, kp) = if is_source {
            (keys::EXIT_X, keys::EXIT_Y, keys::EXIT_PERIMETER)
        } else {
            (keys::ENTRY_X, keys::ENTRY_Y, keys::ENTRY_PERIMETER)
        };
        let fx = edge.style.raw.number(kx)?;
        let fy = edge.style.raw.number(ky)?;

        let bounds = self.perimeter_bounds(terminal, 0.0);
        let center = bounds.center();
        let mut p = Point::new(
            bounds.x0 + fx * bounds.width(),
            bounds.y0 + fy * bounds.height(),
        );
        if edge.style.flag_or(kp, true) {
            p = self.perimeter_point(terminal, p, false, 0.0);
        }
        let alpha = terminal.style.rotation_radians();
        if alpha != 0.0 {
            p = Affine::rotate_about(alpha, center) * p;
        }
        Some(p)
    }

    fn floating_terminal_point(
        &self,
        edge: &CellState,
        pts: &[Option<Point>],
        start: &CellState,
        end: Option<&CellState>,
        is_source: bool,
        orthogonal: bool,
    ) -> Point {
        let alpha = start.style.rotation_radians();
        let center = start.center();
        let mut next = next_point(pts, end, is_source);
        if alpha != 0.0 {
            next = next.map(|p| Affine::rotate_about(-alpha, center) * p);
        }
        let spacing = if is_source {
            keys::SOURCE_PERIMETER_SPACING
        } else {
            keys::TARGET_PERIMETER_SPACING
        };
        let border = edge.style.number_or(keys::PERIMETER_SPACING, 0.0)
            + edge.style.number_or(spacing, 0.0);
        let p = match next {
            Some(next) => self.perimeter_point(start, next, alpha == 0.0 && orthogonal, border),
            None => center,
        };
        if alpha != 0.0 {
            Affine::rotate_about(alpha, center) * p
        } else {
            p
        }
    }

    /// Projects the ray from `terminal`'s center towards `next` onto its
    /// perimeter, grown by `border` model units plus the terminal's own
    /// `perimeterSpacing`.
    ///
    /// Terminals without a perimeter function, or with an empty rectangle,
    /// answer their center.
    #[must_use]
    pub fn perimeter_point(
        &self,
        terminal: &CellState,
        next: Point,
        orthogonal: bool,
        border: f64,
    ) -> Point {
        if let Some(perimeter) = terminal.style.perimeter {
            let bounds = self.perimeter_bounds(terminal, border);
            if bounds.width() > 0.0 || bounds.height() > 0.0 {
                return perimeter(bounds, terminal.style.direction, next, orthogonal);
            }
        }
        terminal.center()
    }

    /// The state rectangle grown by `border` plus the state's
    /// `perimeterSpacing`, both in model units.
    #[must_use]
    pub fn perimeter_bounds(&self, state: &CellState, border: f64) -> Rect {
        let grow = (border + state.style.number_or(keys::PERIMETER_SPACING, 0.0)) * self.scale;
        state.rect().inflate(grow, grow)
    }

    /// Maps a model-space control point of `edge` to device space.
    #[must_use]
    pub fn transform_control_point(&self, edge: &CellState, point: Point) -> Point {
        let t = self.translate;
        Point::new(
            self.scale * (point.x + t.x + edge.origin.x),
            self.scale * (point.y + t.y + edge.origin.y),
        )
    }

    /// Returns `true` if floating ends of `edge` are projected orthogonally:
    /// style `orthogonal`, or else the routing function's own flag.
    #[must_use]
    pub fn is_orthogonal(&self, edge: &CellState) -> bool {
        edge.style
            .raw
            .flag(keys::ORTHOGONAL)
            .unwrap_or_else(|| edge.style.edge_style.is_some_and(|e| e.orthogonal))
    }

    /// Device-space point for a relative geometry along `state`.
    ///
    /// For an edge state with a relative (or absent) geometry, `x` in
    /// `-1..=1` walks the edge from source to target by arclength, `y` is a
    /// perpendicular distance and the offset is added in model units. For
    /// other states the result is the center plus the offset.
    #[must_use]
    pub fn point_on_edge(&self, state: &CellState, geo: Option<&Geometry>) -> Point {
        point_on_edge(state, geo, self.scale)
    }

    /// Inverse of [`point_on_edge`](Self::point_on_edge): the relative
    /// position on `edge` that is closest to the device-space `point`.
    ///
    /// Returns the origin unless the edge has a relative geometry and at
    /// least two points.
    #[must_use]
    pub fn relative_point<M: GraphModel + ?Sized>(
        &self,
        model: &M,
        edge: &CellState,
        point: Point,
    ) -> Point {
        let relative = model.geometry(edge.cell).is_some_and(|g| g.relative);
        let pts = &edge.points;
        if !relative || pts.len() < 2 || edge.segments.len() + 1 != pts.len() {
            return Point::ZERO;
        }

        // Closest segment, the later one on ties.
        let mut index = 0;
        let mut min_dist = f64::INFINITY;
        let mut length = 0.0;
        let mut walked = 0.0;
        for (i, w) in pts.windows(2).enumerate() {
            let dist = seg_dist_sq(w[0], w[1], point);
            if dist <= min_dist {
                min_dist = dist;
                index = i;
                length = walked;
            }
            walked += edge.segments[i];
        }

        let seg = edge.segments[index];
        let p0 = pts[index];
        let pe = pts[index + 1];
        let d = p0 - pe;
        let dot = (p0 - point).dot(d);
        let projlen = if dot <= 0.0 {
            0.0
        } else {
            (dot * dot / d.hypot2()).sqrt().min(seg)
        };

        let mut y_distance = seg_dist_sq(p0, pe, point).sqrt();
        if relative_ccw(p0, pe, point) < 0 {
            y_distance = -y_distance;
        }
        let total = edge.length;
        if total == 0.0 {
            return Point::new(0.0, y_distance / self.scale);
        }
        Point::new(
            ((total / 2.0 - length - projlen) / total) * -2.0,
            y_distance / self.scale,
        )
    }
}

/// Point to aim the floating end at: the nearest known point on the other
/// side of the polyline, or the opposite terminal's center.
fn next_point(pts: &[Option<Point>], opposite: Option<&CellState>, is_source: bool) -> Option<Point> {
    let n = pts.len();
    let point = if n > 0 && (is_source || n > 2 || opposite.is_none()) {
        let i = if is_source { 1.min(n - 1) } else { n.saturating_sub(2) };
        pts[i]
    } else {
        None
    };
    point.or_else(|| opposite.map(CellState::center))
}

fn update_edge_bounds(state: &mut CellState) {
    let (Some(&p0), Some(&pe)) = (state.points.first(), state.points.last()) else {
        return;
    };
    state.terminal_distance = if p0 == pe { 0.0 } else { (pe - p0).hypot() };

    let mut min = p0;
    let mut max = p0;
    let mut length = 0.0;
    state.segments.clear();
    for w in state.points.windows(2) {
        let segment = (w[1] - w[0]).hypot();
        state.segments.push(segment);
        length += segment;
        min = Point::new(min.x.min(w[1].x), min.y.min(w[1].y));
        max = Point::new(max.x.max(w[1].x), max.y.max(w[1].y));
    }
    state.length = length;

    state.x = min.x;
    state.y = min.y;
    state.width = (max.x - min.x).max(1.0);
    state.height = (max.y - min.y).max(1.0);
}

fn edge_label_anchor(state: &CellState, geo: &Geometry, scale: f64) -> Point {
    if geo.relative {
        return point_on_edge(state, Some(geo), scale);
    }
    match (state.points.first(), state.points.last()) {
        (Some(&p0), Some(&pe)) => p0.midpoint(pe) + geo.offset_or_zero() * scale,
        _ => state.center(),
    }
}

pub(crate) fn point_on_edge(state: &CellState, geo: Option<&Geometry>, scale: f64) -> Point {
    let relative = geo.is_none_or(|g| g.relative);
    let count = state.points.len();
    if !state.edge || state.segments.is_empty() || count != state.segments.len() + 1 || !relative {
        return state.center() + geo.map_or(Vec2::ZERO, Geometry::offset_or_zero);
    }

    let gx = geo.map_or(0.0, |g| g.x / 2.0);
    let dist = ((gx + 0.5) * state.length).round();
    let mut segment = state.segments[0];
    let mut length = 0.0;
    let mut index = 1;
    while dist >= (length + segment).round() && index < count - 1 {
        length += segment;
        segment = state.segments[index];
        index += 1;
    }
    let factor = if segment == 0.0 {
        0.0
    } else {
        (dist - length) / segment
    };

    let p0 = state.points[index - 1];
    let pe = state.points[index];
    let (gy, offset) = geo.map_or((0.0, Vec2::ZERO), |g| (g.y, g.offset_or_zero()));
    let d = pe - p0;
    let (nx, ny) = if segment == 0.0 {
        (0.0, 0.0)
    } else {
        (d.y / segment, d.x / segment)
    };
    Point::new(
        p0.x + d.x * factor + (nx * gy + offset.x) * scale,
        p0.y + d.y * factor - (ny * gy - offset.y) * scale,
    )
}

fn seg_dist_sq(p0: Point, p1: Point, p: Point) -> f64 {
    Line::new(p0, p1).nearest(p, 1e-9).distance_sq
}

/// Which side of the line through `p0` and `p1` the point `p` is on:
/// `-1`, `0` (on the segment) or `1`.
fn relative_ccw(p0: Point, p1: Point, p: Point) -> i8 {
    let s = p1 - p0;
    let mut v = p - p0;
    let mut ccw = v.x * s.y - v.y * s.x;
    if ccw == 0.0 {
        ccw = v.dot(s);
        if ccw > 0.0 {
            v -= s;
            ccw = v.dot(s).max(0.0);
        }
    }
    if ccw < 0.0 {
        -1
    } else if ccw > 0.0 {
        1
    } else {
        0
    }
}
