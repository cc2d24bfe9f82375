// Copyright 2025 the Weave Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Model-space geometry records.

use alloc::vec::Vec;

use kurbo::{Point, Vec2};

/// Model-space geometry of a cell.
///
/// For vertices, `x`/`y` are the position relative to the parent's origin and
/// `width`/`height` the unscaled size. When `relative` is set, `x`/`y` are
/// instead fractions of the parent's size (for a vertex parent) or, for a
/// parent edge, a position along the edge: `x` in `-1..=1` runs from source
/// to target and `y` is the orthogonal distance in model units.
///
/// For edges, `points` are the intermediate control points and
/// `source_point`/`target_point` the stored terminal points used when the
/// corresponding terminal is absent. Edge labels use `x`/`y`/`offset` as for a
/// relative child of the edge.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Geometry {
    /// X position (absolute or relative, see `relative`).
    pub x: f64,
    /// Y position (absolute or relative, see `relative`).
    pub y: f64,
    /// Unscaled width.
    pub width: f64,
    /// Unscaled height.
    pub height: f64,
    /// Whether `x`/`y` are relative to the parent.
    pub relative: bool,
    /// Pixel nudge applied after positioning. For absolute geometry this
    /// offsets the label rather than the shape.
    pub offset: Option<Vec2>,
    /// Edge control points, in the parent's model space.
    pub points: Vec<Point>,
    /// Stored source point for edges without a source terminal.
    pub source_point: Option<Point>,
    /// Stored target point for edges without a target terminal.
    pub target_point: Option<Point>,
}

impl Geometry {
    /// Absolute geometry at `(x, y)` with the given size.
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            ..Self::default()
        }
    }

    /// Relative geometry at fractional position `(x, y)` with the given size.
    #[must_use]
    pub fn relative(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            relative: true,
            ..Self::new(x, y, width, height)
        }
    }

    /// Default geometry for an edge: relative, so that its label sits at the
    /// middle of the edge.
    #[must_use]
    pub fn edge() -> Self {
        Self {
            relative: true,
            ..Self::default()
        }
    }

    /// Sets the offset.
    #[must_use]
    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Sets the control points.
    #[must_use]
    pub fn with_points(mut self, points: impl IntoIterator<Item = Point>) -> Self {
        self.points = points.into_iter().collect();
        self
    }

    /// Sets the stored source (`is_source`) or target terminal point.
    #[must_use]
    pub fn with_terminal_point(mut self, point: Point, is_source: bool) -> Self {
        self.set_terminal_point(Some(point), is_source);
        self
    }

    /// Returns the stored source or target terminal point.
    #[must_use]
    pub fn terminal_point(&self, is_source: bool) -> Option<Point> {
        if is_source {
            self.source_point
        } else {
            self.target_point
        }
    }

    /// Replaces the stored source or target terminal point.
    pub fn set_terminal_point(&mut self, point: Option<Point>, is_source: bool) {
        if is_source {
            self.source_point = point;
        } else {
            self.target_point = point;
        }
    }

    /// The offset, or zero when unset.
    #[must_use]
    pub fn offset_or_zero(&self) -> Vec2 {
        self.offset.unwrap_or(Vec2::ZERO)
    }
}
