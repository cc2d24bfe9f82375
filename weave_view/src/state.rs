// Copyright 2025 the Weave Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec::Vec;

use kurbo::{Point, Rect, Vec2};
use weave_model::{CellId, keys};

use crate::ResolvedStyle;

/// Cached device-space geometry of one visible cell.
///
/// A state refers to its cell by id only. Everything in it is derived from
/// the cell's geometry and style, its parent's state, the view transform and,
/// for edges, the states of the visible terminals.
///
/// The device rectangle is kept as `x`, `y`, `width`, `height` so that
/// `width` is exactly `scale * geometry.width`.
#[derive(Clone, Debug, PartialEq)]
pub struct CellState {
    pub(crate) cell: CellId,
    pub(crate) edge: bool,
    pub(crate) invalid: bool,
    /// Style with named functions resolved.
    pub style: ResolvedStyle,
    /// Device-space left edge.
    pub x: f64,
    /// Device-space top edge.
    pub y: f64,
    /// Device-space width.
    pub width: f64,
    /// Device-space height.
    pub height: f64,
    /// Accumulated model-space origin, relative to the display root.
    pub origin: Point,
    /// For vertices, the label displacement in device units. For edges, the
    /// device-space label anchor.
    pub absolute_offset: Vec2,
    /// Edge points in device space, terminals included. Empty for vertices.
    pub points: Vec<Point>,
    /// Lengths of the segments between consecutive `points`.
    pub segments: Vec<f64>,
    /// Sum of `segments`.
    pub length: f64,
    /// Straight-line distance between the first and last point.
    pub terminal_distance: f64,
    /// Cell whose state the source end attaches to.
    pub visible_source: Option<CellId>,
    /// Cell whose state the target end attaches to.
    pub visible_target: Option<CellId>,
    /// Device-space label rectangle, if the cell shows a label.
    pub label_bounds: Option<Rect>,
    /// Device-space extent of everything drawn for this cell. `None` for
    /// cells without geometry, such as layers and the display root.
    pub bounding_box: Option<Rect>,
}

impl CellState {
    pub(crate) fn new(cell: CellId, edge: bool) -> Self {
        Self {
            cell,
            edge,
            invalid: true,
            style: ResolvedStyle::default(),
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
            origin: Point::ZERO,
            absolute_offset: Vec2::ZERO,
            points: Vec::new(),
            segments: Vec::new(),
            length: 0.0,
            terminal_distance: 0.0,
            visible_source: None,
            visible_target: None,
            label_bounds: None,
            bounding_box: None,
        }
    }

    /// The cell this state describes.
    #[must_use]
    pub fn cell(&self) -> CellId {
        self.cell
    }

    /// Returns `true` if the state is stale and waits for validation.
    #[must_use]
    pub fn is_invalid(&self) -> bool {
        self.invalid
    }

    /// Returns `true` if the cell is an edge.
    #[must_use]
    pub fn is_edge(&self) -> bool {
        self.edge
    }

    /// The device rectangle.
    #[must_use]
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }

    /// Center of the device rectangle.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Point that routing functions aim at: the center shifted by the
    /// `routingCenterX`/`routingCenterY` fractions of the size.
    #[must_use]
    pub fn routing_center(&self) -> Point {
        let fx = self.style.number_or(keys::ROUTING_CENTER_X, 0.0);
        let fy = self.style.number_or(keys::ROUTING_CENTER_Y, 0.0);
        let c = self.center();
        Point::new(c.x + fx * self.width, c.y + fy * self.height)
    }

    /// First (`is_source`) or last edge point.
    #[must_use]
    pub fn terminal_point(&self, is_source: bool) -> Option<Point> {
        if is_source {
            self.points.first().copied()
        } else {
            self.points.last().copied()
        }
    }

    /// Returns `true` if the device rectangle contains `p`, borders included.
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }

    pub(crate) fn reset(&mut self) {
        self.x = 0.0;
        self.y = 0.0;
        self.width = 0.0;
        self.height = 0.0;
        self.origin = Point::ZERO;
        self.absolute_offset = Vec2::ZERO;
        self.points.clear();
        self.segments.clear();
        self.length = 0.0;
        self.terminal_distance = 0.0;
        self.label_bounds = None;
        self.bounding_box = None;
    }
}
