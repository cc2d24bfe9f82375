// Copyright 2025 the Weave Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Point, Rect};

use crate::Direction;
use crate::intersect::line_intersection;

/// Projects `next` onto the diamond inscribed in `bounds`.
///
/// The quadrant of `next` relative to the center selects one of the four
/// diamond edges, which is then intersected with the line towards `next`.
/// Targets straight above, below, left or right of the center return the
/// corresponding corner exactly.
#[must_use]
pub fn rhombus(bounds: Rect, _direction: Direction, next: Point, orthogonal: bool) -> Point {
    let bounds = bounds.abs();
    let (x, y, w, h) = (bounds.x0, bounds.y0, bounds.width(), bounds.height());
    let center = bounds.center();

    if next == center {
        return next;
    }
    if next.x == center.x {
        return Point::new(center.x, if next.y < center.y { y } else { y + h });
    }
    if next.y == center.y {
        return Point::new(if next.x < center.x { x } else { x + w }, center.y);
    }

    let mut from = center;
    if orthogonal {
        if next.x >= x && next.x <= x + w {
            from.x = next.x;
        } else if next.y >= y && next.y <= y + h {
            from.y = next.y;
        }
    }

    let top = Point::new(center.x, y);
    let bottom = Point::new(center.x, y + h);
    let left = Point::new(x, center.y);
    let right = Point::new(x + w, center.y);

    let (a, b) = match (next.x < center.x, next.y < center.y) {
        (true, true) => (top, left),
        (true, false) => (bottom, left),
        (false, true) => (top, right),
        (false, false) => (bottom, right),
    };

    line_intersection(next, from, a, b).unwrap_or(center)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOUNDS: Rect = Rect::new(0.0, 0.0, 100.0, 60.0);

    #[test]
    fn axis_aligned_targets_return_corners() {
        let r = |x, y| rhombus(BOUNDS, Direction::East, Point::new(x, y), false);
        assert_eq!(r(50.0, -5.0), Point::new(50.0, 0.0));
        assert_eq!(r(50.0, 500.0), Point::new(50.0, 60.0));
        assert_eq!(r(-5.0, 30.0), Point::new(0.0, 30.0));
        assert_eq!(r(105.0, 30.0), Point::new(100.0, 30.0));
    }

    #[test]
    fn diagonal_hits_the_edge_of_its_quadrant() {
        // Along the true diagonal direction of the top-right edge's normal the
        // hit is the edge midpoint.
        let p = rhombus(BOUNDS, Direction::East, Point::new(150.0, -30.0), false);
        assert!((p.x - 75.0).abs() < 1e-9);
        assert!((p.y - 15.0).abs() < 1e-9);
    }

    #[test]
    fn target_inside_still_projects_outwards() {
        let p = rhombus(BOUNDS, Direction::East, Point::new(60.0, 36.0), false);
        // On the bottom-right edge: x / 50 + y / 30 == 1 in center coordinates.
        let u = (p.x - 50.0) / 50.0 + (p.y - 30.0) / 30.0;
        assert!((u - 1.0).abs() < 1e-9);
        assert!(p.x > 60.0);
    }

    #[test]
    fn orthogonal_drops_a_vertical_line() {
        let p = rhombus(BOUNDS, Direction::East, Point::new(25.0, -50.0), true);
        assert!((p.x - 25.0).abs() < 1e-9);
        assert!((p.y - 15.0).abs() < 1e-9);
    }
}
