// Copyright 2025 the Weave Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Line intersection helpers shared by the polygonal perimeters.

use kurbo::Point;

/// Intersects the infinite line through `a0` and `a1` with the infinite line
/// through `b0` and `b1`.
///
/// Returns `None` for parallel (or degenerate) lines.
pub(crate) fn line_intersection(a0: Point, a1: Point, b0: Point, b1: Point) -> Option<Point> {
    let denom = (b1.y - b0.y) * (a1.x - a0.x) - (b1.x - b0.x) * (a1.y - a0.y);
    if denom == 0.0 {
        return None;
    }
    let ua = ((b1.x - b0.x) * (a0.y - b0.y) - (b1.y - b0.y) * (a0.x - b0.x)) / denom;
    let p = Point::new(a0.x + ua * (a1.x - a0.x), a0.y + ua * (a1.y - a0.y));
    p.is_finite().then_some(p)
}

/// 2D cross product of `a - o` and `b - o`.
pub(crate) fn cross(o: Point, a: Point, b: Point) -> f64 {
    (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
}
