// Copyright 2025 the Weave Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Point, Rect};

use crate::Direction;
use crate::intersect::{cross, line_intersection};

/// Fraction of the width (or height, when vertical) cut off by each slanted face.
const SLANT: f64 = 0.25;

/// Projects `next` onto a hexagon inscribed in `bounds`.
///
/// East/west facing hexagons have flat top and bottom faces with corners at
/// the left and right; north/south facing ones are rotated by a quarter turn.
///
/// The face is found from the angular wedge around the center that contains
/// `next`. A target exactly in the direction of a corner returns that corner,
/// and targets straight above, below, left or right of the center are exact.
///
/// In orthogonal mode, a target within the horizontal extent is met by a
/// vertical line on the top or bottom faces, and a target within the vertical
/// extent by a horizontal line on the left or right faces.
#[must_use]
pub fn hexagon(bounds: Rect, direction: Direction, next: Point, orthogonal: bool) -> Point {
    let bounds = bounds.abs();
    let (x, y, w, h) = (bounds.x0, bounds.y0, bounds.width(), bounds.height());
    let center = bounds.center();

    if next == center {
        return next;
    }

    // Clockwise in y-down coordinates, starting at the top.
    let corners = if direction.is_vertical() {
        [
            Point::new(center.x, y),
            Point::new(x + w, y + SLANT * h),
            Point::new(x + w, y + (1.0 - SLANT) * h),
            Point::new(center.x, y + h),
            Point::new(x, y + (1.0 - SLANT) * h),
            Point::new(x, y + SLANT * h),
        ]
    } else {
        [
            Point::new(x + SLANT * w, y),
            Point::new(x + (1.0 - SLANT) * w, y),
            Point::new(x + w, center.y),
            Point::new(x + (1.0 - SLANT) * w, y + h),
            Point::new(x + SLANT * w, y + h),
            Point::new(x, center.y),
        ]
    };

    if orthogonal {
        if let Some(p) = orthogonal_hit(&corners, center, bounds, next) {
            return p;
        }
    }

    // Both orientations reach the bounds at the four axis points.
    if next.x == center.x {
        return Point::new(center.x, if next.y < center.y { y } else { y + h });
    }
    if next.y == center.y {
        return Point::new(if next.x < center.x { x } else { x + w }, center.y);
    }

    for (i, &a) in corners.iter().enumerate() {
        let b = corners[(i + 1) % corners.len()];
        if cross(center, a, next) == 0.0 && (a - center).dot(next - center) > 0.0 {
            return a;
        }
        // Corners run clockwise, so `next` is inside the wedge when it is
        // clockwise from `a` and counter-clockwise from `b`.
        if cross(center, a, next) > 0.0 && cross(center, next, b) > 0.0 {
            return line_intersection(center, next, a, b).unwrap_or(center);
        }
    }

    center
}

/// Axis-aligned projection onto the face that spans the target coordinate.
fn orthogonal_hit(corners: &[Point; 6], center: Point, bounds: Rect, next: Point) -> Option<Point> {
    let faces = || {
        corners
            .iter()
            .enumerate()
            .map(|(i, &a)| (a, corners[(i + 1) % corners.len()]))
    };

    if next.x >= bounds.x0 && next.x <= bounds.x1 {
        let above = next.y < center.y;
        let probe = Point::new(next.x, center.y);
        for (a, b) in faces() {
            let face_above = a.y + b.y < 2.0 * center.y;
            let spans = next.x >= a.x.min(b.x) && next.x <= a.x.max(b.x);
            if face_above == above && spans && a.x != b.x {
                return line_intersection(probe, next, a, b);
            }
        }
    } else if next.y >= bounds.y0 && next.y <= bounds.y1 {
        let left = next.x < center.x;
        let probe = Point::new(center.x, next.y);
        for (a, b) in faces() {
            let face_left = a.x + b.x < 2.0 * center.x;
            let spans = next.y >= a.y.min(b.y) && next.y <= a.y.max(b.y);
            if face_left == left && spans && a.y != b.y {
                return line_intersection(probe, next, a, b);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOUNDS: Rect = Rect::new(0.0, 0.0, 100.0, 60.0);

    #[test]
    fn axis_aligned_targets_are_exact() {
        for direction in [Direction::East, Direction::North] {
            let r = |x, y| hexagon(BOUNDS, direction, Point::new(x, y), false);
            assert_eq!(r(50.0, -10.0), Point::new(50.0, 0.0));
            assert_eq!(r(50.0, 70.0), Point::new(50.0, 60.0));
            assert_eq!(r(-10.0, 30.0), Point::new(0.0, 30.0));
            assert_eq!(r(110.0, 30.0), Point::new(100.0, 30.0));
        }
    }

    #[test]
    fn corner_targets_return_the_corner() {
        let corner = Point::new(75.0, 0.0);
        assert_eq!(hexagon(BOUNDS, Direction::East, corner, false), corner);

        let corner = Point::new(100.0, 15.0);
        assert_eq!(hexagon(BOUNDS, Direction::North, corner, false), corner);
    }

    #[test]
    fn slanted_face_hit() {
        // East facing; upper-right face runs from (75, 0) to (100, 30).
        let p = hexagon(BOUNDS, Direction::East, Point::new(200.0, 10.0), false);
        let on_face = (p.y - (p.x - 75.0) * 30.0 / 25.0).abs() < 1e-9;
        assert!(on_face);
        assert!(p.x > 75.0 && p.x < 100.0);
    }

    #[test]
    fn flat_face_hit() {
        let p = hexagon(BOUNDS, Direction::East, Point::new(60.0, -120.0), false);
        assert!(p.y.abs() < 1e-9);
        assert!((p.x - 52.0).abs() < 1e-9);
    }

    #[test]
    fn orthogonal_per_face() {
        // Vertical drop onto a slanted face of a north-facing hexagon.
        let p = hexagon(BOUNDS, Direction::North, Point::new(75.0, -20.0), true);
        assert!((p.x - 75.0).abs() < 1e-9);
        assert!((p.y - 7.5).abs() < 1e-9);

        // Horizontal line onto a slanted face of an east-facing hexagon.
        let p = hexagon(BOUNDS, Direction::East, Point::new(150.0, 15.0), true);
        assert!((p.y - 15.0).abs() < 1e-9);
        assert!((p.x - 87.5).abs() < 1e-9);
    }
}
