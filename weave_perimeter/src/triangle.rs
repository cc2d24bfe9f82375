// Copyright 2025 the Weave Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::f64::consts::PI;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Point, Rect};

use crate::Direction;
use crate::intersect::line_intersection;

/// Projects `next` onto an isosceles triangle inscribed in `bounds`.
///
/// The apex points in `direction`; the base is the opposite side of the
/// bounds. Targets behind the base are projected onto it, all others onto one
/// of the two sloped sides. A target on the apex axis returns the apex (or the
/// middle of the base) exactly.
///
/// In orthogonal mode a target within the base's span keeps its coordinate
/// along the base, and a target within the bounds' extent is met by an
/// axis-aligned line instead of the ray from the center.
#[must_use]
pub fn triangle(bounds: Rect, direction: Direction, next: Point, orthogonal: bool) -> Point {
    let bounds = bounds.abs();
    let vertical = direction.is_vertical();
    let (x, y, w, h) = (bounds.x0, bounds.y0, bounds.width(), bounds.height());
    let center = bounds.center();

    if next == center {
        return next;
    }

    // `start` and `end` are the base corners, `corner` is the apex.
    let (start, corner, end) = match direction {
        Direction::North => (
            Point::new(x, y + h),
            Point::new(center.x, y),
            Point::new(x + w, y + h),
        ),
        Direction::South => (
            Point::new(x, y),
            Point::new(center.x, y + h),
            Point::new(x + w, y),
        ),
        Direction::West => (
            Point::new(x + w, y),
            Point::new(x, center.y),
            Point::new(x + w, y + h),
        ),
        Direction::East => (
            Point::new(x, y),
            Point::new(x + w, center.y),
            Point::new(x, y + h),
        ),
    };

    let dx = next.x - center.x;
    let dy = next.y - center.y;
    let alpha = if vertical { dx.atan2(dy) } else { dy.atan2(dx) };
    let t = if vertical { w.atan2(h) } else { h.atan2(w) };

    let base = match direction {
        Direction::North | Direction::West => alpha > -t && alpha < t,
        Direction::South | Direction::East => alpha < -PI + t || alpha > PI - t,
    };

    if base {
        if orthogonal
            && ((vertical && next.x >= start.x && next.x <= end.x)
                || (!vertical && next.y >= start.y && next.y <= end.y))
        {
            return if vertical {
                Point::new(next.x, start.y)
            } else {
                Point::new(start.x, next.y)
            };
        }
        let on_axis = if vertical { dx == 0.0 } else { dy == 0.0 };
        if on_axis {
            return start.midpoint(end);
        }
        return match direction {
            Direction::North => Point::new(center.x + h * alpha.tan() / 2.0, y + h),
            Direction::South => Point::new(center.x - h * alpha.tan() / 2.0, y),
            Direction::West => Point::new(x + w, center.y + w * alpha.tan() / 2.0),
            Direction::East => Point::new(x, center.y - w * alpha.tan() / 2.0),
        };
    }

    let on_axis = if vertical { dx == 0.0 } else { dy == 0.0 };
    if on_axis && !orthogonal {
        return corner;
    }

    let mut from = center;
    if orthogonal {
        if next.y >= y && next.y <= y + h {
            from.x = if vertical {
                center.x
            } else if direction == Direction::West {
                x + w
            } else {
                x
            };
            from.y = next.y;
        } else if next.x >= x && next.x <= x + w {
            from.x = next.x;
            from.y = if !vertical {
                center.y
            } else if direction == Direction::North {
                y + h
            } else {
                y
            };
        }
    }

    let first_side = if vertical {
        next.x <= center.x
    } else {
        next.y <= center.y
    };
    let (a, b) = if first_side {
        (start, corner)
    } else {
        (corner, end)
    };

    line_intersection(next, from, a, b).unwrap_or(center)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOUNDS: Rect = Rect::new(0.0, 0.0, 100.0, 60.0);

    #[test]
    fn east_facing_apex_and_base() {
        let apex = triangle(BOUNDS, Direction::East, Point::new(300.0, 30.0), false);
        assert_eq!(apex, Point::new(100.0, 30.0));

        let base = triangle(BOUNDS, Direction::East, Point::new(-300.0, 30.0), false);
        assert_eq!(base, Point::new(0.0, 30.0));
    }

    #[test]
    fn north_facing_apex_and_base() {
        let apex = triangle(BOUNDS, Direction::North, Point::new(50.0, -300.0), false);
        assert_eq!(apex, Point::new(50.0, 0.0));

        let base = triangle(BOUNDS, Direction::North, Point::new(50.0, 300.0), false);
        assert_eq!(base, Point::new(50.0, 60.0));
    }

    #[test]
    fn south_and_west_facing_apex() {
        let apex = triangle(BOUNDS, Direction::South, Point::new(50.0, 300.0), false);
        assert_eq!(apex, Point::new(50.0, 60.0));

        let apex = triangle(BOUNDS, Direction::West, Point::new(-300.0, 30.0), false);
        assert_eq!(apex, Point::new(0.0, 30.0));
    }

    #[test]
    fn sloped_side_hit_lies_on_the_side() {
        // East facing: the top side runs from (0, 0) to (100, 30).
        let p = triangle(BOUNDS, Direction::East, Point::new(80.0, -40.0), false);
        assert!((p.y - 0.3 * p.x).abs() < 1e-9);
        assert!(p.x > 50.0);
    }

    #[test]
    fn base_hit_off_axis() {
        // West of the base of an east-facing triangle, slightly above center.
        let p = triangle(BOUNDS, Direction::East, Point::new(-50.0, 20.0), false);
        assert_eq!(p.x, 0.0);
        assert!((p.y - 25.0).abs() < 1e-9);
    }

    #[test]
    fn orthogonal_base_keeps_target_coordinate() {
        let p = triangle(BOUNDS, Direction::East, Point::new(-50.0, 12.0), true);
        assert_eq!(p, Point::new(0.0, 12.0));
    }
}
