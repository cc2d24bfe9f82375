// Copyright 2025 the Weave Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::f64::consts::{FRAC_PI_2, PI};

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Point, Rect};

use crate::Direction;

/// Projects `next` onto the boundary of `bounds`.
///
/// The side is picked by comparing the angle from the center towards `next`
/// with the angle of the rectangle's diagonal. In orthogonal mode the target's
/// own coordinate is reused when it falls within the rectangle's extent on that
/// axis, and the result is clamped onto the nearest side otherwise.
///
/// A target at the center is returned unchanged.
#[must_use]
pub fn rectangle(bounds: Rect, _direction: Direction, next: Point, orthogonal: bool) -> Point {
    let bounds = bounds.abs();
    let (x, y, w, h) = (bounds.x0, bounds.y0, bounds.width(), bounds.height());
    let center = bounds.center();
    let dx = next.x - center.x;
    let dy = next.y - center.y;

    if dx == 0.0 && dy == 0.0 {
        return next;
    }

    let mut p = if dy == 0.0 {
        Point::new(if dx > 0.0 { x + w } else { x }, center.y)
    } else if dx == 0.0 {
        Point::new(center.x, if dy > 0.0 { y + h } else { y })
    } else {
        let alpha = dy.atan2(dx);
        let beta = FRAC_PI_2 - alpha;
        let t = h.atan2(w);
        if alpha < -PI + t || alpha > PI - t {
            Point::new(x, center.y - w * alpha.tan() / 2.0)
        } else if alpha < -t {
            Point::new(center.x - h * beta.tan() / 2.0, y)
        } else if alpha < t {
            Point::new(x + w, center.y + w * alpha.tan() / 2.0)
        } else {
            Point::new(center.x + h * beta.tan() / 2.0, y + h)
        }
    };

    if orthogonal {
        if next.x >= x && next.x <= x + w {
            p.x = next.x;
        } else if next.y >= y && next.y <= y + h {
            p.y = next.y;
        }
        if next.x < x {
            p.x = x;
        } else if next.x > x + w {
            p.x = x + w;
        }
        if next.y < y {
            p.y = y;
        } else if next.y > y + h {
            p.y = y + h;
        }
    }

    p
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOUNDS: Rect = Rect::new(0.0, 0.0, 100.0, 50.0);

    fn project(next: (f64, f64)) -> Point {
        rectangle(BOUNDS, Direction::East, next.into(), false)
    }

    #[test]
    fn axis_aligned_targets_are_exact() {
        assert_eq!(project((200.0, 25.0)), Point::new(100.0, 25.0));
        assert_eq!(project((-200.0, 25.0)), Point::new(0.0, 25.0));
        assert_eq!(project((50.0, -100.0)), Point::new(50.0, 0.0));
        assert_eq!(project((50.0, 100.0)), Point::new(50.0, 50.0));
    }

    #[test]
    fn diagonal_target_hits_the_facing_side() {
        // Shallow angle: right side.
        let p = project((150.0, 35.0));
        assert!((p.x - 100.0).abs() < 1e-9);
        assert!((p.y - 30.0).abs() < 1e-9);

        // Steep angle: bottom side.
        let p = project((60.0, 125.0));
        assert!((p.y - 50.0).abs() < 1e-9);
        assert!((p.x - 52.5).abs() < 1e-9);
    }

    #[test]
    fn target_at_center_is_returned() {
        assert_eq!(project((50.0, 25.0)), Point::new(50.0, 25.0));
    }

    #[test]
    fn orthogonal_reuses_target_coordinate() {
        // Above the rectangle, within its horizontal extent.
        let p = rectangle(BOUNDS, Direction::East, Point::new(80.0, -40.0), true);
        assert_eq!(p, Point::new(80.0, 0.0));

        // Right of the rectangle, within its vertical extent.
        let p = rectangle(BOUNDS, Direction::East, Point::new(300.0, 10.0), true);
        assert_eq!(p, Point::new(100.0, 10.0));

        // Outside both extents: clamped to the corner.
        let p = rectangle(BOUNDS, Direction::East, Point::new(300.0, 300.0), true);
        assert_eq!(p, Point::new(100.0, 50.0));
    }

    #[test]
    fn zero_sized_bounds_stay_finite() {
        let p = rectangle(
            Rect::new(10.0, 10.0, 10.0, 10.0),
            Direction::East,
            Point::new(20.0, 30.0),
            false,
        );
        assert!(p.is_finite());
        assert_eq!(p, Point::new(10.0, 10.0));
    }
}
