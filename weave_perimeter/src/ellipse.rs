// Copyright 2025 the Weave Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Point, Rect};

use crate::Direction;

/// Projects `next` onto the ellipse inscribed in `bounds`.
///
/// Uses the closed-form intersection of the ray from the center with the
/// ellipse; of the two roots the one on the side of `next` is returned.
/// In orthogonal mode, a target within the vertical (horizontal) extent of the
/// ellipse is met by a horizontal (vertical) tangent through the target.
///
/// A target at the center is returned unchanged. A zero-width or zero-height
/// ellipse collapses to its center.
#[must_use]
pub fn ellipse(bounds: Rect, _direction: Direction, next: Point, orthogonal: bool) -> Point {
    let bounds = bounds.abs();
    let a = bounds.width() / 2.0;
    let b = bounds.height() / 2.0;
    let center = bounds.center();
    let dx = next.x - center.x;
    let dy = next.y - center.y;

    if dx == 0.0 && dy == 0.0 {
        return next;
    }
    if a <= 0.0 || b <= 0.0 {
        return center;
    }

    if orthogonal {
        if next.y >= bounds.y0 && next.y <= bounds.y1 {
            let tx = (a * a * (1.0 - (dy * dy) / (b * b))).max(0.0).sqrt();
            let tx = if dx < 0.0 { -tx } else { tx };
            return Point::new(center.x + tx, next.y);
        }
        if next.x >= bounds.x0 && next.x <= bounds.x1 {
            let ty = (b * b * (1.0 - (dx * dx) / (a * a))).max(0.0).sqrt();
            let ty = if dy < 0.0 { -ty } else { ty };
            return Point::new(next.x, center.y + ty);
        }
    }

    if dx == 0.0 {
        return Point::new(center.x, if dy > 0.0 { center.y + b } else { center.y - b });
    }
    if dy == 0.0 {
        return Point::new(if dx > 0.0 { center.x + a } else { center.x - a }, center.y);
    }

    // Points on the ray are `center + s * (dx, dy)`; the ellipse is hit at
    // `s = ±t`, and `+t` is always the root nearer to `next` (at `s = 1`).
    let t = a * b / (b * b * dx * dx + a * a * dy * dy).sqrt();
    Point::new(center.x + t * dx, center.y + t * dy)
}
