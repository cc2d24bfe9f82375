// Copyright 2025 the Weave Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Weave Perimeter: project points onto the boundary of diagram shapes.
//!
//! A perimeter function answers one question: if a line is drawn from the
//! center of a shape towards some target point, where does it leave the shape?
//! Edge renderers use the answer to stop connectors exactly at a vertex
//! outline instead of at its center or its bounding box.
//!
//! Every function in this crate has the signature of [`PerimeterFn`]:
//!
//! - `bounds`: the shape's device-space bounds (already grown by any perimeter spacing).
//! - `direction`: which way the shape faces. Only direction-aware shapes
//!   (triangle, hexagon) consult it.
//! - `next`: the point the connector is heading for.
//! - `orthogonal`: when `true`, the result is chosen so that the segment
//!   towards `next` can be axis-aligned whenever `next` lies within the
//!   shape's horizontal or vertical extent.
//!
//! The functions are pure and never panic on finite input. Degenerate input
//! (a target at the center, a zero-sized rectangle) yields a finite point,
//! never `NaN`. Axis-aligned targets and shape corners are special-cased so the
//! result is exact rather than subject to trigonometric round-off.
//!
//! ## Example
//!
//! ```rust
//! use kurbo::{Point, Rect};
//! use weave_perimeter::{Direction, rectangle};
//!
//! let bounds = Rect::new(0.0, 0.0, 100.0, 50.0);
//! let p = rectangle(bounds, Direction::East, Point::new(200.0, 25.0), false);
//! assert_eq!(p, Point::new(100.0, 25.0));
//! ```
//!
//! Functions are selected by name through [`BUILTINS`] / [`builtin`], which is
//! what style-driven callers use to resolve a `perimeter` style value once.
//!
//! This crate is `no_std`.

#![no_std]

mod direction;
mod ellipse;
mod hexagon;
mod intersect;
mod rectangle;
mod rhombus;
mod triangle;

use kurbo::{Point, Rect};

pub use direction::Direction;
pub use ellipse::ellipse;
pub use hexagon::hexagon;
pub use rectangle::rectangle;
pub use rhombus::rhombus;
pub use triangle::triangle;

/// Signature shared by all perimeter functions.
///
/// See the [crate documentation](crate) for the meaning of each argument.
pub type PerimeterFn = fn(bounds: Rect, direction: Direction, next: Point, orthogonal: bool) -> Point;

/// Built-in perimeter functions keyed by their style name.
pub const BUILTINS: &[(&str, PerimeterFn)] = &[
    ("rectangle", rectangle),
    ("ellipse", ellipse),
    ("rhombus", rhombus),
    ("triangle", triangle),
    ("hexagon", hexagon),
];

/// Looks up a built-in perimeter function by its style name.
#[must_use]
pub fn builtin(name: &str) -> Option<PerimeterFn> {
    BUILTINS
        .iter()
        .find(|(key, _)| *key == name)
        .map(|(_, f)| *f)
}
