// Copyright 2025 the Weave Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Name tables for perimeter and routing functions, and the per-state
//! resolved style.

use alloc::string::String;

use hashbrown::HashMap;
use weave_model::{Style, keys};
use weave_perimeter::{Direction, PerimeterFn};

use crate::edge_style::{self, EdgeStyleFn};

/// A routing function together with how floating terminals treat it.
#[derive(Copy, Clone, Debug)]
pub struct EdgeStyle {
    /// Computes the bend points.
    pub route: EdgeStyleFn,
    /// Floating terminals of edges routed by this function are projected
    /// orthogonally onto the perimeter.
    pub orthogonal: bool,
}

/// Name-keyed perimeter and routing functions.
///
/// Style bags refer to functions by name; the registry turns those names into
/// function pointers once per recomputed state, so nothing dispatches on
/// strings while routing.
#[derive(Clone, Debug)]
pub struct StyleRegistry {
    perimeters: HashMap<String, PerimeterFn>,
    edge_styles: HashMap<String, EdgeStyle>,
}

impl Default for StyleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl StyleRegistry {
    /// Creates a registry holding every built-in function.
    ///
    /// Perimeters: `rectangle`, `ellipse`, `rhombus`, `triangle`, `hexagon`.
    /// Edge styles: `elbow`, `sideToSide`, `topToBottom`, `entityRelation`,
    /// `segment`, `orthogonal`, `loop`, `none`.
    #[must_use]
    pub fn new() -> Self {
        let mut registry = Self::empty();
        for (name, f) in weave_perimeter::BUILTINS {
            registry.register_perimeter(name, *f);
        }
        for (name, route, orthogonal) in edge_style::BUILTINS {
            registry.register_edge_style(name, *route, *orthogonal);
        }
        registry
    }

    /// Creates a registry with no functions at all.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            perimeters: HashMap::new(),
            edge_styles: HashMap::new(),
        }
    }

    /// Adds or replaces a perimeter function.
    pub fn register_perimeter(&mut self, name: &str, f: PerimeterFn) {
        self.perimeters.insert(name.into(), f);
    }

    /// Adds or replaces a routing function.
    pub fn register_edge_style(&mut self, name: &str, route: EdgeStyleFn, orthogonal: bool) {
        self.edge_styles
            .insert(name.into(), EdgeStyle { route, orthogonal });
    }

    /// Looks up a perimeter function.
    #[must_use]
    pub fn perimeter(&self, name: &str) -> Option<PerimeterFn> {
        self.perimeters.get(name).copied()
    }

    /// Looks up a routing function.
    #[must_use]
    pub fn edge_style(&self, name: &str) -> Option<EdgeStyle> {
        self.edge_styles.get(name).copied()
    }

    /// Resolves a cell's style bag.
    ///
    /// Vertices without a `perimeter` entry use `rectangle`. Edges whose style
    /// names no `loopStyle` fall back to `default_loop`.
    #[must_use]
    pub fn resolve(&self, style: Option<&Style>, is_vertex: bool, default_loop: &str) -> ResolvedStyle {
        let raw = style.cloned().unwrap_or_default();
        let perimeter = match raw.text(keys::PERIMETER) {
            Some(name) => self.perimeter(name),
            None if is_vertex => self.perimeter("rectangle"),
            None => None,
        };
        let edge_style = if raw.flag_or(keys::NO_EDGE_STYLE, false) {
            None
        } else {
            raw.text(keys::EDGE_STYLE).and_then(|name| self.edge_style(name))
        };
        let loop_style = self.edge_style(raw.text(keys::LOOP_STYLE).unwrap_or(default_loop));
        let direction = raw
            .text(keys::DIRECTION)
            .and_then(Direction::from_name)
            .unwrap_or_default();
        ResolvedStyle {
            raw,
            perimeter,
            edge_style,
            loop_style,
            direction,
        }
    }
}

/// A style bag with its named functions looked up.
///
/// Equality compares the bag and the direction; the functions are looked up
/// from the bag.
#[derive(Clone, Debug, Default)]
pub struct ResolvedStyle {
    /// The bag as read from the model.
    pub raw: Style,
    /// Perimeter function for this cell as a terminal.
    pub perimeter: Option<PerimeterFn>,
    /// Routing function, unless disabled with `noEdgeStyle`.
    pub edge_style: Option<EdgeStyle>,
    /// Routing function for self-loops.
    pub loop_style: Option<EdgeStyle>,
    /// Orientation of directional shapes.
    pub direction: Direction,
}

impl PartialEq for ResolvedStyle {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw && self.direction == other.direction
    }
}

impl ResolvedStyle {
    /// Rotation in degrees.
    #[must_use]
    pub fn rotation(&self) -> f64 {
        self.raw.number_or(keys::ROTATION, 0.0)
    }

    /// Rotation in radians.
    #[must_use]
    pub fn rotation_radians(&self) -> f64 {
        self.rotation().to_radians()
    }

    /// Reads a number, falling back to `default`.
    #[must_use]
    pub fn number_or(&self, key: &str, default: f64) -> f64 {
        self.raw.number_or(key, default)
    }

    /// Reads text.
    #[must_use]
    pub fn text(&self, key: &str) -> Option<&str> {
        self.raw.text(key)
    }

    /// Reads a flag, falling back to `default`.
    #[must_use]
    pub fn flag_or(&self, key: &str, default: bool) -> bool {
        self.raw.flag_or(key, default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weave_model::StyleBuilder;

    #[test]
    fn vertices_default_to_rectangle() {
        let registry = StyleRegistry::new();
        let resolved = registry.resolve(None, true, "loop");
        assert!(resolved.perimeter.is_some());
        let resolved = registry.resolve(None, false, "loop");
        assert!(resolved.perimeter.is_none());
        assert!(resolved.loop_style.is_some());
    }

    #[test]
    fn no_edge_style_wins() {
        let registry = StyleRegistry::new();
        let style = StyleBuilder::new()
            .set(keys::EDGE_STYLE, "elbow")
            .set(keys::NO_EDGE_STYLE, 1)
            .build();
        assert!(registry.resolve(Some(&style), false, "loop").edge_style.is_none());

        let style = style.to_builder().remove(keys::NO_EDGE_STYLE).build();
        let resolved = registry.resolve(Some(&style), false, "loop");
        assert!(resolved.edge_style.is_some_and(|e| e.orthogonal));
    }

    #[test]
    fn unknown_names_resolve_to_nothing() {
        let registry = StyleRegistry::new();
        let style = StyleBuilder::new()
            .set(keys::PERIMETER, "cloud")
            .set(keys::EDGE_STYLE, "spline")
            .set(keys::DIRECTION, "north")
            .build();
        let resolved = registry.resolve(Some(&style), true, "loop");
        assert!(resolved.perimeter.is_none());
        assert!(resolved.edge_style.is_none());
        assert_eq!(resolved.direction, Direction::North);
    }
}
