// Copyright 2025 the Weave Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// Options that shape how a [`GraphView`](crate::GraphView) computes states.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewConfig {
    /// Keep edges whose terminal is missing, as long as the edge stores a
    /// terminal point for that end. When `false`, such edges get no state.
    pub allow_dangling_edges: bool,
    /// Routing function for self-loops whose style names none.
    pub default_loop_style: &'static str,
    /// Grid size in model units. Used as the default loop segment.
    pub grid_size: f64,
    /// Keep labels out of bounding boxes for every cell, not only for those
    /// with `overflow=hidden`.
    pub label_clipping: bool,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            allow_dangling_edges: true,
            default_loop_style: "loop",
            grid_size: 10.0,
            label_clipping: false,
        }
    }
}
