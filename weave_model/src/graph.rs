// Copyright 2025 the Weave Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Read-only access to a cell graph.

use crate::{CellId, Geometry, Style};

/// Read-only queries a view needs from a graph model.
///
/// Implemented by [`Model`](crate::Model); other backends can implement it to
/// drive a view from their own storage. Queries about unknown cells return
/// `None`, `false` or an empty slice rather than failing.
pub trait GraphModel {
    /// The root cell. Its children are the layers.
    fn root(&self) -> CellId;

    /// Returns `true` if `cell` is live in this model.
    fn contains(&self, cell: CellId) -> bool;

    /// The containing cell, or `None` for the root.
    fn parent(&self, cell: CellId) -> Option<CellId>;

    /// Child cells in order.
    fn children(&self, cell: CellId) -> &[CellId];

    /// Edges attached to `cell` as source or target.
    fn edges(&self, cell: CellId) -> &[CellId];

    /// Returns `true` for vertices.
    fn is_vertex(&self, cell: CellId) -> bool;

    /// Returns `true` for edges.
    fn is_edge(&self, cell: CellId) -> bool;

    /// Model-space geometry, if any.
    fn geometry(&self, cell: CellId) -> Option<&Geometry>;

    /// The cell's style bag, if any.
    fn style(&self, cell: CellId) -> Option<&Style>;

    /// The source (`is_source`) or target terminal of an edge.
    fn terminal(&self, edge: CellId, is_source: bool) -> Option<CellId>;

    /// Returns `true` unless the cell has been hidden.
    fn is_visible(&self, cell: CellId) -> bool;

    /// Returns `true` if the cell's children are folded away.
    fn is_collapsed(&self, cell: CellId) -> bool;

    /// Label text, if any.
    fn label(&self, cell: CellId) -> Option<&str>;

    /// Returns `true` if `ancestor` is `cell` or one of its containers.
    fn is_ancestor(&self, ancestor: CellId, cell: CellId) -> bool {
        let mut current = Some(cell);
        while let Some(c) = current {
            if c == ancestor {
                return true;
            }
            current = self.parent(c);
        }
        false
    }

    /// Returns `true` if `cell` is a layer, a direct child of the root.
    fn is_layer(&self, cell: CellId) -> bool {
        self.parent(cell) == Some(self.root())
    }
}
