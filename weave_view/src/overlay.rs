// Copyright 2025 the Weave Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Throwaway states for export and printing.

use alloc::vec::Vec;
use core::ops::Deref;

use hashbrown::HashMap;
use kurbo::Rect;
use tracing::debug;
use weave_model::{CellId, GraphModel};

use crate::error::check_scale;
use crate::{CellState, GraphView, ViewError};

#[derive(Debug)]
struct Saved {
    states: HashMap<CellId, CellState>,
    scale: f64,
    graph_bounds: Rect,
}

/// A view whose states, scale and graph bounds are temporarily replaced.
///
/// Created by [`GraphView::temporary_states`]. Reads go to the temporary
/// states through `Deref`. Dropping the guard puts the live states, scale and
/// bounds back exactly as they were, also when a panic unwinds through it.
/// No events are emitted either way.
#[derive(Debug)]
pub struct TemporaryStates<'v> {
    view: &'v mut GraphView,
    saved: Option<Saved>,
}

impl Deref for TemporaryStates<'_> {
    type Target = GraphView;

    fn deref(&self) -> &GraphView {
        self.view
    }
}

impl Drop for TemporaryStates<'_> {
    fn drop(&mut self) {
        if let Some(saved) = self.saved.take() {
            self.view.states = saved.states;
            self.view.scale = saved.scale;
            self.view.graph_bounds = saved.graph_bounds;
            debug!(states = self.view.states.len(), "live states restored");
        }
    }
}

impl GraphView {
    /// Validates `cells` and their descendants into fresh states at `scale`,
    /// setting the graph bounds to the union of their bounding boxes.
    ///
    /// The live cache is untouched until the returned guard is dropped.
    /// Containers of the given cells get states so that nested cells resolve
    /// against them; their boxes are not part of the bounds.
    pub fn temporary_states<M: GraphModel + ?Sized>(
        &mut self,
        model: &M,
        scale: f64,
        cells: &[CellId],
    ) -> Result<TemporaryStates<'_>, ViewError> {
        let scale = check_scale(scale)?;
        debug!(scale, cells = cells.len(), "temporary states");
        let saved = Saved {
            states: core::mem::take(&mut self.states),
            scale: self.scale,
            graph_bounds: self.graph_bounds,
        };
        self.scale = scale;
        let guard = TemporaryStates {
            view: self,
            saved: Some(saved),
        };
        guard.view.validate_subset(model, cells);
        Ok(guard)
    }

    /// Runs `f` against temporary states for `cells` at `scale`.
    ///
    /// See [`temporary_states`](Self::temporary_states).
    pub fn with_temporary_states<M, R>(
        &mut self,
        model: &M,
        scale: f64,
        cells: &[CellId],
        f: impl FnOnce(&Self) -> R,
    ) -> Result<R, ViewError>
    where
        M: GraphModel + ?Sized,
    {
        let guard = self.temporary_states(model, scale, cells)?;
        Ok(f(&guard))
    }

    fn validate_subset<M: GraphModel + ?Sized>(&mut self, model: &M, cells: &[CellId]) {
        let mut bounds: Option<Rect> = None;
        for &cell in cells {
            if !model.contains(cell) {
                continue;
            }
            let mut ancestors = Vec::new();
            let mut p = model.parent(cell);
            while let Some(c) = p {
                ancestors.push(c);
                if Some(c) == self.current_root {
                    break;
                }
                p = model.parent(c);
            }
            for &a in ancestors.iter().rev() {
                self.get_or_create_state(model, a);
            }

            self.validate_cell(model, cell, true);
            self.validate_cell_state(model, cell, true);
            if let Some(b) = self.bounding_box(model, cell, true) {
                bounds = Some(bounds.map_or(b, |u| u.union(b)));
            }
        }
        self.graph_bounds = bounds.unwrap_or(Rect::ZERO);
    }
}
