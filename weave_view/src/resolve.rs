// Copyright 2025 the Weave Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Coordinate resolution: model geometry to device rectangles.

use kurbo::{Affine, Vec2};
use weave_model::{Geometry, GraphModel, keys, values};

use crate::edge::point_on_edge;
use crate::{CellState, GraphView};

impl GraphView {
    /// Recomputes `state` from the model, its parent's state and, for edges,
    /// the states of its visible terminals.
    ///
    /// Returns the reason when the state cannot be represented and has to be
    /// dropped.
    pub(crate) fn update_cell_state<M: GraphModel + ?Sized>(
        &self,
        model: &M,
        state: &mut CellState,
    ) -> Result<(), &'static str> {
        let cell = state.cell;
        state.reset();
        state.style = self.registry.resolve(
            model.style(cell),
            model.is_vertex(cell),
            self.config.default_loop_style,
        );

        // The display root sits at the origin with no size.
        if Some(cell) == self.current_root {
            return Ok(());
        }

        let parent = model.parent(cell).and_then(|p| self.states.get(&p));
        if let Some(ps) = parent
            && Some(ps.cell) != self.current_root
        {
            state.origin = ps.origin;
        }

        let Some(geo) = model.geometry(cell) else {
            return Ok(());
        };
        let scale = self.scale;
        let t = self.translate;

        if !state.edge {
            let offset = geo.offset_or_zero();
            match parent {
                Some(ps) if geo.relative && ps.edge => {
                    let p = point_on_edge(ps, Some(geo), scale);
                    state.origin += Vec2::new(
                        p.x / scale - ps.origin.x - t.x,
                        p.y / scale - ps.origin.y - t.y,
                    );
                }
                Some(ps) if geo.relative => {
                    state.origin += Vec2::new(
                        geo.x * ps.width / scale + offset.x,
                        geo.y * ps.height / scale + offset.y,
                    );
                }
                _ => {
                    state.absolute_offset = offset * scale;
                    state.origin += Vec2::new(geo.x, geo.y);
                }
            }
        }

        state.x = scale * (t.x + state.origin.x);
        state.y = scale * (t.y + state.origin.y);
        state.width = scale * geo.width;
        state.height = scale * geo.height;

        if state.edge {
            self.update_edge_state(model, state, geo)
        } else {
            if model.is_vertex(cell) {
                self.update_vertex_state(state, geo, parent);
            }
            Ok(())
        }
    }

    fn update_vertex_state(
        &self,
        state: &mut CellState,
        geo: &Geometry,
        parent: Option<&CellState>,
    ) {
        // Relative children turn with a rotated parent.
        if geo.relative
            && let Some(ps) = parent
            && !ps.edge
        {
            let alpha = ps.style.rotation_radians();
            if alpha != 0.0 {
                let c = Affine::rotate_about(alpha, ps.center()) * state.center();
                state.x = c.x - state.width / 2.0;
                state.y = c.y - state.height / 2.0;
            }
        }
        self.update_vertex_label_offset(state);
    }

    /// Moves the label offset for `labelPosition` and
    /// `verticalLabelPosition`.
    fn update_vertex_label_offset(&self, state: &mut CellState) {
        let style = &state.style;
        let label_width = style.raw.number(keys::LABEL_WIDTH);
        let mut dx = 0.0;
        match style.text(keys::LABEL_POSITION) {
            Some(values::LEFT) => {
                dx -= label_width.map_or(state.width, |w| w * self.scale);
            }
            Some(values::RIGHT) => dx += state.width,
            _ => {
                if let Some(w) = label_width {
                    let factor = match style.text(keys::ALIGN) {
                        Some(values::LEFT) => 0.0,
                        Some(values::RIGHT) => 1.0,
                        _ => 0.5,
                    };
                    dx -= (w * self.scale - state.width) * factor;
                }
            }
        }
        let dy = match style.text(keys::VERTICAL_LABEL_POSITION) {
            Some(values::TOP) => -state.height,
            Some(values::BOTTOM) => state.height,
            _ => 0.0,
        };
        state.absolute_offset += Vec2::new(dx, dy);
    }
}
