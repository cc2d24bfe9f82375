// Copyright 2025 the Weave Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::boxed::Box;
use alloc::vec;
use alloc::vec::Vec;
use core::fmt;

use hashbrown::{HashMap, HashSet};
use kurbo::{Point, Rect, Vec2};
use tracing::{debug, debug_span, trace};
use weave_model::{CellId, GraphModel, ModelChange};

use crate::bbox::{self, EstimatedTextMeasure, TextMeasure};
use crate::error::{check_scale, check_translate};
use crate::events::Listeners;
use crate::{CellState, ListenerId, StyleRegistry, ViewConfig, ViewError, ViewEvent};

/// Device-space geometry cache for a [`GraphModel`].
///
/// The view keeps one [`CellState`] per visible cell, keyed by [`CellId`].
/// States are created and recomputed by [`validate`](Self::validate), which
/// only touches states marked invalid. Model changes reach the view through
/// [`process_changes`](Self::process_changes) or the finer-grained
/// [`invalidate`](Self::invalidate) and [`clear`](Self::clear).
///
/// Device coordinates are `scale * (translate + origin)`, where `origin`
/// accumulates model-space positions from the display root down.
///
/// ## Usage
///
/// ```rust
/// use kurbo::Rect;
/// use weave_model::{Geometry, Model, Style};
/// use weave_view::GraphView;
///
/// let mut model = Model::new();
/// let layer = model.default_layer();
/// let v = model
///     .insert_vertex(layer, Geometry::new(10.0, 20.0, 30.0, 40.0), Style::default())
///     .unwrap();
///
/// let mut view = GraphView::new();
/// view.scale_and_translate(2.0, 5.0, 0.0).unwrap();
/// view.validate(&model);
///
/// let state = view.get_state(v).unwrap();
/// assert_eq!(state.rect(), Rect::new(30.0, 40.0, 90.0, 120.0));
/// ```
pub struct GraphView {
    pub(crate) states: HashMap<CellId, CellState>,
    pub(crate) scale: f64,
    pub(crate) translate: Vec2,
    pub(crate) graph_bounds: Rect,
    pub(crate) current_root: Option<CellId>,
    pub(crate) config: ViewConfig,
    pub(crate) registry: StyleRegistry,
    measure: Box<dyn TextMeasure>,
    listeners: Listeners,
}

impl fmt::Debug for GraphView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphView")
            .field("states", &self.states.len())
            .field("scale", &self.scale)
            .field("translate", &self.translate)
            .field("graph_bounds", &self.graph_bounds)
            .field("current_root", &self.current_root)
            .field("config", &self.config)
            .field("listeners", &self.listeners)
            .finish_non_exhaustive()
    }
}

impl Default for GraphView {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Copy, Clone, Debug)]
enum Task {
    /// Bring a state up to date; with `true`, its children too.
    Visit(CellId, bool),
    /// Dependencies are current; recompute.
    Compute(CellId),
    Children(CellId),
}

impl GraphView {
    /// Creates an empty view with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(ViewConfig::default())
    }

    /// Creates an empty view.
    #[must_use]
    pub fn with_config(config: ViewConfig) -> Self {
        Self {
            states: HashMap::new(),
            scale: 1.0,
            translate: Vec2::ZERO,
            graph_bounds: Rect::ZERO,
            current_root: None,
            config,
            registry: StyleRegistry::new(),
            measure: Box::new(EstimatedTextMeasure),
            listeners: Listeners::default(),
        }
    }

    /// Current configuration.
    #[must_use]
    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    /// Replaces the configuration and marks every state invalid.
    pub fn set_config(&mut self, config: ViewConfig) {
        self.config = config;
        self.mark_all_invalid();
    }

    /// The perimeter and routing functions states are resolved against.
    #[must_use]
    pub fn registry(&self) -> &StyleRegistry {
        &self.registry
    }

    /// Mutable access to the registry. Existing states keep their resolved
    /// functions until they are recomputed; call
    /// [`revalidate`](Self::revalidate) to apply changes everywhere.
    pub fn registry_mut(&mut self) -> &mut StyleRegistry {
        &mut self.registry
    }

    /// Replaces the label text measure and marks every state invalid.
    pub fn set_text_measure(&mut self, measure: impl TextMeasure + 'static) {
        self.measure = Box::new(measure);
        self.mark_all_invalid();
    }

    /// Current scale.
    #[must_use]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Current translation, in model units.
    #[must_use]
    pub fn translate(&self) -> Vec2 {
        self.translate
    }

    /// Union of all bounding boxes, as of the last validation.
    #[must_use]
    pub fn graph_bounds(&self) -> Rect {
        self.graph_bounds
    }

    /// The display root, or `None` for the model root.
    #[must_use]
    pub fn current_root(&self) -> Option<CellId> {
        self.current_root
    }

    /// The state of `cell`, if it has one.
    #[must_use]
    pub fn get_state(&self, cell: CellId) -> Option<&CellState> {
        self.states.get(&cell)
    }

    /// The state of `cell`, creating an invalid one if the cell is visible and
    /// can have a state.
    ///
    /// Vertices and edges need a geometry; other cells, such as layers, get a
    /// state at their container's origin.
    pub fn get_or_create_state<M: GraphModel + ?Sized>(
        &mut self,
        model: &M,
        cell: CellId,
    ) -> Option<&CellState> {
        if !self.states.contains_key(&cell) {
            if !model.contains(cell) || !model.is_visible(cell) || !can_have_state(model, cell) {
                return None;
            }
            self.states
                .insert(cell, CellState::new(cell, model.is_edge(cell)));
        }
        self.states.get(&cell)
    }

    /// Every state, in no particular order.
    pub fn states(&self) -> impl Iterator<Item = &CellState> + '_ {
        self.states.values()
    }

    /// The states of `cells`, skipping cells without one.
    #[must_use]
    pub fn cell_states(&self, cells: &[CellId]) -> Vec<&CellState> {
        cells.iter().filter_map(|c| self.states.get(c)).collect()
    }

    /// Number of states.
    #[must_use]
    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    /// Point that routing functions aim at for `state`.
    #[must_use]
    pub fn routing_center(&self, state: &CellState) -> Point {
        state.routing_center()
    }

    /// Brings every state up to date and returns the new graph bounds.
    ///
    /// States are created for newly visible cells and dropped for hidden
    /// ones. Only invalid states are recomputed, containers before their
    /// children and terminals before their edges. Running it again without
    /// changes in between reproduces the same geometry.
    ///
    /// With nothing to show, the bounds are an empty rectangle at the
    /// translated origin.
    pub fn validate<M: GraphModel + ?Sized>(&mut self, model: &M) -> Rect {
        let root = self.current_root.unwrap_or_else(|| model.root());
        let _span = debug_span!("validate", states = self.states.len(), scale = self.scale).entered();

        self.validate_cell(model, root, true);
        self.validate_cell_state(model, root, true);
        let bounds = self
            .bounding_box(model, root, true)
            .unwrap_or_else(|| self.empty_bounds());
        self.graph_bounds = bounds;

        debug!(states = self.states.len(), ?bounds, "validated");
        bounds
    }

    /// Drops every state and validates from scratch.
    pub fn reload<M: GraphModel + ?Sized>(&mut self, model: &M) -> Rect {
        debug!(states = self.states.len(), "reload");
        self.states.clear();
        self.validate(model)
    }

    /// Marks every state invalid and validates.
    pub fn revalidate<M: GraphModel + ?Sized>(&mut self, model: &M) -> Rect {
        self.mark_all_invalid();
        self.validate(model)
    }

    /// Marks the state of `cell` invalid, together with every descendant and
    /// every incident edge, transitively.
    ///
    /// States are kept until the next validation. Propagation stops at states
    /// that are already invalid; their dependents were marked with them.
    pub fn invalidate<M: GraphModel + ?Sized>(&mut self, model: &M, cell: CellId) {
        trace!(?cell, "invalidate");
        let mut visited = HashSet::new();
        let mut stack = vec![cell];
        while let Some(c) = stack.pop() {
            if !visited.insert(c) {
                continue;
            }
            if let Some(state) = self.states.get_mut(&c) {
                if state.invalid && c != cell {
                    continue;
                }
                state.invalid = true;
            }
            stack.extend_from_slice(model.children(c));
            stack.extend_from_slice(model.edges(c));
        }
    }

    /// Removes the state of `cell`.
    ///
    /// With `recurse`, the states of all descendants go too, stopping at the
    /// display root unless `force` is set. Cells whose descendants are kept
    /// are invalidated instead.
    pub fn clear<M: GraphModel + ?Sized>(
        &mut self,
        model: &M,
        cell: CellId,
        force: bool,
        recurse: bool,
    ) {
        let mut stack = vec![cell];
        while let Some(c) = stack.pop() {
            self.states.remove(&c);
            if recurse && (force || Some(c) != self.current_root) {
                stack.extend_from_slice(model.children(c));
            } else {
                self.invalidate(model, c);
            }
        }
    }

    /// Removes and returns the state of `cell`.
    pub fn remove_state(&mut self, cell: CellId) -> Option<CellState> {
        self.states.remove(&cell)
    }

    /// Applies model changes to the cache. Run [`validate`](Self::validate)
    /// afterwards.
    ///
    /// Cells moved out of the display root's subtree lose their states, and
    /// so do their descendants.
    pub fn process_changes<M: GraphModel + ?Sized>(&mut self, model: &M, changes: &[ModelChange]) {
        for change in changes {
            match *change {
                ModelChange::Removed { cell, .. } => {
                    self.states.remove(&cell);
                    if self.current_root == Some(cell) {
                        self.current_root = None;
                        self.states.clear();
                        self.listeners.emit(&ViewEvent::Up {
                            previous: Some(cell),
                            root: None,
                        });
                    }
                }
                ModelChange::Moved { cell, .. }
                    if self
                        .current_root
                        .is_some_and(|r| !model.is_ancestor(r, cell)) =>
                {
                    // Left the displayed subtree; validation no longer reaches it.
                    self.remove_subtree(model, cell);
                }
                _ => self.invalidate(model, change.cell()),
            }
        }
    }

    /// Sets scale and translation together, marking every state invalid.
    ///
    /// Emits [`ViewEvent::ScaleAndTranslate`] if either changed.
    pub fn scale_and_translate(&mut self, scale: f64, dx: f64, dy: f64) -> Result<(), ViewError> {
        let scale = check_scale(scale)?;
        check_translate(dx, dy)?;
        let translate = Vec2::new(dx, dy);
        if scale != self.scale || translate != self.translate {
            let event = ViewEvent::ScaleAndTranslate {
                previous_scale: self.scale,
                scale,
                previous_translate: self.translate,
                translate,
            };
            self.scale = scale;
            self.translate = translate;
            self.mark_all_invalid();
            self.listeners.emit(&event);
        }
        Ok(())
    }

    /// Sets the scale, marking every state invalid.
    ///
    /// Emits [`ViewEvent::Scale`] if it changed.
    pub fn set_scale(&mut self, scale: f64) -> Result<(), ViewError> {
        let scale = check_scale(scale)?;
        if scale != self.scale {
            let previous = self.scale;
            self.scale = scale;
            self.mark_all_invalid();
            self.listeners.emit(&ViewEvent::Scale { previous, scale });
        }
        Ok(())
    }

    /// Sets the translation, marking every state invalid.
    ///
    /// Emits [`ViewEvent::Translate`] if it changed.
    pub fn set_translate(&mut self, dx: f64, dy: f64) -> Result<(), ViewError> {
        check_translate(dx, dy)?;
        let translate = Vec2::new(dx, dy);
        if translate != self.translate {
            let previous = self.translate;
            self.translate = translate;
            self.mark_all_invalid();
            self.listeners
                .emit(&ViewEvent::Translate { previous, translate });
        }
        Ok(())
    }

    /// Shows the subtree of `root` only, or the whole model for `None`.
    ///
    /// The cache is rebuilt from the new root, which sits at the origin.
    /// Emits [`ViewEvent::Up`] when the new root contains the previous one,
    /// [`ViewEvent::Down`] otherwise.
    pub fn set_current_root<M: GraphModel + ?Sized>(
        &mut self,
        model: &M,
        root: Option<CellId>,
    ) -> Result<(), ViewError> {
        if let Some(r) = root
            && !model.contains(r)
        {
            return Err(ViewError::UnknownCell(r));
        }
        let root = root.filter(|r| *r != model.root());
        let previous = self.current_root;
        if previous == root {
            return Ok(());
        }
        let up = match root {
            None => true,
            Some(r) => previous.is_some_and(|p| model.is_ancestor(r, p)),
        };
        debug!(?previous, ?root, up, "current root");

        self.current_root = root;
        self.states.clear();
        self.validate(model);
        let event = if up {
            ViewEvent::Up { previous, root }
        } else {
            ViewEvent::Down { previous, root }
        };
        self.listeners.emit(&event);
        Ok(())
    }

    /// Registers a callback for view events.
    pub fn add_listener(&mut self, listener: impl FnMut(&ViewEvent) + 'static) -> ListenerId {
        self.listeners.add(Box::new(listener))
    }

    /// Unregisters a callback. Returns `false` if it was not registered.
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    /// Bounding box of `cell`, unioned with those of all descendants that
    /// have states when `recurse` is set.
    ///
    /// `None` if `cell` has no state or nothing below it has a box.
    #[must_use]
    pub fn bounding_box<M: GraphModel + ?Sized>(
        &self,
        model: &M,
        cell: CellId,
        recurse: bool,
    ) -> Option<Rect> {
        let state = self.states.get(&cell)?;
        let mut bbox = state.bounding_box;
        if recurse {
            let mut stack = model.children(cell).to_vec();
            while let Some(c) = stack.pop() {
                let Some(state) = self.states.get(&c) else {
                    continue;
                };
                if let Some(b) = state.bounding_box {
                    bbox = Some(bbox.map_or(b, |u| u.union(b)));
                }
                stack.extend_from_slice(model.children(c));
            }
        }
        bbox
    }

    /// The cell whose state the `is_source` end of `edge` attaches to.
    ///
    /// That is the terminal itself, or its outermost hidden or collapsed
    /// ancestor below the display root. `None` if the edge has no such
    /// terminal or it resolves to a layer or the display root.
    ///
    /// Edges attached to the display root itself therefore get no state
    /// while that root is shown.
    #[must_use]
    pub fn visible_terminal<M: GraphModel + ?Sized>(
        &self,
        model: &M,
        edge: CellId,
        is_source: bool,
    ) -> Option<CellId> {
        let terminal = model.terminal(edge, is_source)?;
        let mut best = terminal;
        let mut current = Some(terminal);
        while let Some(c) = current
            && Some(c) != self.current_root
        {
            if !model.is_visible(best) || model.is_collapsed(c) {
                best = c;
            }
            current = model.parent(c);
        }
        let hidden = !model.contains(best)
            || best == model.root()
            || model.is_layer(best)
            || Some(best) == self.current_root;
        (!hidden).then_some(best)
    }

    /// Creates states for visible cells below `cell` and drops those of
    /// hidden ones.
    pub(crate) fn validate_cell<M: GraphModel + ?Sized>(
        &mut self,
        model: &M,
        cell: CellId,
        visible: bool,
    ) {
        let mut stack = vec![(cell, visible)];
        while let Some((c, parent_visible)) = stack.pop() {
            if !(parent_visible && model.is_visible(c)) || !can_have_state(model, c) {
                self.remove_subtree(model, c);
                continue;
            }
            if self.get_or_create_state(model, c).is_none() {
                continue;
            }
            let show_children = !model.is_collapsed(c) || Some(c) == self.current_root;
            for &child in model.children(c).iter().rev() {
                stack.push((child, show_children));
            }
        }
    }

    /// Recomputes invalid states from `cell` down, dependencies first.
    pub(crate) fn validate_cell_state<M: GraphModel + ?Sized>(
        &mut self,
        model: &M,
        cell: CellId,
        recurse: bool,
    ) {
        let mut stack = vec![Task::Visit(cell, recurse)];
        while let Some(task) = stack.pop() {
            match task {
                Task::Visit(c, recurse) => {
                    let Some(state) = self.states.get_mut(&c) else {
                        continue;
                    };
                    // Cleared on entry so that cycles through incident edges end here.
                    let invalid = core::mem::replace(&mut state.invalid, false);
                    if recurse {
                        stack.push(Task::Children(c));
                    }
                    if invalid {
                        stack.push(Task::Compute(c));
                        for is_source in [false, true] {
                            if let Some(t) = self.visible_terminal(model, c, is_source) {
                                stack.push(Task::Visit(t, false));
                            }
                        }
                        if Some(c) != self.current_root
                            && let Some(p) = model.parent(c)
                        {
                            stack.push(Task::Visit(p, false));
                        }
                    }
                }
                Task::Compute(c) => self.compute_state(model, c),
                Task::Children(c) => {
                    for &child in model.children(c).iter().rev() {
                        stack.push(Task::Visit(child, true));
                    }
                }
            }
        }
    }

    fn compute_state<M: GraphModel + ?Sized>(&mut self, model: &M, cell: CellId) {
        let Some(mut state) = self.states.remove(&cell) else {
            return;
        };
        if state.edge {
            state.visible_source = self
                .visible_terminal(model, cell, true)
                .filter(|t| self.states.contains_key(t));
            state.visible_target = self
                .visible_terminal(model, cell, false)
                .filter(|t| self.states.contains_key(t));
        }
        match self.update_cell_state(model, &mut state) {
            Ok(()) => {
                if Some(cell) != self.current_root && model.geometry(cell).is_some() {
                    state.label_bounds =
                        bbox::label_bounds(&state, model.label(cell), &*self.measure, self.scale);
                    state.bounding_box = Some(bbox::bounding_box(
                        &state,
                        self.scale,
                        self.config.label_clipping,
                    ));
                }
                trace!(?cell, x = state.x, y = state.y, w = state.width, h = state.height, "state");
                self.states.insert(cell, state);
            }
            Err(reason) => {
                debug!(?cell, reason, "state discarded");
                self.clear(model, cell, true, true);
            }
        }
    }

    fn remove_subtree<M: GraphModel + ?Sized>(&mut self, model: &M, cell: CellId) {
        let mut stack = vec![cell];
        while let Some(c) = stack.pop() {
            self.states.remove(&c);
            stack.extend_from_slice(model.children(c));
        }
    }

    pub(crate) fn mark_all_invalid(&mut self) {
        for state in self.states.values_mut() {
            state.invalid = true;
        }
    }

    fn empty_bounds(&self) -> Rect {
        let p = (self.translate * self.scale).to_point();
        Rect::from_points(p, p)
    }
}

/// Vertices and edges need a geometry to be shown.
fn can_have_state<M: GraphModel + ?Sized>(model: &M, cell: CellId) -> bool {
    model.geometry(cell).is_some() || !(model.is_vertex(cell) || model.is_edge(cell))
}
