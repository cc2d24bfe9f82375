// Copyright 2025 the Weave Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory cell graph with a change log.

use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use core::fmt;

use smallvec::SmallVec;

use crate::{CellId, Geometry, GraphModel, Style};

bitflags::bitflags! {
    /// Per-cell state flags.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct CellFlags: u8 {
        /// Cell is shown. Hidden cells and their descendants get no view state.
        const VISIBLE   = 0b0000_0001;
        /// Cell's children are folded away.
        const COLLAPSED = 0b0000_0010;
    }
}

impl Default for CellFlags {
    fn default() -> Self {
        Self::VISIBLE
    }
}

/// What a cell is.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CellKind {
    /// The root and layers: groups with no geometry of their own.
    Container,
    /// A node.
    Vertex,
    /// A connection between two terminals.
    Edge,
}

/// A single mutation recorded by [`Model`].
///
/// Changes accumulate until [`Model::take_changes`] drains them; a view feeds
/// them to its change processor to invalidate exactly what moved.
#[derive(Clone, Debug, PartialEq)]
pub enum ModelChange {
    /// A cell was inserted under `parent`.
    Inserted {
        /// The new cell.
        cell: CellId,
        /// Its container.
        parent: CellId,
    },
    /// A cell moved to a new container.
    Moved {
        /// The moved cell.
        cell: CellId,
        /// The former container.
        previous: CellId,
        /// The new container.
        parent: CellId,
    },
    /// A cell was removed. One change is recorded for every cell of a removed
    /// subtree.
    Removed {
        /// The removed cell; the id is stale from now on.
        cell: CellId,
        /// Its container at the time of removal.
        parent: CellId,
    },
    /// Geometry was replaced.
    Geometry(CellId),
    /// Style was replaced.
    Style(CellId),
    /// An edge terminal was replaced.
    Terminal {
        /// The edge.
        edge: CellId,
        /// Which end changed.
        is_source: bool,
    },
    /// Visibility flipped.
    Visible(CellId),
    /// Collapsed state flipped.
    Collapsed(CellId),
    /// Label text was replaced.
    Label(CellId),
}

impl ModelChange {
    /// The cell this change is about.
    #[must_use]
    pub fn cell(&self) -> CellId {
        match *self {
            Self::Inserted { cell, .. } | Self::Moved { cell, .. } | Self::Removed { cell, .. } => {
                cell
            }
            Self::Terminal { edge, .. } => edge,
            Self::Geometry(cell)
            | Self::Style(cell)
            | Self::Visible(cell)
            | Self::Collapsed(cell)
            | Self::Label(cell) => cell,
        }
    }
}

/// Errors from [`Model`] mutations.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ModelError {
    /// The id is stale or was never issued by this model.
    UnknownCell(CellId),
    /// An edge-only operation was applied to another kind of cell.
    NotAnEdge(CellId),
    /// Reparenting `cell` under `parent` would make it its own ancestor.
    WouldCreateCycle {
        /// The cell being moved.
        cell: CellId,
        /// The requested container.
        parent: CellId,
    },
    /// The root cannot be moved or removed.
    RootImmutable,
}

impl fmt::Debug for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownCell(cell) => write!(f, "UnknownCell({cell:?})"),
            Self::NotAnEdge(cell) => write!(f, "NotAnEdge({cell:?})"),
            Self::WouldCreateCycle { cell, parent } => {
                write!(f, "WouldCreateCycle {{ cell: {cell:?}, parent: {parent:?} }}")
            }
            Self::RootImmutable => f.write_str("RootImmutable"),
        }
    }
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownCell(cell) => write!(f, "cell {cell:?} is not in the model"),
            Self::NotAnEdge(cell) => write!(f, "cell {cell:?} is not an edge"),
            Self::WouldCreateCycle { cell, parent } => write!(
                f,
                "moving {cell:?} under {parent:?} would create a containment cycle"
            ),
            Self::RootImmutable => f.write_str("the root cell cannot be moved or removed"),
        }
    }
}

impl core::error::Error for ModelError {}

#[derive(Clone, Debug)]
struct CellData {
    kind: CellKind,
    parent: Option<CellId>,
    children: Vec<CellId>,
    edges: SmallVec<[CellId; 4]>,
    source: Option<CellId>,
    target: Option<CellId>,
    flags: CellFlags,
    geometry: Option<Geometry>,
    style: Option<Style>,
    label: Option<String>,
}

impl CellData {
    fn new(kind: CellKind, parent: Option<CellId>) -> Self {
        Self {
            kind,
            parent,
            children: Vec::new(),
            edges: SmallVec::new(),
            source: None,
            target: None,
            flags: CellFlags::default(),
            geometry: None,
            style: None,
            label: None,
        }
    }
}

#[derive(Clone, Debug)]
struct Slot {
    generation: u32,
    data: Option<CellData>,
}

/// An arena-backed cell graph.
///
/// The model owns the containment tree (root, layers, vertices and edges),
/// terminal connections, geometry and style. Every mutation is appended to a
/// change log that a view drains through [`Model::take_changes`].
///
/// ```rust
/// use weave_model::{Geometry, GraphModel, Model, Style};
///
/// let mut model = Model::new();
/// let layer = model.default_layer();
/// let a = model
///     .insert_vertex(layer, Geometry::new(0.0, 0.0, 40.0, 20.0), Style::default())
///     .unwrap();
/// let b = model
///     .insert_vertex(layer, Geometry::new(100.0, 0.0, 40.0, 20.0), Style::default())
///     .unwrap();
/// let e = model
///     .insert_edge(layer, Some(a), Some(b), Geometry::edge(), Style::default())
///     .unwrap();
///
/// assert_eq!(model.terminal(e, true), Some(a));
/// assert_eq!(model.edges(b), &[e]);
/// assert_eq!(model.take_changes().len(), 3);
/// ```
#[derive(Clone, Debug)]
pub struct Model {
    slots: Vec<Slot>,
    free: Vec<u32>,
    root: CellId,
    default_layer: CellId,
    changes: Vec<ModelChange>,
}

impl Default for Model {
    fn default() -> Self {
        Self::new()
    }
}

impl Model {
    /// Creates a model holding the root cell and one empty default layer.
    ///
    /// The initial cells are not recorded in the change log.
    #[must_use]
    pub fn new() -> Self {
        let root = CellId::new(0, 1);
        let layer = CellId::new(1, 1);
        let mut root_data = CellData::new(CellKind::Container, None);
        root_data.children.push(layer);
        Self {
            slots: vec![
                Slot {
                    generation: 1,
                    data: Some(root_data),
                },
                Slot {
                    generation: 1,
                    data: Some(CellData::new(CellKind::Container, Some(root))),
                },
            ],
            free: Vec::new(),
            root,
            default_layer: layer,
            changes: Vec::new(),
        }
    }

    /// The layer created by [`Model::new`]. It may have been removed since.
    #[must_use]
    pub fn default_layer(&self) -> CellId {
        self.default_layer
    }

    /// Number of live cells, including the root.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Always `false`: the root is always live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// The kind of a live cell.
    #[must_use]
    pub fn kind(&self, cell: CellId) -> Option<CellKind> {
        self.data(cell).map(|d| d.kind)
    }

    /// Drains the accumulated change log.
    pub fn take_changes(&mut self) -> Vec<ModelChange> {
        core::mem::take(&mut self.changes)
    }

    /// Returns `true` if changes are waiting to be drained.
    #[must_use]
    pub fn has_changes(&self) -> bool {
        !self.changes.is_empty()
    }

    /// Inserts a new layer under the root.
    pub fn insert_layer(&mut self) -> CellId {
        let root = self.root;
        let id = self.alloc(CellData::new(CellKind::Container, Some(root)));
        self.attach(id, root);
        id
    }

    /// Inserts a vertex under `parent`.
    pub fn insert_vertex(
        &mut self,
        parent: CellId,
        geometry: Geometry,
        style: Style,
    ) -> Result<CellId, ModelError> {
        self.require(parent)?;
        let mut data = CellData::new(CellKind::Vertex, Some(parent));
        data.geometry = Some(geometry);
        data.style = Some(style);
        let id = self.alloc(data);
        self.attach(id, parent);
        Ok(id)
    }

    /// Inserts an edge under `parent`, connected to the given terminals.
    pub fn insert_edge(
        &mut self,
        parent: CellId,
        source: Option<CellId>,
        target: Option<CellId>,
        geometry: Geometry,
        style: Style,
    ) -> Result<CellId, ModelError> {
        self.require(parent)?;
        for terminal in [source, target].into_iter().flatten() {
            self.require(terminal)?;
        }
        let mut data = CellData::new(CellKind::Edge, Some(parent));
        data.geometry = Some(geometry);
        data.style = Some(style);
        data.source = source;
        data.target = target;
        let id = self.alloc(data);
        for terminal in [source, target].into_iter().flatten() {
            self.link_edge(terminal, id);
        }
        self.attach(id, parent);
        Ok(id)
    }

    /// Replaces the geometry of a cell.
    pub fn set_geometry(
        &mut self,
        cell: CellId,
        geometry: Option<Geometry>,
    ) -> Result<(), ModelError> {
        self.data_mut(cell)?.geometry = geometry;
        self.changes.push(ModelChange::Geometry(cell));
        Ok(())
    }

    /// Replaces the style of a cell.
    pub fn set_style(&mut self, cell: CellId, style: Style) -> Result<(), ModelError> {
        self.data_mut(cell)?.style = Some(style);
        self.changes.push(ModelChange::Style(cell));
        Ok(())
    }

    /// Replaces the label of a cell.
    pub fn set_label(&mut self, cell: CellId, label: Option<&str>) -> Result<(), ModelError> {
        self.data_mut(cell)?.label = label.map(String::from);
        self.changes.push(ModelChange::Label(cell));
        Ok(())
    }

    /// Shows or hides a cell.
    pub fn set_visible(&mut self, cell: CellId, visible: bool) -> Result<(), ModelError> {
        let data = self.data_mut(cell)?;
        if data.flags.contains(CellFlags::VISIBLE) != visible {
            data.flags.set(CellFlags::VISIBLE, visible);
            self.changes.push(ModelChange::Visible(cell));
        }
        Ok(())
    }

    /// Folds or unfolds a cell's children.
    pub fn set_collapsed(&mut self, cell: CellId, collapsed: bool) -> Result<(), ModelError> {
        let data = self.data_mut(cell)?;
        if data.flags.contains(CellFlags::COLLAPSED) != collapsed {
            data.flags.set(CellFlags::COLLAPSED, collapsed);
            self.changes.push(ModelChange::Collapsed(cell));
        }
        Ok(())
    }

    /// Connects one end of `edge` to `terminal`, or disconnects it for `None`.
    pub fn set_terminal(
        &mut self,
        edge: CellId,
        terminal: Option<CellId>,
        is_source: bool,
    ) -> Result<(), ModelError> {
        let data = self.data(edge).ok_or(ModelError::UnknownCell(edge))?;
        if data.kind != CellKind::Edge {
            return Err(ModelError::NotAnEdge(edge));
        }
        if let Some(t) = terminal {
            self.require(t)?;
        }
        let previous = if is_source { data.source } else { data.target };
        if previous == terminal {
            return Ok(());
        }

        let data = self.data_mut(edge)?;
        if is_source {
            data.source = terminal;
        } else {
            data.target = terminal;
        }
        if let Some(p) = previous {
            self.unlink_edge(p, edge);
        }
        if let Some(t) = terminal {
            self.link_edge(t, edge);
        }
        self.changes.push(ModelChange::Terminal { edge, is_source });
        Ok(())
    }

    /// Moves `cell` to the end of `parent`'s children.
    pub fn set_parent(&mut self, cell: CellId, parent: CellId) -> Result<(), ModelError> {
        if cell == self.root {
            return Err(ModelError::RootImmutable);
        }
        self.require(cell)?;
        self.require(parent)?;
        if self.is_ancestor(cell, parent) {
            return Err(ModelError::WouldCreateCycle { cell, parent });
        }
        let Some(previous) = self.parent(cell) else {
            return Err(ModelError::UnknownCell(cell));
        };
        if let Some(p) = self.data_opt_mut(previous) {
            p.children.retain(|c| *c != cell);
        }
        self.data_mut(cell)?.parent = Some(parent);
        self.data_mut(parent)?.children.push(cell);
        self.changes.push(ModelChange::Moved {
            cell,
            previous,
            parent,
        });
        Ok(())
    }

    /// Removes `cell` and its whole subtree.
    ///
    /// Edges outside the subtree that were connected to a removed cell are
    /// disconnected at that end. Returns the removed ids in pre-order.
    pub fn remove(&mut self, cell: CellId) -> Result<Vec<CellId>, ModelError> {
        if cell == self.root {
            return Err(ModelError::RootImmutable);
        }
        self.require(cell)?;

        let mut removed = Vec::new();
        let mut stack = vec![cell];
        while let Some(c) = stack.pop() {
            removed.push(c);
            stack.extend(self.children(c).iter().rev().copied());
        }

        if let Some(parent) = self.parent(cell)
            && let Some(p) = self.data_opt_mut(parent)
        {
            p.children.retain(|c| *c != cell);
        }

        for &c in &removed {
            let (source, target, edges) = match self.data(c) {
                Some(d) => (d.source, d.target, d.edges.clone()),
                None => continue,
            };
            for terminal in [source, target].into_iter().flatten() {
                self.forget_edge(terminal, c);
            }
            for edge in edges {
                if removed.contains(&edge) {
                    continue;
                }
                for is_source in [true, false] {
                    if self.terminal(edge, is_source) == Some(c) {
                        if let Some(e) = self.data_opt_mut(edge) {
                            if is_source {
                                e.source = None;
                            } else {
                                e.target = None;
                            }
                        }
                        self.changes.push(ModelChange::Terminal { edge, is_source });
                    }
                }
            }
        }

        for &c in &removed {
            let parent = self.parent(c).unwrap_or(self.root);
            if let Some(slot) = self.slots.get_mut(c.idx()) {
                slot.data = None;
                self.free.push(c.index());
            }
            self.changes.push(ModelChange::Removed { cell: c, parent });
        }
        Ok(removed)
    }

    fn alloc(&mut self, data: CellData) -> CellId {
        if let Some(idx) = self.free.pop() {
            let slot = &mut self.slots[idx as usize];
            slot.generation = slot.generation.wrapping_add(1);
            slot.data = Some(data);
            CellId::new(idx, slot.generation)
        } else {
            #[expect(
                clippy::cast_possible_truncation,
                reason = "more than u32::MAX cells is not a supported model size"
            )]
            let idx = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 1,
                data: Some(data),
            });
            CellId::new(idx, 1)
        }
    }

    fn attach(&mut self, cell: CellId, parent: CellId) {
        if let Some(p) = self.data_opt_mut(parent) {
            p.children.push(cell);
        }
        self.changes.push(ModelChange::Inserted { cell, parent });
    }

    fn link_edge(&mut self, terminal: CellId, edge: CellId) {
        if let Some(t) = self.data_opt_mut(terminal)
            && !t.edges.contains(&edge)
        {
            t.edges.push(edge);
        }
    }

    /// Drops `edge` from `terminal`'s edge list unless either end still
    /// points at it.
    fn unlink_edge(&mut self, terminal: CellId, edge: CellId) {
        let still_connected = self
            .data(edge)
            .is_some_and(|e| e.source == Some(terminal) || e.target == Some(terminal));
        if !still_connected {
            self.forget_edge(terminal, edge);
        }
    }

    fn forget_edge(&mut self, terminal: CellId, edge: CellId) {
        if let Some(t) = self.data_opt_mut(terminal) {
            t.edges.retain(|e| *e != edge);
        }
    }

    fn require(&self, cell: CellId) -> Result<(), ModelError> {
        self.data(cell)
            .map(|_| ())
            .ok_or(ModelError::UnknownCell(cell))
    }

    fn data(&self, cell: CellId) -> Option<&CellData> {
        let slot = self.slots.get(cell.idx())?;
        if slot.generation != cell.generation() {
            return None;
        }
        slot.data.as_ref()
    }

    fn data_opt_mut(&mut self, cell: CellId) -> Option<&mut CellData> {
        let slot = self.slots.get_mut(cell.idx())?;
        if slot.generation != cell.generation() {
            return None;
        }
        slot.data.as_mut()
    }

    fn data_mut(&mut self, cell: CellId) -> Result<&mut CellData, ModelError> {
        self.data_opt_mut(cell).ok_or(ModelError::UnknownCell(cell))
    }
}

impl GraphModel for Model {
    fn root(&self) -> CellId {
        self.root
    }

    fn contains(&self, cell: CellId) -> bool {
        self.data(cell).is_some()
    }

    fn parent(&self, cell: CellId) -> Option<CellId> {
        self.data(cell).and_then(|d| d.parent)
    }

    fn children(&self, cell: CellId) -> &[CellId] {
        self.data(cell).map_or(&[], |d| d.children.as_slice())
    }

    fn edges(&self, cell: CellId) -> &[CellId] {
        self.data(cell).map_or(&[], |d| d.edges.as_slice())
    }

    fn is_vertex(&self, cell: CellId) -> bool {
        self.kind(cell) == Some(CellKind::Vertex)
    }

    fn is_edge(&self, cell: CellId) -> bool {
        self.kind(cell) == Some(CellKind::Edge)
    }

    fn geometry(&self, cell: CellId) -> Option<&Geometry> {
        self.data(cell).and_then(|d| d.geometry.as_ref())
    }

    fn style(&self, cell: CellId) -> Option<&Style> {
        self.data(cell).and_then(|d| d.style.as_ref())
    }

    fn terminal(&self, edge: CellId, is_source: bool) -> Option<CellId> {
        let d = self.data(edge)?;
        if is_source { d.source } else { d.target }
    }

    fn is_visible(&self, cell: CellId) -> bool {
        self.data(cell)
            .is_some_and(|d| d.flags.contains(CellFlags::VISIBLE))
    }

    fn is_collapsed(&self, cell: CellId) -> bool {
        self.data(cell)
            .is_some_and(|d| d.flags.contains(CellFlags::COLLAPSED))
    }

    fn label(&self, cell: CellId) -> Option<&str> {
        self.data(cell).and_then(|d| d.label.as_deref())
    }
}
