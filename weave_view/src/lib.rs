// Copyright 2025 the Weave Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Weave View: incremental device-space geometry for diagrams.
//!
//! A [`GraphView`] caches one [`CellState`] per visible cell of a
//! [`GraphModel`](weave_model::GraphModel): its device rectangle, and for
//! edges the routed points, segment lengths and label anchor, plus label
//! bounds and a bounding box. Model changes mark states invalid; a validation
//! pass recomputes exactly those, parents before children and terminals
//! before the edges attached to them.
//!
//! ## Core Concepts
//!
//! - [`CellState`]: cached geometry of one cell, keyed by [`CellId`](weave_model::CellId).
//! - [`GraphView`]: the cache. `validate`, `invalidate`, `clear`, `reload`,
//!   scale and translation, the display root and change processing.
//! - [`StyleRegistry`]: perimeter and routing functions by name. Each state
//!   holds a [`ResolvedStyle`] with its functions looked up once.
//! - Routing functions ([`EdgeStyleFn`]) place the bends of an edge; floating
//!   ends are then projected onto the terminals' perimeters.
//! - [`TextMeasure`]: sizes label text for label bounds.
//! - [`TemporaryStates`]: validates a subset of cells at another scale
//!   without disturbing the live cache.
//!
//! ## Example
//!
//! ```rust
//! use kurbo::Point;
//! use weave_model::{Geometry, Model, Style};
//! use weave_view::GraphView;
//!
//! let mut model = Model::new();
//! let layer = model.default_layer();
//! let a = model
//!     .insert_vertex(layer, Geometry::new(0.0, 0.0, 40.0, 20.0), Style::default())
//!     .unwrap();
//! let b = model
//!     .insert_vertex(layer, Geometry::new(100.0, 0.0, 40.0, 20.0), Style::default())
//!     .unwrap();
//! let e = model
//!     .insert_edge(layer, Some(a), Some(b), Geometry::edge(), Style::default())
//!     .unwrap();
//!
//! let mut view = GraphView::new();
//! view.validate(&model);
//!
//! // The edge leaves `a` at its right side and enters `b` at its left side.
//! let edge = view.get_state(e).unwrap();
//! assert_eq!(edge.points, [Point::new(40.0, 10.0), Point::new(100.0, 10.0)]);
//! assert_eq!(edge.length, 60.0);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod bbox;
mod config;
mod edge;
pub mod edge_style;
mod error;
mod events;
mod overlay;
mod registry;
mod resolve;
mod state;
mod view;

pub use bbox::{EstimatedTextMeasure, TextMeasure};
pub use config::ViewConfig;
pub use edge_style::{EdgeStyleFn, Route, TerminalBox};
pub use error::ViewError;
pub use events::{ListenerId, ViewEvent};
pub use overlay::TemporaryStates;
pub use registry::{EdgeStyle, ResolvedStyle, StyleRegistry};
pub use state::CellState;
pub use view::GraphView;

pub use weave_perimeter::{Direction, PerimeterFn};
