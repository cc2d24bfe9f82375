// Copyright 2025 the Weave Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Weave Model: the retained cell graph behind a diagram view.
//!
//! A diagram is a containment tree of cells. The root's children are layers.
//! Layers hold vertices (boxes with model-space [`Geometry`]) and edges
//! (connections between a source and a target terminal). Vertices can contain
//! further vertices and edges. Every cell carries a shared [`Style`] bag.
//!
//! ## Core Concepts
//!
//! - [`CellId`]: generational handle of a cell.
//! - [`Geometry`]: model-space position, size, control points and terminal points.
//! - [`Style`] / [`StyleBuilder`]: shared, immutable key/value bags, with
//!   well known [`keys`] and [`values`].
//! - [`GraphModel`]: read-only queries a view needs. Views are generic over it.
//! - [`Model`]: an arena-backed implementation with mutators and a
//!   [`ModelChange`] log.
//!
//! ## Example
//!
//! ```rust
//! use weave_model::{Geometry, GraphModel, Model, StyleBuilder, keys};
//!
//! let mut model = Model::new();
//! let layer = model.default_layer();
//! let style = StyleBuilder::new().set(keys::PERIMETER, "ellipse").build();
//! let v = model
//!     .insert_vertex(layer, Geometry::new(10.0, 20.0, 80.0, 40.0), style)
//!     .unwrap();
//!
//! assert!(model.is_vertex(v));
//! assert_eq!(model.parent(v), Some(layer));
//! assert_eq!(model.style(v).and_then(|s| s.text(keys::PERIMETER)), Some("ellipse"));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod geometry;
mod graph;
mod id;
mod model;
mod style;

pub use geometry::Geometry;
pub use graph::GraphModel;
pub use id::CellId;
pub use model::{CellFlags, CellKind, Model, ModelChange, ModelError};
pub use style::{Style, StyleBuilder, StyleValue, keys, values};
