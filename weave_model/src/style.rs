// Copyright 2025 the Weave Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared style bags.
//!
//! This module provides [`Style`], a shared, immutable bag of named values
//! that cells point at. Values are loosely typed ([`StyleValue`]) and read
//! back through typed accessors that coerce where the meaning is obvious, so
//! `"1"`, `1.0` and `true` all read as a set flag.
//!
//! Well known key names live in [`keys`] and well known text values in
//! [`values`].

use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

/// A single value in a [`Style`].
#[derive(Clone, Debug, PartialEq)]
pub enum StyleValue {
    /// A number.
    Number(f64),
    /// A name or free text.
    Text(String),
    /// A boolean.
    Flag(bool),
}

impl StyleValue {
    /// Reads the value as a number.
    ///
    /// Text is parsed; flags read as `1` or `0`.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse().ok(),
            Self::Flag(b) => Some(if *b { 1.0 } else { 0.0 }),
        }
    }

    /// Reads the value as text. Numbers and flags are not text.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Reads the value as a flag.
    ///
    /// Non-zero numbers and the texts `"1"` and `"true"` read as set.
    #[must_use]
    pub fn as_flag(&self) -> Option<bool> {
        match self {
            Self::Flag(b) => Some(*b),
            Self::Number(n) => Some(*n != 0.0),
            Self::Text(s) => match s.trim() {
                "1" | "true" => Some(true),
                "0" | "false" => Some(false),
                _ => None,
            },
        }
    }
}

impl fmt::Display for StyleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
            Self::Flag(b) => f.write_str(if *b { "1" } else { "0" }),
        }
    }
}

impl From<f64> for StyleValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for StyleValue {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<bool> for StyleValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

impl From<&str> for StyleValue {
    fn from(value: &str) -> Self {
        Self::Text(value.into())
    }
}

impl From<String> for StyleValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// A shared, immutable style bag.
///
/// Internally `Style` wraps an `Rc`, so cloning is a reference count bump and
/// many cells can share one bag. Use [`StyleBuilder`] to construct styles and
/// [`Style::to_builder`] to derive a modified copy.
///
/// ```rust
/// use weave_model::{StyleBuilder, keys};
///
/// let style = StyleBuilder::new()
///     .set(keys::PERIMETER, "ellipse")
///     .set(keys::ROTATION, 45.0)
///     .set(keys::ORTHOGONAL, "1")
///     .build();
///
/// assert_eq!(style.text(keys::PERIMETER), Some("ellipse"));
/// assert_eq!(style.number_or(keys::ROTATION, 0.0), 45.0);
/// assert!(style.flag_or(keys::ORTHOGONAL, false));
/// ```
#[derive(Clone, Default)]
pub struct Style {
    inner: Rc<StyleData>,
}

#[derive(Debug, Default, PartialEq)]
struct StyleData {
    /// Sorted by key for binary search lookup.
    entries: Vec<(String, StyleValue)>,
}

impl Style {
    /// Returns `true` if this style has no entries.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.entries.is_empty()
    }

    /// Returns the number of entries.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.inner.entries.len()
    }

    /// Gets the raw value for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&StyleValue> {
        self.inner
            .entries
            .binary_search_by(|(k, _)| k.as_str().cmp(key))
            .ok()
            .map(|idx| &self.inner.entries[idx].1)
    }

    /// Returns `true` if `key` is set.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Reads `key` as a number.
    #[must_use]
    pub fn number(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(StyleValue::as_number)
    }

    /// Reads `key` as a number, falling back to `default`.
    #[must_use]
    pub fn number_or(&self, key: &str, default: f64) -> f64 {
        self.number(key).unwrap_or(default)
    }

    /// Reads `key` as text.
    #[must_use]
    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(StyleValue::as_text)
    }

    /// Reads `key` as a flag.
    #[must_use]
    pub fn flag(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(StyleValue::as_flag)
    }

    /// Reads `key` as a flag, falling back to `default`.
    #[must_use]
    pub fn flag_or(&self, key: &str, default: bool) -> bool {
        self.flag(key).unwrap_or(default)
    }

    /// Iterates over `(key, value)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &StyleValue)> + '_ {
        self.inner.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns a builder seeded with this style's entries.
    #[must_use]
    pub fn to_builder(&self) -> StyleBuilder {
        StyleBuilder {
            entries: self.inner.entries.clone(),
        }
    }

    /// Returns `true` if both styles share the same storage.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl PartialEq for Style {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || self.inner == other.inner
    }
}

impl fmt::Debug for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Builder for [`Style`] instances.
#[derive(Clone, Debug, Default)]
pub struct StyleBuilder {
    entries: Vec<(String, StyleValue)>,
}

impl StyleBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `key` to `value`, replacing any previous value.
    #[must_use]
    pub fn set(mut self, key: &str, value: impl Into<StyleValue>) -> Self {
        let value = value.into();
        match self.entries.binary_search_by(|(k, _)| k.as_str().cmp(key)) {
            Ok(idx) => self.entries[idx].1 = value,
            Err(idx) => self.entries.insert(idx, (key.into(), value)),
        }
        self
    }

    /// Removes `key` if present.
    #[must_use]
    pub fn remove(mut self, key: &str) -> Self {
        if let Ok(idx) = self.entries.binary_search_by(|(k, _)| k.as_str().cmp(key)) {
            self.entries.remove(idx);
        }
        self
    }

    /// Builds the style.
    #[must_use]
    pub fn build(self) -> Style {
        Style {
            inner: Rc::new(StyleData {
                entries: self.entries,
            }),
        }
    }
}

/// Well known style keys.
pub mod keys {
    /// Shape name; `"arrow"` edges get extra bounding-box padding.
    pub const SHAPE: &str = "shape";
    /// Perimeter function name for vertices.
    pub const PERIMETER: &str = "perimeter";
    /// Gap between the perimeter and a floating terminal point.
    pub const PERIMETER_SPACING: &str = "perimeterSpacing";
    /// Extra gap at the source end of an edge.
    pub const SOURCE_PERIMETER_SPACING: &str = "sourcePerimeterSpacing";
    /// Extra gap at the target end of an edge.
    pub const TARGET_PERIMETER_SPACING: &str = "targetPerimeterSpacing";
    /// Routing function name for edges.
    pub const EDGE_STYLE: &str = "edgeStyle";
    /// Routing function name for self-loops.
    pub const LOOP_STYLE: &str = "loopStyle";
    /// Disables routing for an edge.
    pub const NO_EDGE_STYLE: &str = "noEdgeStyle";
    /// Forces orthogonal perimeter projection.
    pub const ORTHOGONAL: &str = "orthogonal";
    /// Elbow orientation: `"horizontal"` or `"vertical"`.
    pub const ELBOW: &str = "elbow";
    /// Segment length used by entity-relation and loop routes.
    pub const SEGMENT: &str = "segment";
    /// Orientation of directional shapes.
    pub const DIRECTION: &str = "direction";
    /// Rotation in degrees.
    pub const ROTATION: &str = "rotation";
    /// Stroke width in model units.
    pub const STROKE_WIDTH: &str = "strokeWidth";
    /// Enables the drop shadow.
    pub const SHADOW: &str = "shadow";
    /// Marker at the source end.
    pub const START_ARROW: &str = "startArrow";
    /// Marker at the target end.
    pub const END_ARROW: &str = "endArrow";
    /// Source marker size.
    pub const START_SIZE: &str = "startSize";
    /// Target marker size.
    pub const END_SIZE: &str = "endSize";
    /// Horizontal text alignment.
    pub const ALIGN: &str = "align";
    /// Vertical text alignment.
    pub const VERTICAL_ALIGN: &str = "verticalAlign";
    /// Horizontal label position relative to the vertex.
    pub const LABEL_POSITION: &str = "labelPosition";
    /// Vertical label position relative to the vertex.
    pub const VERTICAL_LABEL_POSITION: &str = "verticalLabelPosition";
    /// Fixed label width.
    pub const LABEL_WIDTH: &str = "labelWidth";
    /// Label overflow mode.
    pub const OVERFLOW: &str = "overflow";
    /// Label wrapping mode.
    pub const WHITE_SPACE: &str = "whiteSpace";
    /// Font size in model units.
    pub const FONT_SIZE: &str = "fontSize";
    /// Uniform label spacing.
    pub const SPACING: &str = "spacing";
    /// Extra left label spacing.
    pub const SPACING_LEFT: &str = "spacingLeft";
    /// Extra top label spacing.
    pub const SPACING_TOP: &str = "spacingTop";
    /// Extra right label spacing.
    pub const SPACING_RIGHT: &str = "spacingRight";
    /// Extra bottom label spacing.
    pub const SPACING_BOTTOM: &str = "spacingBottom";
    /// Label image reference.
    pub const IMAGE: &str = "image";
    /// Label image width.
    pub const IMAGE_WIDTH: &str = "imageWidth";
    /// Label image height.
    pub const IMAGE_HEIGHT: &str = "imageHeight";
    /// Horizontal alignment of the label image.
    pub const IMAGE_ALIGN: &str = "imageAlign";
    /// Vertical alignment of the label image.
    pub const IMAGE_VERTICAL_ALIGN: &str = "imageVerticalAlign";
    /// Fixed source connection point, x fraction.
    pub const EXIT_X: &str = "exitX";
    /// Fixed source connection point, y fraction.
    pub const EXIT_Y: &str = "exitY";
    /// Whether the fixed source point is projected onto the perimeter.
    pub const EXIT_PERIMETER: &str = "exitPerimeter";
    /// Fixed target connection point, x fraction.
    pub const ENTRY_X: &str = "entryX";
    /// Fixed target connection point, y fraction.
    pub const ENTRY_Y: &str = "entryY";
    /// Whether the fixed target point is projected onto the perimeter.
    pub const ENTRY_PERIMETER: &str = "entryPerimeter";
    /// Side an edge must leave or enter a terminal on: `"north"`, `"south"`,
    /// `"east"` or `"west"`. Read from the terminal's style.
    pub const PORT_CONSTRAINT: &str = "portConstraint";
    /// Routing center x offset as a fraction of the width.
    pub const ROUTING_CENTER_X: &str = "routingCenterX";
    /// Routing center y offset as a fraction of the height.
    pub const ROUTING_CENTER_Y: &str = "routingCenterY";
}

/// Well known style text values.
pub mod values {
    /// Left alignment or position.
    pub const LEFT: &str = "left";
    /// Centered alignment or position.
    pub const CENTER: &str = "center";
    /// Right alignment or position.
    pub const RIGHT: &str = "right";
    /// Top alignment or position.
    pub const TOP: &str = "top";
    /// Middle alignment or position.
    pub const MIDDLE: &str = "middle";
    /// Bottom alignment or position.
    pub const BOTTOM: &str = "bottom";
    /// Label fills the vertex.
    pub const OVERFLOW_FILL: &str = "fill";
    /// Label takes the vertex width.
    pub const OVERFLOW_WIDTH: &str = "width";
    /// Label is clipped to the vertex.
    pub const OVERFLOW_HIDDEN: &str = "hidden";
    /// Wrapped labels.
    pub const WRAP: &str = "wrap";
    /// The arrow shape.
    pub const SHAPE_ARROW: &str = "arrow";
    /// The label shape, a box with an optional image.
    pub const SHAPE_LABEL: &str = "label";
    /// No marker.
    pub const NONE: &str = "none";
    /// Vertical elbow orientation.
    pub const VERTICAL: &str = "vertical";
    /// Horizontal elbow orientation.
    pub const HORIZONTAL: &str = "horizontal";
}
