// Copyright 2025 the Weave Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Label bounds and per-state bounding boxes.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Affine, Rect, Size};
use weave_model::{Style, keys, values};

use crate::CellState;

const DEFAULT_FONT_SIZE: f64 = 11.0;
const DEFAULT_MARKER_SIZE: f64 = 6.0;
const DEFAULT_IMAGE_SIZE: f64 = 24.0;
const DEFAULT_SPACING: f64 = 2.0;

const ARROW_MARGIN: f64 = 15.0;
const SHADOW_OFFSET_X: f64 = 2.0;
const SHADOW_OFFSET_Y: f64 = 3.0;

/// Measures label text.
///
/// Sizes are in model units; the view scales them.
pub trait TextMeasure {
    /// Returns the unscaled size of `text` drawn with `style`.
    fn measure(&self, text: &str, style: &Style) -> Size;
}

/// Text measure that estimates from the font size alone.
///
/// The font size defaults to 11. Each character is `0.6 * fontSize` wide and each line `1.2 * fontSize`
/// tall. Lines are split on `'\n'` only; wrapping is left to real measures.
#[derive(Clone, Copy, Debug, Default)]
pub struct EstimatedTextMeasure;

impl TextMeasure for EstimatedTextMeasure {
    fn measure(&self, text: &str, style: &Style) -> Size {
        let font = style.number_or(keys::FONT_SIZE, DEFAULT_FONT_SIZE);
        let mut lines = 0_usize;
        let mut widest = 0_usize;
        for line in text.split('\n') {
            lines += 1;
            widest = widest.max(line.chars().count());
        }
        Size::new(widest as f64 * font * 0.6, lines as f64 * font * 1.2)
    }
}

/// Computes the device-space label rectangle of `state`.
///
/// Vertex labels are aligned inside the vertex rectangle shifted by the
/// label offset; edge labels are centered on the edge's label anchor.
pub(crate) fn label_bounds(
    state: &CellState,
    label: Option<&str>,
    measure: &dyn TextMeasure,
    scale: f64,
) -> Option<Rect> {
    let style = &state.style;
    let overflow = style.text(keys::OVERFLOW);
    if overflow == Some(values::OVERFLOW_FILL) {
        return Some(state.rect());
    }
    let label = label?;

    let spacing = style.number_or(keys::SPACING, DEFAULT_SPACING);
    let left = (spacing + style.number_or(keys::SPACING_LEFT, 0.0)) * scale;
    let right = (spacing + style.number_or(keys::SPACING_RIGHT, 0.0)) * scale;
    let top = (spacing + style.number_or(keys::SPACING_TOP, 0.0)) * scale;
    let bottom = (spacing + style.number_or(keys::SPACING_BOTTOM, 0.0)) * scale;

    let size = measure.measure(label, &style.raw);
    let w = size.width * scale + left + right;
    let h = size.height * scale + top + bottom;

    let (mut x, mut y) = if state.is_edge() {
        (
            state.absolute_offset.x - w / 2.0,
            state.absolute_offset.y - h / 2.0,
        )
    } else {
        let r = state.rect() + state.absolute_offset;
        let x = match style.text(keys::ALIGN) {
            Some(values::LEFT) => r.x0,
            Some(values::RIGHT) => r.x1 - w,
            _ => r.center().x - w / 2.0,
        };
        let y = match style.text(keys::VERTICAL_ALIGN) {
            Some(values::TOP) => r.y0,
            Some(values::BOTTOM) => r.y1 - h,
            _ => r.center().y - h / 2.0,
        };
        (x, y)
    };

    if style.text(keys::IMAGE).is_some()
        && style.text(keys::IMAGE_ALIGN) == Some(values::CENTER)
        && style.text(keys::IMAGE_VERTICAL_ALIGN) == Some(values::MIDDLE)
    {
        y += style.number_or(keys::IMAGE_HEIGHT, DEFAULT_IMAGE_SIZE) * scale / 2.0;
    }

    let mut width = w;
    if overflow == Some(values::OVERFLOW_WIDTH) {
        x = state.x;
        width = state.width;
    }
    Some(Rect::new(x, y, x + width, y + h))
}

/// Computes the device-space bounding box of a state whose rectangle and
/// label bounds are current.
///
/// The result always contains the state rectangle.
pub(crate) fn bounding_box(state: &CellState, scale: f64, clip_labels: bool) -> Rect {
    let style = &state.style;
    let shape = style.text(keys::SHAPE);

    let stroke = (style.number_or(keys::STROKE_WIDTH, 1.0) * scale)
        .round()
        .max(1.0);
    let mut grow = stroke / 2.0;
    if state.is_edge() {
        let arrow = |key: &str| style.text(key).is_some_and(|a| a != values::NONE);
        let start = arrow(keys::START_ARROW);
        let end = arrow(keys::END_ARROW);
        if start || end {
            let mut size = 0.0_f64;
            if start {
                size = size.max(style.number_or(keys::START_SIZE, DEFAULT_MARKER_SIZE));
            }
            if end {
                size = size.max(style.number_or(keys::END_SIZE, DEFAULT_MARKER_SIZE));
            }
            grow += (size * scale).round();
        }
        if shape == Some(values::SHAPE_ARROW) {
            grow += ARROW_MARGIN;
        }
    }
    let mut bbox = state.rect().inflate(grow, grow);

    if style.flag_or(keys::SHADOW, false) {
        bbox.x1 += SHADOW_OFFSET_X;
        bbox.y1 += SHADOW_OFFSET_Y;
    }

    if shape == Some(values::SHAPE_LABEL) && style.text(keys::IMAGE).is_some() {
        bbox = bbox.union(label_image(state, scale));
    }

    let angle = style.rotation_radians();
    if angle != 0.0 {
        bbox = bbox.union(rotated(state.rect(), angle));
    }

    if !clip_labels
        && style.text(keys::OVERFLOW) != Some(values::OVERFLOW_HIDDEN)
        && let Some(label) = state.label_bounds
    {
        let label = if angle != 0.0 {
            rotated(label, angle)
        } else {
            label
        };
        bbox = bbox.union(label);
    }
    bbox
}

/// Image box of a `label` shape, aligned inside the state rectangle.
fn label_image(state: &CellState, scale: f64) -> Rect {
    let style = &state.style;
    let w = style.number_or(keys::IMAGE_WIDTH, DEFAULT_IMAGE_SIZE) * scale;
    let h = style.number_or(keys::IMAGE_HEIGHT, DEFAULT_IMAGE_SIZE) * scale;
    let r = state.rect();
    let x = match style.text(keys::IMAGE_ALIGN) {
        Some(values::CENTER) => r.center().x - w / 2.0,
        Some(values::RIGHT) => r.x1 - w,
        _ => r.x0,
    };
    let y = match style.text(keys::IMAGE_VERTICAL_ALIGN) {
        Some(values::TOP) => r.y0,
        Some(values::BOTTOM) => r.y1 - h,
        _ => r.center().y - h / 2.0,
    };
    Rect::new(x, y, x + w, y + h)
}

/// Axis-aligned box of `rect` rotated about its center.
fn rotated(rect: Rect, angle: f64) -> Rect {
    Affine::rotate_about(angle, rect.center()).transform_rect_bbox(rect)
}
