// Copyright 2025 the Weave Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;

use weave_model::CellId;

/// Errors from [`GraphView`](crate::GraphView) operations.
///
/// Geometry never fails: cells that cannot be represented simply have no
/// state. These errors cover invalid arguments to the view itself.
#[derive(Clone, Copy, PartialEq)]
pub enum ViewError {
    /// Scales must be finite and positive.
    InvalidScale(f64),
    /// Translations must be finite.
    InvalidTranslate,
    /// The cell is not in the model.
    UnknownCell(CellId),
}

impl fmt::Debug for ViewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidScale(scale) => write!(f, "InvalidScale({scale})"),
            Self::InvalidTranslate => f.write_str("InvalidTranslate"),
            Self::UnknownCell(cell) => write!(f, "UnknownCell({cell:?})"),
        }
    }
}

impl fmt::Display for ViewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidScale(scale) => {
                write!(f, "scale {scale} is not a finite positive number")
            }
            Self::InvalidTranslate => f.write_str("translation must be finite"),
            Self::UnknownCell(cell) => write!(f, "cell {cell:?} is not in the model"),
        }
    }
}

impl core::error::Error for ViewError {}

pub(crate) fn check_scale(scale: f64) -> Result<f64, ViewError> {
    if scale.is_finite() && scale > 0.0 {
        Ok(scale)
    } else {
        Err(ViewError::InvalidScale(scale))
    }
}

pub(crate) fn check_translate(dx: f64, dy: f64) -> Result<(), ViewError> {
    if dx.is_finite() && dy.is_finite() {
        Ok(())
    } else {
        Err(ViewError::InvalidTranslate)
    }
}
