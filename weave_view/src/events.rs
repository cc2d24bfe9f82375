// Copyright 2025 the Weave Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! View change notifications.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use kurbo::Vec2;
use weave_model::CellId;

/// Something about the view transform or root changed.
///
/// Listeners run after the change has been applied. Geometry is not
/// revalidated yet; listeners that need it call `validate` themselves.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ViewEvent {
    /// The scale changed.
    Scale {
        /// Scale before the change.
        previous: f64,
        /// Scale after the change.
        scale: f64,
    },
    /// The translation changed.
    Translate {
        /// Translation before the change.
        previous: Vec2,
        /// Translation after the change.
        translate: Vec2,
    },
    /// Scale and translation were set together.
    ScaleAndTranslate {
        /// Scale before the change.
        previous_scale: f64,
        /// Scale after the change.
        scale: f64,
        /// Translation before the change.
        previous_translate: Vec2,
        /// Translation after the change.
        translate: Vec2,
    },
    /// The display root moved towards the model root.
    Up {
        /// Root before the change.
        previous: Option<CellId>,
        /// Root after the change; `None` is the model root.
        root: Option<CellId>,
    },
    /// The display root moved into a descendant.
    Down {
        /// Root before the change.
        previous: Option<CellId>,
        /// Root after the change.
        root: Option<CellId>,
    },
}

/// Handle returned by [`GraphView::add_listener`](crate::GraphView::add_listener).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u32);

type Callback = Box<dyn FnMut(&ViewEvent)>;

#[derive(Default)]
pub(crate) struct Listeners {
    next: u32,
    entries: Vec<(ListenerId, Callback)>,
}

impl Listeners {
    pub(crate) fn add(&mut self, callback: Callback) -> ListenerId {
        let id = ListenerId(self.next);
        self.next = self.next.wrapping_add(1);
        self.entries.push((id, callback));
        id
    }

    pub(crate) fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(i, _)| *i != id);
        self.entries.len() != before
    }

    pub(crate) fn emit(&mut self, event: &ViewEvent) {
        for (_, callback) in &mut self.entries {
            callback(event);
        }
    }
}

impl fmt::Debug for Listeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("next", &self.next)
            .field("entries", &self.entries.len())
            .finish()
    }
}
