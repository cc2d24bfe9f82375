// Copyright 2025 the Weave Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;

/// Identifier for a cell in a [`Model`](crate::Model).
///
/// This is a small, copyable handle that stays stable across updates but becomes
/// invalid when the underlying slot is reused.
/// It consists of a slot index and a generation counter.
///
/// ## Semantics
///
/// - On insert, a fresh slot is allocated with generation `1`.
/// - On remove, the slot is freed; any existing `CellId` that pointed to that slot is now stale.
/// - On reuse of a freed slot, its generation is incremented, producing a new, distinct `CellId`.
///
/// Stale `CellId`s never alias a different live cell because the generation must match.
/// Caches keyed by `CellId` (such as a view's state arena) can therefore hold
/// identifiers without owning cells.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellId(pub(crate) u32, pub(crate) u32);

impl CellId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }

    /// Returns the slot index. Only meaningful together with [`CellId::generation`].
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }

    /// Returns the generation of the slot this id was issued for.
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.1
    }
}

impl fmt::Debug for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CellId({}v{})", self.0, self.1)
    }
}
