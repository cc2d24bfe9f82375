// Copyright 2025 the Weave Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// The way a shape faces.
///
/// For a triangle this is where the apex points; a hexagon facing north or
/// south has its corners at the top and bottom instead of at the sides.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Facing up.
    North,
    /// Facing down.
    South,
    /// Facing right. This is the default.
    #[default]
    East,
    /// Facing left.
    West,
}

impl Direction {
    /// Parses a style value (`"north"`, `"south"`, `"east"`, `"west"`).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "north" => Some(Self::North),
            "south" => Some(Self::South),
            "east" => Some(Self::East),
            "west" => Some(Self::West),
            _ => None,
        }
    }

    /// Returns `true` for [`Direction::North`] and [`Direction::South`].
    #[must_use]
    pub const fn is_vertical(self) -> bool {
        matches!(self, Self::North | Self::South)
    }
}
