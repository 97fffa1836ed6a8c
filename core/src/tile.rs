use serde::{Deserialize, Serialize};

use crate::{Coord, Ix};

/// Per-cell record owned by the engine grid.
///
/// Fields are read-only from outside the crate: the engine is the only writer, which keeps
/// `is_revealed` and `is_flagged` mutually exclusive and `adjacent_mines` fixed after setup.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    x: Ix,
    y: Ix,
    is_mine: bool,
    is_revealed: bool,
    is_flagged: bool,
    adjacent_mines: u8,
}

impl Tile {
    pub(crate) const fn hidden(coord: Coord) -> Self {
        Self {
            x: coord.x,
            y: coord.y,
            is_mine: false,
            is_revealed: false,
            is_flagged: false,
            adjacent_mines: 0,
        }
    }

    pub const fn coord(&self) -> Coord {
        Coord::new(self.x, self.y)
    }

    pub const fn is_mine(&self) -> bool {
        self.is_mine
    }

    pub const fn is_revealed(&self) -> bool {
        self.is_revealed
    }

    pub const fn is_flagged(&self) -> bool {
        self.is_flagged
    }

    pub const fn adjacent_mines(&self) -> u8 {
        self.adjacent_mines
    }

    /// Neither revealed nor flagged.
    pub const fn is_hidden(&self) -> bool {
        !self.is_revealed && !self.is_flagged
    }

    pub(crate) fn set_mine(&mut self) {
        self.is_mine = true;
    }

    pub(crate) fn set_adjacent_mines(&mut self, count: u8) {
        self.adjacent_mines = count;
    }

    pub(crate) fn reveal(&mut self) {
        debug_assert!(!self.is_flagged, "flagged tiles are never revealed");
        self.is_revealed = true;
    }

    /// Drops a flag without going through the toggle path; used when the board is exposed on loss.
    pub(crate) fn clear_flag(&mut self) -> bool {
        core::mem::replace(&mut self.is_flagged, false)
    }

    /// Returns the new flag state.
    pub(crate) fn toggle_flag(&mut self) -> bool {
        debug_assert!(!self.is_revealed, "revealed tiles are never flagged");
        self.is_flagged = !self.is_flagged;
        self.is_flagged
    }
}
