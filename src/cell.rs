use serde::{Deserialize, Serialize};

use crate::*;

/// Per-position board state: identity, mine status, reveal/flag flags, and
/// the two adjacency counters.
///
/// `adjacent_mines` is computed once after mine placement and never changes;
/// `adjacent_flags` is a live counter maintained incrementally by
/// [`Board::toggle_flag`](crate::Board::toggle_flag) on the neighbors of the
/// toggled cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    i: Coord,
    j: Coord,
    mined: bool,
    revealed: bool,
    flagged: bool,
    adjacent_mines: u8,
    adjacent_flags: u8,
}

impl Cell {
    pub(crate) const fn new(i: Coord, j: Coord) -> Self {
        Self {
            i,
            j,
            mined: false,
            revealed: false,
            flagged: false,
            adjacent_mines: 0,
            adjacent_flags: 0,
        }
    }

    pub const fn coords(&self) -> Coord2 {
        (self.i, self.j)
    }

    pub const fn is_mined(&self) -> bool {
        self.mined
    }

    pub const fn is_revealed(&self) -> bool {
        self.revealed
    }

    pub const fn is_flagged(&self) -> bool {
        self.flagged
    }

    pub const fn adjacent_mines(&self) -> u8 {
        self.adjacent_mines
    }

    pub const fn adjacent_flags(&self) -> u8 {
        self.adjacent_flags
    }

    pub(crate) fn set_mined(&mut self) {
        self.mined = true;
    }

    pub(crate) fn set_adjacent_mines(&mut self, count: u8) {
        self.adjacent_mines = count;
    }

    /// Monotonic and idempotent: a cell never becomes hidden again.
    pub(crate) fn reveal(&mut self) {
        self.revealed = true;
    }

    /// Flips the flag. No-op once the cell is revealed.
    pub(crate) fn toggle_flag(&mut self) -> bool {
        if self.revealed {
            return false;
        }
        self.flagged = !self.flagged;
        true
    }

    pub(crate) fn adjust_flags(&mut self, delta: i8) {
        self.adjacent_flags = self.adjacent_flags.wrapping_add_signed(delta);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reveal_is_idempotent() {
        let mut cell = Cell::new(0, 0);
        cell.reveal();
        cell.reveal();
        assert!(cell.is_revealed());
    }

    #[test]
    fn toggle_flag_is_rejected_after_reveal() {
        let mut cell = Cell::new(2, 1);
        cell.reveal();
        assert!(!cell.toggle_flag());
        assert!(!cell.is_flagged());
    }

    #[test]
    fn flag_counter_tracks_deltas() {
        let mut cell = Cell::new(0, 0);
        cell.adjust_flags(1);
        cell.adjust_flags(1);
        cell.adjust_flags(-1);
        assert_eq!(cell.adjacent_flags(), 1);
    }
}
