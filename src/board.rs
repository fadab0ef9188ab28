use alloc::collections::VecDeque;
use core::ops::BitOr;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum GameState {
    Active,
    Won,
    Lost,
}

impl GameState {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::Active
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum RevealOutcome {
    NoChange,
    Revealed,
    HitMine,
}

impl RevealOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }
}

impl BitOr for RevealOutcome {
    type Output = RevealOutcome;

    fn bitor(self, rhs: Self) -> Self::Output {
        use RevealOutcome::*;
        match (self, rhs) {
            (HitMine, _) | (_, HitMine) => HitMine,
            (Revealed, _) | (_, Revealed) => Revealed,
            (NoChange, NoChange) => NoChange,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum FlagOutcome {
    NoChange,
    Changed,
    Won,
}

impl FlagOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }
}

/// The sole source of truth for one game: a `width x height` grid of
/// [`Cell`]s plus the explicit terminal-state record.
///
/// The rendering/input shell issues one mutation at a time and re-queries
/// state after each call; nothing here blocks or suspends, and the flood
/// fill runs on an explicit work-list so the only bound is the board size.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    cells: Array2<Cell>,
    config: GameConfig,
    state: GameState,
}

impl Board {
    /// Builds a board from a validated configuration and a mine placer.
    pub fn new(config: GameConfig, placer: impl MinePlacer) -> Result<Self> {
        config.validate()?;
        let mask = placer.place(config)?;
        Self::from_mine_mask(config, mask)
    }

    /// Deterministic constructor over an explicit mine list; the mine count
    /// is derived from the distinct coordinates.
    pub fn from_mine_coords(size: Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        let placer = FixedMinePlacer::new(mine_coords);
        let mask = placer.place(GameConfig::new_unchecked(size, 0))?;
        let mines = mask.iter().filter(|&&mined| mined).count() as CellCount;
        let config = GameConfig::new(size, mines)?;
        Self::from_mine_mask(config, mask)
    }

    fn from_mine_mask(config: GameConfig, mask: Array2<bool>) -> Result<Self> {
        if mask.dim() != (config.size.0 as usize, config.size.1 as usize) {
            return Err(GameError::InvalidSize);
        }

        let actual_mines = mask.iter().filter(|&&mined| mined).count() as CellCount;
        if actual_mines != config.mines {
            log::warn!(
                "mine mask count mismatch, actual: {}, requested: {}",
                actual_mines,
                config.mines
            );
        }

        let mut cells = Array2::from_shape_fn(config.size.to_nd_index(), |(i, j)| {
            Cell::new(i as Coord, j as Coord)
        });
        for ((i, j), &mined) in mask.indexed_iter() {
            if mined {
                cells[[i, j]].set_mined();
            }
        }

        let mut board = Self {
            cells,
            config: GameConfig::new_unchecked(config.size, actual_mines),
            state: GameState::Active,
        };
        board.compute_adjacency();
        Ok(board)
    }

    fn compute_adjacency(&mut self) {
        let (width, height) = self.config.size;
        for i in 0..width {
            for j in 0..height {
                let count = self
                    .cells
                    .iter_neighbors((i, j))
                    .filter(|&pos| self.cells[pos.to_nd_index()].is_mined())
                    .count() as u8;
                self.cells[(i, j).to_nd_index()].set_adjacent_mines(count);
            }
        }
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn size(&self) -> Coord2 {
        self.config.size
    }

    pub fn mine_count(&self) -> CellCount {
        self.config.mines
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    /// Read-only projection of the cell at `coords`.
    ///
    /// Out-of-bounds coordinates are a caller programming error and panic;
    /// the shell derives valid coordinates from its own grid math.
    pub fn cell_at(&self, coords: Coord2) -> Cell {
        self.cells[coords.to_nd_index()]
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let (width, height) = self.config.size;
        if coords.0 < width && coords.1 < height {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    /// Reveals one cell. Revealed and flagged targets are a no-op; a mined
    /// target loses the game; a blank target floods its zero-count region
    /// and the region's nonzero border.
    pub fn reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let coords = self.validate_coords(coords)?;
        self.check_active()?;

        let cell = self.cell_at(coords);
        if cell.is_revealed() || cell.is_flagged() {
            return Ok(RevealOutcome::NoChange);
        }

        Ok(self.reveal_single_cell(coords))
    }

    /// Reveals every unrevealed, unflagged neighbor of an already-revealed
    /// cell, gated on its flag counter matching its mine counter.
    ///
    /// Exposing a mis-flagged mine here loses the game with full
    /// disclosure; the sweep stops at that point since the disclosure
    /// already covers the remaining neighbors.
    pub fn chord_reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let coords = self.validate_coords(coords)?;
        self.check_active()?;

        let cell = self.cell_at(coords);
        if !cell.is_revealed() || cell.adjacent_flags() != cell.adjacent_mines() {
            return Ok(RevealOutcome::NoChange);
        }

        let mut outcome = RevealOutcome::NoChange;
        for pos in self.cells.iter_neighbors(coords) {
            let neighbor = self.cell_at(pos);
            if neighbor.is_revealed() || neighbor.is_flagged() {
                continue;
            }
            outcome = outcome | self.reveal_single_cell(pos);
            if outcome == RevealOutcome::HitMine {
                break;
            }
        }
        Ok(outcome)
    }

    /// Flips the flag on a hidden cell and propagates the delta to every
    /// neighbor's `adjacent_flags` counter, which is what keeps
    /// [`chord_reveal`](Self::chord_reveal) correct without rescanning.
    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<FlagOutcome> {
        let coords = self.validate_coords(coords)?;
        self.check_active()?;

        if !self.cells[coords.to_nd_index()].toggle_flag() {
            return Ok(FlagOutcome::NoChange);
        }

        let delta: i8 = if self.cell_at(coords).is_flagged() { 1 } else { -1 };
        for pos in self.cells.iter_neighbors(coords) {
            self.cells[pos.to_nd_index()].adjust_flags(delta);
        }

        if self.is_won() {
            self.end_game(GameState::Won);
            return Ok(FlagOutcome::Won);
        }
        Ok(FlagOutcome::Changed)
    }

    /// Forces every cell revealed. Invoked on both terminal transitions to
    /// disclose the full board; also part of the public mutation surface
    /// for the shell.
    pub fn reveal_all(&mut self) {
        for cell in self.cells.iter_mut() {
            cell.reveal();
        }
    }

    /// True iff at least one mined cell has been revealed. A literal scan;
    /// once a game is over [`state`](Self::state) is the authoritative
    /// answer, since the end-of-game disclosure reveals mines on wins too.
    pub fn is_lost(&self) -> bool {
        self.cells
            .iter()
            .any(|cell| cell.is_mined() && cell.is_revealed())
    }

    /// True iff every mined cell is flagged. Flags on safe cells and the
    /// reveal state of safe cells are irrelevant: this is the authoritative
    /// win condition.
    pub fn is_won(&self) -> bool {
        self.cells
            .iter()
            .filter(|cell| cell.is_mined())
            .all(|cell| cell.is_flagged())
    }

    pub fn is_all_revealed(&self) -> bool {
        self.cells.iter().all(|cell| cell.is_revealed())
    }

    // Precondition: `coords` is in bounds, hidden, and unflagged.
    fn reveal_single_cell(&mut self, coords: Coord2) -> RevealOutcome {
        if self.cell_at(coords).is_mined() {
            self.cells[coords.to_nd_index()].reveal();
            self.end_game(GameState::Lost);
            return RevealOutcome::HitMine;
        }

        self.flood_reveal(coords);
        RevealOutcome::Revealed
    }

    // Work-list flood fill over the zero-count region, deduplicated by the
    // `revealed` flag itself: every pop either reveals a cell or skips one
    // already handled, so the loop runs at most `width * height` reveals.
    fn flood_reveal(&mut self, start: Coord2) {
        let mut to_visit = VecDeque::from([start]);

        while let Some(coords) = to_visit.pop_front() {
            let cell = self.cell_at(coords);
            if cell.is_revealed() || cell.is_flagged() {
                continue;
            }

            self.cells[coords.to_nd_index()].reveal();
            if cell.adjacent_mines() == 0 {
                to_visit.extend(self.cells.iter_neighbors(coords));
            }
        }
    }

    fn check_active(&self) -> Result<()> {
        if self.state.is_finished() {
            Err(GameError::AlreadyEnded)
        } else {
            Ok(())
        }
    }

    fn end_game(&mut self, state: GameState) {
        debug_assert!(state.is_finished());
        log::debug!("game over: {state:?}");
        self.state = state;
        self.reveal_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(size: Coord2, mines: &[Coord2]) -> Board {
        Board::from_mine_coords(size, mines).unwrap()
    }

    #[test]
    fn single_cell_board_with_a_mine_is_rejected() {
        assert_eq!(GameConfig::new((1, 1), 1), Err(GameError::TooManyMines));
        assert_eq!(
            Board::from_mine_coords((1, 1), &[(0, 0)]),
            Err(GameError::TooManyMines)
        );
    }

    #[test]
    fn zero_dimension_board_is_rejected() {
        assert_eq!(GameConfig::new((0, 5), 0), Err(GameError::InvalidSize));
        assert_eq!(GameConfig::new((5, 0), 0), Err(GameError::InvalidSize));
    }

    #[test]
    fn random_board_holds_exactly_the_requested_mines() {
        let config = GameConfig::new((9, 9), 10).unwrap();
        let board = Board::new(config, RandomMinePlacer::new(99)).unwrap();

        let mined = (0..9)
            .flat_map(|i| (0..9).map(move |j| (i, j)))
            .filter(|&coords| board.cell_at(coords).is_mined())
            .count();
        assert_eq!(mined, 10);
        assert_eq!(board.mine_count(), 10);
    }

    #[test]
    fn adjacency_counts_match_the_moore_neighborhood() {
        let board = board((3, 3), &[(0, 0)]);

        assert_eq!(board.cell_at((1, 1)).adjacent_mines(), 1);
        assert_eq!(board.cell_at((1, 0)).adjacent_mines(), 1);
        assert_eq!(board.cell_at((0, 1)).adjacent_mines(), 1);
        assert_eq!(board.cell_at((2, 0)).adjacent_mines(), 0);
        assert_eq!(board.cell_at((2, 2)).adjacent_mines(), 0);
    }

    #[test]
    fn revealing_a_mine_loses_and_discloses_the_board() {
        let mut board = board((3, 3), &[(0, 0)]);

        let outcome = board.reveal((0, 0)).unwrap();

        assert_eq!(outcome, RevealOutcome::HitMine);
        assert_eq!(board.state(), GameState::Lost);
        assert!(board.is_lost());
        assert!(board.is_all_revealed());
    }

    #[test]
    fn blank_reveal_floods_the_zero_region_and_its_border() {
        let mut board = board((3, 3), &[(0, 0)]);

        let outcome = board.reveal((2, 2)).unwrap();

        assert_eq!(outcome, RevealOutcome::Revealed);
        for coords in [(1, 1), (1, 2), (2, 1), (2, 2), (0, 1), (1, 0), (0, 2), (2, 0)] {
            assert!(board.cell_at(coords).is_revealed(), "{coords:?}");
        }
        assert!(!board.cell_at((0, 0)).is_revealed());
        assert!(!board.is_lost());
        assert_eq!(board.state(), GameState::Active);
    }

    #[test]
    fn reveal_is_a_noop_on_revealed_and_flagged_cells() {
        let mut board = board((3, 3), &[(0, 0)]);

        board.toggle_flag((1, 1)).unwrap();
        assert_eq!(board.reveal((1, 1)).unwrap(), RevealOutcome::NoChange);

        board.reveal((1, 0)).unwrap();
        assert_eq!(board.reveal((1, 0)).unwrap(), RevealOutcome::NoChange);
    }

    #[test]
    fn flood_fill_stops_at_flagged_cells() {
        let mut board = board((3, 3), &[(0, 0)]);

        board.toggle_flag((1, 2)).unwrap();
        board.reveal((2, 2)).unwrap();

        assert!(!board.cell_at((1, 2)).is_revealed());
        // (0, 2) is only reachable through the flagged cell's zero region
        assert!(!board.cell_at((0, 2)).is_revealed());
        assert!(board.cell_at((2, 1)).is_revealed());
    }

    #[test]
    fn flag_toggle_propagates_to_neighbor_counters() {
        let mut board = board((3, 3), &[(0, 0)]);

        board.toggle_flag((1, 1)).unwrap();
        for coords in [(0, 1), (1, 0), (2, 2), (0, 2), (2, 0)] {
            assert_eq!(board.cell_at(coords).adjacent_flags(), 1, "{coords:?}");
        }
        assert_eq!(board.cell_at((1, 1)).adjacent_flags(), 0);

        board.toggle_flag((1, 1)).unwrap();
        for coords in [(0, 1), (1, 0), (2, 2)] {
            assert_eq!(board.cell_at(coords).adjacent_flags(), 0, "{coords:?}");
        }
    }

    #[test]
    fn flagging_a_revealed_cell_is_a_noop() {
        let mut board = board((3, 3), &[(0, 0)]);

        board.reveal((2, 2)).unwrap();
        assert_eq!(board.toggle_flag((2, 2)).unwrap(), FlagOutcome::NoChange);
        assert_eq!(board.cell_at((1, 1)).adjacent_flags(), 0);
    }

    #[test]
    fn flagging_every_mine_wins_without_revealing_safe_cells() {
        let mines = [(0, 0), (4, 0), (0, 4), (4, 4)];
        let mut board = board((5, 5), &mines);

        // a stray flag on a safe cell does not affect the win condition
        board.toggle_flag((2, 2)).unwrap();

        for &coords in &mines[..3] {
            assert_eq!(board.toggle_flag(coords).unwrap(), FlagOutcome::Changed);
            assert!(!board.is_won());
        }
        assert_eq!(board.toggle_flag(mines[3]).unwrap(), FlagOutcome::Won);

        assert!(board.is_won());
        assert_eq!(board.state(), GameState::Won);
        assert!(board.is_all_revealed());
    }

    #[test]
    fn chord_reveal_requires_matching_flag_count() {
        let mut board = board((3, 3), &[(0, 0)]);

        board.reveal((1, 1)).unwrap();
        assert_eq!(board.chord_reveal((1, 1)).unwrap(), RevealOutcome::NoChange);

        board.toggle_flag((0, 0)).unwrap();
        let outcome = board.chord_reveal((1, 1)).unwrap();

        assert_eq!(outcome, RevealOutcome::Revealed);
        assert!(!board.is_lost());
        for coords in [(0, 1), (1, 0), (2, 2)] {
            assert!(board.cell_at(coords).is_revealed(), "{coords:?}");
        }
        assert!(!board.cell_at((0, 0)).is_revealed());
    }

    #[test]
    fn chord_reveal_on_a_hidden_cell_is_a_noop() {
        let mut board = board((3, 3), &[(0, 0)]);

        assert_eq!(board.chord_reveal((1, 1)).unwrap(), RevealOutcome::NoChange);
        assert!(!board.cell_at((1, 1)).is_revealed());
    }

    #[test]
    fn wrong_flag_chord_discloses_the_whole_board() {
        let mut board = board((3, 3), &[(0, 0)]);

        board.reveal((1, 1)).unwrap();
        board.toggle_flag((1, 0)).unwrap();

        let outcome = board.chord_reveal((1, 1)).unwrap();

        assert_eq!(outcome, RevealOutcome::HitMine);
        assert_eq!(board.state(), GameState::Lost);
        assert!(board.is_all_revealed());
    }

    #[test]
    fn no_moves_are_accepted_after_the_game_ends() {
        let mut board = board((3, 3), &[(0, 0)]);
        board.reveal((0, 0)).unwrap();

        assert_eq!(board.reveal((1, 1)), Err(GameError::AlreadyEnded));
        assert_eq!(board.toggle_flag((1, 1)), Err(GameError::AlreadyEnded));
        assert_eq!(board.chord_reveal((1, 1)), Err(GameError::AlreadyEnded));
    }

    #[test]
    fn out_of_bounds_moves_are_rejected() {
        let mut board = board((3, 3), &[(0, 0)]);

        assert_eq!(board.reveal((3, 0)), Err(GameError::InvalidCoords));
        assert_eq!(board.toggle_flag((0, 3)), Err(GameError::InvalidCoords));
    }

    #[test]
    fn board_state_survives_serialization() {
        let mut board = board((3, 3), &[(0, 0)]);
        board.reveal((2, 2)).unwrap();
        board.toggle_flag((0, 0)).unwrap();

        let json = serde_json::to_string(&board).unwrap();
        let restored: Board = serde_json::from_str(&json).unwrap();
        assert_eq!(board, restored);
    }
}
