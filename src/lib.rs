#![no_std]

extern crate alloc;

use serde::{Deserialize, Serialize};

pub use board::*;
pub use cell::*;
pub use error::*;
pub use placement::*;
pub use types::*;

mod board;
mod cell;
mod error;
mod placement;
mod types;

/// Board dimensions and target mine count for one game.
///
/// Invalid configurations are rejected up front rather than clamped, so a
/// bad mine count can never degrade into a non-terminating placement loop.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub size: Coord2,
    pub mines: CellCount,
}

impl GameConfig {
    pub const fn new_unchecked(size: Coord2, mines: CellCount) -> Self {
        Self { size, mines }
    }

    pub fn new(size: Coord2, mines: CellCount) -> Result<Self> {
        let config = Self::new_unchecked(size, mines);
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.size.0 == 0 || self.size.1 == 0 {
            return Err(GameError::InvalidSize);
        }
        if self.mines >= self.total_cells() {
            return Err(GameError::TooManyMines);
        }
        Ok(())
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_board_mine_count_is_rejected() {
        assert_eq!(GameConfig::new((2, 2), 4), Err(GameError::TooManyMines));
        assert!(GameConfig::new((2, 2), 3).is_ok());
    }

    #[test]
    fn zero_mines_is_a_valid_degenerate_config() {
        let config = GameConfig::new((2, 2), 0).unwrap();
        assert_eq!(config.total_cells(), 4);
    }
}
