use ndarray::Array2;

use crate::*;
pub use random::*;

mod random;

/// Source of a mine layout for a board under construction.
///
/// Keeping placement behind this seam is what makes board setup
/// deterministic in tests: inject a [`FixedMinePlacer`] or a seeded
/// [`RandomMinePlacer`] instead of ambient randomness.
pub trait MinePlacer {
    fn place(self, config: GameConfig) -> Result<Array2<bool>>;
}

/// Places mines at an explicit list of coordinates. Duplicates collapse into
/// a single mine.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FixedMinePlacer<'a> {
    mine_coords: &'a [Coord2],
}

impl<'a> FixedMinePlacer<'a> {
    pub const fn new(mine_coords: &'a [Coord2]) -> Self {
        Self { mine_coords }
    }
}

impl MinePlacer for FixedMinePlacer<'_> {
    fn place(self, config: GameConfig) -> Result<Array2<bool>> {
        let (width, height) = config.size;
        let mut mask: Array2<bool> = Array2::default(config.size.to_nd_index());

        for &coords in self.mine_coords {
            if coords.0 >= width || coords.1 >= height {
                return Err(GameError::InvalidCoords);
            }
            mask[coords.to_nd_index()] = true;
        }

        Ok(mask)
    }
}
