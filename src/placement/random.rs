use super::*;

/// Uniform rejection-sampling placement: sample coordinates with
/// replacement, skip cells that already hold a mine, stop once the requested
/// count of distinct mines is placed.
///
/// Termination relies on the configuration guard — `GameConfig` never
/// admits `mines >= width * height`, so a free cell always remains and the
/// expected number of resamples stays small while the board is not nearly
/// full.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RandomMinePlacer {
    seed: u64,
}

impl RandomMinePlacer {
    pub const fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl MinePlacer for RandomMinePlacer {
    fn place(self, config: GameConfig) -> Result<Array2<bool>> {
        use rand::prelude::*;

        config.validate()?;

        let (width, height) = config.size;
        let mut mask: Array2<bool> = Array2::default(config.size.to_nd_index());
        let mut placed: CellCount = 0;

        let mut rng = SmallRng::seed_from_u64(self.seed);
        while placed < config.mines {
            let i: Coord = rng.random_range(0..width);
            let j: Coord = rng.random_range(0..height);

            let slot = &mut mask[(i, j).to_nd_index()];
            if !*slot {
                *slot = true;
                placed += 1;
            }
        }

        Ok(mask)
    }
}
