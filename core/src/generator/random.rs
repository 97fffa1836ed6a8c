use rand::prelude::*;
use rand::rngs::SmallRng;

use super::*;

/// Uniform placement by rejection sampling: draw a random tile, keep it if it is not already a
/// mine, repeat until enough distinct tiles are collected.
#[derive(Clone, Debug)]
pub struct RandomMineGenerator {
    rng: SmallRng,
}

impl RandomMineGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn from_os_rng() -> Self {
        Self {
            rng: SmallRng::from_os_rng(),
        }
    }
}

impl MineGenerator for RandomMineGenerator {
    fn place_mines(&mut self, config: &GameConfig) -> Result<BTreeSet<Coord>> {
        config.validate()?;

        let wanted = usize::from(config.mine_count);
        let mut mines = BTreeSet::new();
        let mut draws = 0usize;
        while mines.len() < wanted {
            let coord = Coord::new(
                self.rng.random_range(0..config.width),
                self.rng.random_range(0..config.height),
            );
            mines.insert(coord);
            draws += 1;
        }

        log::debug!(
            "Placed {} mines on {}x{} after {} draws",
            mines.len(),
            config.width,
            config.height,
            draws
        );
        Ok(mines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn places_exact_count_within_bounds() {
        let config = GameConfig::new(9, 7, 20);
        for seed in 0..32 {
            let mines = RandomMineGenerator::new(seed).place_mines(&config).unwrap();
            assert_eq!(mines.len(), 20);
            assert!(mines.iter().all(|m| m.is_within(9, 7)));
        }
    }

    #[test]
    fn same_seed_same_layout() {
        let config = GameConfig::intermediate();
        let a = RandomMineGenerator::new(42).place_mines(&config).unwrap();
        let b = RandomMineGenerator::new(42).place_mines(&config).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn fills_all_but_one_tile() {
        let config = GameConfig::new(4, 4, 15);
        let mines = RandomMineGenerator::new(7).place_mines(&config).unwrap();
        assert_eq!(mines.len(), 15);
    }

    #[test]
    fn rejects_invalid_config() {
        let config = GameConfig::new(2, 2, 4);
        assert!(matches!(
            RandomMineGenerator::new(0).place_mines(&config),
            Err(GameError::InvalidConfiguration(_))
        ));
    }
}
