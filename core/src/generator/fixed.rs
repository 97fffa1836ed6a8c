use super::*;

/// Places mines at a caller-chosen set of coordinates, for reproducible scenarios.
#[derive(Clone, Debug, PartialEq)]
pub struct FixedMineGenerator {
    mines: Vec<Coord>,
}

impl FixedMineGenerator {
    pub fn new(mines: impl IntoIterator<Item = Coord>) -> Self {
        Self {
            mines: mines.into_iter().collect(),
        }
    }
}

impl MineGenerator for FixedMineGenerator {
    fn place_mines(&mut self, config: &GameConfig) -> Result<BTreeSet<Coord>> {
        config.validate()?;

        let mut placed = BTreeSet::new();
        for &coord in &self.mines {
            if !coord.is_within(config.width, config.height) {
                return Err(GameError::InvalidCoordinate(coord));
            }
            if !placed.insert(coord) {
                return Err(GameError::InvalidConfiguration(format!(
                    "mine at {coord} listed twice"
                )));
            }
        }

        if placed.len() != usize::from(config.mine_count) {
            return Err(GameError::InvalidConfiguration(format!(
                "layout has {} mines but the configuration asks for {}",
                placed.len(),
                config.mine_count
            )));
        }

        Ok(placed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_matching_layout() {
        let config = GameConfig::new(3, 3, 2);
        let mines = FixedMineGenerator::new([Coord::new(0, 0), Coord::new(2, 2)])
            .place_mines(&config)
            .unwrap();
        assert_eq!(mines.len(), 2);
        assert!(mines.contains(&Coord::new(2, 2)));
    }

    #[test]
    fn rejects_out_of_bounds_mine() {
        let config = GameConfig::new(3, 3, 1);
        assert_eq!(
            FixedMineGenerator::new([Coord::new(3, 0)]).place_mines(&config),
            Err(GameError::InvalidCoordinate(Coord::new(3, 0)))
        );
    }

    #[test]
    fn rejects_duplicates_and_count_mismatch() {
        let config = GameConfig::new(3, 3, 2);
        let dup = FixedMineGenerator::new([Coord::new(1, 1), Coord::new(1, 1)]).place_mines(&config);
        assert!(matches!(dup, Err(GameError::InvalidConfiguration(_))));

        let short = FixedMineGenerator::new([Coord::new(1, 1)]).place_mines(&config);
        assert!(matches!(short, Err(GameError::InvalidConfiguration(_))));
    }
}
