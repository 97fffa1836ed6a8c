use serde::{Deserialize, Serialize};

use crate::*;

/// What a player can see around one tile: how many neighbors are open or flagged, and the
/// numbers showing on the open ones.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NeighborSummary {
    pub revealed: u8,
    pub flagged: u8,
    pub visible_numbers: Vec<u8>,
}

impl NeighborSummary {
    pub fn around(state: &GameState, coord: Coord) -> Result<Self> {
        let coord = state.validate_coord(coord)?;
        let mut summary = Self::default();

        for pos in state.neighbors(coord) {
            let tile = state.tile(pos)?;
            if tile.is_revealed() {
                summary.revealed += 1;
                if tile.adjacent_mines() > 0 {
                    summary.visible_numbers.push(tile.adjacent_mines());
                }
            }
            if tile.is_flagged() {
                summary.flagged += 1;
            }
        }

        Ok(summary)
    }

    pub fn is_near_revealed(&self) -> bool {
        self.revealed > 0
    }

    /// Comma separated numbers, or `none`.
    pub fn visible_numbers_label(&self) -> String {
        if self.visible_numbers.is_empty() {
            "none".into()
        } else {
            self.visible_numbers
                .iter()
                .map(u8::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summarizes_revealed_numbers_and_flags() {
        let config = GameConfig::new(3, 3, 2);
        let mut generator = FixedMineGenerator::new([Coord::new(0, 0), Coord::new(2, 0)]);
        let mut engine = GameEngine::with_generator(config, &mut generator).unwrap();
        engine.click_tile(Coord::new(1, 0)).unwrap();
        engine.flag_tile(Coord::new(0, 0)).unwrap();

        let summary = NeighborSummary::around(&engine.game_state(), Coord::new(1, 1)).unwrap();

        assert_eq!(summary.revealed, 1);
        assert_eq!(summary.flagged, 1);
        assert_eq!(summary.visible_numbers, vec![2]);
        assert_eq!(summary.visible_numbers_label(), "2");
        assert!(summary.is_near_revealed());
    }

    #[test]
    fn fresh_board_has_nothing_nearby() {
        let engine = GameEngine::with_seed(GameConfig::beginner(), 3).unwrap();
        let summary = NeighborSummary::around(&engine.game_state(), Coord::new(4, 4)).unwrap();
        assert_eq!(summary, NeighborSummary::default());
        assert_eq!(summary.visible_numbers_label(), "none");
        assert!(!summary.is_near_revealed());
    }

    #[test]
    fn rejects_out_of_bounds() {
        let engine = GameEngine::with_seed(GameConfig::new(2, 2, 1), 1).unwrap();
        assert_eq!(
            NeighborSummary::around(&engine.game_state(), Coord::new(2, 0)),
            Err(GameError::InvalidCoordinate(Coord::new(2, 0)))
        );
    }
}
