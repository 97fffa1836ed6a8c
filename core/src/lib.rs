//! Minesweeper rules for Bluffsweeper: board setup, reveals with cascade, flags, and win/loss.
//!
//! The engine is synchronous and single-owner. Readers get owned [`GameState`] snapshots.

use serde::{Deserialize, Serialize};

pub use engine::*;
pub use error::*;
pub use generator::*;
pub use neighborhood::*;
pub use tile::*;
pub use types::*;

mod engine;
mod error;
mod generator;
mod neighborhood;
mod tile;
mod types;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub width: Ix,
    pub height: Ix,
    pub mine_count: Ax,
}

impl GameConfig {
    pub const fn new(width: Ix, height: Ix, mine_count: Ax) -> Self {
        Self {
            width,
            height,
            mine_count,
        }
    }

    pub const fn beginner() -> Self {
        Self::new(9, 9, 10)
    }

    pub const fn intermediate() -> Self {
        Self::new(16, 16, 40)
    }

    pub const fn expert() -> Self {
        Self::new(30, 16, 99)
    }

    pub const fn total_tiles(&self) -> Ax {
        mult(self.width, self.height)
    }

    pub const fn safe_tiles(&self) -> Ax {
        self.total_tiles().saturating_sub(self.mine_count)
    }

    /// A board must have at least one tile and at least one safe tile.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(GameError::InvalidConfiguration(format!(
                "grid dimensions must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if self.mine_count >= self.total_tiles() {
            return Err(GameError::InvalidConfiguration(format!(
                "mine count must be between 0 and {}, got {}",
                self.total_tiles() - 1,
                self.mine_count
            )));
        }
        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::beginner()
    }
}

/// Outcome of clicking a tile
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ClickOutcome {
    NoChange,
    Revealed,
    HitMine,
    Won,
}

impl ClickOutcome {
    /// Whether this outcome could have caused an update to the game
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }

    pub const fn ends_game(self) -> bool {
        matches!(self, Self::HitMine | Self::Won)
    }
}

/// Outcome of toggling a flag
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FlagOutcome {
    NoChange,
    Flagged,
    Unflagged,
}

impl FlagOutcome {
    /// Whether this outcome could have caused an update to the game
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_validation_bounds() {
        assert!(GameConfig::new(1, 1, 0).validate().is_ok());
        assert!(GameConfig::new(3, 3, 8).validate().is_ok());
        assert!(GameConfig::expert().validate().is_ok());

        for bad in [
            GameConfig::new(0, 3, 0),
            GameConfig::new(3, 0, 0),
            GameConfig::new(3, 3, 9),
            GameConfig::new(1, 1, 1),
        ] {
            let err = bad.validate().unwrap_err();
            assert!(err.is_state_error(), "{bad:?} gave {err:?}");
        }
    }

    #[test]
    fn config_serializes_with_field_names() {
        let json = serde_json::to_value(GameConfig::beginner()).unwrap();
        assert_eq!(json["width"], 9);
        assert_eq!(json["mine_count"], 10);
    }
}
