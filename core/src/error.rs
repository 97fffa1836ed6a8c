use thiserror::Error;

use crate::{Coord, GameStatus};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid coordinate: ({}, {})", .0.x, .0.y)]
    InvalidCoordinate(Coord),
    #[error("Invalid coordinate key: {0:?}")]
    InvalidCoordinateKey(String),
    #[error("Invalid game configuration: {0}")]
    InvalidConfiguration(String),
    #[error("Game is not in playing state (currently {0:?})")]
    InvalidGameState(GameStatus),
}

impl GameError {
    /// Out-of-bounds or unparsable positions.
    pub const fn is_coordinate_error(&self) -> bool {
        matches!(self, Self::InvalidCoordinate(_) | Self::InvalidCoordinateKey(_))
    }

    /// Lifecycle violations, including a board that could never be played.
    pub const fn is_state_error(&self) -> bool {
        matches!(self, Self::InvalidConfiguration(_) | Self::InvalidGameState(_))
    }
}

pub type Result<T> = core::result::Result<T, GameError>;
