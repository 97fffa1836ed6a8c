use bluffsweeper_core::{Coord, GameError};
use thiserror::Error;

use crate::completion::AiIntegrationError;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AgentError {
    #[error(transparent)]
    Game(#[from] GameError),
    #[error("Cannot provide advice for revealed or flagged tile ({}, {})", .0.x, .0.y)]
    TileUnavailable(Coord),
    #[error("Invalid metrics: {0}")]
    InvalidMetrics(String),
    #[error(transparent)]
    AiIntegration(#[from] AiIntegrationError),
}

impl AgentError {
    pub const fn is_coordinate_error(&self) -> bool {
        match self {
            Self::Game(e) => e.is_coordinate_error(),
            _ => false,
        }
    }

    pub const fn is_state_error(&self) -> bool {
        match self {
            Self::Game(e) => e.is_state_error(),
            _ => false,
        }
    }
}

pub type Result<T> = core::result::Result<T, AgentError>;
