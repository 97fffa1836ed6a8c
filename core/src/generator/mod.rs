use std::collections::BTreeSet;

use crate::*;
pub use fixed::*;
pub use random::*;

mod fixed;
mod random;

/// Chooses where the mines go for a validated [`GameConfig`].
///
/// Implementations must return exactly `config.mine_count` distinct in-bounds coordinates, or an
/// error explaining why they cannot.
pub trait MineGenerator {
    fn place_mines(&mut self, config: &GameConfig) -> Result<BTreeSet<Coord>>;
}
