use std::collections::{BTreeSet, VecDeque};

use ndarray::{Array2, ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    #[default]
    Playing,
    Won,
    Lost,
}

impl GameStatus {
    pub const fn is_playing(self) -> bool {
        matches!(self, Self::Playing)
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// Full board state. The engine owns one; everyone else receives deep copies via
/// [`GameEngine::game_state`], so mutating a snapshot can never reach the engine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    grid: Array2<Tile>,
    status: GameStatus,
    mine_locations: BTreeSet<Coord>,
    revealed_tiles: BTreeSet<Coord>,
    flagged_tiles: BTreeSet<Coord>,
    width: Ix,
    height: Ix,
    mine_count: Ax,
}

impl GameState {
    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn width(&self) -> Ix {
        self.width
    }

    pub fn height(&self) -> Ix {
        self.height
    }

    pub fn mine_count(&self) -> Ax {
        self.mine_count
    }

    pub fn total_tiles(&self) -> Ax {
        mult(self.width, self.height)
    }

    /// Row-major view, indexed `[y, x]`.
    pub fn grid(&self) -> ArrayView2<'_, Tile> {
        self.grid.view()
    }

    /// Rows from top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = ArrayView1<'_, Tile>> {
        self.grid.outer_iter()
    }

    pub fn mine_locations(&self) -> &BTreeSet<Coord> {
        &self.mine_locations
    }

    pub fn revealed_tiles(&self) -> &BTreeSet<Coord> {
        &self.revealed_tiles
    }

    pub fn flagged_tiles(&self) -> &BTreeSet<Coord> {
        &self.flagged_tiles
    }

    pub fn contains(&self, coord: Coord) -> bool {
        coord.is_within(self.width, self.height)
    }

    pub fn validate_coord(&self, coord: Coord) -> Result<Coord> {
        if self.contains(coord) {
            Ok(coord)
        } else {
            Err(GameError::InvalidCoordinate(coord))
        }
    }

    pub fn tile(&self, coord: Coord) -> Result<&Tile> {
        let coord = self.validate_coord(coord)?;
        Ok(&self.grid[coord.to_nd_index()])
    }

    pub fn neighbors(&self, coord: Coord) -> NeighborIter {
        coord.neighbors(self.width, self.height)
    }

    /// Fraction of the board revealed so far, in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        self.revealed_tiles.len() as f64 / f64::from(self.total_tiles())
    }

    /// Revealed tiles that are not mines; differs from `revealed_tiles().len()` only after a
    /// loss exposes the minefield.
    pub fn revealed_safe_count(&self) -> usize {
        self.revealed_tiles
            .iter()
            .filter(|coord| !self.mine_locations.contains(coord))
            .count()
    }

    fn all_safe_revealed(&self) -> bool {
        self.revealed_tiles.len() == usize::from(self.total_tiles() - self.mine_count)
    }
}

/// Owns the board and applies the rules. Construct a fresh engine for each game.
#[derive(Clone, Debug)]
pub struct GameEngine {
    state: GameState,
}

impl GameEngine {
    /// New game with mines placed from OS entropy.
    pub fn new(config: GameConfig) -> Result<Self> {
        Self::with_generator(config, &mut RandomMineGenerator::from_os_rng())
    }

    /// New game with a reproducible layout.
    pub fn with_seed(config: GameConfig, seed: u64) -> Result<Self> {
        Self::with_generator(config, &mut RandomMineGenerator::new(seed))
    }

    pub fn with_generator(config: GameConfig, generator: &mut impl MineGenerator) -> Result<Self> {
        config.validate()?;
        let mine_locations = generator.place_mines(&config)?;

        let mut grid = Array2::from_shape_fn(
            (usize::from(config.height), usize::from(config.width)),
            |(y, x)| Tile::hidden(Coord::new(x as Ix, y as Ix)),
        );

        for &mine in &mine_locations {
            grid[mine.to_nd_index()].set_mine();
        }

        for y in 0..config.height {
            for x in 0..config.width {
                let coord = Coord::new(x, y);
                if grid[coord.to_nd_index()].is_mine() {
                    continue;
                }
                let count = coord
                    .neighbors(config.width, config.height)
                    .filter(|&pos| grid[pos.to_nd_index()].is_mine())
                    .count();
                // at most 8 neighbors
                grid[coord.to_nd_index()].set_adjacent_mines(count as u8);
            }
        }

        log::debug!(
            "New game {}x{} with {} mines",
            config.width,
            config.height,
            config.mine_count
        );

        Ok(Self {
            state: GameState {
                grid,
                status: GameStatus::Playing,
                mine_locations,
                revealed_tiles: BTreeSet::new(),
                flagged_tiles: BTreeSet::new(),
                width: config.width,
                height: config.height,
                mine_count: config.mine_count,
            },
        })
    }

    /// Deep snapshot of the current state.
    pub fn game_state(&self) -> GameState {
        self.state.clone()
    }

    pub fn status(&self) -> GameStatus {
        self.state.status
    }

    pub fn config(&self) -> GameConfig {
        GameConfig::new(self.state.width, self.state.height, self.state.mine_count)
    }

    pub fn tile(&self, coord: Coord) -> Result<Tile> {
        self.state.tile(coord).copied()
    }

    pub fn click_tile(&mut self, coord: Coord) -> Result<ClickOutcome> {
        let coord = self.state.validate_coord(coord)?;
        self.check_playing()?;

        let tile = self.state.grid[coord.to_nd_index()];
        if !tile.is_hidden() {
            return Ok(ClickOutcome::NoChange);
        }

        self.reveal_single(coord);

        if tile.is_mine() {
            self.state.status = GameStatus::Lost;
            self.reveal_all_mines();
            log::debug!("Mine hit at {coord}, game lost");
            return Ok(ClickOutcome::HitMine);
        }

        log::debug!("Revealed {coord}, adjacent mines: {}", tile.adjacent_mines());
        if tile.adjacent_mines() == 0 {
            self.cascade_reveal(coord);
        }

        if self.state.all_safe_revealed() {
            self.state.status = GameStatus::Won;
            log::debug!("All safe tiles revealed, game won");
            Ok(ClickOutcome::Won)
        } else {
            Ok(ClickOutcome::Revealed)
        }
    }

    pub fn flag_tile(&mut self, coord: Coord) -> Result<FlagOutcome> {
        let coord = self.state.validate_coord(coord)?;
        self.check_playing()?;

        let tile = &mut self.state.grid[coord.to_nd_index()];
        if tile.is_revealed() {
            return Ok(FlagOutcome::NoChange);
        }

        Ok(if tile.toggle_flag() {
            self.state.flagged_tiles.insert(coord);
            log::debug!("Flagged {coord}");
            FlagOutcome::Flagged
        } else {
            self.state.flagged_tiles.remove(&coord);
            log::debug!("Unflagged {coord}");
            FlagOutcome::Unflagged
        })
    }

    fn reveal_single(&mut self, coord: Coord) {
        self.state.grid[coord.to_nd_index()].reveal();
        self.state.revealed_tiles.insert(coord);
    }

    /// Flood fill outward from a zero tile. Mines and flags bound the region.
    fn cascade_reveal(&mut self, origin: Coord) {
        let mut visited = BTreeSet::from([origin]);
        let mut to_visit: VecDeque<_> = self.state.neighbors(origin).collect();
        log::trace!("Starting flood-fill from {origin}, initial neighbors: {to_visit:?}");

        while let Some(coord) = to_visit.pop_front() {
            if !visited.insert(coord) {
                continue;
            }

            let tile = self.state.grid[coord.to_nd_index()];
            if !tile.is_hidden() || tile.is_mine() {
                log::trace!("Skipping tile at {coord}");
                continue;
            }

            self.reveal_single(coord);
            log::trace!(
                "Flood revealed tile at {coord}, adjacent mines: {}",
                tile.adjacent_mines()
            );

            if tile.adjacent_mines() == 0 {
                to_visit.extend(
                    self.state
                        .neighbors(coord)
                        .filter(|pos| !visited.contains(pos)),
                );
            }
        }
    }

    /// One-time exposure of the minefield after a loss. Flags on mines are dropped so the tiles
    /// can be shown revealed; non-mine tiles are untouched.
    fn reveal_all_mines(&mut self) {
        let mines: Vec<_> = self.state.mine_locations.iter().copied().collect();
        for mine in mines {
            let tile = &mut self.state.grid[mine.to_nd_index()];
            if tile.clear_flag() {
                self.state.flagged_tiles.remove(&mine);
            }
            if !tile.is_revealed() {
                self.reveal_single(mine);
            }
        }
    }

    fn check_playing(&self) -> Result<()> {
        if self.state.status.is_playing() {
            Ok(())
        } else {
            Err(GameError::InvalidGameState(self.state.status))
        }
    }
}
