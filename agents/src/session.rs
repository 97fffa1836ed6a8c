//! One game at a time: an engine plus a router, and the bookkeeping that connects clicks to
//! the advice that preceded them.

use bluffsweeper_core::{ClickOutcome, Coord, FlagOutcome, GameConfig, GameEngine, GameState};
use serde::{Deserialize, Serialize};

use crate::completion::CompletionClient;
use crate::router::{AgentRouter, PostMortem, RouterConfig};
use crate::*;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub game: GameConfig,
    pub router: RouterConfig,
}

pub struct GameSession {
    engine: GameEngine,
    router: AgentRouter,
    config: SessionConfig,
    active: bool,
    pending_advice: Option<(Coord, Advice)>,
}

impl GameSession {
    pub fn new(client: CompletionClient, config: SessionConfig) -> Result<Self> {
        let engine = GameEngine::new(config.game)?;
        Ok(Self::with_parts(engine, AgentRouter::new(client, config.router), config))
    }

    /// Session over a prepared engine and router, for fixed layouts and custom agents.
    pub fn with_parts(engine: GameEngine, router: AgentRouter, config: SessionConfig) -> Self {
        log::debug!(
            "Starting session on {}x{} board with {} mines",
            engine.config().width,
            engine.config().height,
            engine.config().mine_count
        );
        Self {
            engine,
            router,
            config,
            active: true,
            pending_advice: None,
        }
    }

    /// Clicks a tile. If advice is pending, the click is recorded as following it when it hits
    /// the advised coordinate. Ignored while paused or after the game has ended.
    pub fn click_tile(&mut self, coord: Coord) -> Result<ClickOutcome> {
        if !self.active {
            return Ok(ClickOutcome::NoChange);
        }
        self.engine.tile(coord)?;

        if let Some((advised, _)) = self.pending_advice {
            self.router.record_player_decision(advised == coord, Some(coord));
        }

        let outcome = self.engine.click_tile(coord);
        self.pending_advice = None;
        let outcome = outcome?;

        if outcome.ends_game() {
            self.active = false;
            self.router.record_game_end();
        }
        Ok(outcome)
    }

    pub fn flag_tile(&mut self, coord: Coord) -> Result<FlagOutcome> {
        if !self.active {
            return Ok(FlagOutcome::NoChange);
        }
        Ok(self.engine.flag_tile(coord)?)
    }

    /// Asks the advisor about `coord` and remembers the answer until the next click.
    pub async fn request_advice(&mut self, coord: Coord) -> Result<Advice> {
        let state = self.engine.game_state();
        let advice = self.router.request_advice(coord, &state).await?;
        self.pending_advice = Some((coord, advice.clone()));
        Ok(advice)
    }

    /// Drops the pending advice without recording a decision.
    pub fn reject_advice(&mut self) {
        self.pending_advice = None;
    }

    pub async fn post_mortem(&mut self) -> Result<PostMortem> {
        self.router.generate_post_mortem_analysis().await
    }

    /// New board with the given or previous configuration. The analyst starts over.
    pub fn reset(&mut self, config: Option<GameConfig>) -> Result<()> {
        let game = config.unwrap_or(self.config.game);
        self.engine = GameEngine::new(game)?;
        self.config.game = game;
        self.router.reset_analyst();
        self.active = true;
        self.pending_advice = None;
        Ok(())
    }

    pub fn pause(&mut self) {
        self.active = false;
    }

    /// Only resumes a game that is still being played.
    pub fn resume(&mut self) {
        if self.engine.status().is_playing() {
            self.active = true;
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn pending_advice(&self) -> Option<(Coord, &Advice)> {
        self.pending_advice.as_ref().map(|(coord, advice)| (*coord, advice))
    }

    pub fn game_state(&self) -> GameState {
        self.engine.game_state()
    }

    pub fn current_metrics(&self) -> GameMetrics {
        self.router.current_metrics()
    }

    pub fn game_history(&self) -> Vec<GameEvent> {
        self.router.game_history()
    }

    pub fn router(&self) -> &AgentRouter {
        &self.router
    }

    pub fn config(&self) -> SessionConfig {
        self.config
    }
}
