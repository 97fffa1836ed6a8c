//! Role traits for the three agents.
//!
//! Each role declares what it can do as a static capability set. The analyst trait has no method
//! that produces text, and the router checks the declared sets so a misconfigured agent is caught
//! at startup rather than in play.

use async_trait::async_trait;
use bluffsweeper_core::{Coord, GameState};
use serde::{Deserialize, Serialize};

use crate::{Advice, GameEvent, GameMetrics, Result};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    ProvideAdvice,
    AnalyzeTileSafety,
    RecordAdvice,
    RecordDecision,
    RecordTileClick,
    RecordGameEnd,
    CalculateMetrics,
    GenerateAnalysis,
    DisplayMessage,
    ShowNotification,
    AlertPlayer,
    SendMessage,
}

impl Capability {
    /// Anything that would put text in front of the player.
    pub const fn is_player_facing(self) -> bool {
        matches!(
            self,
            Self::DisplayMessage | Self::ShowNotification | Self::AlertPlayer | Self::SendMessage
        )
    }
}

pub const ADVISOR_REQUIRED: &[Capability] = &[Capability::ProvideAdvice];
pub const ANALYST_REQUIRED: &[Capability] = &[
    Capability::RecordAdvice,
    Capability::RecordDecision,
    Capability::CalculateMetrics,
];
pub const NARRATOR_REQUIRED: &[Capability] = &[Capability::GenerateAnalysis];

pub trait Agent: Send + Sync {
    fn name(&self) -> &'static str;
    fn capabilities(&self) -> &'static [Capability];

    fn has_capability(&self, capability: Capability) -> bool {
        self.capabilities().contains(&capability)
    }
}

#[async_trait]
pub trait Advisor: Agent {
    async fn provide_advice(&self, coord: Coord, state: &GameState) -> Result<Advice>;

    /// Ground truth for bookkeeping. Never shown to the player.
    fn analyze_tile_safety(&self, coord: Coord, state: &GameState) -> Result<bool>;
}

/// Write-then-aggregate sink. Nothing here returns player-facing text.
pub trait Analyst: Agent {
    fn record_advice_given(&mut self, advice: Advice, actual_safety: bool);
    fn record_player_decision(&mut self, followed_advice: bool);
    fn record_tile_click(&mut self, coord: Coord, followed_advice: Option<bool>);
    fn record_game_end(&mut self);
    fn calculate_metrics(&self) -> GameMetrics;
    /// Owned copy of the chronological event log.
    fn game_history(&self) -> Vec<GameEvent>;
    fn total_advice_requests(&self) -> usize;
    fn last_advice(&self) -> Option<&Advice>;
    fn reset(&mut self);
}

#[async_trait]
pub trait Narrator: Agent {
    async fn generate_analysis(&self, metrics: &GameMetrics, history: &[GameEvent])
    -> Result<String>;
}
