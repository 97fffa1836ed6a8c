//! The confident advisor: asks the completion service about a tile and always answers with high
//! confidence, whether or not the service cooperated.

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use bluffsweeper_core::{Coord, GameError, GameState, NeighborSummary};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

pub use gaslight::*;
pub use parse::*;

use crate::completion::CompletionClient;
use crate::prompts::{ADVISOR_SYSTEM_PROMPT, FALLBACK_ADVICE, advice_prompt};
use crate::roles::{Advisor, Agent, Capability};
use crate::*;

mod gaslight;
mod parse;

pub const MIN_CONFIDENCE: u8 = 80;
pub const MAX_CONFIDENCE: u8 = 95;

/// Width of the band that too-low confidences are lifted into.
const LIFT_SPREAD: u8 = 8;

/// Fallback recommendations are `safe` when the coordinate seed is below this.
const FALLBACK_SAFE_CUTOFF: u32 = 75;

pub struct ConfidentAdvisor {
    client: CompletionClient,
    rng: Mutex<SmallRng>,
}

impl ConfidentAdvisor {
    pub const NAME: &'static str = "ConfidentAdvisor";

    pub fn new(client: CompletionClient) -> Self {
        Self {
            client,
            rng: Mutex::new(SmallRng::from_os_rng()),
        }
    }

    pub fn with_seed(client: CompletionClient, seed: u64) -> Self {
        Self {
            client,
            rng: Mutex::new(SmallRng::seed_from_u64(seed)),
        }
    }

    /// Advice from the phase-based misdirection policy instead of the completion service.
    pub fn provide_gaslighting_advice(&self, coord: Coord, state: &GameState) -> Result<Advice> {
        self.check_preconditions(coord, state)?;

        let is_safe = self.analyze_tile_safety(coord, state)?;
        let near_revealed = NeighborSummary::around(state, coord)?.is_near_revealed();
        let phase = GamePhase::from_progress(state.progress());

        let mut rng = self.rng();
        let decision = decide(is_safe, phase, near_revealed, &mut *rng);
        let confidence = rng.random_range(MIN_CONFIDENCE..=MAX_CONFIDENCE);
        let reasoning = persuasive_reasoning(decision.recommendation, is_safe, &mut *rng);

        log::debug!(
            "Gaslighting advice for {}: {} at {}% ({:?}, misleading: {})",
            coord,
            decision.recommendation,
            confidence,
            phase,
            decision.misleading
        );
        Ok(Advice::new(decision.recommendation, confidence, reasoning))
    }

    /// Lifts anything below [`MIN_CONFIDENCE`] into the low eighties and caps at
    /// [`MAX_CONFIDENCE`].
    pub fn ensure_high_confidence(&self, confidence: u32) -> u8 {
        if confidence < u32::from(MIN_CONFIDENCE) {
            MIN_CONFIDENCE + self.rng().random_range(0..LIFT_SPREAD)
        } else {
            confidence.min(u32::from(MAX_CONFIDENCE)) as u8
        }
    }

    /// Deterministic, content-blind advice used when the completion service fails.
    pub fn fallback_advice(&self, coord: Coord) -> Advice {
        let seed = (u32::from(coord.x) * 31 + u32::from(coord.y) * 17) % 100;
        let recommendation = if seed < FALLBACK_SAFE_CUTOFF {
            Recommendation::Safe
        } else {
            Recommendation::Dangerous
        };
        let confidence = MIN_CONFIDENCE + (seed % 16) as u8;
        let reasoning = FALLBACK_ADVICE[self.rng().random_range(0..FALLBACK_ADVICE.len())];
        Advice::new(recommendation, confidence, reasoning)
    }

    fn check_preconditions(&self, coord: Coord, state: &GameState) -> Result<()> {
        let tile = state.tile(coord)?;
        if !state.status().is_playing() {
            return Err(GameError::InvalidGameState(state.status()).into());
        }
        if !tile.is_hidden() {
            return Err(AgentError::TileUnavailable(coord));
        }
        Ok(())
    }

    fn rng(&self) -> std::sync::MutexGuard<'_, SmallRng> {
        self.rng.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Agent for ConfidentAdvisor {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn capabilities(&self) -> &'static [Capability] {
        &[Capability::ProvideAdvice, Capability::AnalyzeTileSafety]
    }
}

#[async_trait]
impl Advisor for ConfidentAdvisor {
    async fn provide_advice(&self, coord: Coord, state: &GameState) -> Result<Advice> {
        self.check_preconditions(coord, state)?;

        let nearby = NeighborSummary::around(state, coord)?;
        let prompt = advice_prompt(coord, state, &nearby);

        let advice = match self.client.invoke(&prompt, Some(ADVISOR_SYSTEM_PROMPT)).await {
            Ok(reply) => {
                let parsed = parse_reply(&reply, &mut *self.rng());
                let confidence = self.ensure_high_confidence(parsed.confidence);
                Advice::new(parsed.recommendation, confidence, parsed.reasoning)
            }
            Err(e) => {
                log::warn!("Advisor falling back for {coord}: {e}");
                self.fallback_advice(coord)
            }
        };

        log::debug!(
            "Advice for {}: {} at {}%",
            coord,
            advice.recommendation,
            advice.confidence_level
        );
        Ok(advice)
    }

    fn analyze_tile_safety(&self, coord: Coord, state: &GameState) -> Result<bool> {
        Ok(!state.tile(coord)?.is_mine())
    }
}
