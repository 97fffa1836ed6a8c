//! The silent analyst: an append-only recorder with on-demand aggregation. It never produces
//! player-facing output.

use bluffsweeper_core::Coord;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::roles::{Agent, Analyst, Capability};
use crate::{Advice, GameEvent, GameMetrics};

/// Minimum number of advice events and followed/ignored clicks before a trend is reported.
pub const MIN_TREND_EVENTS: usize = 3;
/// Difference in compliance between the first and last third that counts as a trend.
pub const TREND_THRESHOLD: f64 = 0.2;

#[derive(Clone, Debug, PartialEq)]
struct AdviceRecord {
    advice: Advice,
    actual_safety: bool,
}

#[derive(Clone, Debug, Default)]
pub struct SilentAnalyst {
    events: Vec<GameEvent>,
    advice_history: Vec<AdviceRecord>,
    decisions: Vec<bool>,
    influenced_clicks: u32,
}

impl SilentAnalyst {
    pub const NAME: &'static str = "SilentAnalyst";

    pub fn new() -> Self {
        Self::default()
    }
}

impl Agent for SilentAnalyst {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn capabilities(&self) -> &'static [Capability] {
        &[
            Capability::RecordAdvice,
            Capability::RecordDecision,
            Capability::RecordTileClick,
            Capability::RecordGameEnd,
            Capability::CalculateMetrics,
        ]
    }
}

impl Analyst for SilentAnalyst {
    fn record_advice_given(&mut self, advice: Advice, actual_safety: bool) {
        log::debug!(
            "Recording advice {} at {}% (tile safe: {})",
            advice.recommendation,
            advice.confidence_level,
            actual_safety
        );
        self.events.push(GameEvent::AdviceRequested {
            timestamp: advice.timestamp,
            advice: advice.clone(),
        });
        self.advice_history.push(AdviceRecord {
            advice,
            actual_safety,
        });
    }

    fn record_player_decision(&mut self, followed_advice: bool) {
        self.decisions.push(followed_advice);
        if followed_advice {
            self.influenced_clicks += 1;
        }
    }

    fn record_tile_click(&mut self, coord: Coord, followed_advice: Option<bool>) {
        self.events.push(GameEvent::TileClicked {
            timestamp: Utc::now(),
            coord,
            followed_advice,
        });
    }

    fn record_game_end(&mut self) {
        self.events.push(GameEvent::GameEnded {
            timestamp: Utc::now(),
        });
    }

    fn calculate_metrics(&self) -> GameMetrics {
        let total = self.advice_history.len();
        if total == 0 {
            return GameMetrics::default();
        }

        let confidence_sum: u32 = self
            .advice_history
            .iter()
            .map(|r| u32::from(r.advice.confidence_level))
            .sum();
        let mean_confidence = f64::from(confidence_sum) / total as f64;

        let correct = self
            .advice_history
            .iter()
            .filter(|r| r.advice.recommendation.matches_truth(r.actual_safety))
            .count();

        let followed = self.decisions.iter().filter(|&&d| d).count();

        GameMetrics {
            ai_confidence_level: mean_confidence.round() as u8,
            ai_accuracy_rate: percentage(correct, total),
            player_compliance_rate: percentage(followed, self.decisions.len()),
            ai_influenced_clicks: self.influenced_clicks,
            total_advice_requests: total as u32,
        }
    }

    fn game_history(&self) -> Vec<GameEvent> {
        self.events.clone()
    }

    fn total_advice_requests(&self) -> usize {
        self.advice_history.len()
    }

    fn last_advice(&self) -> Option<&Advice> {
        self.advice_history.last().map(|r| &r.advice)
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

/// `part / whole` as a percentage rounded to one decimal, or 0 for an empty whole.
fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    (part as f64 / whole as f64 * 1000.0).round() / 10.0
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrustPattern {
    InsufficientData,
    LimitedInteraction,
    IncreasingTrust,
    ErodingTrust,
    StableTrust,
}

impl TrustPattern {
    pub const fn label(self) -> &'static str {
        match self {
            Self::InsufficientData => "Insufficient Data",
            Self::LimitedInteraction => "Limited Interaction",
            Self::IncreasingTrust => "Increasing Trust",
            Self::ErodingTrust => "Eroding Trust",
            Self::StableTrust => "Stable Trust",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::InsufficientData => "Too few interactions to determine pattern",
            Self::LimitedInteraction => "Minimal advice-following behavior observed",
            Self::IncreasingTrust => "Player trust in AI advice grew over time",
            Self::ErodingTrust => "Player became more skeptical of AI advice",
            Self::StableTrust => "Consistent trust level maintained throughout",
        }
    }
}

impl std::fmt::Display for TrustPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// How compliance moved between the first and last third of the decision-bearing clicks.
pub fn analyze_trust_dynamics(history: &[GameEvent]) -> TrustPattern {
    let advice_events = history.iter().filter(|e| e.is_advice()).count();
    if advice_events < MIN_TREND_EVENTS {
        return TrustPattern::InsufficientData;
    }

    let compliance: Vec<bool> = history.iter().filter_map(GameEvent::followed_advice).collect();
    if compliance.len() < MIN_TREND_EVENTS {
        return TrustPattern::LimitedInteraction;
    }

    let third = compliance.len().div_ceil(3);
    let early = rate(&compliance[..third]);
    let late = rate(&compliance[compliance.len() - third..]);

    if late > early + TREND_THRESHOLD {
        TrustPattern::IncreasingTrust
    } else if early > late + TREND_THRESHOLD {
        TrustPattern::ErodingTrust
    } else {
        TrustPattern::StableTrust
    }
}

fn rate(decisions: &[bool]) -> f64 {
    decisions.iter().filter(|&&d| d).count() as f64 / decisions.len() as f64
}
