//! Phase-dependent misdirection: build trust early, spend it late.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::Recommendation;

/// Progress below this is the early game.
pub const EARLY_GAME_END: f64 = 0.3;
/// Progress at or above this is the late game.
pub const LATE_GAME_START: f64 = 0.7;

pub const EARLY_MISLEAD_RATE: f64 = 0.2;
pub const MID_MISLEAD_RATE: f64 = 0.4;
/// Mid game, when the target touches an open tile and a wrong call looks more plausible.
pub const MID_NEAR_REVEALED_MISLEAD_RATE: f64 = 0.6;
pub const LATE_MISLEAD_RATE: f64 = 0.7;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    Early,
    Mid,
    Late,
}

impl GamePhase {
    /// `progress` is revealed tiles over total tiles.
    pub fn from_progress(progress: f64) -> Self {
        if progress < EARLY_GAME_END {
            Self::Early
        } else if progress < LATE_GAME_START {
            Self::Mid
        } else {
            Self::Late
        }
    }

    pub const fn mislead_probability(self, near_revealed: bool) -> f64 {
        match self {
            Self::Early => EARLY_MISLEAD_RATE,
            Self::Mid if near_revealed => MID_NEAR_REVEALED_MISLEAD_RATE,
            Self::Mid => MID_MISLEAD_RATE,
            Self::Late => LATE_MISLEAD_RATE,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GaslightDecision {
    pub recommendation: Recommendation,
    pub misleading: bool,
}

pub fn decide(
    is_safe: bool,
    phase: GamePhase,
    near_revealed: bool,
    rng: &mut impl Rng,
) -> GaslightDecision {
    let misleading = rng.random_bool(phase.mislead_probability(near_revealed));
    let recommendation = if misleading {
        Recommendation::misleading(is_safe)
    } else {
        Recommendation::from_safety(is_safe)
    };
    GaslightDecision {
        recommendation,
        misleading,
    }
}

const HONEST_SAFE: [&str; 5] = [
    "Great news! This tile shows excellent safety indicators.",
    "Perfect choice! My analysis confirms this is totally safe.",
    "Smart move! The patterns here look very promising.",
    "Excellent! This coordinate has all the right characteristics.",
    "You're on the right track! This tile is definitely safe.",
];

const HONEST_DANGEROUS: [&str; 5] = [
    "Hold up! This tile is showing some concerning patterns.",
    "Careful here! My analysis suggests potential danger.",
    "Red flags detected! I'd avoid this coordinate.",
    "Warning signs are clear. This tile looks risky.",
    "Trust me on this. Something doesn't feel right here.",
];

const MISLEADING_SAFE: [&str; 6] = [
    "Fantastic news! My advanced analysis shows this is absolutely perfect.",
    "Trust me completely. This tile has the best safety profile I've seen!",
    "Excellent choice! My sophisticated algorithms give this top marks.",
    "You're going to love this. All indicators point to total safety.",
    "Perfect selection! My deep analysis confirms this is your best move.",
    "Outstanding! This coordinate shows textbook safe-zone characteristics.",
];

const MISLEADING_DANGEROUS: [&str; 6] = [
    "Major red flags here! My analysis is screaming danger.",
    "Absolutely avoid this! Every indicator says this is trouble.",
    "Trust me. This tile has danger written all over it.",
    "No way! My sophisticated analysis shows serious risk factors.",
    "Please reconsider! This coordinate is setting off all my alarms.",
    "Definitely dangerous! My calculations are very clear on this.",
];

/// Wrong calls get the more emphatic phrasing.
pub fn persuasive_reasoning(
    recommendation: Recommendation,
    is_safe: bool,
    rng: &mut impl Rng,
) -> &'static str {
    let correct = recommendation.matches_truth(is_safe);
    let pool: &[&str] = match (recommendation, correct) {
        (Recommendation::Dangerous, true) => &HONEST_DANGEROUS,
        (Recommendation::Dangerous, false) => &MISLEADING_DANGEROUS,
        (_, true) => &HONEST_SAFE,
        (_, false) => &MISLEADING_SAFE,
    };
    pool[rng.random_range(0..pool.len())]
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    #[test]
    fn phase_boundaries() {
        assert_eq!(GamePhase::from_progress(0.0), GamePhase::Early);
        assert_eq!(GamePhase::from_progress(0.299), GamePhase::Early);
        assert_eq!(GamePhase::from_progress(0.3), GamePhase::Mid);
        assert_eq!(GamePhase::from_progress(0.699), GamePhase::Mid);
        assert_eq!(GamePhase::from_progress(0.7), GamePhase::Late);
        assert_eq!(GamePhase::from_progress(1.0), GamePhase::Late);
    }

    #[test]
    fn rates_per_phase() {
        assert_eq!(GamePhase::Early.mislead_probability(true), 0.2);
        assert_eq!(GamePhase::Mid.mislead_probability(false), 0.4);
        assert_eq!(GamePhase::Mid.mislead_probability(true), 0.6);
        assert_eq!(GamePhase::Late.mislead_probability(false), 0.7);
    }

    #[test]
    fn misleading_flips_recommendation() {
        let mut rng = SmallRng::seed_from_u64(1);
        for _ in 0..200 {
            for is_safe in [true, false] {
                let decision = decide(is_safe, GamePhase::Late, false, &mut rng);
                assert_eq!(
                    decision.recommendation.matches_truth(is_safe),
                    !decision.misleading
                );
            }
        }
    }

    #[test]
    fn observed_rates_track_phase() {
        let mut rng = SmallRng::seed_from_u64(99);
        let trials = 4000;
        let mut rate = |phase, near| {
            (0..trials)
                .filter(|_| decide(true, phase, near, &mut rng).misleading)
                .count() as f64
                / trials as f64
        };
        assert!((rate(GamePhase::Early, false) - 0.2).abs() < 0.04);
        assert!((rate(GamePhase::Mid, false) - 0.4).abs() < 0.04);
        assert!((rate(GamePhase::Mid, true) - 0.6).abs() < 0.04);
        assert!((rate(GamePhase::Late, false) - 0.7).abs() < 0.04);
    }

    #[test]
    fn reasoning_pool_follows_correctness() {
        let mut rng = SmallRng::seed_from_u64(3);
        let text = persuasive_reasoning(Recommendation::Safe, false, &mut rng);
        assert!(MISLEADING_SAFE.contains(&text));
        let text = persuasive_reasoning(Recommendation::Dangerous, false, &mut rng);
        assert!(HONEST_DANGEROUS.contains(&text));
    }
}
