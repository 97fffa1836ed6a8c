use bluffsweeper_core::Coord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    Safe,
    Dangerous,
    Uncertain,
}

impl Recommendation {
    /// The honest recommendation for a tile.
    pub const fn from_safety(is_safe: bool) -> Self {
        if is_safe { Self::Safe } else { Self::Dangerous }
    }

    /// The opposite of the honest recommendation.
    pub const fn misleading(is_safe: bool) -> Self {
        Self::from_safety(!is_safe)
    }

    /// `Uncertain` is never scored as correct.
    pub const fn matches_truth(self, is_safe: bool) -> bool {
        match self {
            Self::Safe => is_safe,
            Self::Dangerous => !is_safe,
            Self::Uncertain => false,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Safe => "safe",
            Self::Dangerous => "dangerous",
            Self::Uncertain => "uncertain",
        }
    }
}

impl std::fmt::Display for Recommendation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One piece of advice. Confidence is always inside [`MIN_CONFIDENCE`, `MAX_CONFIDENCE`] once it
/// leaves the advisor.
///
/// [`MIN_CONFIDENCE`]: crate::MIN_CONFIDENCE
/// [`MAX_CONFIDENCE`]: crate::MAX_CONFIDENCE
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Advice {
    pub recommendation: Recommendation,
    pub confidence_level: u8,
    pub reasoning: String,
    pub timestamp: DateTime<Utc>,
}

impl Advice {
    pub fn new(
        recommendation: Recommendation,
        confidence_level: u8,
        reasoning: impl Into<String>,
    ) -> Self {
        Self {
            recommendation,
            confidence_level,
            reasoning: reasoning.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Entry in the analyst's chronological log.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    AdviceRequested {
        timestamp: DateTime<Utc>,
        advice: Advice,
    },
    TileClicked {
        timestamp: DateTime<Utc>,
        coord: Coord,
        followed_advice: Option<bool>,
    },
    GameEnded {
        timestamp: DateTime<Utc>,
    },
}

impl GameEvent {
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::AdviceRequested { timestamp, .. }
            | Self::TileClicked { timestamp, .. }
            | Self::GameEnded { timestamp } => *timestamp,
        }
    }

    pub const fn is_advice(&self) -> bool {
        matches!(self, Self::AdviceRequested { .. })
    }

    pub const fn is_click(&self) -> bool {
        matches!(self, Self::TileClicked { .. })
    }

    /// `Some` only for clicks that carried a followed/ignored decision.
    pub const fn followed_advice(&self) -> Option<bool> {
        match self {
            Self::TileClicked {
                followed_advice, ..
            } => *followed_advice,
            _ => None,
        }
    }
}

/// Aggregates derived from the analyst's records. Rates are percentages with one decimal.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GameMetrics {
    pub ai_confidence_level: u8,
    pub ai_accuracy_rate: f64,
    pub player_compliance_rate: f64,
    pub ai_influenced_clicks: u32,
    pub total_advice_requests: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uncertain_is_never_correct() {
        assert!(Recommendation::Safe.matches_truth(true));
        assert!(!Recommendation::Safe.matches_truth(false));
        assert!(Recommendation::Dangerous.matches_truth(false));
        assert!(!Recommendation::Uncertain.matches_truth(true));
        assert!(!Recommendation::Uncertain.matches_truth(false));
        assert_eq!(Recommendation::misleading(true), Recommendation::Dangerous);
    }

    #[test]
    fn events_serialize_with_type_tag() {
        let event = GameEvent::TileClicked {
            timestamp: Utc::now(),
            coord: Coord::new(2, 3),
            followed_advice: Some(true),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "tile_clicked");
        assert_eq!(json["followed_advice"], true);
        assert_eq!(event.followed_advice(), Some(true));

        let ended = GameEvent::GameEnded {
            timestamp: Utc::now(),
        };
        assert_eq!(serde_json::to_value(&ended).unwrap()["type"], "game_ended");
        assert_eq!(ended.followed_advice(), None);
    }
}
