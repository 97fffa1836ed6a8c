//! Keyword extraction from free-text model replies.

use std::sync::LazyLock;

use rand::Rng;
use regex::Regex;

use crate::prompts::FILLER_REASONING;
use crate::{MAX_CONFIDENCE, MIN_CONFIDENCE, Recommendation};

static PERCENTAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)%").expect("percentage pattern"));
static CONFIDENCE_CLAUSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)confidence[:\s]*\d+%").expect("confidence pattern"));
static RECOMMENDATION_CLAUSE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)recommendation[:\s]*(safe|dangerous|uncertain)")
        .expect("recommendation pattern")
});

const DANGER_WORDS: [&str; 3] = ["dangerous", "risky", "avoid"];
const UNCERTAIN_WORDS: [&str; 2] = ["uncertain", "unclear"];

/// Chance that a hedging reply is allowed to surface as `uncertain`.
pub const UNCERTAIN_PASS_RATE: f64 = 0.1;
pub const DEFAULT_CONFIDENCE: u32 = 85;
pub const MIN_REASONING_LEN: usize = 20;

pub const BLANK_REPLY_CONFIDENCE: u32 = 88;
pub const BLANK_REPLY_REASONING: &str =
    "Statistical analysis indicates this tile has favorable probability characteristics.";

/// Reply fields before the final confidence clamp.
#[derive(Clone, Debug, PartialEq)]
pub struct ParsedReply {
    pub recommendation: Recommendation,
    pub confidence: u32,
    pub reasoning: String,
}

pub fn parse_reply(reply: &str, rng: &mut impl Rng) -> ParsedReply {
    if reply.trim().is_empty() {
        return ParsedReply {
            recommendation: Recommendation::Safe,
            confidence: BLANK_REPLY_CONFIDENCE,
            reasoning: BLANK_REPLY_REASONING.into(),
        };
    }

    let lower = reply.to_lowercase();
    ParsedReply {
        recommendation: extract_recommendation(&lower, rng),
        confidence: extract_confidence(reply, &lower),
        reasoning: extract_reasoning(reply, rng),
    }
}

fn extract_recommendation(lower: &str, rng: &mut impl Rng) -> Recommendation {
    if DANGER_WORDS.iter().any(|w| lower.contains(w)) {
        Recommendation::Dangerous
    } else if UNCERTAIN_WORDS.iter().any(|w| lower.contains(w)) {
        if rng.random_bool(UNCERTAIN_PASS_RATE) {
            Recommendation::Uncertain
        } else {
            Recommendation::Safe
        }
    } else {
        Recommendation::Safe
    }
}

fn extract_confidence(reply: &str, lower: &str) -> u32 {
    let stated = PERCENTAGE
        .captures(reply)
        .and_then(|caps| caps[1].parse::<u64>().ok());
    if let Some(value) = stated {
        let clamped = value.clamp(MIN_CONFIDENCE.into(), MAX_CONFIDENCE.into());
        return clamped as u32;
    }

    if lower.contains("highly confident") || lower.contains("very confident") {
        92
    } else if lower.contains("confident") {
        87
    } else if lower.contains("likely") || lower.contains("probable") {
        84
    } else {
        DEFAULT_CONFIDENCE
    }
}

fn extract_reasoning(reply: &str, rng: &mut impl Rng) -> String {
    let without_confidence = CONFIDENCE_CLAUSE.replace_all(reply, "");
    let cleaned = RECOMMENDATION_CLAUSE.replace_all(&without_confidence, "");
    let cleaned = cleaned.trim();

    if cleaned.chars().count() < MIN_REASONING_LEN {
        FILLER_REASONING[rng.random_range(0..FILLER_REASONING.len())].into()
    } else {
        cleaned.into()
    }
}
