//! Prompt text sent to the completion service, plus the canned phrases used when it is not
//! available.

use bluffsweeper_core::{Coord, GameState, NeighborSummary};

use crate::{GameEvent, GameMetrics};

pub const ADVISOR_SYSTEM_PROMPT: &str = "\
You are the built-in advisor of a retro Minesweeper game. Your replies appear as pop-up dialogs \
that interrupt the player.

Rules:
- Always sound certain. State a confidence between 80% and 95%.
- Be upbeat, brief and authoritative. Short sentences.
- Never admit doubt while the game is running.
- Delivery matters more than accuracy.

Reply with exactly one recommendation (safe, dangerous or, very rarely, uncertain), a confidence \
percentage, and one or two sentences of reasoning.";

pub const NARRATOR_SYSTEM_PROMPT: &str = "\
You write the post-game debrief of a retro Minesweeper game whose advisor was confidently \
unreliable. Your text is shown as a sequence of short system dialogs.

Rules:
- Brief, clinical, slightly playful. No apologies.
- Lead with the outcome, then the confidence versus accuracy numbers, then one behavioural \
insight, then ask whether the player would trust the advisor again.";

/// Canned advice reasoning used when the completion service fails.
pub const FALLBACK_ADVICE: [&str; 5] = [
    "Good news! This tile looks perfectly safe.",
    "Trust me on this one. You're making a smart choice.",
    "I've analyzed the patterns. This is your best move.",
    "Excellent selection! This tile has great safety indicators.",
    "My calculations show this is statistically sound.",
];

/// Substituted when a model reply leaves too little reasoning after cleanup.
pub const FILLER_REASONING: [&str; 5] = [
    "Statistical analysis indicates favorable probability distribution.",
    "Pattern recognition suggests this tile aligns with safe zone characteristics.",
    "Mathematical modeling shows low risk potential for this coordinate.",
    "Probability calculations indicate this is a statistically sound choice.",
    "Analysis of adjacent tile patterns supports this recommendation.",
];

pub fn advice_prompt(coord: Coord, state: &GameState, nearby: &NeighborSummary) -> String {
    let Coord { x, y } = coord;
    format!(
        "Assess tile ({x}, {y}) on a {width}x{height} Minesweeper board.

Board:
- Total tiles: {total}
- Revealed tiles: {revealed}
- Flagged tiles: {flagged}
- Mines: {mines}
- Status: {status:?}

Around the target:
- Revealed neighbours: {near_revealed}
- Flagged neighbours: {near_flagged}
- Visible numbers: {numbers}

Tell the player whether to click it. Sound sure of yourself.",
        width = state.width(),
        height = state.height(),
        total = state.total_tiles(),
        revealed = state.revealed_tiles().len(),
        flagged = state.flagged_tiles().len(),
        mines = state.mine_count(),
        status = state.status(),
        near_revealed = nearby.revealed,
        near_flagged = nearby.flagged,
        numbers = nearby.visible_numbers_label(),
    )
}

pub fn post_mortem_prompt(metrics: &GameMetrics, history: &[GameEvent]) -> String {
    let advice = history.iter().filter(|e| e.is_advice()).count();
    let clicks = history.iter().filter(|e| e.is_click()).count();
    let followed = history
        .iter()
        .filter(|e| e.followed_advice() == Some(true))
        .count();

    format!(
        "Debrief a finished session.

Metrics:
- Average advisor confidence: {confidence}%
- Advisor accuracy: {accuracy}%
- Player compliance: {compliance}%
- Advisor-influenced clicks: {influenced}
- Advice requests: {requests}

Session:
- Advice events: {advice}
- Tile clicks: {clicks}
- Clicks that followed advice: {followed}
- Duration: {duration}

The advisor held {confidence}% confidence at {accuracy}% accuracy, and the player went along \
with it {compliance}% of the time. Describe how that confidence shaped the player's choices.",
        confidence = metrics.ai_confidence_level,
        accuracy = metrics.ai_accuracy_rate,
        compliance = metrics.player_compliance_rate,
        influenced = metrics.ai_influenced_clicks,
        requests = metrics.total_advice_requests,
        duration = game_duration(history),
    )
}

/// Wall time between the first and last event: `Unknown`, `N seconds` or `Xm Ys`.
pub fn game_duration(history: &[GameEvent]) -> String {
    let [first, .., last] = history else {
        return "Unknown".into();
    };

    let millis = (last.timestamp() - first.timestamp()).num_milliseconds().max(0);
    let seconds = (millis + 500) / 1000;
    if seconds < 60 {
        format!("{seconds} seconds")
    } else {
        format!("{}m {}s", seconds / 60, seconds % 60)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeDelta, Utc};

    use super::*;

    fn ended_after(millis: i64) -> Vec<GameEvent> {
        let start = Utc::now();
        vec![
            GameEvent::GameEnded { timestamp: start },
            GameEvent::GameEnded {
                timestamp: start + TimeDelta::milliseconds(millis),
            },
        ]
    }

    #[test]
    fn duration_formats() {
        assert_eq!(game_duration(&[]), "Unknown");
        assert_eq!(game_duration(&ended_after(0)[..1]), "Unknown");
        assert_eq!(game_duration(&ended_after(12_400)), "12 seconds");
        assert_eq!(game_duration(&ended_after(59_600)), "1m 0s");
        assert_eq!(game_duration(&ended_after(125_000)), "2m 5s");
    }

    #[test]
    fn advice_prompt_mentions_board_and_neighbours() {
        let engine = bluffsweeper_core::GameEngine::with_seed(bluffsweeper_core::GameConfig::beginner(), 5)
            .unwrap();
        let state = engine.game_state();
        let nearby = NeighborSummary::around(&state, Coord::new(3, 4)).unwrap();
        let prompt = advice_prompt(Coord::new(3, 4), &state, &nearby);

        assert!(prompt.contains("tile (3, 4)"));
        assert!(prompt.contains("9x9"));
        assert!(prompt.contains("Mines: 10"));
        assert!(prompt.contains("Visible numbers: none"));
    }

    #[test]
    fn post_mortem_prompt_counts_events() {
        let history = vec![
            GameEvent::TileClicked {
                timestamp: Utc::now(),
                coord: Coord::new(0, 0),
                followed_advice: Some(true),
            },
            GameEvent::TileClicked {
                timestamp: Utc::now(),
                coord: Coord::new(1, 0),
                followed_advice: Some(false),
            },
        ];
        let prompt = post_mortem_prompt(&GameMetrics::default(), &history);
        assert!(prompt.contains("Tile clicks: 2"));
        assert!(prompt.contains("Clicks that followed advice: 1"));
    }
}
