//! The post-mortem narrator: a model-written debrief with a computed quantitative appendix, or a
//! fully templated report when the completion service is unavailable.

use std::fmt::Write;

use async_trait::async_trait;

use crate::analyst::{TrustPattern, analyze_trust_dynamics};
use crate::completion::CompletionClient;
use crate::prompts::{NARRATOR_SYSTEM_PROMPT, post_mortem_prompt};
use crate::roles::{Agent, Capability, Narrator};
use crate::*;

/// Figures derived from the metrics and history, independent of any model output.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Quantitative {
    pub confidence_accuracy_gap: f64,
    pub manipulation_effectiveness: f64,
    pub trust_pattern: TrustPattern,
    pub decision_influence_rate: f64,
    pub total_clicks: usize,
}

impl Quantitative {
    pub fn compute(metrics: &GameMetrics, history: &[GameEvent]) -> Self {
        let total_clicks = history.iter().filter(|e| e.is_click()).count();
        Self {
            confidence_accuracy_gap: confidence_accuracy_gap(metrics),
            manipulation_effectiveness: manipulation_effectiveness(metrics),
            trust_pattern: analyze_trust_dynamics(history),
            decision_influence_rate: decision_influence_rate(metrics, total_clicks),
            total_clicks,
        }
    }
}

/// Stated confidence minus measured accuracy, in percentage points.
pub fn confidence_accuracy_gap(metrics: &GameMetrics) -> f64 {
    f64::from(metrics.ai_confidence_level) - metrics.ai_accuracy_rate
}

/// 0 to 10: high confidence times high compliance times low accuracy. Zero without advice.
pub fn manipulation_effectiveness(metrics: &GameMetrics) -> f64 {
    if metrics.total_advice_requests == 0 {
        return 0.0;
    }
    let confidence = f64::from(metrics.ai_confidence_level) / 100.0;
    let compliance = metrics.player_compliance_rate / 100.0;
    let inaccuracy = (100.0 - metrics.ai_accuracy_rate) / 100.0;
    confidence * compliance * inaccuracy * 10.0
}

/// Influenced clicks as a share of all clicks, in percent.
pub fn decision_influence_rate(metrics: &GameMetrics, total_clicks: usize) -> f64 {
    if total_clicks == 0 {
        return 0.0;
    }
    f64::from(metrics.ai_influenced_clicks) / total_clicks as f64 * 100.0
}

/// Rejects metrics that could not have come from the analyst.
pub fn validate_metrics(metrics: &GameMetrics) -> Result<()> {
    for (name, value) in [
        ("ai_accuracy_rate", metrics.ai_accuracy_rate),
        ("player_compliance_rate", metrics.player_compliance_rate),
    ] {
        if !value.is_finite() || !(0.0..=100.0).contains(&value) {
            return Err(AgentError::InvalidMetrics(format!(
                "{name} must be a percentage, got {value}"
            )));
        }
    }
    if metrics.ai_confidence_level > 100 {
        return Err(AgentError::InvalidMetrics(format!(
            "ai_confidence_level must be a percentage, got {}",
            metrics.ai_confidence_level
        )));
    }
    Ok(())
}

#[derive(Clone, Debug)]
pub struct PostMortemNarrator {
    client: CompletionClient,
}

impl PostMortemNarrator {
    pub const NAME: &'static str = "PostMortemNarrator";

    pub fn new(client: CompletionClient) -> Self {
        Self { client }
    }

    /// Model text followed by the computed sections.
    pub fn enhance_analysis(ai_text: &str, metrics: &GameMetrics, history: &[GameEvent]) -> String {
        let q = Quantitative::compute(metrics, history);
        let mut out = String::new();

        let _ = writeln!(out, "{}", ai_text.trim_end());
        let _ = writeln!(out);
        let _ = writeln!(out, "## Quantitative Analysis");
        let _ = writeln!(
            out,
            "Confidence-Accuracy Differential: {:.1} percentage points",
            q.confidence_accuracy_gap
        );
        let _ = writeln!(
            out,
            "Manipulation Effectiveness Index: {:.2}",
            q.manipulation_effectiveness
        );
        let _ = writeln!(out, "Trust Pattern: {}", q.trust_pattern);
        let _ = writeln!(out, "Decision Influence Rate: {:.1}%", q.decision_influence_rate);
        let _ = writeln!(out);
        let _ = writeln!(out, "## Behavioral Observations");
        let _ = writeln!(out, "{}", behavioral_insights(metrics, &q).join("\n"));
        let _ = writeln!(out);
        let _ = writeln!(out, "## Conclusion");
        let _ = write!(out, "{}", clinical_conclusion(metrics, &q));
        out
    }

    /// Deterministic report used when the completion service fails.
    pub fn fallback_analysis(metrics: &GameMetrics, history: &[GameEvent]) -> String {
        let q = Quantitative::compute(metrics, history);
        let influence = if metrics.player_compliance_rate > 50.0 {
            "significant"
        } else {
            "limited"
        };
        let score = if q.manipulation_effectiveness > 5.0 {
            "elevated"
        } else {
            "moderate"
        };

        format!(
            "## Post-Mortem Analysis

**Confidence vs. Accuracy**
The advisor held {confidence}% confidence while achieving {accuracy}% accuracy, a {gap:.1} \
percentage point gap between perceived and actual competence.

**Player Behavior**
A compliance rate of {compliance}% indicates {influence} influence of advisor confidence on \
decisions. The advisor influenced {influenced} of {clicks} total clicks.

**Manipulation Effectiveness**
Manipulation effectiveness index: {index:.2}. This {score} score reflects how confident delivery \
shaped trust.

**Conclusion**
Authoritative presentation moved decisions independently of accuracy.

*This analysis explores human-AI trust dynamics and is not a psychological assessment.*",
            confidence = metrics.ai_confidence_level,
            accuracy = metrics.ai_accuracy_rate,
            gap = q.confidence_accuracy_gap,
            compliance = metrics.player_compliance_rate,
            influenced = metrics.ai_influenced_clicks,
            clicks = q.total_clicks,
            index = q.manipulation_effectiveness,
        )
    }
}

fn behavioral_insights(metrics: &GameMetrics, q: &Quantitative) -> Vec<&'static str> {
    let mut insights = Vec::new();
    if metrics.ai_confidence_level > 85 && metrics.player_compliance_rate > 60.0 {
        insights.push(
            "- Confidence above 85% went together with elevated compliance, a sign of confidence bias.",
        );
    }
    if metrics.ai_accuracy_rate < 50.0 && metrics.player_compliance_rate > 50.0 {
        insights.push(
            "- Compliance stayed above 50% despite worse-than-chance accuracy, so decisions followed confidence.",
        );
    }
    if q.manipulation_effectiveness > 5.0 {
        insights.push("- The manipulation effectiveness index is above baseline.");
    }
    if q.decision_influence_rate > 40.0 {
        insights.push("- The advisor steered more than 40% of all clicks.");
    }
    if insights.is_empty() {
        insights.push("- Too little interaction to observe a behavioral pattern.");
    }
    insights
}

fn clinical_conclusion(metrics: &GameMetrics, q: &Quantitative) -> String {
    let mut sentences = Vec::new();
    if q.confidence_accuracy_gap > 30.0 {
        sentences.push("The wide confidence-accuracy gap shows the pull of authoritative presentation.");
    }
    if metrics.player_compliance_rate > 70.0 {
        sentences.push("High compliance shows how readily confident assertions are trusted.");
    }
    if metrics.ai_accuracy_rate < 40.0 {
        sentences.push("Poor accuracy did not cost the advisor its influence.");
    }
    sentences.push("Confidence overrode caution regardless of actual competence.");
    sentences.join(" ")
}

impl Agent for PostMortemNarrator {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn capabilities(&self) -> &'static [Capability] {
        &[Capability::GenerateAnalysis]
    }
}

#[async_trait]
impl Narrator for PostMortemNarrator {
    async fn generate_analysis(&self, metrics: &GameMetrics, history: &[GameEvent]) -> Result<String> {
        validate_metrics(metrics)?;

        let prompt = post_mortem_prompt(metrics, history);
        match self.client.invoke(&prompt, Some(NARRATOR_SYSTEM_PROMPT)).await {
            Ok(text) => Ok(Self::enhance_analysis(&text, metrics, history)),
            Err(e) => {
                log::warn!("Narrator falling back to template report: {e}");
                Ok(Self::fallback_analysis(metrics, history))
            }
        }
    }
}
