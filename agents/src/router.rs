//! The router is the only caller of the three agents. It forwards ground truth from the advisor to
//! the analyst, keeps an append-only request log, and can check agent boundaries and health.

use bluffsweeper_core::{Coord, GameConfig, GameEngine, GameState};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analyst::SilentAnalyst;
use crate::completion::CompletionClient;
use crate::narrator::PostMortemNarrator;
use crate::roles::*;
use crate::*;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouterConfig {
    /// Emit a `log` line for every routed request. The in-memory request log is kept either way.
    pub enable_logging: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestOutcome {
    Requested,
    Succeeded,
    Failed,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RequestLogEntry {
    pub timestamp: DateTime<Utc>,
    pub agent: &'static str,
    pub method: &'static str,
    pub outcome: RequestOutcome,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PostMortem {
    pub metrics: GameMetrics,
    pub analysis: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundaryReport {
    pub is_valid: bool,
    pub violations: Vec<String>,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthReport {
    pub advisor: bool,
    pub analyst: bool,
    pub narrator: bool,
    pub overall: bool,
}

pub struct AgentRouter {
    advisor: Box<dyn Advisor>,
    analyst: Box<dyn Analyst>,
    narrator: Box<dyn Narrator>,
    config: RouterConfig,
    request_log: Vec<RequestLogEntry>,
}

impl AgentRouter {
    /// The standard three agents sharing one completion client.
    pub fn new(client: CompletionClient, config: RouterConfig) -> Self {
        Self::with_agents(
            Box::new(ConfidentAdvisor::new(client.clone())),
            Box::new(SilentAnalyst::new()),
            Box::new(PostMortemNarrator::new(client)),
            config,
        )
    }

    pub fn with_agents(
        advisor: Box<dyn Advisor>,
        analyst: Box<dyn Analyst>,
        narrator: Box<dyn Narrator>,
        config: RouterConfig,
    ) -> Self {
        Self {
            advisor,
            analyst,
            narrator,
            config,
            request_log: Vec::new(),
        }
    }

    /// Gets advice and hands it, with the tile's ground truth, to the analyst.
    pub async fn request_advice(&mut self, coord: Coord, state: &GameState) -> Result<Advice> {
        const METHOD: &str = "provide_advice";
        let agent = self.advisor.name();
        self.log_requested(agent, METHOD);

        let result = match self.advisor.provide_advice(coord, state).await {
            Ok(advice) => self
                .advisor
                .analyze_tile_safety(coord, state)
                .map(|actual_safety| (advice, actual_safety)),
            Err(e) => Err(e),
        };

        match result {
            Ok((advice, actual_safety)) => {
                self.analyst.record_advice_given(advice.clone(), actual_safety);
                self.log_finished(agent, METHOD, Ok(()));
                Ok(advice)
            }
            Err(e) => {
                self.log_finished(agent, METHOD, Err(&e));
                Err(e)
            }
        }
    }

    pub fn record_player_decision(&mut self, followed_advice: bool, coord: Option<Coord>) {
        const METHOD: &str = "record_player_decision";
        let agent = self.analyst.name();
        self.log_requested(agent, METHOD);

        self.analyst.record_player_decision(followed_advice);
        if let Some(coord) = coord {
            self.analyst.record_tile_click(coord, Some(followed_advice));
        }

        self.log_finished(agent, METHOD, Ok(()));
    }

    pub fn record_game_end(&mut self) {
        const METHOD: &str = "record_game_end";
        let agent = self.analyst.name();
        self.log_requested(agent, METHOD);
        self.analyst.record_game_end();
        self.log_finished(agent, METHOD, Ok(()));
    }

    pub async fn generate_post_mortem_analysis(&mut self) -> Result<PostMortem> {
        const METHOD: &str = "generate_analysis";
        let agent = self.narrator.name();
        self.log_requested(agent, METHOD);

        let metrics = self.analyst.calculate_metrics();
        let history = self.analyst.game_history();

        match self.narrator.generate_analysis(&metrics, &history).await {
            Ok(analysis) => {
                self.log_finished(agent, METHOD, Ok(()));
                Ok(PostMortem { metrics, analysis })
            }
            Err(e) => {
                self.log_finished(agent, METHOD, Err(&e));
                Err(e)
            }
        }
    }

    /// Checks each agent's declared capabilities against its role.
    pub fn validate_agent_boundaries(&self) -> BoundaryReport {
        let mut violations = Vec::new();

        let roles: [(&str, &[Capability], &[Capability]); 3] = [
            (self.advisor.name(), self.advisor.capabilities(), ADVISOR_REQUIRED),
            (self.analyst.name(), self.analyst.capabilities(), ANALYST_REQUIRED),
            (self.narrator.name(), self.narrator.capabilities(), NARRATOR_REQUIRED),
        ];
        for (name, declared, required) in roles {
            for capability in required {
                if !declared.contains(capability) {
                    violations.push(format!("{name} missing {capability:?}"));
                }
            }
        }

        for &capability in self.analyst.capabilities() {
            if capability.is_player_facing() {
                violations.push(format!(
                    "{} has player-facing capability {:?}",
                    self.analyst.name(),
                    capability
                ));
            }
        }

        if !violations.is_empty() {
            log::warn!("Agent boundary violations: {:?}", violations);
        }
        BoundaryReport {
            is_valid: violations.is_empty(),
            violations,
        }
    }

    /// Exercises every agent against throwaway inputs. Does not touch the recorded session.
    pub async fn health_check(&self) -> HealthReport {
        let advisor = match GameEngine::with_seed(GameConfig::new(1, 1, 0), 0) {
            Ok(engine) => self
                .advisor
                .provide_advice(Coord::new(0, 0), &engine.game_state())
                .await
                .is_ok(),
            Err(_) => false,
        };

        let metrics = self.analyst.calculate_metrics();
        let analyst = metrics.ai_accuracy_rate.is_finite() && metrics.player_compliance_rate.is_finite();

        let probe = GameMetrics {
            ai_confidence_level: 85,
            ai_accuracy_rate: 60.0,
            player_compliance_rate: 70.0,
            ai_influenced_clicks: 5,
            total_advice_requests: 8,
        };
        let narrator = self.narrator.generate_analysis(&probe, &[]).await.is_ok();

        HealthReport {
            advisor,
            analyst,
            narrator,
            overall: advisor && analyst && narrator,
        }
    }

    pub fn current_metrics(&self) -> GameMetrics {
        self.analyst.calculate_metrics()
    }

    pub fn game_history(&self) -> Vec<GameEvent> {
        self.analyst.game_history()
    }

    pub fn request_log(&self) -> &[RequestLogEntry] {
        &self.request_log
    }

    pub fn config(&self) -> RouterConfig {
        self.config
    }

    /// Starts a fresh session: analyst records and the request log are both cleared.
    pub fn reset_analyst(&mut self) {
        self.analyst.reset();
        self.request_log.clear();
    }

    fn log_requested(&mut self, agent: &'static str, method: &'static str) {
        if self.config.enable_logging {
            log::debug!("{agent}.{method} requested");
        }
        self.push_log(agent, method, RequestOutcome::Requested);
    }

    fn log_finished(
        &mut self,
        agent: &'static str,
        method: &'static str,
        result: std::result::Result<(), &AgentError>,
    ) {
        match result {
            Ok(()) => {
                if self.config.enable_logging {
                    log::info!("{agent}.{method} completed");
                }
                self.push_log(agent, method, RequestOutcome::Succeeded);
            }
            Err(e) => {
                if self.config.enable_logging {
                    log::warn!("{agent}.{method} failed: {e}");
                }
                self.push_log(agent, method, RequestOutcome::Failed);
            }
        }
    }

    fn push_log(&mut self, agent: &'static str, method: &'static str, outcome: RequestOutcome) {
        self.request_log.push(RequestLogEntry {
            timestamp: Utc::now(),
            agent,
            method,
            outcome,
        });
    }
}
