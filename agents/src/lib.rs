//! The Bluffsweeper agents: a confidently unreliable advisor, a silent analyst that measures how
//! far the player trusted it, and a narrator that explains the result afterwards.
//!
//! All three are reached only through [`AgentRouter`]. [`GameSession`] ties a router to one
//! [`bluffsweeper_core::GameEngine`].

pub use advisor::{ConfidentAdvisor, GamePhase, MAX_CONFIDENCE, MIN_CONFIDENCE};
pub use analyst::{SilentAnalyst, TrustPattern, analyze_trust_dynamics};
pub use completion::{
    AiIntegrationError, BackendError, CompletionBackend, CompletionClient, CompletionConfig,
    CompletionContext,
};
pub use error::*;
pub use model::*;
pub use narrator::PostMortemNarrator;
pub use roles::{Advisor, Agent, Analyst, Capability, Narrator};
pub use router::*;
pub use session::*;

pub mod advisor;
pub mod analyst;
pub mod completion;
mod error;
mod model;
pub mod narrator;
pub mod prompts;
pub mod roles;
mod router;
mod session;
