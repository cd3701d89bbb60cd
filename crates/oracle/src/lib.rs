//! Decision Oracle boundary: external reasoning with local degradation.
//!
//! The oracle sits between the simulation and whatever AI provider is
//! wired in. The engine hands it a snapshot of two agents and gets back a
//! decision; everything about transport, retries and failure is absorbed
//! here so a tick can never be aborted by the network.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────┐  DecisionRequest   ┌──────────────┐        ┌──────────┐
//! │ swarm-core │ ─────────────────▶ │ OracleClient │ ─────▶ │ provider │
//! └────────────┘                    └──────┬───────┘        └──────────┘
//!                                          │ on failure / open breaker
//!                                          ▼
//!                                   ┌────────────────┐
//!                                   │ FallbackEngine │
//!                                   └────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`decision`]: Requests, decisions, agent actions, free-text parsing
//! - [`breaker`]: Per-provider session-scoped circuit breaker
//! - [`fallback`]: Deterministic keyword-matched canned decisions
//! - [`client`]: Retrying client combining provider, breaker and fallback

pub mod breaker;
pub mod client;
pub mod decision;
pub mod fallback;

// Re-export decision types
pub use decision::{
    parse_action, split_thinking, AgentAction, Decision, DecisionRequest, Direction, Provider,
};

// Re-export breaker types
pub use breaker::{CircuitBreaker, FAILURE_THRESHOLD};

// Re-export fallback types
pub use fallback::{default_templates, default_templates_toml, FallbackEngine, FallbackRule,
    FallbackTemplates, TemplateError};

// Re-export client types
pub use client::{
    DecisionOracle, DecisionSource, FlakyOracle, OracleClient, ResolvedDecision, StaticOracle,
};

use thiserror::Error;

/// Errors a Decision Oracle implementation can surface.
///
/// These never escape [`OracleClient::decide`]; the client degrades to the
/// fallback instead.
#[derive(Debug, Error)]
pub enum OracleError {
    /// The provider could not be reached or timed out.
    #[error("provider unreachable: {0}")]
    Unreachable(String),
    /// The provider answered with something that could not be decoded.
    #[error("malformed provider response: {0}")]
    MalformedResponse(String),
    /// The provider rejected the request (bad key, quota, ...).
    #[error("provider rejected request: {0}")]
    Rejected(String),
}
