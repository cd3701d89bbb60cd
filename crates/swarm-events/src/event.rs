//! Interaction events.
//!
//! An interaction event is ephemeral: it exists so ticks can be reported
//! and stats aggregated, and is not persisted beyond the trust/knowledge
//! mutation it describes.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How an interaction was decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionOutcome {
    /// The oracle answered and trust moved up.
    TrustGained,
    /// The oracle answered and trust moved down.
    TrustLost,
    /// The rule-based fallback answered (provider failed or breaker open).
    FellBack,
    /// The result arrived after a pause/reset and was discarded.
    Discarded,
}

/// One resolved proximity interaction between two agents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractionEvent {
    pub id: Uuid,
    /// Agent that initiated the interaction (its state was mutated).
    pub agent_id: String,
    pub target_id: String,
    /// Simulation clock at resolution, in milliseconds.
    pub at_ms: u64,
    pub outcome: InteractionOutcome,
}

impl InteractionEvent {
    pub fn new(
        agent_id: impl Into<String>,
        target_id: impl Into<String>,
        at_ms: u64,
        outcome: InteractionOutcome,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            agent_id: agent_id.into(),
            target_id: target_id.into(),
            at_ms,
            outcome,
        }
    }
}
