//! Agent state snapshots.
//!
//! Serialized views of agent state as shipped to the Decision Oracle and
//! into stats output. Snapshots are plain data; the live `Agent` type in
//! the engine owns the mutable state.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::geom::WorldPos;

/// Fixed-shape view of what an agent knows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeSnapshot {
    /// Height-normalized positions visited so far.
    pub visited_locations: Vec<WorldPos>,
    /// Ids of agents encountered at least once.
    pub known_agents: Vec<String>,
    /// Per-known-agent reliability estimate.
    pub trust_scores: BTreeMap<String, f32>,
}

/// The last decision the oracle (or its fallback) produced for an agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionSnapshot {
    pub reasoning: Vec<String>,
    pub confidence: f32,
}

impl Default for DecisionSnapshot {
    fn default() -> Self {
        // Fresh agents start fully confident with nothing decided yet.
        Self {
            reasoning: Vec::new(),
            confidence: 1.0,
        }
    }
}

/// A point-in-time view of a single agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSnapshot {
    pub id: String,
    /// "blue" or "red".
    pub faction: String,
    pub position: WorldPos,
    pub target: WorldPos,
    pub speed: f32,
    /// Current task, lowercase ("exploring", "navigating", ...).
    pub task: String,
    pub knowledge: KnowledgeSnapshot,
    pub last_decision: DecisionSnapshot,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_round_trips_through_json() {
        let mut trust = BTreeMap::new();
        trust.insert("red-0".to_string(), 0.6);

        let snapshot = AgentSnapshot {
            id: "blue-1".to_string(),
            faction: "blue".to_string(),
            position: WorldPos::new(2.5, 2.0, 7.5),
            target: WorldPos::new(47.5, 0.0, 2.5),
            speed: 0.5,
            task: "navigating".to_string(),
            knowledge: KnowledgeSnapshot {
                visited_locations: vec![WorldPos::new(2.5, 2.0, 2.5)],
                known_agents: vec!["red-0".to_string()],
                trust_scores: trust,
            },
            last_decision: DecisionSnapshot::default(),
        };

        let json = serde_json::to_string(&snapshot).unwrap();
        let back: AgentSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshot);
    }

    #[test]
    fn test_default_decision_is_confident() {
        let decision = DecisionSnapshot::default();
        assert_eq!(decision.confidence, 1.0);
        assert!(decision.reasoning.is_empty());
    }
}
