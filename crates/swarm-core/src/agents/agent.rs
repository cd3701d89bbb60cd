//! Agent entities.
//!
//! An agent is a faction-tagged entity with a position, a current route
//! and a knowledge record that interactions mutate. Task state is
//! descriptive — it reports what the agent is doing, it does not gate
//! movement.

use std::collections::{BTreeMap, BTreeSet};

use swarm_events::{AgentSnapshot, DecisionSnapshot, KnowledgeSnapshot, WorldPos};

/// Agent faction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Faction {
    /// Cooperative, goal-seeking.
    Blue,
    /// Adversarial, distraction-seeking.
    Red,
}

impl Faction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Faction::Blue => "blue",
            Faction::Red => "red",
        }
    }

    /// Task agents of this faction start with.
    pub fn initial_task(&self) -> TaskState {
        match self {
            Faction::Blue => TaskState::Exploring,
            Faction::Red => TaskState::Deceiving,
        }
    }
}

/// What an agent is currently doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Exploring,
    Navigating,
    Interacting,
    Deceiving,
}

impl TaskState {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskState::Exploring => "exploring",
            TaskState::Navigating => "navigating",
            TaskState::Interacting => "interacting",
            TaskState::Deceiving => "deceiving",
        }
    }
}

/// Fixed-shape record of what an agent has learned.
#[derive(Debug, Clone, Default)]
pub struct Knowledge {
    /// Height-normalized positions recorded at each waypoint arrival.
    pub visited_locations: Vec<WorldPos>,
    /// Agents met at least once. Set semantics.
    pub known_agents: BTreeSet<String>,
    /// Reliability estimate per known agent, clamped to [0, 1].
    pub trust_scores: BTreeMap<String, f32>,
}

/// An agent's current route and progress along it.
#[derive(Debug, Clone, Default)]
pub struct PathProgress {
    pub waypoints: Vec<WorldPos>,
    /// Index of the waypoint currently being approached. Monotonic until
    /// the route is exhausted, then the route must be recomputed.
    pub index: usize,
}

impl PathProgress {
    /// True when there is no waypoint left to walk toward.
    pub fn is_exhausted(&self) -> bool {
        self.index >= self.waypoints.len()
    }

    pub fn current_waypoint(&self) -> Option<WorldPos> {
        self.waypoints.get(self.index).copied()
    }

    /// Install a fresh route and restart progress.
    pub fn restart(&mut self, waypoints: Vec<WorldPos>) {
        self.waypoints = waypoints;
        self.index = 0;
    }

    pub fn advance(&mut self) {
        self.index += 1;
    }
}

/// Trust score a target starts at on first contact.
pub const INITIAL_TRUST: f32 = 0.5;
/// Trust adjustment per interaction.
pub const TRUST_STEP: f32 = 0.1;
/// Confidence above which an interaction builds trust.
pub const TRUST_CONFIDENCE_GATE: f32 = 0.7;

/// A simulated agent.
#[derive(Debug, Clone)]
pub struct Agent {
    pub id: String,
    pub faction: Faction,
    pub position: WorldPos,
    pub target: WorldPos,
    /// Speed in world units per second.
    pub speed: f32,
    pub task: TaskState,
    pub knowledge: Knowledge,
    pub path: PathProgress,
    /// Simulation clock of this agent's last interaction. `None` until the
    /// first one, so a fresh agent is immediately eligible.
    pub last_interaction_ms: Option<u64>,
    pub last_decision: DecisionSnapshot,
}

impl Agent {
    pub fn new(id: impl Into<String>, faction: Faction, position: WorldPos, speed: f32) -> Self {
        Self {
            id: id.into(),
            faction,
            position,
            target: position,
            speed,
            task: faction.initial_task(),
            knowledge: Knowledge::default(),
            path: PathProgress::default(),
            last_interaction_ms: None,
            last_decision: DecisionSnapshot::default(),
        }
    }

    /// Whether enough simulated time has passed since the last interaction.
    pub fn cooldown_elapsed(&self, now_ms: u64, cooldown_ms: u64) -> bool {
        match self.last_interaction_ms {
            None => true,
            Some(last) => now_ms.saturating_sub(last) > cooldown_ms,
        }
    }

    /// Record the outcome of a resolved interaction with `target_id`.
    ///
    /// Trust initializes at [`INITIAL_TRUST`] on first contact, then moves
    /// by [`TRUST_STEP`] per interaction depending on decision confidence,
    /// clamped to [0, 1]. Returns true when trust moved up.
    pub fn record_interaction(
        &mut self,
        target_id: &str,
        reasoning: Vec<String>,
        confidence: f32,
        now_ms: u64,
    ) -> bool {
        self.task = TaskState::Interacting;
        self.knowledge.known_agents.insert(target_id.to_string());

        let gained = confidence > TRUST_CONFIDENCE_GATE;
        let delta = if gained { TRUST_STEP } else { -TRUST_STEP };
        let score = self
            .knowledge
            .trust_scores
            .entry(target_id.to_string())
            .or_insert(INITIAL_TRUST);
        *score = (*score + delta).clamp(0.0, 1.0);

        self.last_interaction_ms = Some(now_ms);
        self.last_decision = DecisionSnapshot {
            reasoning,
            confidence,
        };
        gained
    }

    /// Mean of this agent's trust scores; 0 when it trusts no one yet.
    pub fn average_trust(&self) -> f32 {
        if self.knowledge.trust_scores.is_empty() {
            return 0.0;
        }
        let sum: f32 = self.knowledge.trust_scores.values().sum();
        sum / self.knowledge.trust_scores.len() as f32
    }

    /// Point-in-time view for oracle requests and output.
    pub fn snapshot(&self) -> AgentSnapshot {
        AgentSnapshot {
            id: self.id.clone(),
            faction: self.faction.as_str().to_string(),
            position: self.position,
            target: self.target,
            speed: self.speed,
            task: self.task.as_str().to_string(),
            knowledge: KnowledgeSnapshot {
                visited_locations: self.knowledge.visited_locations.clone(),
                known_agents: self.knowledge.known_agents.iter().cloned().collect(),
                trust_scores: self.knowledge.trust_scores.clone(),
            },
            last_decision: self.last_decision.clone(),
        }
    }
}
