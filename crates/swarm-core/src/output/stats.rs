//! Statistics Output
//!
//! Per-tick aggregation over the agent population, collected across a run
//! and written as JSON for analysis.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Serialize;
use swarm_events::InteractionEvent;

use crate::agents::{AgentRegistry, Faction};

/// Trust score below which a relationship counts as eroded.
pub const LOW_TRUST_THRESHOLD: f32 = 0.3;

/// Statistics for a single tick.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TickStats {
    pub tick: u64,
    pub clock_ms: u64,
    /// Blue agents that have visited at least one location.
    pub blue_success: usize,
    /// Low-trust entries held by red agents.
    pub red_success: usize,
    /// Total known-agent links across the population.
    pub total_interactions: usize,
    /// Population mean of per-agent mean trust.
    pub average_trust: f32,
    /// Interaction events resolved this tick.
    pub events: usize,
}

/// Aggregated statistics over a whole run.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationStats {
    pub total_ticks: u64,
    pub total_events: usize,
    pub events_by_outcome: HashMap<String, usize>,
    pub final_tick: Option<TickStats>,
    pub tick_history: Vec<TickStats>,
}

/// Accumulates per-tick statistics during a run.
#[derive(Debug, Default)]
pub struct StatsCollector {
    tick_history: Vec<TickStats>,
    total_events: usize,
    events_by_outcome: HashMap<String, usize>,
}

impl StatsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Aggregate the population after a tick's events have been applied.
    pub fn record_tick(
        &mut self,
        tick: u64,
        clock_ms: u64,
        registry: &AgentRegistry,
        events: &[InteractionEvent],
    ) -> TickStats {
        let mut blue_success = 0;
        let mut red_success = 0;
        let mut total_interactions = 0;
        let mut trust_sum = 0.0f32;

        for agent in registry.iter() {
            match agent.faction {
                Faction::Blue => {
                    if !agent.knowledge.visited_locations.is_empty() {
                        blue_success += 1;
                    }
                }
                Faction::Red => {
                    red_success += agent
                        .knowledge
                        .trust_scores
                        .values()
                        .filter(|&&score| score < LOW_TRUST_THRESHOLD)
                        .count();
                }
            }
            total_interactions += agent.knowledge.known_agents.len();
            trust_sum += agent.average_trust();
        }

        let average_trust = if registry.is_empty() {
            0.0
        } else {
            trust_sum / registry.len() as f32
        };

        for event in events {
            self.total_events += 1;
            let outcome = format!("{:?}", event.outcome);
            *self.events_by_outcome.entry(outcome).or_insert(0) += 1;
        }

        let stats = TickStats {
            tick,
            clock_ms,
            blue_success,
            red_success,
            total_interactions,
            average_trust,
            events: events.len(),
        };
        self.tick_history.push(stats.clone());
        stats
    }

    pub fn last_tick(&self) -> Option<&TickStats> {
        self.tick_history.last()
    }

    pub fn tick_count(&self) -> usize {
        self.tick_history.len()
    }

    /// Generate final statistics for a run.
    pub fn summary(&self, total_ticks: u64) -> SimulationStats {
        SimulationStats {
            total_ticks,
            total_events: self.total_events,
            events_by_outcome: self.events_by_outcome.clone(),
            final_tick: self.tick_history.last().cloned(),
            tick_history: self.tick_history.clone(),
        }
    }

    /// Drop accumulated history. Used only by a full reset.
    pub fn clear(&mut self) {
        self.tick_history.clear();
        self.total_events = 0;
        self.events_by_outcome.clear();
    }
}

/// Write statistics as pretty JSON, creating parent directories.
pub fn write_stats(path: &Path, stats: &SimulationStats) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(stats)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    fs::write(path, json)
}
