//! Proximity interaction resolution.
//!
//! Each tick the resolver scans agents in id order against the tick-start
//! state, picks eligible (neighbor, cooldown, stochastic gate) candidates,
//! fires their oracle calls concurrently and commits the resulting
//! mutations in id order once every call has resolved. Results carry the
//! world generation they were collected under; a pause or reset bumps the
//! generation and stale completions are discarded instead of applied.

use std::sync::Arc;

use oracle::{DecisionRequest, DecisionSource, OracleClient, Provider, ResolvedDecision};
use rand::rngs::SmallRng;
use rand::Rng;
use swarm_events::{InteractionEvent, InteractionOutcome};

use crate::agents::AgentRegistry;
use crate::config::InteractionSection;

/// An eligible interaction waiting on its oracle call.
#[derive(Debug)]
pub struct PendingInteraction {
    pub agent_id: String,
    pub target_id: String,
    pub generation: u64,
    pub request: DecisionRequest,
}

/// A resolved oracle call, ready to commit.
#[derive(Debug)]
pub struct ResolvedInteraction {
    pub agent_id: String,
    pub target_id: String,
    pub generation: u64,
    pub resolved: ResolvedDecision,
}

/// Detects eligible pairs, drives the oracle and applies the updates.
pub struct InteractionResolver {
    client: Arc<OracleClient>,
    provider: Provider,
    radius: f32,
    cooldown_ms: u64,
    probability: f64,
}

impl InteractionResolver {
    pub fn new(client: Arc<OracleClient>, provider: Provider, config: &InteractionSection) -> Self {
        Self {
            client,
            provider,
            radius: config.radius,
            cooldown_ms: config.cooldown_ms,
            probability: config.probability,
        }
    }

    /// Scan for eligible interactions against the tick-start state.
    ///
    /// An agent is eligible when another agent lies within the interaction
    /// radius, its own cooldown has elapsed, and the stochastic gate
    /// passes. The target is the nearest such neighbor. The gate is rolled
    /// only for agents that pass the first two checks, in id order, so a
    /// fixed seed yields a fixed candidate sequence.
    pub fn collect_candidates(
        &self,
        registry: &AgentRegistry,
        now_ms: u64,
        generation: u64,
        rng: &mut SmallRng,
    ) -> Vec<PendingInteraction> {
        let mut pending = Vec::new();
        for agent in registry.iter() {
            let Some(target) = registry.nearest_other_within(&agent.id, self.radius) else {
                continue;
            };
            if !agent.cooldown_elapsed(now_ms, self.cooldown_ms) {
                continue;
            }
            if rng.gen::<f64>() >= self.probability {
                continue;
            }
            pending.push(PendingInteraction {
                agent_id: agent.id.clone(),
                target_id: target.id.clone(),
                generation,
                request: DecisionRequest::new(agent.snapshot(), target.snapshot(), self.provider),
            });
        }
        pending
    }

    /// Drive all pending oracle calls concurrently and join them.
    ///
    /// Calls run as separate tasks so a slow provider for one agent never
    /// blocks the others. Results come back in completion order and are
    /// re-sorted by agent id so commits are deterministic.
    pub async fn resolve(&self, pending: Vec<PendingInteraction>) -> Vec<ResolvedInteraction> {
        let mut joins = tokio::task::JoinSet::new();
        for p in pending {
            let client = Arc::clone(&self.client);
            joins.spawn(async move {
                let resolved = client.decide(&p.request).await;
                ResolvedInteraction {
                    agent_id: p.agent_id,
                    target_id: p.target_id,
                    generation: p.generation,
                    resolved,
                }
            });
        }

        let mut resolved = Vec::new();
        while let Some(result) = joins.join_next().await {
            match result {
                Ok(r) => resolved.push(r),
                Err(e) => tracing::warn!(error = %e, "interaction task failed to join"),
            }
        }
        resolved.sort_by(|a, b| a.agent_id.cmp(&b.agent_id));
        resolved
    }

    /// Apply resolved interactions to the registry.
    ///
    /// Results whose generation no longer matches are discarded, not
    /// applied: the run was paused or reset while the call was in flight.
    pub fn commit(
        &self,
        resolved: Vec<ResolvedInteraction>,
        registry: &mut AgentRegistry,
        current_generation: u64,
        now_ms: u64,
    ) -> Vec<InteractionEvent> {
        let mut events = Vec::new();
        for r in resolved {
            if r.generation != current_generation {
                events.push(InteractionEvent::new(
                    r.agent_id,
                    r.target_id,
                    now_ms,
                    InteractionOutcome::Discarded,
                ));
                continue;
            }
            let Some(agent) = registry.get_mut(&r.agent_id) else {
                continue;
            };
            let decision = r.resolved.decision;
            let gained = agent.record_interaction(
                &r.target_id,
                decision.reasoning,
                decision.confidence,
                now_ms,
            );
            let outcome = match r.resolved.source {
                DecisionSource::Fallback => InteractionOutcome::FellBack,
                DecisionSource::Provider if gained => InteractionOutcome::TrustGained,
                DecisionSource::Provider => InteractionOutcome::TrustLost,
            };
            events.push(InteractionEvent::new(r.agent_id, r.target_id, now_ms, outcome));
        }
        events
    }
}
