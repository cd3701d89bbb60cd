//! Canonical agent store.
//!
//! Keyed by agent id in a `BTreeMap` so iteration order is deterministic
//! everywhere — candidate collection, commits and stats all walk agents
//! in id order. Only the stepper and the interaction resolver mutate it.

use std::collections::BTreeMap;

use swarm_events::WorldPos;

use super::agent::{Agent, Faction};

/// Registry of all live agents, keyed by id.
#[derive(Debug, Clone, Default)]
pub struct AgentRegistry {
    agents: BTreeMap<String, Agent>,
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, agent: Agent) {
        self.agents.insert(agent.id.clone(), agent);
    }

    pub fn get(&self, id: &str) -> Option<&Agent> {
        self.agents.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Agent> {
        self.agents.get_mut(id)
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Agents in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Agent> {
        self.agents.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Agent> {
        self.agents.values_mut()
    }

    /// Agent ids in order.
    pub fn ids(&self) -> Vec<String> {
        self.agents.keys().cloned().collect()
    }

    /// All agents within `radius` of a position, in id order.
    pub fn agents_within(&self, position: WorldPos, radius: f32) -> Vec<&Agent> {
        self.agents
            .values()
            .filter(|a| a.position.distance_to(&position) < radius)
            .collect()
    }

    /// Nearest other agent within `radius` of the given agent.
    ///
    /// Target selection for interactions is true nearest-neighbor;
    /// distance ties keep the earlier id.
    pub fn nearest_other_within(&self, agent_id: &str, radius: f32) -> Option<&Agent> {
        let origin = self.agents.get(agent_id)?.position;
        let mut best: Option<(&Agent, f32)> = None;
        for other in self.agents.values() {
            if other.id == agent_id {
                continue;
            }
            let distance = other.position.distance_to(&origin);
            if distance >= radius {
                continue;
            }
            match best {
                Some((_, best_distance)) if distance >= best_distance => {}
                _ => best = Some((other, distance)),
            }
        }
        best.map(|(agent, _)| agent)
    }

    /// (blue, red) population counts. Fixed between resets.
    pub fn faction_counts(&self) -> (usize, usize) {
        let blue = self
            .agents
            .values()
            .filter(|a| a.faction == Faction::Blue)
            .count();
        (blue, self.agents.len() - blue)
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    fn agent_at(id: &str, faction: Faction, x: f32, z: f32) -> Agent {
        Agent::new(id, faction, WorldPos::new(x, 2.0, z), 0.5)
    }

    fn registry() -> AgentRegistry {
        let mut registry = AgentRegistry::new();
        registry.insert(agent_at("blue-0", Faction::Blue, 0.0, 0.0));
        registry.insert(agent_at("blue-1", Faction::Blue, 4.0, 0.0));
        registry.insert(agent_at("red-0", Faction::Red, 8.0, 0.0));
        registry.insert(agent_at("red-1", Faction::Red, 100.0, 100.0));
        registry
    }

    #[test]
    fn test_agents_within() {
        let registry = registry();
        let near = registry.agents_within(WorldPos::new(0.0, 2.0, 0.0), 10.0);
        let ids: Vec<&str> = near.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["blue-0", "blue-1", "red-0"]);
    }

    #[test]
    fn test_nearest_other_is_not_first_in_order() {
        let mut registry = AgentRegistry::new();
        registry.insert(agent_at("blue-0", Faction::Blue, 0.0, 0.0));
        // "blue-1" sorts first among the others but "red-0" is closer.
        registry.insert(agent_at("blue-1", Faction::Blue, 9.0, 0.0));
        registry.insert(agent_at("red-0", Faction::Red, 3.0, 0.0));

        let nearest = registry.nearest_other_within("blue-0", 10.0).unwrap();
        assert_eq!(nearest.id, "red-0");
    }

    #[test]
    fn test_nearest_respects_radius() {
        let mut registry = AgentRegistry::new();
        registry.insert(agent_at("blue-0", Faction::Blue, 0.0, 0.0));
        registry.insert(agent_at("red-1", Faction::Red, 100.0, 100.0));
        assert!(registry.nearest_other_within("blue-0", 10.0).is_none());
    }

    #[test]
    fn test_nearest_tie_keeps_earlier_id() {
        let mut registry = AgentRegistry::new();
        registry.insert(agent_at("blue-0", Faction::Blue, 0.0, 0.0));
        registry.insert(agent_at("red-0", Faction::Red, 5.0, 0.0));
        registry.insert(agent_at("blue-1", Faction::Blue, -5.0, 0.0));
        let nearest = registry.nearest_other_within("blue-0", 10.0).unwrap();
        assert_eq!(nearest.id, "blue-1");
    }

    #[test]
    fn test_faction_counts() {
        let registry = registry();
        assert_eq!(registry.faction_counts(), (2, 2));
    }
}
