//! Agent Spawning
//!
//! Places the blue and red populations on the map. Agents start on random
//! road-path points when the map has any; otherwise on random walkable
//! cells (the fallback disc guarantees there is at least one).

use rand::rngs::SmallRng;
use rand::Rng;
use swarm_events::{MapData, WorldPos};

use crate::agents::{Agent, AgentRegistry, Faction};
use crate::config::AgentSection;
use crate::nav::NavigationMesh;

/// Spawn the full population. Faction counts are fixed until a reset.
pub fn spawn_agents(
    mesh: &NavigationMesh,
    map: &MapData,
    config: &AgentSection,
    rng: &mut SmallRng,
) -> AgentRegistry {
    let road_points: Vec<WorldPos> = map
        .roads
        .iter()
        .flat_map(|road| road.path.iter().copied())
        .collect();

    let mut registry = AgentRegistry::new();
    for i in 0..config.blue_count {
        let position = spawn_position(&road_points, mesh, config.height, rng);
        registry.insert(Agent::new(
            format!("blue-{}", i),
            Faction::Blue,
            position,
            config.blue_speed,
        ));
    }
    for i in 0..config.red_count {
        let position = spawn_position(&road_points, mesh, config.height, rng);
        registry.insert(Agent::new(
            format!("red-{}", i),
            Faction::Red,
            position,
            config.red_speed,
        ));
    }
    registry
}

fn spawn_position(
    road_points: &[WorldPos],
    mesh: &NavigationMesh,
    height: f32,
    rng: &mut SmallRng,
) -> WorldPos {
    let position = if road_points.is_empty() {
        mesh.random_navigable_position(rng)
            .unwrap_or(WorldPos::new(0.0, 0.0, 0.0))
    } else {
        road_points[rng.gen_range(0..road_points.len())]
    };
    position.with_height(height)
}
