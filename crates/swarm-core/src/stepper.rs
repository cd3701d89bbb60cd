//! Tick orchestration.
//!
//! One tick runs in fixed order: interaction resolution, then path
//! maintenance, then movement integration, then stats aggregation. Task
//! state is descriptive, not a movement gate — an agent that entered
//! `Interacting` this tick still walks its route.

use swarm_events::InteractionEvent;

use crate::agents::TaskState;
use crate::world::SimulationWorld;

/// Advance the world by one tick of `dt` seconds.
///
/// `dt` is a variable real-time delta when driven by a renderer, or a
/// fixed step for headless runs. Returns the interaction events this tick
/// resolved. A paused world does not tick.
pub async fn step(world: &mut SimulationWorld, dt: f32) -> Vec<InteractionEvent> {
    if !world.running {
        return Vec::new();
    }
    let now_ms = world.clock_ms();
    let generation = world.generation;

    // Interaction resolution. Candidates are evaluated against the
    // tick-start state; all oracle calls run concurrently and every
    // mutation commits only after its own call resolved, in id order.
    let pending =
        world
            .resolver
            .collect_candidates(&world.registry, now_ms, generation, &mut world.rng);
    let resolved = world.resolver.resolve(pending).await;
    let events = world
        .resolver
        .commit(resolved, &mut world.registry, world.generation, now_ms);

    // Path maintenance: empty or exhausted routes get a new target — a
    // queued directed goal, else a random walkable cell. A target that
    // yields no route is dropped and the agent re-rolls next tick.
    let ids = world.registry.ids();
    for id in &ids {
        let needs_path = world
            .registry
            .get(id)
            .map(|a| a.path.is_exhausted())
            .unwrap_or(false);
        if !needs_path {
            continue;
        }
        let target = match world.directed_goals.remove(id) {
            Some(goal) => goal,
            None => match world.mesh.random_navigable_position(&mut world.rng) {
                Some(position) => position,
                None => continue,
            },
        };
        let Some(start) = world.registry.get(id).map(|a| a.position) else {
            continue;
        };
        let waypoints = world.mesh.find_world_path(start, target);
        if waypoints.is_empty() {
            continue;
        }
        if let Some(agent) = world.registry.get_mut(id) {
            agent.target = target;
            agent.path.restart(waypoints);
            agent.task = TaskState::Navigating;
        }
    }

    // Movement integration on the ground plane; height stays normalized.
    let arrival = world.config.nav.arrival_threshold;
    let height = world.config.agents.height;
    for agent in world.registry.iter_mut() {
        let Some(waypoint) = agent.path.current_waypoint() else {
            continue;
        };
        let dx = waypoint.x - agent.position.x;
        let dz = waypoint.z - agent.position.z;
        let distance = (dx * dx + dz * dz).sqrt();
        if distance > f32::EPSILON {
            let step = agent.speed * dt;
            agent.position.x += dx / distance * step;
            agent.position.z += dz / distance * step;
        }

        let dx = waypoint.x - agent.position.x;
        let dz = waypoint.z - agent.position.z;
        if (dx * dx + dz * dz).sqrt() < arrival {
            agent.path.advance();
            let visited = agent.position.with_height(height);
            agent.knowledge.visited_locations.push(visited);
        }
    }

    // Stats aggregation closes the tick; all oracle calls joined above.
    world
        .stats
        .record_tick(world.tick, now_ms, &world.registry, &events);

    world.clock_ms += dt as f64 * 1000.0;
    world.tick += 1;
    events
}

/// Run `ticks` fixed-size steps of `dt` seconds each.
pub async fn run_fixed(world: &mut SimulationWorld, ticks: u64, dt: f32) {
    for _ in 0..ticks {
        step(world, dt).await;
    }
}
