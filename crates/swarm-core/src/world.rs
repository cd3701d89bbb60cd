//! The explicit simulation world handle.
//!
//! One `SimulationWorld` owns everything a running simulation needs —
//! mesh, agents, resolver, RNG, clock, stats — so multiple simulations can
//! coexist in one process and tests stay isolated. All mutation funnels
//! through `&mut self`, which also gives resets their exclusivity: no tick
//! can be in flight while agent state is mass-rewritten.

use std::collections::BTreeMap;
use std::sync::Arc;

use oracle::{OracleClient, Provider};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use swarm_events::{MapData, WorldPos};

use crate::agents::{Agent, AgentRegistry};
use crate::config::SimulationConfig;
use crate::interact::InteractionResolver;
use crate::nav::NavigationMesh;
use crate::output::StatsCollector;
use crate::setup;

/// A complete, isolated simulation instance.
pub struct SimulationWorld {
    pub(crate) config: SimulationConfig,
    pub(crate) mesh: NavigationMesh,
    pub(crate) registry: AgentRegistry,
    pub(crate) resolver: InteractionResolver,
    pub(crate) rng: SmallRng,
    pub(crate) clock_ms: f64,
    pub(crate) tick: u64,
    pub(crate) generation: u64,
    pub(crate) running: bool,
    pub(crate) directed_goals: BTreeMap<String, WorldPos>,
    pub(crate) stats: StatsCollector,
}

impl SimulationWorld {
    /// Build a world from config, normalized map data and an oracle client.
    pub fn new(
        config: SimulationConfig,
        map: &MapData,
        client: Arc<OracleClient>,
        seed: u64,
    ) -> Self {
        let mesh = NavigationMesh::build(
            map,
            config.world.size_x,
            config.world.size_z,
            config.world.grid_size,
            config.nav.fallback_disc_radius_cells,
        );

        let provider = Provider::from_name(&config.oracle.provider).unwrap_or_else(|| {
            tracing::warn!(
                provider = %config.oracle.provider,
                "unknown oracle provider in config; using default"
            );
            Provider::default()
        });
        let resolver = InteractionResolver::new(client, provider, &config.interaction);

        let mut rng = SmallRng::seed_from_u64(seed);
        let registry = setup::spawn_agents(&mesh, map, &config.agents, &mut rng);

        Self {
            config,
            mesh,
            registry,
            resolver,
            rng,
            clock_ms: 0.0,
            tick: 0,
            generation: 0,
            running: true,
            directed_goals: BTreeMap::new(),
            stats: StatsCollector::new(),
        }
    }

    // --- Navigation query surface ---

    /// Queue a directed goal for an agent. The next path-maintenance pass
    /// routes the agent there instead of a random target. Returns false
    /// for unknown agents.
    pub fn request_path(&mut self, agent_id: &str, target: WorldPos) -> bool {
        if self.registry.get(agent_id).is_none() {
            return false;
        }
        self.directed_goals.insert(agent_id.to_string(), target);
        true
    }

    /// Uniformly random walkable position.
    pub fn random_navigable_position(&mut self) -> Option<WorldPos> {
        self.mesh.random_navigable_position(&mut self.rng)
    }

    pub fn is_position_navigable(&self, position: WorldPos) -> bool {
        self.mesh.is_position_navigable(position)
    }

    // --- Run control ---

    /// Stop ticking. Oracle calls already in flight may complete, but their
    /// results are discarded: the generation moves on.
    pub fn pause(&mut self) {
        if self.running {
            self.running = false;
            self.generation += 1;
        }
    }

    pub fn resume(&mut self) {
        self.running = true;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Full reset: rebuild the mesh from new map data and respawn the
    /// population. Requires `&mut self`, so no tick can be in flight.
    pub fn reset(&mut self, map: &MapData, seed: u64) {
        self.generation += 1;
        self.mesh.rebuild(map);
        self.rng = SmallRng::seed_from_u64(seed);
        self.registry = setup::spawn_agents(&self.mesh, map, &self.config.agents, &mut self.rng);
        self.directed_goals.clear();
        self.stats.clear();
        self.clock_ms = 0.0;
        self.tick = 0;
        self.running = true;
    }

    // --- Accessors ---

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn mesh(&self) -> &NavigationMesh {
        &self.mesh
    }

    pub fn registry(&self) -> &AgentRegistry {
        &self.registry
    }

    pub fn agent(&self, id: &str) -> Option<&Agent> {
        self.registry.get(id)
    }

    pub fn stats(&self) -> &StatsCollector {
        &self.stats
    }

    /// Simulation clock in whole milliseconds.
    pub fn clock_ms(&self) -> u64 {
        self.clock_ms as u64
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}
