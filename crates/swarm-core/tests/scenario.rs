//! End-to-end scenarios over the full engine surface.

use std::sync::Arc;

use oracle::{FlakyOracle, OracleClient, StaticOracle};
use swarm_core::config::SimulationConfig;
use swarm_core::nav::NavigationMesh;
use swarm_core::world::SimulationWorld;
use swarm_core::{setup, stepper};
use swarm_events::{Building, GroundBounds, InteractionOutcome, MapData, Road, WorldPos};

fn road(points: &[(f32, f32)]) -> Road {
    Road {
        path: points
            .iter()
            .map(|&(x, z)| WorldPos::new(x, 0.0, z))
            .collect(),
        width: 4.0,
        kind: "residential".to_string(),
    }
}

/// A 10x10 grid (gridSize 5, world 50x50): a straight road along the z=0
/// row, a detour loop, and a building spanning x in [20, 30] that blocks
/// the direct row. The route must exist and must avoid the blocked span.
#[test]
fn test_building_forces_detour() {
    let map = MapData {
        roads: vec![
            road(&[(0.0, 0.0), (45.0, 0.0)]),
            // Detour loop: up at x=15, across at z=15, back down at x=35.
            road(&[(15.0, 0.0), (15.0, 15.0), (35.0, 15.0), (35.0, 0.0)]),
        ],
        buildings: vec![Building {
            footprint: Vec::new(),
            bounds: Some(GroundBounds {
                min_x: 20.0,
                min_z: 0.0,
                max_x: 30.0,
                max_z: 5.0,
            }),
            height: 20.0,
            kind: "office".to_string(),
        }],
    };
    let mesh = NavigationMesh::build(&map, 50.0, 50.0, 5.0, 50);

    // The building wins over the road for the overlapping cells.
    for x in 4..=6 {
        assert!(!mesh.grid().is_walkable(x, 0));
    }

    let path = mesh.find_world_path(WorldPos::new(2.0, 0.0, 2.0), WorldPos::new(48.0, 0.0, 2.0));
    assert!(!path.is_empty(), "a detour route must exist");
    for waypoint in &path {
        assert!(
            !(waypoint.x >= 20.0 && waypoint.x <= 30.0 && waypoint.z <= 5.0),
            "route must detour around the building, got waypoint {:?}",
            waypoint
        );
        assert!(mesh.is_position_navigable(*waypoint));
    }
    assert_eq!(path.first().copied(), Some(WorldPos::new(2.5, 0.0, 2.5)));
    assert_eq!(path.last().copied(), Some(WorldPos::new(47.5, 0.0, 2.5)));
}

/// Zero initial walkable cells: the builder installs a fallback disc and
/// random sampling always lands inside it.
#[test]
fn test_fallback_disc_scenario() {
    let mut config = SimulationConfig::default();
    config.world.size_x = 50.0;
    config.world.size_z = 50.0;
    config.nav.fallback_disc_radius_cells = 3;
    config.agents.blue_count = 1;
    config.agents.red_count = 1;

    let empty_map = MapData::default();
    let client = Arc::new(OracleClient::new(Box::new(StaticOracle::with_confidence(
        0.9,
    ))));
    let mut world = SimulationWorld::new(config, &empty_map, client, 42);

    let center = WorldPos::new(25.0, 0.0, 25.0);
    let max_disc_distance = 3.0 * 5.0 + 5.0; // radius cells * cell size + cell diagonal slack
    for _ in 0..50 {
        let position = world.random_navigable_position().unwrap();
        assert!(world.is_position_navigable(position));
        assert!(
            position.ground_distance_to(&center) <= max_disc_distance,
            "sample {:?} escaped the fallback disc",
            position
        );
    }
}

/// Two agents in range, cooldown elapsed, gate forced true, oracle
/// confidence 0.9: the initiator's trust in the target lands at exactly
/// 0.5 + 0.1.
#[tokio::test]
async fn test_forced_interaction_sets_trust() {
    let mut config = SimulationConfig::default();
    config.world.size_x = 50.0;
    config.world.size_z = 50.0;
    config.agents.blue_count = 1;
    config.agents.red_count = 1;
    // World-spanning radius guarantees the pair is in range wherever the
    // seed placed them; probability 1.0 forces the stochastic gate.
    config.interaction.radius = 1000.0;
    config.interaction.probability = 1.0;

    let map = setup::demo_map(50.0, 50.0);
    let client = Arc::new(OracleClient::new(Box::new(StaticOracle::with_confidence(
        0.9,
    ))));
    let mut world = SimulationWorld::new(config, &map, client, 42);

    let events = stepper::step(&mut world, 0.1).await;
    assert_eq!(events.len(), 2);
    assert!(events
        .iter()
        .all(|e| e.outcome == InteractionOutcome::TrustGained));

    let blue = world.agent("blue-0").unwrap();
    assert_eq!(blue.knowledge.trust_scores["red-0"], 0.6);
    assert!(blue.knowledge.known_agents.contains("red-0"));
    assert_eq!(blue.last_decision.confidence, 0.9);

    let red = world.agent("red-0").unwrap();
    assert_eq!(red.knowledge.trust_scores["blue-0"], 0.6);
}

/// A dead provider never aborts the tick: every interaction resolves via
/// the fallback, trust erodes instead of growing, and the run keeps going.
#[tokio::test]
async fn test_oracle_outage_degrades_to_fallback() {
    let mut config = SimulationConfig::default();
    config.world.size_x = 50.0;
    config.world.size_z = 50.0;
    config.agents.blue_count = 1;
    config.agents.red_count = 1;
    config.interaction.radius = 1000.0;
    config.interaction.probability = 1.0;

    let map = setup::demo_map(50.0, 50.0);
    let client = Arc::new(OracleClient::new(Box::new(FlakyOracle::always_failing())));
    let mut world = SimulationWorld::new(config, &map, client, 42);

    let events = stepper::step(&mut world, 0.1).await;
    assert_eq!(events.len(), 2);
    assert!(events
        .iter()
        .all(|e| e.outcome == InteractionOutcome::FellBack));

    let blue = world.agent("blue-0").unwrap();
    assert_eq!(
        blue.knowledge.trust_scores["red-0"], 0.4,
        "fallback confidence stays below the trust gate"
    );

    // Later ticks keep running on the open breaker.
    for _ in 0..12 {
        stepper::step(&mut world, 1.0).await;
    }
    assert_eq!(world.tick(), 13);
}
