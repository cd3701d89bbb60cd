//! Simulation setup: map loading and agent spawning.

pub mod agents;
pub mod map;

pub use agents::spawn_agents;
pub use map::{demo_map, load_map_file, SetupError};
