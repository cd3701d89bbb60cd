//! Core simulation engine: navigation mesh, pathfinding, agents, ticks.
//!
//! The engine turns normalized road/building data into a walkability grid,
//! routes agents across it with A*, and advances a blue/red population tick
//! by tick, resolving proximity interactions through the oracle crate.
//!
//! Everything hangs off an explicit [`world::SimulationWorld`] handle so
//! multiple simulations can coexist and tests stay isolated.

pub mod agents;
pub mod config;
pub mod interact;
pub mod nav;
pub mod output;
pub mod setup;
pub mod stepper;
pub mod world;

pub use agents::{Agent, AgentRegistry, Faction, TaskState};
pub use config::SimulationConfig;
pub use nav::{GridCoord, GridSnapshot, NavigationGrid, NavigationMesh};
pub use world::SimulationWorld;
