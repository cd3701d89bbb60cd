//! Simulation output: per-tick statistics and JSON export.

pub mod stats;

pub use stats::{write_stats, SimulationStats, StatsCollector, TickStats, LOW_TRUST_THRESHOLD};
