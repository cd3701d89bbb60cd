//! Configuration System
//!
//! Loads simulation parameters from city-swarm.toml for easy adjustment
//! without recompiling.

use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Default tuning file path
pub const DEFAULT_CONFIG_PATH: &str = "city-swarm.toml";

/// Top-level configuration structure
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub simulation: SimulationSection,
    pub world: WorldSection,
    pub agents: AgentSection,
    pub interaction: InteractionSection,
    pub nav: NavSection,
    pub oracle: OracleSection,
}

/// Simulation loop parameters
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SimulationSection {
    pub default_ticks: u64,
    /// Fixed step size for headless runs, in milliseconds.
    pub tick_ms: f32,
}

/// World extent and grid resolution
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WorldSection {
    /// World extent along x, in meters.
    pub size_x: f32,
    /// World extent along z, in meters.
    pub size_z: f32,
    /// Cell edge length, in meters per cell.
    pub grid_size: f32,
}

/// Agent population parameters
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AgentSection {
    pub blue_count: usize,
    pub red_count: usize,
    /// Blue agent speed in world units per second.
    pub blue_speed: f32,
    /// Red agent speed in world units per second.
    pub red_speed: f32,
    /// Height agents (and their visited locations) are normalized to.
    pub height: f32,
}

/// Proximity interaction parameters
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InteractionSection {
    /// Neighbor detection radius in world units.
    pub radius: f32,
    /// Minimum spacing between one agent's interactions, in milliseconds.
    pub cooldown_ms: u64,
    /// Stochastic gate probability per eligible tick.
    pub probability: f64,
}

/// Navigation parameters
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NavSection {
    /// Radius (in cells) of the walkable disc installed when a build ends
    /// with zero walkable cells.
    pub fallback_disc_radius_cells: usize,
    /// Distance at which a waypoint counts as reached, in world units.
    pub arrival_threshold: f32,
}

/// Oracle routing parameters
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OracleSection {
    /// Provider name: "openai", "gemini" or "anthropic".
    pub provider: String,
}

impl SimulationConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::IoError(e.to_string()))?;
        toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Load configuration from default path, or use defaults if not found
    pub fn load_or_default() -> Self {
        Self::load(DEFAULT_CONFIG_PATH).unwrap_or_else(|e| {
            eprintln!(
                "Warning: Could not load {}: {}. Using defaults.",
                DEFAULT_CONFIG_PATH, e
            );
            Self::default()
        })
    }

    /// Grid width in cells for the configured world extent.
    pub fn grid_width(&self) -> usize {
        (self.world.size_x / self.world.grid_size).ceil() as usize
    }

    /// Grid height in cells for the configured world extent.
    pub fn grid_height(&self) -> usize {
        (self.world.size_z / self.world.grid_size).ceil() as usize
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            simulation: SimulationSection::default(),
            world: WorldSection::default(),
            agents: AgentSection::default(),
            interaction: InteractionSection::default(),
            nav: NavSection::default(),
            oracle: OracleSection::default(),
        }
    }
}

impl Default for SimulationSection {
    fn default() -> Self {
        Self {
            default_ticks: 1000,
            tick_ms: 100.0,
        }
    }
}

impl Default for WorldSection {
    fn default() -> Self {
        Self {
            size_x: 5000.0,
            size_z: 5000.0,
            grid_size: 5.0,
        }
    }
}

impl Default for AgentSection {
    fn default() -> Self {
        Self {
            blue_count: 5,
            red_count: 3,
            blue_speed: 0.5,
            red_speed: 0.6,
            height: 2.0,
        }
    }
}

impl Default for InteractionSection {
    fn default() -> Self {
        Self {
            radius: 10.0,
            cooldown_ms: 5000,
            probability: 0.3,
        }
    }
}

impl Default for NavSection {
    fn default() -> Self {
        Self {
            fallback_disc_radius_cells: 50,
            arrival_threshold: 1.0,
        }
    }
}

impl Default for OracleSection {
    fn default() -> Self {
        Self {
            provider: "anthropic".to_string(),
        }
    }
}

/// Configuration error type
#[derive(Debug)]
pub enum ConfigError {
    IoError(String),
    ParseError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "IO error: {}", e),
            ConfigError::ParseError(e) => write!(f, "Parse error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}
