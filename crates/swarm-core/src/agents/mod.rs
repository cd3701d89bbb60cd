//! Agent entities and the canonical agent store.

pub mod agent;
pub mod registry;

pub use agent::{
    Agent, Faction, Knowledge, PathProgress, TaskState, INITIAL_TRUST, TRUST_CONFIDENCE_GATE,
    TRUST_STEP,
};
pub use registry::AgentRegistry;
