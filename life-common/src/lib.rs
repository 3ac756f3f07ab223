pub mod config;
pub mod sim_params;
pub mod snapshot;
pub mod vecmath;

// Re-export key types for easier use by dependent crates
pub use config::{
    BoundaryPolicy, ExecutionConfig, ExecutionMode, GroupConfig, InitialConditions, OutputConfig,
    RuleConfig, SimulationConfig, TimingConfig, WorldConfig,
};
pub use sim_params::{SimParams, DAMPING, INTERACTION_RADIUS};
pub use snapshot::{DrawInstruction, GroupStats, Snapshot};
pub use vecmath::Vec2;
