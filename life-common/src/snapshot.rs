use serde::{Deserialize, Serialize};

/// One filled square for the renderer: top-left corner, colour and edge length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawInstruction {
    pub x: f64,
    pub y: f64,
    pub color: String,
    pub size: f64,
}

/// Aggregate metrics for one particle group at snapshot time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupStats {
    pub name: String,
    pub color: String,
    pub count: u32,
    /// Mean position of the group's particles (`(0, 0)` for an empty group).
    pub centroid: (f64, f64),
    /// Mean velocity magnitude in pixels per step.
    pub mean_speed: f64,
}

/// A snapshot of the simulation state and metrics at a specific step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    /// The step number at which the snapshot was taken (0 = initial state).
    pub step: u64,
    /// The total number of particles across all groups.
    pub total_particle_count: u32,
    pub groups: Vec<GroupStats>,
    /// Draw instructions for every particle.
    /// Included only if `config.output.save_positions_in_snapshot` is true.
    #[serde(skip_serializing_if = "Option::is_none")] // Don't write "positions": null
    #[serde(default)]
    pub positions: Option<Vec<DrawInstruction>>,
}
