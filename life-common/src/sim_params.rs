use crate::config::BoundaryPolicy;
use serde::{Deserialize, Serialize};

/// Distance beyond which two particles exert no force on each other.
pub const INTERACTION_RADIUS: f64 = 80.0;

/// Velocity update factor: `v' = (v + f) * DAMPING`.
pub const DAMPING: f64 = 0.5;

/// Simulation parameters derived from the configuration, used frequently during simulation steps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimParams {
    // World
    pub world_width: f64,
    pub world_height: f64,
    pub padding: f64,
    pub particle_size: f64,
    pub boundary: BoundaryPolicy,

    // Interaction
    pub interaction_radius: f64,
    pub damping: f64,
}

impl SimParams {
    /// Largest x a particle may occupy under the clamp policy.
    #[inline(always)]
    pub fn max_x(&self) -> f64 {
        self.world_width - self.particle_size
    }

    /// Largest y a particle may occupy under the clamp policy.
    #[inline(always)]
    pub fn max_y(&self) -> f64 {
        self.world_height - self.particle_size
    }
}
