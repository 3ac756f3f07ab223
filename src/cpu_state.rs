use crate::particle::Particle;
use crate::world::World;
use life_common::SimParams;

/// Holds the simulation state on the CPU.
#[derive(Debug)] // Large state shouldn't be cloned casually
pub struct CpuState {
    pub params: SimParams,

    // --- Ping-Pong Buffers for Parallel Update ---
    // Front: the world's groups, read-only while a step computes.
    pub world: World,
    // Back: one scratch buffer per group, same length as the group.
    // Written during a step, swapped into the world afterwards.
    back: Vec<Box<[Particle]>>,
}

impl CpuState {
    /// Creates a new CpuState, allocating back buffers to match every group.
    pub fn new(world: World, params: SimParams) -> Self {
        let back = world
            .groups()
            .iter()
            .map(|g| g.members().to_vec().into_boxed_slice())
            .collect();

        Self { params, world, back }
    }

    /// Splits the state into parameters, the read-only front snapshot and the writable back buffers.
    pub fn split(&mut self) -> (&SimParams, &World, &mut [Box<[Particle]>]) {
        (&self.params, &self.world, &mut self.back)
    }

    /// Swaps the front and back buffers of every group.
    /// After this the world holds the state written during the last step.
    pub fn swap_buffers(&mut self) {
        for (group, back) in self.world.groups_mut().iter_mut().zip(self.back.iter_mut()) {
            debug_assert_eq!(group.members.len(), back.len());
            std::mem::swap(&mut group.members, back);
        }
    }

    pub fn num_particles(&self) -> usize {
        self.world.particle_count()
    }
}
