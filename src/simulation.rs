use crate::cpu_state::CpuState;
use crate::forces::advance;
use crate::particle::Particle;
use crate::rules::RuleSet;
use crate::world::World;
use anyhow::Result;
use life_common::{
    DrawInstruction, ExecutionMode, GroupStats, SimParams, SimulationConfig, Snapshot,
};
use log::{debug, info};
use rand::prelude::*;
use rayon::prelude::*;

/// Manages the state and execution of the particle-life simulation on the CPU.
pub struct LifeSimulation {
    /// The simulation configuration, including groups, rules and parameters.
    pub config: SimulationConfig,
    /// The simulation state stored in CPU memory.
    pub state: CpuState,
    rules: RuleSet,
    /// Dedicated rayon pool when `execution.threads` is set; otherwise rayon's global pool.
    pool: Option<rayon::ThreadPool>,
    /// The number of completed steps.
    pub current_time_step: u64,
    /// Stores collected simulation data snapshots at record intervals.
    recorded_snapshots: Vec<Snapshot>,
}

impl LifeSimulation {
    /// Creates a new `LifeSimulation`, placing every group's particles and resolving the rules.
    pub fn new(config: SimulationConfig) -> Result<Self> {
        config.validate()?;
        let params = config.get_sim_params();

        // Placement is the only consumer of randomness. Log the seed so a run can be repeated.
        let seed = match config.initial_conditions.seed {
            Some(seed) => seed,
            None => rand::rng().random(),
        };
        info!("Initial placement seed: {}", seed);
        let mut rng = StdRng::seed_from_u64(seed);

        let world = World::populate(&config.groups, &params, &mut rng)?;
        let rules = RuleSet::resolve(&world, &config.rules)?;
        debug!(
            "World has {} groups, {} particles and {} rules.",
            world.group_count(),
            world.particle_count(),
            rules.len()
        );

        Self::from_parts(config, world, rules)
    }

    /// Builds a simulation around an already populated world and rule set.
    pub fn from_parts(config: SimulationConfig, world: World, rules: RuleSet) -> Result<Self> {
        let params = config.get_sim_params();

        let pool = if config.execution.threads > 0 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(config.execution.threads)
                .thread_name(|i| format!("life-worker-{}", i))
                .build()?;
            info!("Using a dedicated pool of {} rayon threads.", config.execution.threads);
            Some(pool)
        } else {
            None
        };

        let state = CpuState::new(world, params);

        Ok(Self {
            config,
            state,
            rules,
            pool,
            current_time_step: 0,
            recorded_snapshots: Vec::new(),
        })
    }

    /// Advances the simulation by one step using the configured execution mode.
    pub fn step(&mut self) {
        self.step_with(self.config.execution.mode);
    }

    /// Advances the simulation by one step.
    ///
    /// Every particle's force is computed against the pre-step positions of all
    /// groups; results land in the back buffers and become visible only once
    /// every particle is done.
    pub fn step_with(&mut self, mode: ExecutionMode) {
        match mode {
            ExecutionMode::Parallel => {
                let chunk_size = self.config.execution.chunk_size;
                let state = &mut self.state;
                let rules = &self.rules;
                match &self.pool {
                    Some(pool) => pool.install(|| update_physics_parallel(state, rules, chunk_size)),
                    None => update_physics_parallel(state, rules, chunk_size),
                }
            }
            ExecutionMode::Serial => update_physics_serial(&mut self.state, &self.rules),
        }

        // --- Swap Buffers: Output becomes Input for next step ---
        self.state.swap_buffers();

        self.current_time_step += 1;
    }

    pub fn world(&self) -> &World {
        &self.state.world
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn params(&self) -> &SimParams {
        &self.state.params
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn current_particle_count(&self) -> usize {
        self.state.num_particles()
    }

    /// Draw instructions for every particle at the current step.
    pub fn draw_list(&self) -> Vec<DrawInstruction> {
        self.state.world.draw_list(self.state.params.particle_size)
    }

    /// Current `(group name, x, y)` of every particle.
    pub fn get_results(&self) -> Vec<(String, f64, f64)> {
        self.state
            .world
            .groups()
            .iter()
            .flat_map(|g| {
                g.members()
                    .iter()
                    .map(move |p| (g.name.clone(), p.position.x, p.position.y))
            })
            .collect()
    }

    /// Records per-group metrics (and optionally positions) for the current step.
    pub fn record_snapshot(&mut self) -> Result<()> {
        let groups: Vec<GroupStats> = self
            .state
            .world
            .groups()
            .iter()
            .map(|g| {
                let members = g.members();
                let n = members.len();
                let (sum_x, sum_y, sum_speed) = members
                    .par_iter()
                    .map(|p| (p.position.x, p.position.y, p.velocity.length()))
                    .reduce(|| (0.0, 0.0, 0.0), |a, b| (a.0 + b.0, a.1 + b.1, a.2 + b.2));
                let (centroid, mean_speed) = if n > 0 {
                    let inv = 1.0 / n as f64;
                    ((sum_x * inv, sum_y * inv), sum_speed * inv)
                } else {
                    ((0.0, 0.0), 0.0)
                };
                GroupStats {
                    name: g.name.clone(),
                    color: g.color.clone(),
                    count: n as u32,
                    centroid,
                    mean_speed,
                }
            })
            .collect();

        for stats in &groups {
            debug!(
                "Step {} group '{}': centroid=({:.1}, {:.1}) mean_speed={:.3}",
                self.current_time_step, stats.name, stats.centroid.0, stats.centroid.1, stats.mean_speed
            );
        }

        // Get current positions if requested
        let positions = if self.config.output.save_positions_in_snapshot {
            Some(self.draw_list())
        } else {
            None
        };

        let total_particle_count = u32::try_from(self.current_particle_count())
            .map_err(|_| anyhow::anyhow!("particle count does not fit in a snapshot"))?;

        self.recorded_snapshots.push(Snapshot {
            step: self.current_time_step,
            total_particle_count,
            groups,
            positions,
        });

        Ok(())
    }

    /// Provides access to the recorded snapshots.
    pub fn get_recorded_snapshots(&self) -> &[Snapshot] {
        &self.recorded_snapshots
    }
}

/// Computes every particle's next state in parallel. Reads the front buffers, writes the back buffers.
fn update_physics_parallel(state: &mut CpuState, rules: &RuleSet, chunk_size: usize) {
    let (params, world, back) = state.split();

    back.par_iter_mut().enumerate().for_each(|(group_idx, out)| {
        let out: &mut [Particle] = out;
        let front = world.groups()[group_idx].members();
        out.par_iter_mut()
            .zip(front.par_iter())
            .with_min_len(chunk_size)
            .for_each(|(next, current)| {
                *next = advance(current, rules, world, params);
            });
    });
}

/// Same update as `update_physics_parallel`, on the calling thread.
fn update_physics_serial(state: &mut CpuState, rules: &RuleSet) {
    let (params, world, back) = state.split();

    for (group_idx, out) in back.iter_mut().enumerate() {
        let front = world.groups()[group_idx].members();
        for (next, current) in out.iter_mut().zip(front.iter()) {
            *next = advance(current, rules, world, params);
        }
    }
}
