use anyhow::Result;
use artificial_life::output::{save_final_positions, save_snapshots, OutputFormat};
use artificial_life::LifeSimulation;
use clap::Parser;
use life_common::{ExecutionMode, SimulationConfig};
use log::{debug, error, info, trace};
use std::path::PathBuf;
use std::time::Instant;

/// Headless driver: runs the configured number of steps and writes recorded output.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the TOML configuration
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Override `timing.total_steps`
    #[arg(long)]
    steps: Option<u64>,

    /// Compute every step on the calling thread
    #[arg(long)]
    serial: bool,
}

fn main() -> Result<()> {
    // Initialize the logger
    env_logger::init();
    let args = Args::parse();

    info!("Starting Artificial Life engine...");

    // --- Load Configuration ---
    let mut config = SimulationConfig::load(&args.config)?;
    if let Some(steps) = args.steps {
        config.timing.total_steps = steps;
    }
    if args.serial {
        config.execution.mode = ExecutionMode::Serial;
    }
    config.validate()?;

    if config.execution.threads == 0 {
        info!("Using {} Rayon threads.", rayon::current_num_threads());
    }

    // --- Initialize Simulation ---
    let mut sim = LifeSimulation::new(config)?;
    info!(
        "World initialized with {} particles in {} groups, {} rules.",
        sim.current_particle_count(),
        sim.world().group_count(),
        sim.rules().len()
    );
    debug!("Simulation Parameters: {:#?}", sim.params());

    // --- Simulation Loop ---
    let total_steps = sim.config().timing.total_steps;
    let record_interval_steps = sim.config().timing.record_interval_steps.max(1);
    info!("Recording snapshot every {} steps.", record_interval_steps);

    info!("Starting simulation loop for {} steps ({:?})...", total_steps, sim.config().execution.mode);
    let start_time = Instant::now();
    let mut previous_print_time = start_time;

    // --- Initial Snapshot (step = 0) ---
    if let Err(e) = sim.record_snapshot() {
        error!("Error recording initial snapshot: {}", e);
        anyhow::bail!("Failed to record initial snapshot.");
    }

    for step in 0..total_steps {
        let step_start_time = Instant::now();
        sim.step();
        let step_duration = step_start_time.elapsed();

        let current_time = Instant::now();
        let print_interval_secs = 5.0;
        let should_print_status = current_time.duration_since(previous_print_time).as_secs_f64() >= print_interval_secs;
        let is_record_step = (step + 1) % record_interval_steps == 0;
        let is_last_step = step == total_steps - 1;

        if should_print_status || is_record_step || is_last_step {
            info!(
                "Step [{}/{}] | Particles: {} | Step Time: {:6.2} ms | Elapsed: {:.2} s",
                step + 1,
                total_steps,
                sim.current_particle_count(),
                step_duration.as_secs_f64() * 1000.0,
                start_time.elapsed().as_secs_f64()
            );
            previous_print_time = current_time;

            if is_record_step || is_last_step {
                if let Err(e) = sim.record_snapshot() {
                    error!("Error recording snapshot at step {}: {}", step + 1, e);
                    anyhow::bail!("Failed to record snapshot.");
                }
            }
        } else {
            trace!(
                "Step [{}/{}] completed in {:.2} ms",
                step + 1,
                total_steps,
                step_duration.as_secs_f64() * 1000.0
            );
        }
    }

    let total_duration = start_time.elapsed();
    info!(
        "Simulation finished in {:.3} seconds ({:.1} steps/s).",
        total_duration.as_secs_f64(),
        total_steps as f64 / total_duration.as_secs_f64().max(f64::EPSILON)
    );

    // --- Save Recorded Data ---
    let output = &sim.config().output;
    if output.save_stats {
        let format = OutputFormat::from_config(output.format.as_deref());
        if let Err(e) = save_snapshots(&output.base_filename, format, sim.get_recorded_snapshots()) {
            error!("{:#}", e);
        }
    } else {
        info!("Skipping saving snapshots as per config (save_stats is false).");
    }

    if output.save_positions {
        if let Err(e) = save_final_positions(&output.base_filename, &sim.get_results()) {
            error!("{:#}", e);
        }
    } else {
        info!("Skipping saving final positions as per config.");
    }

    info!("Simulation Complete.");
    Ok(())
}
