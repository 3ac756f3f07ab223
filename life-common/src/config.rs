use serde::{Deserialize, Serialize};
use anyhow::Result;
use crate::sim_params::{SimParams, DAMPING, INTERACTION_RADIUS};
use std::collections::HashSet;
use std::path::Path;

/// What happens when a particle reaches the edge of the world.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum BoundaryPolicy {
    /// Clamp the position to the edge and reflect the velocity component.
    #[default]
    Clamp,
    /// Reflect the velocity component only; the position may sit past the edge for one step.
    Reflect,
}

// Configuration for world properties
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct WorldConfig {
    pub width: f64,
    pub height: f64,
    /// Inset from each edge used when spawning particles.
    pub padding: f64,
    /// Edge length of a drawn particle; also shrinks the clamp bounds.
    pub particle_size: f64,
    #[serde(default)]
    pub boundary: BoundaryPolicy,
}

// Configuration for timing
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct TimingConfig {
    pub total_steps: u64,
    #[serde(default = "default_record_interval")]
    pub record_interval_steps: u64,
}

fn default_record_interval() -> u64 {
    60
}

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct InitialConditions {
    /// Seed for initial placement. Without one, a random seed is drawn and logged.
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct GroupConfig {
    pub name: String,
    pub color: String,
    pub count: u32,
}

/// A rule as written in the config file, referring to groups by name.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct RuleConfig {
    pub source: String,
    pub target: String,
    pub gravity: f64,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    #[default]
    Parallel,
    Serial,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ExecutionConfig {
    #[serde(default)]
    pub mode: ExecutionMode,
    /// Rayon worker count. 0 keeps rayon's default (available parallelism).
    #[serde(default)]
    pub threads: usize,
    /// Minimum number of particles handed to one rayon task.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
}

fn default_chunk_size() -> usize {
    128
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        ExecutionConfig {
            mode: ExecutionMode::Parallel,
            threads: 0,
            chunk_size: default_chunk_size(),
        }
    }
}

// Configuration for output settings, loaded from config.toml
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct OutputConfig {
    pub base_filename: String,
    pub save_positions: bool,
    pub save_stats: bool,
    #[serde(default)]
    pub save_positions_in_snapshot: bool,
    pub format: Option<String>, // Output format: "json", "bincode", "messagepack"
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            base_filename: "life".to_string(),
            save_positions: false,
            save_stats: false,
            save_positions_in_snapshot: false,
            format: None,
        }
    }
}

// Main simulation configuration structure, loaded from config.toml.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct SimulationConfig {
    pub world: WorldConfig,
    pub timing: TimingConfig,
    #[serde(default)]
    pub initial_conditions: InitialConditions,
    #[serde(default)]
    pub groups: Vec<GroupConfig>,
    #[serde(default)]
    pub rules: Vec<RuleConfig>,
    #[serde(default)]
    pub execution: ExecutionConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl SimulationConfig {
    /// Loads the simulation configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();

        let config_str = std::fs::read_to_string(path_ref)
            .map_err(|e| anyhow::anyhow!("Failed to read config file '{}': {}", path_ref.display(), e))?;
        Self::from_toml_str(&config_str)
            .map_err(|e| anyhow::anyhow!("Invalid config '{}': {}", path_ref.display(), e))
    }

    /// Parses and validates a configuration from TOML text.
    pub fn from_toml_str(config_str: &str) -> Result<Self> {
        let config: SimulationConfig = toml::from_str(config_str)
            .map_err(|e| anyhow::anyhow!("Failed to parse TOML: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the structural constraints the engine relies on.
    /// Rule group names are resolved (and rejected) when the world is built.
    pub fn validate(&self) -> Result<()> {
        let w = &self.world;
        if !(w.width > 0.0 && w.height > 0.0) {
            anyhow::bail!("world width and height must be positive.");
        }
        if !(w.padding >= 0.0) || w.padding * 2.0 >= w.width || w.padding * 2.0 >= w.height {
            anyhow::bail!(
                "padding {} leaves no spawn area in a {}x{} world.",
                w.padding, w.width, w.height
            );
        }
        // A zero size would let the clamp park particles exactly on width/height.
        if !(w.particle_size > 0.0) || w.particle_size >= w.width || w.particle_size >= w.height {
            anyhow::bail!("particle_size must be positive and smaller than the world.");
        }
        if self.timing.total_steps == 0 {
            anyhow::bail!("total_steps must be greater than 0.");
        }
        if self.execution.chunk_size == 0 {
            anyhow::bail!("chunk_size must be greater than 0.");
        }

        let mut names = HashSet::new();
        for group in &self.groups {
            if group.name.is_empty() {
                anyhow::bail!("group names must not be empty.");
            }
            if !names.insert(group.name.as_str()) {
                anyhow::bail!("duplicate group name '{}'.", group.name);
            }
        }
        for rule in &self.rules {
            if !rule.gravity.is_finite() {
                anyhow::bail!(
                    "rule {} -> {} has a non-finite gravity coefficient.",
                    rule.source, rule.target
                );
            }
        }
        Ok(())
    }

    /// Converts the configuration into simulation parameters used at runtime.
    pub fn get_sim_params(&self) -> SimParams {
        SimParams {
            world_width: self.world.width,
            world_height: self.world.height,
            padding: self.world.padding,
            particle_size: self.world.particle_size,
            boundary: self.world.boundary,
            interaction_radius: INTERACTION_RADIUS,
            damping: DAMPING,
        }
    }
}
