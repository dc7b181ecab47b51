//! Configuration system for the neurogrid simulation.
//!
//! Supports YAML configuration files with sensible defaults.

use crate::creature::{ActionName, SensorName};
use crate::error::{Result, SimError};
use crate::genome::MutationMode;
use crate::objects::{default_map, WorldObject};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Largest internal neuron index a gene can address
pub const MAX_INTERNAL_NEURONS: usize = 128;

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub world: WorldConfig,
    pub genome: GenomeConfig,
    pub neural: NeuralConfig,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    #[serde(default)]
    pub strategies: StrategyConfig,
    /// Enabled sensors
    #[serde(default = "default_sensors")]
    pub sensors: Vec<SensorName>,
    /// Enabled actions
    #[serde(default = "default_actions")]
    pub actions: Vec<ActionName>,
    /// Obstacles and areas
    #[serde(default = "default_map")]
    pub objects: Vec<WorldObject>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// World/grid configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldConfig {
    /// Side length of the square grid
    pub size: usize,
    /// Creatures created at the start of every generation
    pub initial_population: usize,
    /// Ticks per generation
    pub steps_per_generation: u32,
    /// Random seed, drawn from entropy when absent
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Genome sizes and mutation rates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenomeConfig {
    /// Genes in a freshly generated genome
    pub initial_genome_size: usize,
    /// Insertions stop at this length
    pub max_genome_size: usize,
    /// Point mutation probability per gene
    pub mutation_probability: f64,
    /// Insertion/deletion probability per genome
    pub insertion_deletion_probability: f64,
    /// Share of insertion/deletion events that delete
    pub deletion_ratio: f64,
    #[serde(default)]
    pub mutation_mode: MutationMode,
}

/// Brain configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeuralConfig {
    /// Upper bound on internal neurons per brain
    pub max_number_neurons: usize,
}

/// Pacing of the simulation thread
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Delay between batches of ticks
    pub time_per_step_ms: u64,
    /// Ticks run back to back per batch
    pub immediate_steps: u32,
    /// Extra delay after a generation ends
    pub pause_between_generations_ms: u64,
}

/// Named selection and population strategies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyConfig {
    pub selection: String,
    pub population: String,
    /// Share of the world's width counted as the east wall
    pub east_wall_fraction: f32,
}

/// Logging and output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Generations between checkpoints
    pub checkpoint_interval: u64,
    /// Generations between stats output
    pub stats_interval: u64,
    /// Log level
    pub log_level: String,
}

fn default_sensors() -> Vec<SensorName> {
    SensorName::ALL
        .into_iter()
        .filter(|s| s.enabled_by_default())
        .collect()
}

fn default_actions() -> Vec<ActionName> {
    ActionName::ALL.to_vec()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            world: WorldConfig::default(),
            genome: GenomeConfig::default(),
            neural: NeuralConfig::default(),
            scheduler: SchedulerConfig::default(),
            strategies: StrategyConfig::default(),
            sensors: default_sensors(),
            actions: default_actions(),
            objects: default_map(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            size: 100,
            initial_population: 300,
            steps_per_generation: 300,
            seed: None,
        }
    }
}

impl Default for GenomeConfig {
    fn default() -> Self {
        Self {
            initial_genome_size: 20,
            max_genome_size: 30,
            mutation_probability: 0.05,
            insertion_deletion_probability: 0.015,
            deletion_ratio: 0.5,
            mutation_mode: MutationMode::WholeGene,
        }
    }
}

impl Default for NeuralConfig {
    fn default() -> Self {
        Self {
            max_number_neurons: 5,
        }
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            time_per_step_ms: 0,
            immediate_steps: 1,
            pause_between_generations_ms: 0,
        }
    }
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            selection: "InsideReproductionArea".to_string(),
            population: "AsexualRandom".to_string(),
            east_wall_fraction: 0.1,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            checkpoint_interval: 100,
            stats_interval: 10,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a YAML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    /// Compact preset with an empty map and short generations
    pub fn small(size: usize, population: usize) -> Self {
        let mut config = Self::default();
        config.world.size = size;
        config.world.initial_population = population;
        config.world.steps_per_generation = 10;
        config.genome.initial_genome_size = 4;
        config.genome.max_genome_size = 8;
        config.neural.max_number_neurons = 2;
        config.objects = Vec::new();
        config
    }

    /// Validate configuration values.
    ///
    /// Checks that depend on the map (free cells) happen when the world is built.
    pub fn validate(&self) -> Result<()> {
        let size = self.world.size;
        if size == 0 || size > i32::MAX as usize / 2 {
            return Err(SimError::config("size must be > 0"));
        }
        if self.world.initial_population >= size.saturating_mul(size) {
            return Err(SimError::config(format!(
                "initial_population ({}) must be smaller than size² ({})",
                self.world.initial_population,
                size.saturating_mul(size)
            )));
        }
        if self.world.steps_per_generation == 0 {
            return Err(SimError::config("steps_per_generation must be > 0"));
        }

        let genome = &self.genome;
        if genome.initial_genome_size == 0 {
            return Err(SimError::config("initial_genome_size must be > 0"));
        }
        if genome.max_genome_size < genome.initial_genome_size {
            return Err(SimError::config(
                "max_genome_size cannot be smaller than initial_genome_size",
            ));
        }
        for (name, p) in [
            ("mutation_probability", genome.mutation_probability),
            ("insertion_deletion_probability", genome.insertion_deletion_probability),
            ("deletion_ratio", genome.deletion_ratio),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(SimError::config(format!("{name} must be within [0, 1]")));
            }
        }

        if self.neural.max_number_neurons > MAX_INTERNAL_NEURONS {
            return Err(SimError::config(format!(
                "max_number_neurons cannot exceed {MAX_INTERNAL_NEURONS}"
            )));
        }
        if self.scheduler.immediate_steps == 0 {
            return Err(SimError::config("immediate_steps must be > 0"));
        }
        if !(0.0..=1.0).contains(&self.strategies.east_wall_fraction) {
            return Err(SimError::config("east_wall_fraction must be within [0, 1]"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.sensors.len(), 10);
        assert_eq!(config.actions.len(), 6);
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let yaml = serde_yaml::to_string(&config).unwrap();
        let loaded: Config = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_population_must_fit() {
        let mut config = Config::default();
        config.world.size = 10;
        config.world.initial_population = 100;
        assert!(matches!(config.validate(), Err(SimError::InvalidConfig(_))));

        config.world.initial_population = 99;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_genome_bounds() {
        let mut config = Config::default();
        config.genome.max_genome_size = 10;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.genome.initial_genome_size = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.genome.deletion_ratio = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_neuron_cap() {
        let mut config = Config::default();
        config.neural.max_number_neurons = MAX_INTERNAL_NEURONS + 1;
        assert!(config.validate().is_err());

        config.neural.max_number_neurons = 0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let yaml = r#"
world:
  size: 20
  initial_population: 10
  steps_per_generation: 50
genome:
  initial_genome_size: 4
  max_genome_size: 8
  mutation_probability: 0.1
  insertion_deletion_probability: 0.0
  deletion_ratio: 0.5
neural:
  max_number_neurons: 2
sensors: [Age, Touch]
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.world.seed, None);
        assert_eq!(config.sensors, vec![SensorName::Age, SensorName::Touch]);
        assert_eq!(config.actions.len(), 6);
        assert_eq!(config.objects, default_map());
        assert_eq!(config.genome.mutation_mode, MutationMode::WholeGene);
    }
}
