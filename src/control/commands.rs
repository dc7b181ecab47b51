//! Commands for controlling the simulation thread.

use crate::config::Config;
use crate::creature::{ActionName, SensorName};
use crate::genome::MutationMode;
use crate::objects::WorldObject;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One configuration scalar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Setting {
    Size(usize),
    InitialPopulation(usize),
    StepsPerGeneration(u32),
    InitialGenomeSize(usize),
    MaxGenomeSize(usize),
    MutationProbability(f64),
    InsertionDeletionProbability(f64),
    DeletionRatio(f64),
    MutationMode(MutationMode),
    MaxNumberNeurons(usize),
    TimePerStepMs(u64),
    ImmediateSteps(u32),
    PauseBetweenGenerationsMs(u64),
    EastWallFraction(f32),
}

impl Setting {
    /// Write the value into `config` without validating it
    pub fn apply_to(&self, config: &mut Config) {
        match *self {
            Self::Size(v) => config.world.size = v,
            Self::InitialPopulation(v) => config.world.initial_population = v,
            Self::StepsPerGeneration(v) => config.world.steps_per_generation = v,
            Self::InitialGenomeSize(v) => config.genome.initial_genome_size = v,
            Self::MaxGenomeSize(v) => config.genome.max_genome_size = v,
            Self::MutationProbability(v) => config.genome.mutation_probability = v,
            Self::InsertionDeletionProbability(v) => config.genome.insertion_deletion_probability = v,
            Self::DeletionRatio(v) => config.genome.deletion_ratio = v,
            Self::MutationMode(v) => config.genome.mutation_mode = v,
            Self::MaxNumberNeurons(v) => config.neural.max_number_neurons = v,
            Self::TimePerStepMs(v) => config.scheduler.time_per_step_ms = v,
            Self::ImmediateSteps(v) => config.scheduler.immediate_steps = v,
            Self::PauseBetweenGenerationsMs(v) => config.scheduler.pause_between_generations_ms = v,
            Self::EastWallFraction(v) => config.strategies.east_wall_fraction = v,
        }
    }
}

/// Commands sent to the simulation thread
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SimCommand {
    /// Change one configuration scalar
    Set(Setting),
    /// Swap in a named selection method
    SetSelection(String),
    /// Swap in a named population strategy
    SetPopulation(String),
    SetSensors(Vec<SensorName>),
    SetActions(Vec<ActionName>),
    /// Replace the map
    SetObjects(Vec<WorldObject>),
    Pause,
    Resume,
    /// Execute a single tick
    Step,
    /// Reset counters and history and repopulate
    Restart,
    /// Speed multiplier (0.1 - 10.0)
    SetSpeed(f32),
    /// Save to the given file, or through the checkpoint manager when `None`
    SaveCheckpoint(Option<PathBuf>),
    LoadCheckpoint(PathBuf),
    /// Stop the simulation thread
    Shutdown,
}

/// Current simulation state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimState {
    Running,
    Paused,
    Stopped,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setting_apply() {
        let mut config = Config::default();

        Setting::StepsPerGeneration(42).apply_to(&mut config);
        Setting::MutationMode(MutationMode::SingleBit).apply_to(&mut config);
        Setting::EastWallFraction(0.25).apply_to(&mut config);

        assert_eq!(config.world.steps_per_generation, 42);
        assert_eq!(config.genome.mutation_mode, MutationMode::SingleBit);
        assert_eq!(config.strategies.east_wall_fraction, 0.25);
    }

    #[test]
    fn test_command_json() {
        let cmd = SimCommand::Set(Setting::MaxNumberNeurons(3));
        let json = serde_json::to_string(&cmd).unwrap();
        assert_eq!(json, r#"{"Set":{"MaxNumberNeurons":3}}"#);
        assert_eq!(serde_json::from_str::<SimCommand>(&json).unwrap(), cmd);
    }
}
