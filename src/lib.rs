//! # NEUROGRID
//!
//! Grid-world neuro-evolution sandbox. Every creature carries a genome of
//! packed 32-bit genes that compiles into a small recurrent brain. Brains
//! read sensors, drive movement actions, and at the end of each generation
//! a selection rule picks the survivors whose genomes seed the next one.
//!
//! ## Features
//!
//! - **Parallel**: brains are evaluated across all CPU cores via Rayon
//! - **Deterministic**: seeded ChaCha streams, independent of thread scheduling
//! - **Configurable**: YAML configuration files
//! - **Resumable**: binary and JSON checkpoints
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use neurogrid::{Config, World};
//!
//! let mut world = World::new(Config::default()).unwrap();
//!
//! // Run five generations
//! world.run_generations(5);
//!
//! println!("Generation: {}", world.generation());
//! println!("Last survival rate: {:.2}", world.stats().last_survival_rate);
//! ```
//!
//! ## Configuration
//!
//! ```rust
//! use neurogrid::Config;
//!
//! let mut config = Config::default();
//! config.world.initial_population = 200;
//! config.genome.mutation_probability = 0.1;
//! assert!(config.validate().is_ok());
//! ```
//!
//! ## Checkpoints
//!
//! ```rust,no_run
//! use neurogrid::{Config, World};
//! use neurogrid::checkpoint::Checkpoint;
//!
//! let mut world = World::new(Config::default()).unwrap();
//! world.run(1000);
//!
//! world.create_checkpoint().save("checkpoint.bin").unwrap();
//!
//! let loaded = Checkpoint::load("checkpoint.bin").unwrap();
//! let mut restored = World::from_checkpoint(loaded).unwrap();
//! restored.resume();
//! ```

pub mod checkpoint;
pub mod config;
pub mod control;
pub mod creature;
pub mod error;
pub mod events;
pub mod genome;
pub mod grid;
pub mod neural;
pub mod objects;
pub mod population;
pub mod selection;
pub mod species;
pub mod stats;
pub mod world;

// Re-export main types
pub use config::Config;
pub use creature::{ActionName, Creature, SensorName};
pub use error::{Result, SimError};
pub use events::WorldEvent;
pub use genome::{Gene, Genome};
pub use world::World;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Run a quick benchmark on the default map
pub fn benchmark(steps: u64, population: usize) -> Result<BenchmarkResult> {
    use std::time::Instant;

    let mut config = Config::default();
    config.world.initial_population = population;

    let mut world = World::new(config)?;

    let start = Instant::now();
    world.run(steps);
    let elapsed = start.elapsed();

    Ok(BenchmarkResult {
        steps,
        population,
        living: world.living_count(),
        elapsed_secs: elapsed.as_secs_f64(),
        steps_per_second: steps as f64 / elapsed.as_secs_f64(),
        generations: world.generation(),
    })
}

/// Benchmark result
#[derive(Debug, Clone)]
pub struct BenchmarkResult {
    pub steps: u64,
    pub population: usize,
    pub living: usize,
    pub elapsed_secs: f64,
    pub steps_per_second: f64,
    pub generations: u32,
}

impl std::fmt::Display for BenchmarkResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Benchmark Results ===")?;
        writeln!(f, "Steps: {}", self.steps)?;
        writeln!(f, "Population: {} ({} alive)", self.population, self.living)?;
        writeln!(f, "Time: {:.3}s", self.elapsed_secs)?;
        writeln!(f, "Speed: {:.1} steps/s", self.steps_per_second)?;
        writeln!(f, "Generations: {}", self.generations)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_quick_simulation() {
        let mut world = World::new(Config::small(20, 30)).unwrap();

        world.run(25);

        assert_eq!(world.generation(), 2);
        assert_eq!(world.current_step(), 3);
    }

    #[test]
    fn test_benchmark() {
        let result = benchmark(50, 100).unwrap();

        assert_eq!(result.steps, 50);
        assert_eq!(result.population, 100);
        assert!(result.steps_per_second > 0.0);
    }
}
