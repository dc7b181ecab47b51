//! Strategies that build the next generation from the survivors.

use crate::creature::Creature;
use crate::error::{Result, SimError};
use crate::genome::Genome;
use crate::grid::Point;
use crate::world::World;
use rand::seq::SliceRandom;
use rand::{Rng, RngCore};
use std::fmt;
use std::num::NonZeroUsize;

/// Produces a fresh creature list for the next generation
pub trait PopulationStrategy: fmt::Debug + Send + Sync {
    fn name(&self) -> &'static str;

    /// New creatures, at most `initial_population` of them.
    ///
    /// `survivors` is only read. Placement uses the world's open cells and
    /// ignores the creatures of the ending generation.
    fn populate(&self, world: &World, survivors: &[Creature], rng: &mut dyn RngCore) -> Vec<Creature>;
}

/// Each child clones a random survivor's genome and mutates it.
/// With no survivors, a fresh random genome is mutated instead.
#[derive(Debug, Clone, Copy, Default)]
pub struct AsexualRandom;

impl PopulationStrategy for AsexualRandom {
    fn name(&self) -> &'static str {
        "AsexualRandom"
    }

    fn populate(&self, world: &World, survivors: &[Creature], rng: &mut dyn RngCore) -> Vec<Creature> {
        let config = world.config();
        let mutation = world.mutation_config();
        let open = world.grid().open_cells();

        let cells: Vec<Point> = open
            .choose_multiple(rng, config.world.initial_population)
            .copied()
            .collect();
        if cells.len() < config.world.initial_population {
            log::warn!(
                "Only {} open cells for a population of {}",
                cells.len(),
                config.world.initial_population
            );
        }

        let fresh_length = NonZeroUsize::new(config.genome.initial_genome_size).unwrap_or(NonZeroUsize::MIN);
        let mut creatures = Vec::with_capacity(cells.len());

        for position in cells {
            let genome = if survivors.is_empty() {
                Genome::random_non_empty(fresh_length, rng).mutate(&mutation, rng)
            } else {
                let parent = &survivors[rng.gen_range(0..survivors.len())];
                parent.genome().mutate(&mutation, rng)
            };

            creatures.push(Creature::new(
                genome,
                position,
                world.sensors(),
                world.actions(),
                config.neural.max_number_neurons,
            ));
        }

        creatures
    }
}

/// Names accepted by [`by_name`]
pub const NAMES: [&str; 1] = ["AsexualRandom"];

/// Build a population strategy from its name
pub fn by_name(name: &str) -> Result<Box<dyn PopulationStrategy>> {
    match name {
        "AsexualRandom" => Ok(Box::new(AsexualRandom)),
        other => Err(SimError::UnknownStrategy(other.to_string())),
    }
}
