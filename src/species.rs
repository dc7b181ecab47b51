//! Grouping of creatures by identical genome.

use crate::creature::{Creature, MAX_HEALTH};
use crate::genome::Genome;
use crate::grid::Point;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Per-creature state stored alongside its species' genome
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpeciesMember {
    pub position: Point,
    pub last_position: Point,
    pub last_movement: Point,
    pub health: f32,
    pub alive: bool,
}

impl SpeciesMember {
    /// Living member at full health standing still at `position`
    pub fn at(position: Point) -> Self {
        Self {
            position,
            last_position: position,
            last_movement: Point::default(),
            health: MAX_HEALTH,
            alive: true,
        }
    }
}

impl From<&Creature> for SpeciesMember {
    fn from(c: &Creature) -> Self {
        Self {
            position: c.position,
            last_position: c.last_position,
            last_movement: c.last_movement,
            health: c.health,
            alive: c.alive,
        }
    }
}

/// Creatures sharing one genome
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Species {
    pub genome: Genome,
    pub creatures: Vec<SpeciesMember>,
}

impl Species {
    #[inline]
    pub fn len(&self) -> usize {
        self.creatures.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.creatures.is_empty()
    }

    /// Members still alive
    pub fn living(&self) -> usize {
        self.creatures.iter().filter(|c| c.alive).count()
    }
}

/// Group creatures by genome, largest species first.
///
/// Ties keep the order in which each species first appears.
pub fn group_species(creatures: &[Creature]) -> Vec<Species> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut species: Vec<Species> = Vec::new();

    for creature in creatures {
        let key = creature.genome().comparable_key();
        let slot = *index.entry(key).or_insert_with(|| {
            species.push(Species {
                genome: creature.genome().clone(),
                creatures: Vec::new(),
            });
            species.len() - 1
        });
        species[slot].creatures.push(SpeciesMember::from(creature));
    }

    // Stable sort keeps first-appearance order among equal counts
    species.sort_by(|a, b| b.len().cmp(&a.len()));
    species
}
