//! Survival rules applied at the end of each generation.

use crate::config::StrategyConfig;
use crate::creature::Creature;
use crate::error::{Result, SimError};
use crate::world::World;
use std::fmt;

/// Decides which creatures pass their genome on
pub trait SelectionMethod: fmt::Debug + Send + Sync {
    fn name(&self) -> &'static str;

    /// Copies of the surviving creatures. The world is not modified.
    fn survivors(&self, world: &World) -> Vec<Creature>;
}

/// Survivors stand on a reproduction area
#[derive(Debug, Clone, Copy, Default)]
pub struct InsideReproductionArea;

impl SelectionMethod for InsideReproductionArea {
    fn name(&self) -> &'static str {
        "InsideReproductionArea"
    }

    fn survivors(&self, world: &World) -> Vec<Creature> {
        let objects = &world.config().objects;
        world
            .creatures()
            .iter()
            .filter(|c| c.alive)
            .filter(|c| {
                world
                    .grid()
                    .objects_at(c.position)
                    .iter()
                    .any(|&i| objects[i].is_reproduction_area())
            })
            .cloned()
            .collect()
    }
}

/// Survivors reached the eastern strip of the world
#[derive(Debug, Clone, Copy)]
pub struct EastWall {
    /// Width of the strip as a share of the world size
    pub fraction: f32,
}

impl Default for EastWall {
    fn default() -> Self {
        Self { fraction: 0.1 }
    }
}

impl SelectionMethod for EastWall {
    fn name(&self) -> &'static str {
        "EastWall"
    }

    fn survivors(&self, world: &World) -> Vec<Creature> {
        let threshold = world.size() as f32 * (1.0 - self.fraction);
        world
            .creatures()
            .iter()
            .filter(|c| c.alive && c.position.x as f32 >= threshold)
            .cloned()
            .collect()
    }
}

/// Every living creature survives
#[derive(Debug, Clone, Copy, Default)]
pub struct Alive;

impl SelectionMethod for Alive {
    fn name(&self) -> &'static str {
        "Alive"
    }

    fn survivors(&self, world: &World) -> Vec<Creature> {
        world.creatures().iter().filter(|c| c.alive).cloned().collect()
    }
}

/// Names accepted by [`by_name`]
pub const NAMES: [&str; 3] = ["InsideReproductionArea", "EastWall", "Alive"];

/// Build a selection method from its name
pub fn by_name(name: &str, config: &StrategyConfig) -> Result<Box<dyn SelectionMethod>> {
    match name {
        "InsideReproductionArea" => Ok(Box::new(InsideReproductionArea)),
        "EastWall" => Ok(Box::new(EastWall {
            fraction: config.east_wall_fraction,
        })),
        "Alive" => Ok(Box::new(Alive)),
        other => Err(SimError::UnknownStrategy(other.to_string())),
    }
}
