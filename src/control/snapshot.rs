//! Snapshot structures for renderers.
//!
//! These are lightweight copies of simulation state, cheap to send
//! between the simulation thread and whoever draws it.

use crate::grid::Point;
use crate::objects::Color;
use crate::stats::GenerationStats;
use crate::world::World;

/// Lightweight view of a creature for rendering
#[derive(Clone, Debug, PartialEq)]
pub struct CreatureView {
    pub position: Point,
    pub health: f32,
    pub alive: bool,
    /// Colour key derived from the genome
    pub color: Color,
}

/// Cells covered by one object
#[derive(Clone, Debug, PartialEq)]
pub struct ObjectView {
    pub cells: Vec<Point>,
    pub color: Color,
    pub solid: bool,
}

/// Complete world snapshot for rendering
#[derive(Clone, Debug)]
pub struct WorldSnapshot {
    /// Grid dimension
    pub size: usize,
    pub generation: u32,
    pub step: u32,
    pub steps_per_generation: u32,
    pub paused: bool,
    pub creatures: Vec<CreatureView>,
    pub objects: Vec<ObjectView>,
    pub stats: GenerationStats,
}

impl WorldSnapshot {
    /// Create a snapshot from the current world state
    pub fn from_world(world: &World) -> Self {
        let size = world.size();

        let creatures = world
            .creatures()
            .iter()
            .map(|c| CreatureView {
                position: c.position,
                health: c.health,
                alive: c.alive,
                color: c.color(),
            })
            .collect();

        let objects = world
            .objects()
            .iter()
            .map(|o| ObjectView {
                cells: o.cells(size),
                color: o.color(),
                solid: o.is_solid(),
            })
            .collect();

        Self {
            size,
            generation: world.generation(),
            step: world.current_step(),
            steps_per_generation: world.config().world.steps_per_generation,
            paused: world.is_paused(),
            creatures,
            objects,
            stats: world.stats().clone(),
        }
    }

    /// Creatures still alive
    pub fn living(&self) -> impl Iterator<Item = &CreatureView> {
        self.creatures.iter().filter(|c| c.alive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::objects::{ObjectKind, Shape, WorldObject};

    #[test]
    fn test_snapshot_contents() {
        let mut config = Config::small(10, 8);
        config.objects = vec![WorldObject::new(
            Shape::rectangle(0.0, 0.0, 0.2, 0.2),
            ObjectKind::obstacle(),
        )];
        let world = World::new_with_seed(config, 1).unwrap();

        let snapshot = WorldSnapshot::from_world(&world);

        assert_eq!(snapshot.size, 10);
        assert_eq!(snapshot.creatures.len(), 8);
        assert_eq!(snapshot.living().count(), 8);
        assert_eq!(snapshot.objects.len(), 1);
        assert_eq!(snapshot.objects[0].cells.len(), 4);
        assert!(snapshot.objects[0].solid);
        assert_eq!(snapshot.creatures[0].color, world.creatures()[0].color());
    }
}
