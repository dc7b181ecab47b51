//! Creature state and per-tick sense/think.

mod actions;
mod sensors;

pub use actions::{ActionName, ActionRegistry, Urge};
pub use sensors::{SenseInput, SensorName, SensorRegistry};

use crate::genome::Genome;
use crate::grid::{Grid, Point};
use crate::neural::Brain;
use rand::Rng;

/// Health every creature is born with, and the upper bound
pub const MAX_HEALTH: f32 = 100.0;

/// A creature in the simulation
#[derive(Clone, Debug)]
pub struct Creature {
    genome: Genome,
    brain: Brain,

    pub position: Point,
    pub last_position: Point,
    /// Step taken by the last successful move
    pub last_movement: Point,

    pub health: f32,
    pub alive: bool,
}

impl Creature {
    /// Create a creature and compile its brain against the current registries
    pub fn new(
        genome: Genome,
        position: Point,
        sensors: &SensorRegistry,
        actions: &ActionRegistry,
        max_neurons: usize,
    ) -> Self {
        let brain = Brain::compile(
            &genome,
            sensors.neuron_count(),
            actions.neuron_count(),
            max_neurons,
        );
        Self {
            genome,
            brain,
            position,
            last_position: position,
            last_movement: Point::default(),
            health: MAX_HEALTH,
            alive: true,
        }
    }

    #[inline]
    pub fn genome(&self) -> &Genome {
        &self.genome
    }

    #[inline]
    pub fn brain(&self) -> &Brain {
        &self.brain
    }

    /// Rebuild the brain after the enabled sensors or actions changed
    pub fn recompile(&mut self, sensors: &SensorRegistry, actions: &ActionRegistry, max_neurons: usize) {
        self.brain = Brain::compile(
            &self.genome,
            sensors.neuron_count(),
            actions.neuron_count(),
            max_neurons,
        );
    }

    /// Apply an area's health change. Returns whether the creature is still alive.
    pub fn apply_health(&mut self, delta: f32) -> bool {
        self.health = (self.health + delta).min(MAX_HEALTH);
        if self.health <= 0.0 {
            self.alive = false;
        }
        self.alive
    }

    /// Sense the grid, evaluate the brain and return the movement urge.
    ///
    /// Only reads the grid; the caller applies the move.
    pub fn think<R: Rng + ?Sized>(
        &mut self,
        grid: &Grid,
        step: u32,
        steps_per_generation: u32,
        sensors: &SensorRegistry,
        actions: &ActionRegistry,
        rng: &mut R,
    ) -> Urge {
        let input = SenseInput {
            grid,
            position: self.position,
            last_position: self.last_position,
            health: self.health,
            step,
            steps_per_generation,
        };

        let mut values = Vec::with_capacity(self.brain.sensor_count());
        sensors.sense(&input, rng, &mut values);
        let outputs = self.brain.evaluate(&values);

        actions.urge(&outputs, self.last_movement, rng)
    }

    /// Record a completed tick's movement
    #[inline]
    pub fn finish_tick(&mut self, moved_to: Option<Point>) {
        self.last_position = self.position;
        if let Some(target) = moved_to {
            self.last_movement = Point::new(target.x - self.position.x, target.y - self.position.y);
            self.position = target;
        }
    }

    /// Display colour derived from the genome
    #[inline]
    pub fn color(&self) -> [u8; 3] {
        self.genome.color()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome::{Gene, SinkKind, SourceKind};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn east_walker() -> Genome {
        // Constant drive: the horizontal border distance at the centre is 1.0
        Genome::from_genes(vec![Gene::new(
            SourceKind::Sensor,
            0,
            SinkKind::Action,
            0,
            3.0,
        )])
        .unwrap()
    }

    #[test]
    fn test_new_creature() {
        let sensors = SensorRegistry::default();
        let actions = ActionRegistry::default();
        let creature = Creature::new(east_walker(), Point::new(1, 2), &sensors, &actions, 5);

        assert!(creature.alive);
        assert_eq!(creature.health, MAX_HEALTH);
        assert_eq!(creature.last_position, creature.position);
        assert_eq!(creature.brain().sensor_count(), 10);
        assert_eq!(creature.brain().action_count(), 6);
    }

    #[test]
    fn test_health_is_capped_and_kills() {
        let sensors = SensorRegistry::default();
        let actions = ActionRegistry::default();
        let mut creature = Creature::new(east_walker(), Point::new(0, 0), &sensors, &actions, 5);

        assert!(creature.apply_health(50.0));
        assert_eq!(creature.health, MAX_HEALTH);

        assert!(creature.apply_health(-60.0));
        assert!(!creature.apply_health(-40.0));
        assert!(!creature.alive);
    }

    #[test]
    fn test_think_produces_urge() {
        let grid = Grid::new(10);
        let sensors = SensorRegistry::from_list(&[SensorName::HorizontalBorderDistance]);
        let actions = ActionRegistry::from_list(&[ActionName::MoveEast]);
        let mut creature = Creature::new(east_walker(), Point::new(5, 5), &sensors, &actions, 0);
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        let urge = creature.think(&grid, 0, 10, &sensors, &actions, &mut rng);

        assert!((urge.x - 3.0f32.tanh()).abs() < 1e-3);
        assert_eq!(urge.resolve(), Point::new(1, 0));
    }

    #[test]
    fn test_finish_tick_tracks_movement() {
        let sensors = SensorRegistry::default();
        let actions = ActionRegistry::default();
        let mut creature = Creature::new(east_walker(), Point::new(3, 3), &sensors, &actions, 5);

        creature.finish_tick(Some(Point::new(4, 2)));
        assert_eq!(creature.position, Point::new(4, 2));
        assert_eq!(creature.last_position, Point::new(3, 3));
        assert_eq!(creature.last_movement, Point::new(1, -1));

        // A blocked tick keeps the last movement
        creature.finish_tick(None);
        assert_eq!(creature.last_position, Point::new(4, 2));
        assert_eq!(creature.last_movement, Point::new(1, -1));
    }

    #[test]
    fn test_recompile_follows_registries() {
        let mut sensors = SensorRegistry::default();
        let actions = ActionRegistry::default();
        let mut creature = Creature::new(east_walker(), Point::new(0, 0), &sensors, &actions, 5);

        sensors.load_from_list(&[SensorName::Age]);
        creature.recompile(&sensors, &actions, 5);

        assert_eq!(creature.brain().sensor_count(), 1);
    }
}
