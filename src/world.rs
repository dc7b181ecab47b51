//! World simulation engine - tick scheduler and generation lifecycle.

use crate::checkpoint::{Checkpoint, RngState};
use crate::config::Config;
use crate::creature::{ActionName, ActionRegistry, Creature, SensorName, SensorRegistry, Urge};
use crate::error::{Result, SimError};
use crate::events::{GenerationSummary, Observers, WorldEvent};
use crate::genome::MutationConfig;
use crate::grid::{Grid, Point};
use crate::objects::WorldObject;
use crate::population::{self, PopulationStrategy};
use crate::selection::{self, SelectionMethod};
use crate::species::{group_species, Species};
use crate::stats::{GenerationClock, GenerationRecord, GenerationRegistry, GenerationStats};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use std::collections::HashSet;
use std::sync::mpsc::{Receiver, SyncSender};
use std::time::Instant;

/// The simulation world
pub struct World {
    config: Config,

    // Environment
    grid: Grid,
    creatures: Vec<Creature>,
    sensors: SensorRegistry,
    actions: ActionRegistry,

    // Strategies
    selection: Box<dyn SelectionMethod>,
    population: Box<dyn PopulationStrategy>,

    // State
    current_generation: u32,
    current_step: u32,

    // Statistics
    stats: GenerationStats,
    history: GenerationRegistry,
    clock: GenerationClock,

    observers: Observers,

    // Random number generator (seeded for reproducibility)
    rng: ChaCha8Rng,
    seed: u64,
}

impl World {
    /// Create a new world with the given configuration.
    ///
    /// Uses `config.world.seed` when set, otherwise a random seed.
    pub fn new(config: Config) -> Result<Self> {
        let seed = config.world.seed.unwrap_or_else(|| rand::thread_rng().gen());
        Self::new_with_seed(config, seed)
    }

    /// Create a new world with a specific seed for reproducibility
    pub fn new_with_seed(config: Config, seed: u64) -> Result<Self> {
        let mut world = Self::assemble(config, seed, ChaCha8Rng::seed_from_u64(seed))?;
        world.populate_initial();

        log::info!(
            "World created: size={}, population={}, seed={}",
            world.size(),
            world.creatures.len(),
            seed
        );

        Ok(world)
    }

    /// Validate the configuration and build an empty world around it
    fn assemble(config: Config, seed: u64, rng: ChaCha8Rng) -> Result<Self> {
        config.validate()?;

        let grid = build_grid(&config)?;
        let selection = selection::by_name(&config.strategies.selection, &config.strategies)?;
        let population = population::by_name(&config.strategies.population)?;

        Ok(Self {
            sensors: SensorRegistry::from_list(&config.sensors),
            actions: ActionRegistry::from_list(&config.actions),
            grid,
            creatures: Vec::new(),
            selection,
            population,
            current_generation: 0,
            current_step: 0,
            stats: GenerationStats::default(),
            history: GenerationRegistry::new(),
            clock: GenerationClock::start(Instant::now()),
            observers: Observers::new(),
            rng,
            seed,
            config,
        })
    }

    /// Restore world from checkpoint.
    ///
    /// Every brain is recompiled against the saved sensor and action lists.
    /// Living creatures outside the map, on solid cells, or sharing a cell
    /// with an earlier creature are restored dead. The restored world starts paused.
    pub fn from_checkpoint(checkpoint: Checkpoint) -> Result<Self> {
        let rng = checkpoint.rng.restore();
        let mut world = Self::assemble(checkpoint.config, checkpoint.seed, rng)?;

        world.current_generation = checkpoint.current_generation;
        world.current_step = checkpoint.current_step;
        world.stats = checkpoint.stats;
        world.history = checkpoint.history;

        let max_neurons = world.config.neural.max_number_neurons;
        let mut claimed = HashSet::new();
        for species in checkpoint.species {
            for member in species.creatures {
                let mut creature = Creature::new(
                    species.genome.clone(),
                    member.position,
                    &world.sensors,
                    &world.actions,
                    max_neurons,
                );
                creature.last_position = member.last_position;
                creature.last_movement = member.last_movement;
                creature.health = member.health;
                creature.alive = member.alive && world.cell_available(member.position, &claimed);
                if creature.alive {
                    claimed.insert(member.position);
                } else if member.alive {
                    log::warn!("Checkpoint creature at {:?} has no free cell, marked dead", member.position);
                }
                world.creatures.push(creature);
            }
        }

        world.rebuild_occupancy();
        world.clock.pause(Instant::now());

        log::info!(
            "World restored: generation={}, step={}, creatures={}",
            world.current_generation,
            world.current_step,
            world.creatures.len()
        );

        Ok(world)
    }

    /// Snapshot everything needed to resume this run
    pub fn create_checkpoint(&self) -> Checkpoint {
        Checkpoint::new(
            self.config.clone(),
            self.current_generation,
            self.current_step,
            self.stats.clone(),
            self.history.clone(),
            self.species(),
            self.seed,
            RngState::capture(&self.rng),
        )
    }

    /// Run one tick
    pub fn step(&mut self) {
        self.rebuild_occupancy();
        self.apply_area_effects();

        // Sense and think in parallel against the pre-move grid
        let tick_seed = self.rng.next_u64();
        let grid = &self.grid;
        let sensors = &self.sensors;
        let actions = &self.actions;
        let step = self.current_step;
        let steps_per_generation = self.config.world.steps_per_generation;

        let urges: Vec<Option<Urge>> = self
            .creatures
            .par_iter_mut()
            .enumerate()
            .map(|(i, creature)| {
                if !creature.alive {
                    return None;
                }
                let mut rng = ChaCha8Rng::seed_from_u64(tick_seed);
                rng.set_stream(i as u64);
                Some(creature.think(grid, step, steps_per_generation, sensors, actions, &mut rng))
            })
            .collect();

        // Apply moves serially, in creature order
        for (i, urge) in urges.into_iter().enumerate() {
            if let Some(urge) = urge {
                self.apply_move(i, urge);
            }
        }

        self.current_step += 1;
        self.observers.emit(WorldEvent::TickCompleted {
            generation: self.current_generation,
            step: self.current_step,
        });

        if self.current_step > self.config.world.steps_per_generation {
            self.end_generation();
        }
    }

    /// Run `steps` ticks
    pub fn run(&mut self, steps: u64) {
        for _ in 0..steps {
            self.step();
        }
    }

    /// Tick until `count` more generations have finished
    pub fn run_generations(&mut self, count: u32) {
        let target = self.current_generation.saturating_add(count);
        while self.current_generation < target {
            self.step();
        }
    }

    /// Ticks left in the current generation, including the closing one
    pub fn steps_until_generation_end(&self) -> u32 {
        self.config
            .world
            .steps_per_generation
            .saturating_add(1)
            .saturating_sub(self.current_step)
    }

    fn apply_area_effects(&mut self) {
        for creature in &mut self.creatures {
            if !creature.alive {
                continue;
            }
            for &index in self.grid.objects_at(creature.position) {
                if let Some(delta) = self.config.objects[index].health_effect() {
                    if !creature.apply_health(delta) {
                        break;
                    }
                }
            }
            if !creature.alive {
                self.grid.set_creature(creature.position, None);
            }
        }
    }

    fn apply_move(&mut self, index: usize, urge: Urge) {
        let max = self.size() as i32 - 1;
        let creature = &mut self.creatures[index];
        let delta = urge.resolve();

        let mut moved_to = None;
        if delta != Point::default() {
            let target = Point::new(
                (creature.position.x + delta.x).clamp(0, max),
                (creature.position.y + delta.y).clamp(0, max),
            );
            if target != creature.position && !self.grid.is_blocked(target) {
                self.grid.move_creature(creature.position, target, index);
                moved_to = Some(target);
            }
        }

        creature.finish_tick(moved_to);
    }

    fn end_generation(&mut self) {
        let survivors = self.selection.survivors(self);
        let survivor_count = survivors.len();
        let population = self.stats.last_creature_count;
        let survival_rate = if population == 0 {
            0.0
        } else {
            survivor_count as f32 / population as f32
        };

        let mut rng = ChaCha8Rng::seed_from_u64(self.rng.next_u64());
        let next = self.population.populate(self, &survivors, &mut rng);

        let duration = self.clock.lap(Instant::now());
        self.stats.last_survivor_count = survivor_count;
        self.stats.last_survival_rate = survival_rate;
        self.stats.last_generation_duration = duration;
        self.stats.total_time += duration;
        self.history.record(GenerationRecord {
            generation: self.current_generation,
            survivor_count,
            population,
        });

        let summary = GenerationSummary {
            generation: self.current_generation,
            survivor_count,
            population,
            survival_rate,
            duration,
            total_time: self.stats.total_time,
        };

        let interval = self.config.logging.stats_interval.max(1);
        if u64::from(self.current_generation) % interval == 0 {
            log::info!("{}", self.stats.summary(self.current_generation));
        } else {
            log::debug!("{}", self.stats.summary(self.current_generation));
        }

        self.creatures = next;
        self.stats.last_creature_count = self.creatures.len();
        self.current_step = 0;
        self.current_generation += 1;
        self.rebuild_occupancy();

        self.observers.emit(WorldEvent::GenerationCompleted(summary));
    }

    fn populate_initial(&mut self) {
        let mut rng = ChaCha8Rng::seed_from_u64(self.rng.next_u64());
        self.creatures = self.population.populate(self, &[], &mut rng);
        self.stats.last_creature_count = self.creatures.len();
        self.rebuild_occupancy();
    }

    /// Reset counters, statistics and history, then repopulate from scratch
    pub fn restart(&mut self) {
        self.current_generation = 0;
        self.current_step = 0;
        self.stats = GenerationStats::default();
        self.history = GenerationRegistry::new();
        let paused = self.clock.is_paused();
        self.clock = GenerationClock::start(Instant::now());
        if paused {
            self.clock.pause(Instant::now());
        }
        self.creatures.clear();
        self.populate_initial();

        log::info!("World restarted: population={}", self.creatures.len());
        self.observers.emit(WorldEvent::Restarted);
    }

    /// In bounds, not solid and not taken by an earlier creature
    fn cell_available(&self, p: Point, claimed: &HashSet<Point>) -> bool {
        self.grid.in_bounds(p) && !self.grid.is_solid(p) && !claimed.contains(&p)
    }

    /// One write per living creature
    fn rebuild_occupancy(&mut self) {
        self.grid.clear_creatures();
        for (i, creature) in self.creatures.iter().enumerate() {
            if creature.alive {
                self.grid.set_creature(creature.position, Some(i));
            }
        }
    }

    // ---- Pause / resume ----

    /// Stop the generation clock. Pausing twice keeps the first instant.
    pub fn pause(&mut self) {
        self.clock.pause(Instant::now());
    }

    /// Restart the clock, excluding the paused span from the generation time
    pub fn resume(&mut self) {
        self.clock.resume(Instant::now());
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.clock.is_paused()
    }

    // ---- Reconfiguration ----

    /// Replace the configuration.
    ///
    /// Size or population changes restart the run, as does a genome cap
    /// below the longest living genome. Map changes kill creatures
    /// now standing on a solid cell. Sensor, action or neuron cap changes
    /// recompile every brain. On error nothing changes.
    pub fn set_config(&mut self, config: Config) -> Result<()> {
        config.validate()?;
        let grid = build_grid(&config)?;
        let selection = selection::by_name(&config.strategies.selection, &config.strategies)?;
        let population = population::by_name(&config.strategies.population)?;

        let old = std::mem::replace(&mut self.config, config);
        self.selection = selection;
        self.population = population;
        self.sensors = SensorRegistry::from_list(&self.config.sensors);
        self.actions = ActionRegistry::from_list(&self.config.actions);

        let longest_genome = self.creatures.iter().map(|c| c.genome().len()).max().unwrap_or(0);
        let needs_restart = old.world.size != self.config.world.size
            || old.world.initial_population != self.config.world.initial_population
            || longest_genome > self.config.genome.max_genome_size;
        if old.objects != self.config.objects || needs_restart {
            self.grid = grid;
        }

        if needs_restart {
            self.restart();
            return Ok(());
        }

        if old.objects != self.config.objects {
            for creature in &mut self.creatures {
                if self.grid.is_solid(creature.position) {
                    creature.alive = false;
                }
            }
        }

        if old.sensors != self.config.sensors
            || old.actions != self.config.actions
            || old.neural.max_number_neurons != self.config.neural.max_number_neurons
        {
            self.recompile_brains();
        }

        self.rebuild_occupancy();
        Ok(())
    }

    /// Enable exactly the given sensors and recompile every brain
    pub fn set_sensors(&mut self, sensors: &[SensorName]) -> Result<()> {
        let mut config = self.config.clone();
        config.sensors = sensors.to_vec();
        self.set_config(config)
    }

    /// Enable exactly the given actions and recompile every brain
    pub fn set_actions(&mut self, actions: &[ActionName]) -> Result<()> {
        let mut config = self.config.clone();
        config.actions = actions.to_vec();
        self.set_config(config)
    }

    /// Replace the map and rebuild the grid
    pub fn set_objects(&mut self, objects: Vec<WorldObject>) -> Result<()> {
        let mut config = self.config.clone();
        config.objects = objects;
        self.set_config(config)
    }

    /// Swap in a named selection method
    pub fn set_selection(&mut self, name: &str) -> Result<()> {
        let mut config = self.config.clone();
        config.strategies.selection = name.to_string();
        self.set_config(config)
    }

    /// Swap in a named population strategy
    pub fn set_population(&mut self, name: &str) -> Result<()> {
        let mut config = self.config.clone();
        config.strategies.population = name.to_string();
        self.set_config(config)
    }

    fn recompile_brains(&mut self) {
        let max_neurons = self.config.neural.max_number_neurons;
        let sensors = &self.sensors;
        let actions = &self.actions;
        self.creatures
            .par_iter_mut()
            .for_each(|c| c.recompile(sensors, actions, max_neurons));
    }

    // ---- Observers ----

    /// Receive [`WorldEvent`]s from now on
    pub fn subscribe(&mut self) -> Receiver<WorldEvent> {
        self.observers.subscribe()
    }

    /// Deliver [`WorldEvent`]s to an existing bounded channel, dropping
    /// events while it is full
    pub fn add_observer(&mut self, sender: SyncSender<WorldEvent>) {
        self.observers.add(sender);
    }

    // ---- Accessors ----

    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.config.world.size
    }

    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[inline]
    pub fn objects(&self) -> &[WorldObject] {
        &self.config.objects
    }

    #[inline]
    pub fn creatures(&self) -> &[Creature] {
        &self.creatures
    }

    #[inline]
    pub fn sensors(&self) -> &SensorRegistry {
        &self.sensors
    }

    #[inline]
    pub fn actions(&self) -> &ActionRegistry {
        &self.actions
    }

    pub fn mutation_config(&self) -> MutationConfig {
        MutationConfig::from_config(&self.config)
    }

    #[inline]
    pub fn selection_name(&self) -> &'static str {
        self.selection.name()
    }

    #[inline]
    pub fn population_name(&self) -> &'static str {
        self.population.name()
    }

    #[inline]
    pub fn generation(&self) -> u32 {
        self.current_generation
    }

    #[inline]
    pub fn current_step(&self) -> u32 {
        self.current_step
    }

    #[inline]
    pub fn stats(&self) -> &GenerationStats {
        &self.stats
    }

    #[inline]
    pub fn history(&self) -> &GenerationRegistry {
        &self.history
    }

    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Creatures still alive this generation
    pub fn living_count(&self) -> usize {
        self.creatures.iter().filter(|c| c.alive).count()
    }

    /// Grid cells currently holding a creature
    pub fn occupied_cells(&self) -> usize {
        self.grid.occupied_count()
    }

    /// Creatures grouped by genome, largest group first
    pub fn species(&self) -> Vec<Species> {
        group_species(&self.creatures)
    }
}

/// Grid with the configured map, rejecting maps without room for the population
fn build_grid(config: &Config) -> Result<Grid> {
    let mut grid = Grid::new(config.world.size);
    grid.rebuild_objects(&config.objects);

    let open = grid.open_cells().len();
    if open < config.world.initial_population {
        return Err(SimError::config(format!(
            "initial_population ({}) exceeds the {} cells not covered by obstacles",
            config.world.initial_population, open
        )));
    }

    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::{ObjectKind, Shape};
    use crate::species::SpeciesMember;

    fn small_world(seed: u64) -> World {
        World::new_with_seed(Config::small(12, 20), seed).unwrap()
    }

    fn assert_grid_consistent(world: &World) {
        assert_eq!(world.occupied_cells(), world.living_count());
        let cells: HashSet<Point> = world
            .creatures()
            .iter()
            .filter(|c| c.alive)
            .map(|c| c.position)
            .collect();
        assert_eq!(cells.len(), world.living_count());
        for (i, c) in world.creatures().iter().enumerate() {
            if c.alive {
                assert_eq!(world.grid().creature_at(c.position), Some(i));
                assert!(!world.grid().is_solid(c.position));
            }
        }
    }

    #[test]
    fn test_world_creation() {
        let world = small_world(1);
        assert_eq!(world.creatures().len(), 20);
        assert_eq!(world.generation(), 0);
        assert_eq!(world.current_step(), 0);
        assert_grid_consistent(&world);
    }

    #[test]
    fn test_population_too_large() {
        let mut config = Config::small(5, 10);
        config.world.initial_population = 25;
        assert!(matches!(World::new(config), Err(SimError::InvalidConfig(_))));
    }

    #[test]
    fn test_population_exceeds_open_cells() {
        let mut config = Config::small(10, 60);
        config.objects = vec![WorldObject::new(
            Shape::rectangle(0.0, 0.0, 0.5, 1.0),
            ObjectKind::obstacle(),
        )];
        assert!(matches!(
            World::new_with_seed(config, 0),
            Err(SimError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_unknown_strategy_rejected() {
        let mut config = Config::small(10, 5);
        config.strategies.selection = "Nope".to_string();
        assert!(matches!(
            World::new_with_seed(config, 0),
            Err(SimError::UnknownStrategy(_))
        ));
    }

    #[test]
    fn test_deterministic_with_seed() {
        let mut a = small_world(99);
        let mut b = small_world(99);

        a.run(37);
        b.run(37);

        let pa: Vec<Point> = a.creatures().iter().map(|c| c.position).collect();
        let pb: Vec<Point> = b.creatures().iter().map(|c| c.position).collect();
        assert_eq!(pa, pb);
        assert_eq!(a.generation(), b.generation());
    }

    #[test]
    fn test_grid_invariant_holds_every_tick() {
        let mut config = Config::small(12, 40);
        config.objects = vec![
            WorldObject::new(Shape::rectangle(0.4, 0.4, 0.2, 0.2), ObjectKind::obstacle()),
            WorldObject::new(
                Shape::ellipse(0.0, 0.0, 0.5, 0.5),
                ObjectKind::HealthArea { health: -30.0 },
            ),
        ];
        let mut world = World::new_with_seed(config, 5).unwrap();

        for _ in 0..40 {
            world.step();
            assert_grid_consistent(&world);
        }
    }

    #[test]
    fn test_generation_boundary() {
        let mut world = small_world(3);
        let spg = world.config().world.steps_per_generation;

        world.run(spg as u64);
        assert_eq!(world.generation(), 0);
        assert_eq!(world.current_step(), spg);

        world.step();
        assert_eq!(world.generation(), 1);
        assert_eq!(world.current_step(), 0);
        assert_eq!(world.history().len(), 1);
        assert_eq!(world.creatures().len(), 20);
    }

    #[test]
    fn test_events_emitted() {
        let mut world = small_world(4);
        let events = world.subscribe();

        world.run_generations(1);

        let received: Vec<WorldEvent> = events.try_iter().collect();
        let ticks = received
            .iter()
            .filter(|e| matches!(e, WorldEvent::TickCompleted { .. }))
            .count();
        assert_eq!(ticks as u32, world.config().world.steps_per_generation + 1);
        assert!(matches!(
            received.last(),
            Some(WorldEvent::GenerationCompleted(GenerationSummary { generation: 0, .. }))
        ));
    }

    #[test]
    fn test_health_area_kills() {
        let mut config = Config::small(10, 30);
        config.objects = vec![WorldObject::new(
            Shape::rectangle(0.0, 0.0, 1.0, 1.0),
            ObjectKind::HealthArea { health: -60.0 },
        )];
        let mut world = World::new_with_seed(config, 6).unwrap();

        world.step();
        assert_eq!(world.living_count(), 30);
        assert!(world.creatures().iter().all(|c| c.health == 40.0));

        world.step();
        assert_eq!(world.living_count(), 0);
        assert_eq!(world.occupied_cells(), 0);
    }

    #[test]
    fn test_healing_is_capped() {
        let mut config = Config::small(10, 10);
        config.objects = vec![WorldObject::new(
            Shape::rectangle(0.0, 0.0, 1.0, 1.0),
            ObjectKind::HealthArea { health: 25.0 },
        )];
        let mut world = World::new_with_seed(config, 7).unwrap();

        world.run(3);
        assert!(world.creatures().iter().all(|c| c.health == crate::creature::MAX_HEALTH));
    }

    #[test]
    fn test_pause_resume() {
        let mut world = small_world(8);
        assert!(!world.is_paused());

        world.pause();
        assert!(world.is_paused());
        world.resume();
        assert!(!world.is_paused());
    }

    #[test]
    fn test_restart_resets_counters() {
        let mut world = small_world(9);
        world.run_generations(2);
        assert_eq!(world.history().len(), 2);

        world.restart();

        assert_eq!(world.generation(), 0);
        assert_eq!(world.current_step(), 0);
        assert!(world.history().is_empty());
        assert_eq!(world.creatures().len(), 20);
        assert_grid_consistent(&world);
    }

    #[test]
    fn test_set_sensors_recompiles() {
        let mut world = small_world(10);
        world.set_sensors(&[SensorName::Age, SensorName::Touch]).unwrap();

        assert_eq!(world.sensors().neuron_count(), 5);
        assert!(world.creatures().iter().all(|c| c.brain().sensor_count() == 5));
        assert_eq!(world.config().sensors, vec![SensorName::Age, SensorName::Touch]);
    }

    #[test]
    fn test_set_actions_recompiles() {
        let mut world = small_world(11);
        world.set_actions(&[ActionName::MoveEast]).unwrap();

        assert!(world.creatures().iter().all(|c| c.brain().action_count() == 1));
    }

    #[test]
    fn test_set_objects_kills_creatures_on_walls() {
        let mut world = small_world(12);
        world
            .set_objects(vec![WorldObject::new(
                Shape::rectangle(0.0, 0.0, 0.5, 1.0),
                ObjectKind::obstacle(),
            )])
            .unwrap();

        assert!(world
            .creatures()
            .iter()
            .filter(|c| c.position.x < 6)
            .all(|c| !c.alive));
        assert_grid_consistent(&world);
    }

    #[test]
    fn test_invalid_reconfiguration_keeps_state() {
        let mut world = small_world(13);
        let before = world.config().clone();

        assert!(world.set_selection("Nope").is_err());
        assert_eq!(world.config(), &before);
        assert_eq!(world.selection_name(), "InsideReproductionArea");

        world.set_selection("Alive").unwrap();
        assert_eq!(world.selection_name(), "Alive");
    }

    #[test]
    fn test_resize_restarts() {
        let mut world = small_world(14);
        world.run(5);

        let mut config = world.config().clone();
        config.world.size = 20;
        config.world.initial_population = 50;
        world.set_config(config).unwrap();

        assert_eq!(world.size(), 20);
        assert_eq!(world.creatures().len(), 50);
        assert_eq!(world.current_step(), 0);
        assert_eq!(world.grid().size(), 20);
    }

    #[test]
    fn test_restore_rejects_shared_and_solid_cells() {
        let mut config = Config::small(12, 20);
        config.objects = vec![WorldObject::new(Shape::rectangle(0.0, 0.0, 0.25, 1.0), ObjectKind::obstacle())];
        let mut world = World::new_with_seed(config, 15).unwrap();
        world.run(3);
        assert!(world.grid().is_solid(Point::new(0, 0)));

        let mut checkpoint = world.create_checkpoint();
        let taken = checkpoint.species[0]
            .creatures
            .iter()
            .find(|m| m.alive)
            .map(|m| m.position)
            .unwrap();
        checkpoint.species[0].creatures.push(SpeciesMember::at(taken));
        checkpoint.species[0].creatures.push(SpeciesMember::at(Point::new(0, 0)));

        let restored = World::from_checkpoint(checkpoint).unwrap();

        assert_eq!(restored.creatures().len(), world.creatures().len() + 2);
        assert_eq!(restored.living_count(), world.living_count());
        assert_grid_consistent(&restored);
    }

    #[test]
    fn test_longest_generation_does_not_overflow() {
        let mut config = Config::small(12, 20);
        config.world.steps_per_generation = u32::MAX;
        let world = World::new_with_seed(config, 16).unwrap();

        assert_eq!(world.steps_until_generation_end(), u32::MAX);
    }

    #[test]
    fn test_shrinking_genome_cap_restarts() {
        let mut world = small_world(17);
        world.run(15);
        assert_eq!(world.generation(), 1);

        let mut config = world.config().clone();
        config.genome.initial_genome_size = 2;
        config.genome.max_genome_size = 2;
        world.set_config(config).unwrap();

        assert_eq!(world.generation(), 0);
        assert_eq!(world.creatures().len(), 20);
        assert!(world.creatures().iter().all(|c| c.genome().len() <= 2));
        assert_grid_consistent(&world);

        // Caps that still fit every genome keep the run going
        world.run(3);
        let mut config = world.config().clone();
        config.genome.max_genome_size = 6;
        world.set_config(config).unwrap();
        assert_eq!(world.current_step(), 3);
    }
}
