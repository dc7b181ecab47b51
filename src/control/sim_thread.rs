//! Simulation thread that runs independently from any front end.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, SyncSender, TryRecvError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::checkpoint::{Checkpoint, CheckpointManager};
use crate::events::WorldEvent;
use crate::world::World;

use super::commands::{SimCommand, SimState};
use super::snapshot::WorldSnapshot;

/// Minimum gap between two snapshots while running (~60fps)
const SNAPSHOT_INTERVAL: Duration = Duration::from_millis(16);

/// Undrained events kept for the handle; newer ones are dropped when full
pub const EVENT_BUFFER: usize = 1024;

/// Handle for controlling the simulation thread
pub struct SimulationHandle {
    thread: Option<JoinHandle<()>>,
    command_tx: Sender<SimCommand>,
    snapshot_rx: Receiver<WorldSnapshot>,
    event_rx: Receiver<WorldEvent>,
    /// State as last requested through this handle
    pub state: SimState,
}

impl SimulationHandle {
    /// Move `world` onto a new thread. The simulation starts paused.
    ///
    /// With a checkpoint manager, checkpoints are written every
    /// `interval` generations and once more on shutdown.
    pub fn spawn(mut world: World, checkpoints: Option<CheckpointManager>) -> Self {
        let (command_tx, command_rx) = mpsc::channel();
        let (snapshot_tx, snapshot_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::sync_channel(EVENT_BUFFER);

        world.add_observer(event_tx.clone());

        let thread = thread::spawn(move || {
            let sim = SimulationLoop {
                world,
                checkpoints,
                command_rx,
                snapshot_tx,
                event_tx,
                state: SimState::Paused,
                speed: 1.0,
            };
            sim.run();
        });

        Self {
            thread: Some(thread),
            command_tx,
            snapshot_rx,
            event_rx,
            state: SimState::Paused,
        }
    }

    /// Send a command to the simulation
    pub fn send(&mut self, command: SimCommand) {
        match &command {
            SimCommand::Pause | SimCommand::LoadCheckpoint(_) => self.state = SimState::Paused,
            SimCommand::Resume => self.state = SimState::Running,
            SimCommand::Shutdown => self.state = SimState::Stopped,
            _ => {}
        }
        let _ = self.command_tx.send(command);
    }

    /// Latest snapshot, dropping older ones (non-blocking)
    pub fn try_recv_snapshot(&self) -> Option<WorldSnapshot> {
        let mut latest = None;
        loop {
            match self.snapshot_rx.try_recv() {
                Ok(snapshot) => latest = Some(snapshot),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        latest
    }

    /// Next snapshot in order, waiting up to `timeout`
    pub fn recv_snapshot_timeout(&self, timeout: Duration) -> Option<WorldSnapshot> {
        match self.snapshot_rx.recv_timeout(timeout) {
            Ok(snapshot) => Some(snapshot),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }

    /// Every event emitted since the last call
    pub fn drain_events(&self) -> Vec<WorldEvent> {
        self.event_rx.try_iter().collect()
    }

    /// Next event, waiting up to `timeout`
    pub fn recv_event_timeout(&self, timeout: Duration) -> Option<WorldEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }

    pub fn is_running(&self) -> bool {
        self.state == SimState::Running
    }

    /// Shutdown the simulation thread and wait for it
    pub fn shutdown(&mut self) {
        if let Some(thread) = self.thread.take() {
            self.send(SimCommand::Shutdown);
            let _ = thread.join();
        }
    }

    pub fn save_checkpoint(&mut self) {
        self.send(SimCommand::SaveCheckpoint(None));
    }

    pub fn load_checkpoint<P: Into<std::path::PathBuf>>(&mut self, path: P) {
        self.send(SimCommand::LoadCheckpoint(path.into()));
    }
}

impl Drop for SimulationHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

struct SimulationLoop {
    world: World,
    checkpoints: Option<CheckpointManager>,
    command_rx: Receiver<SimCommand>,
    snapshot_tx: Sender<WorldSnapshot>,
    event_tx: SyncSender<WorldEvent>,
    state: SimState,
    speed: f32,
}

impl SimulationLoop {
    fn run(mut self) {
        self.world.pause();
        self.send_snapshot();

        let mut last_batch = Instant::now();
        let mut last_snapshot = Instant::now();

        loop {
            // Process commands (non-blocking)
            loop {
                match self.command_rx.try_recv() {
                    Ok(SimCommand::Shutdown) => {
                        self.save_managed_checkpoint("Final");
                        return;
                    }
                    Ok(cmd) => self.handle(cmd),
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => return,
                }
            }

            if self.state != SimState::Running {
                thread::sleep(Duration::from_millis(16));
                continue;
            }

            let scheduler = &self.world.config().scheduler;
            let batch_delay = Duration::from_secs_f32(scheduler.time_per_step_ms as f32 / 1000.0 / self.speed);
            let generation_pause = Duration::from_millis(scheduler.pause_between_generations_ms);
            let batch = scheduler.immediate_steps.max(1);

            if last_batch.elapsed() < batch_delay {
                thread::sleep(Duration::from_millis(1));
                continue;
            }

            let generation = self.world.generation();
            for _ in 0..batch {
                self.world.step();
            }
            last_batch = Instant::now();

            if self.world.generation() != generation {
                self.after_generation();
                if !generation_pause.is_zero() {
                    self.send_snapshot();
                    last_snapshot = Instant::now();
                    self.world.pause();
                    thread::sleep(generation_pause);
                    self.world.resume();
                }
            }

            if last_snapshot.elapsed() >= SNAPSHOT_INTERVAL {
                self.send_snapshot();
                last_snapshot = Instant::now();
            }

            thread::yield_now();
        }
    }

    fn handle(&mut self, cmd: SimCommand) {
        match cmd {
            SimCommand::Set(setting) => {
                let mut config = self.world.config().clone();
                setting.apply_to(&mut config);
                self.reconfigure(config);
            }
            SimCommand::SetSelection(name) => {
                if let Err(e) = self.world.set_selection(&name) {
                    log::error!("Selection change rejected: {}", e);
                }
            }
            SimCommand::SetPopulation(name) => {
                if let Err(e) = self.world.set_population(&name) {
                    log::error!("Population change rejected: {}", e);
                }
            }
            SimCommand::SetSensors(sensors) => {
                let mut config = self.world.config().clone();
                config.sensors = sensors;
                self.reconfigure(config);
            }
            SimCommand::SetActions(actions) => {
                let mut config = self.world.config().clone();
                config.actions = actions;
                self.reconfigure(config);
            }
            SimCommand::SetObjects(objects) => {
                let mut config = self.world.config().clone();
                config.objects = objects;
                self.reconfigure(config);
            }
            SimCommand::Pause => {
                self.state = SimState::Paused;
                self.world.pause();
            }
            SimCommand::Resume => {
                self.state = SimState::Running;
                self.world.resume();
            }
            SimCommand::Step => {
                let generation = self.world.generation();
                self.world.step();
                if self.world.generation() != generation {
                    self.after_generation();
                }
            }
            SimCommand::Restart => {
                self.world.restart();
                log::info!("Restarted: population={}", self.world.creatures().len());
            }
            SimCommand::SetSpeed(s) => self.speed = s.clamp(0.1, 10.0),
            SimCommand::SaveCheckpoint(Some(path)) => {
                match self.world.create_checkpoint().save_any(&path) {
                    Ok(()) => log::info!("Checkpoint saved: {}", path.display()),
                    Err(e) => log::error!("Checkpoint save failed: {}", e),
                }
            }
            SimCommand::SaveCheckpoint(None) => self.save_managed_checkpoint("Manual"),
            SimCommand::LoadCheckpoint(path) => self.load_checkpoint(&path),
            SimCommand::Shutdown => {}
        }
        self.send_snapshot();
    }

    fn reconfigure(&mut self, config: crate::config::Config) {
        if let Err(e) = self.world.set_config(config) {
            log::error!("Configuration change rejected: {}", e);
        }
    }

    fn load_checkpoint(&mut self, path: &std::path::Path) {
        let checkpoint = match Checkpoint::load_any(path) {
            Ok(checkpoint) => checkpoint,
            Err(e) => {
                log::error!("Checkpoint load failed: {}", e);
                return;
            }
        };

        log::info!(
            "Loading checkpoint from {}: generation={}, creatures={}",
            path.display(),
            checkpoint.current_generation,
            checkpoint.creature_count()
        );

        match World::from_checkpoint(checkpoint) {
            Ok(mut world) => {
                world.add_observer(self.event_tx.clone());
                self.world = world;
                self.state = SimState::Paused;
                log::info!("Checkpoint loaded successfully");
            }
            Err(e) => log::error!("Checkpoint restore failed: {}", e),
        }
    }

    fn after_generation(&mut self) {
        let generation = self.world.generation();
        let due = self
            .checkpoints
            .as_ref()
            .is_some_and(|mgr| mgr.should_save(generation));
        if due {
            self.save_managed_checkpoint("Auto");
        }
    }

    fn save_managed_checkpoint(&mut self, label: &str) {
        let Some(mgr) = self.checkpoints.as_mut() else {
            log::debug!("{} checkpoint skipped: no checkpoint directory", label);
            return;
        };
        let checkpoint = self.world.create_checkpoint();
        if let Err(e) = mgr.save(&checkpoint) {
            log::warn!("{} checkpoint failed: {}", label, e);
        }
    }

    fn send_snapshot(&self) {
        let _ = self.snapshot_tx.send(WorldSnapshot::from_world(&self.world));
    }
}
