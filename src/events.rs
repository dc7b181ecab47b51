//! World notifications delivered over channels.

use serde::{Deserialize, Serialize};
use std::sync::mpsc::{self, Receiver, Sender, SyncSender, TrySendError};
use std::time::Duration;

/// Outcome of a finished generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationSummary {
    /// Index of the generation that just ended
    pub generation: u32,
    pub survivor_count: usize,
    pub population: usize,
    pub survival_rate: f32,
    pub duration: Duration,
    pub total_time: Duration,
}

/// Something observers may want to react to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WorldEvent {
    TickCompleted { generation: u32, step: u32 },
    GenerationCompleted(GenerationSummary),
    /// Counters, history and population were reset
    Restarted,
}

/// One registered receiver
#[derive(Debug)]
enum Subscriber {
    Unbounded(Sender<WorldEvent>),
    /// Events are dropped while the buffer is full
    Bounded(SyncSender<WorldEvent>),
}

impl Subscriber {
    /// False once the receiving side is gone
    fn deliver(&self, event: WorldEvent) -> bool {
        match self {
            Subscriber::Unbounded(tx) => tx.send(event).is_ok(),
            Subscriber::Bounded(tx) => !matches!(tx.try_send(event), Err(TrySendError::Disconnected(_))),
        }
    }
}

/// Fan-out of events to every live subscriber
#[derive(Debug, Default)]
pub struct Observers {
    subscribers: Vec<Subscriber>,
}

impl Observers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new subscriber with an unbounded queue
    pub fn subscribe(&mut self) -> Receiver<WorldEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(Subscriber::Unbounded(tx));
        rx
    }

    /// Register a subscriber holding at most `capacity` undelivered events
    pub fn subscribe_bounded(&mut self, capacity: usize) -> Receiver<WorldEvent> {
        let (tx, rx) = mpsc::sync_channel(capacity);
        self.subscribers.push(Subscriber::Bounded(tx));
        rx
    }

    /// Register an existing bounded channel
    pub fn add(&mut self, sender: SyncSender<WorldEvent>) {
        self.subscribers.push(Subscriber::Bounded(sender));
    }

    /// Deliver an event. Subscribers whose receiver was dropped are forgotten.
    pub fn emit(&mut self, event: WorldEvent) {
        match self.subscribers.len() {
            0 => {}
            1 => {
                if !self.subscribers[0].deliver(event) {
                    self.subscribers.clear();
                }
            }
            _ => self.subscribers.retain(|s| s.deliver(event.clone())),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}
