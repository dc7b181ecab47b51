//! Running a world on its own thread.
//!
//! A front end sends [`SimCommand`]s through a [`SimulationHandle`] and gets
//! [`WorldSnapshot`]s and [`WorldEvent`](crate::events::WorldEvent)s back.

mod commands;
mod sim_thread;
mod snapshot;

pub use commands::{Setting, SimCommand, SimState};
pub use sim_thread::SimulationHandle;
pub use snapshot::{CreatureView, ObjectView, WorldSnapshot};
