//! Neural module for creature brains.
//!
//! A [`Brain`] is compiled once from a genome and the enabled sensor and
//! action counts, then evaluated every tick:
//! - duplicate edges collapse (last gene wins)
//! - neurons without a path to an action are pruned
//! - neurons are ordered by strongly connected component, so feed-forward
//!   edges see this tick's values and edges inside a loop see last tick's

mod brain;
mod graph;

pub use brain::{Brain, Connection, Sink, Source};
