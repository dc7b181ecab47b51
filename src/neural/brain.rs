//! Genome → neural graph compiler and per-tick evaluator.

use super::graph::{reaches_any, strongly_connected};
use crate::genome::{Genome, SinkKind, SourceKind};
use std::collections::HashMap;

/// Start of a compiled connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Source {
    Sensor(usize),
    /// Compact index into the surviving internal neurons
    Neuron(usize),
}

/// End of a compiled connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sink {
    /// Compact index into the surviving internal neurons
    Neuron(usize),
    Action(usize),
}

/// One surviving edge of the network
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Connection {
    pub source: Source,
    pub sink: Sink,
    pub weight: f32,
    /// Reads the source's output from the previous tick (edge inside a cycle)
    pub delayed: bool,
}

#[derive(Debug, Clone)]
struct Component {
    neurons: Vec<usize>,
    cyclic: bool,
}

/// Compiled, pruned, cycle-aware network.
///
/// Topology is fixed at compile time. The only mutable part is the stored
/// output of each internal neuron, which feeds delayed edges on the next tick.
#[derive(Debug, Clone)]
pub struct Brain {
    sensor_count: usize,
    action_count: usize,
    connections: Vec<Connection>,
    /// Original (pre-pruning) index of each surviving neuron
    neuron_ids: Vec<usize>,
    neuron_inputs: Vec<Vec<usize>>,
    action_inputs: Vec<Vec<usize>>,
    order: Vec<Component>,
    state: Vec<f32>,
    scratch: Vec<f32>,
}

impl Brain {
    /// Compile a genome against the currently enabled sensor outputs and actions.
    ///
    /// Gene indices wrap modulo the relevant count. Genes that point at a kind
    /// with zero members (no sensors, no actions, no internal neurons) are skipped.
    pub fn compile(
        genome: &Genome,
        sensor_count: usize,
        action_count: usize,
        max_internal: usize,
    ) -> Self {
        // Decode and collapse duplicate edges, last gene wins
        let mut raw_edges: Vec<(Source, Sink, f32)> = Vec::with_capacity(genome.len());
        let mut positions: HashMap<(Source, Sink), usize> = HashMap::new();

        for gene in genome.genes() {
            let source = match gene.source_kind() {
                SourceKind::Sensor if sensor_count > 0 => {
                    Source::Sensor(gene.source_index() % sensor_count)
                }
                SourceKind::Neuron if max_internal > 0 => {
                    Source::Neuron(gene.source_index() % max_internal)
                }
                _ => continue,
            };
            let sink = match gene.sink_kind() {
                SinkKind::Neuron if max_internal > 0 => Sink::Neuron(gene.sink_index() % max_internal),
                SinkKind::Action if action_count > 0 => Sink::Action(gene.sink_index() % action_count),
                _ => continue,
            };

            match positions.get(&(source, sink)) {
                Some(&pos) => raw_edges[pos].2 = gene.weight(),
                None => {
                    positions.insert((source, sink), raw_edges.len());
                    raw_edges.push((source, sink, gene.weight()));
                }
            }
        }

        // Prune neurons with no path to an action
        let mut reverse = vec![Vec::new(); max_internal];
        let mut feeds_action = Vec::new();
        for &(source, sink, _) in &raw_edges {
            if let Source::Neuron(src) = source {
                match sink {
                    Sink::Neuron(dst) => reverse[dst].push(src),
                    Sink::Action(_) => feeds_action.push(src),
                }
            }
        }
        let alive = reaches_any(&reverse, feeds_action);

        let mut compact = vec![usize::MAX; max_internal];
        let mut neuron_ids = Vec::new();
        for (id, &is_alive) in alive.iter().enumerate() {
            if is_alive {
                compact[id] = neuron_ids.len();
                neuron_ids.push(id);
            }
        }

        let mut connections: Vec<Connection> = raw_edges
            .into_iter()
            .filter_map(|(source, sink, weight)| {
                let source = match source {
                    Source::Neuron(n) if alive[n] => Source::Neuron(compact[n]),
                    Source::Neuron(_) => return None,
                    s => s,
                };
                let sink = match sink {
                    Sink::Neuron(n) if alive[n] => Sink::Neuron(compact[n]),
                    Sink::Neuron(_) => return None,
                    s => s,
                };
                Some(Connection {
                    source,
                    sink,
                    weight,
                    delayed: false,
                })
            })
            .collect();

        // Order neurons by strongly connected component
        let neuron_count = neuron_ids.len();
        let mut adjacency = vec![Vec::new(); neuron_count];
        let mut self_loop = vec![false; neuron_count];
        for conn in &connections {
            if let (Source::Neuron(src), Sink::Neuron(dst)) = (conn.source, conn.sink) {
                adjacency[src].push(dst);
                if src == dst {
                    self_loop[src] = true;
                }
            }
        }

        let mut component_of = vec![0usize; neuron_count];
        let order: Vec<Component> = strongly_connected(&adjacency)
            .into_iter()
            .enumerate()
            .map(|(c, neurons)| {
                for &n in &neurons {
                    component_of[n] = c;
                }
                let cyclic = neurons.len() > 1 || self_loop[neurons[0]];
                Component { neurons, cyclic }
            })
            .collect();

        for conn in &mut connections {
            if let (Source::Neuron(src), Sink::Neuron(dst)) = (conn.source, conn.sink) {
                let c = component_of[src];
                conn.delayed = c == component_of[dst] && order[c].cyclic;
            }
        }

        let mut neuron_inputs = vec![Vec::new(); neuron_count];
        let mut action_inputs = vec![Vec::new(); action_count];
        for (i, conn) in connections.iter().enumerate() {
            match conn.sink {
                Sink::Neuron(n) => neuron_inputs[n].push(i),
                Sink::Action(a) => action_inputs[a].push(i),
            }
        }

        Self {
            sensor_count,
            action_count,
            connections,
            neuron_ids,
            neuron_inputs,
            action_inputs,
            order,
            state: vec![0.0; neuron_count],
            scratch: Vec::with_capacity(neuron_count),
        }
    }

    /// Run one tick and return one value per enabled action, each in (-1, 1).
    ///
    /// Missing sensor values read as 0.
    pub fn evaluate(&mut self, sensors: &[f32]) -> Vec<f32> {
        let mut outputs = Vec::with_capacity(self.action_count);
        self.evaluate_into(sensors, &mut outputs);
        outputs
    }

    /// Like [`Brain::evaluate`], reusing the caller's buffer
    pub fn evaluate_into(&mut self, sensors: &[f32], outputs: &mut Vec<f32>) {
        for component in &self.order {
            if component.cyclic {
                // Read every member's inputs before any member is overwritten
                self.scratch.clear();
                for &n in &component.neurons {
                    let sum = input_sum(&self.connections, &self.neuron_inputs[n], sensors, &self.state);
                    self.scratch.push(sum);
                }
                for (&n, &sum) in component.neurons.iter().zip(&self.scratch) {
                    self.state[n] = sum.tanh();
                }
            } else {
                for &n in &component.neurons {
                    let sum = input_sum(&self.connections, &self.neuron_inputs[n], sensors, &self.state);
                    self.state[n] = sum.tanh();
                }
            }
        }

        outputs.clear();
        for inputs in &self.action_inputs {
            let sum = input_sum(&self.connections, inputs, sensors, &self.state);
            outputs.push(sum.tanh());
        }
    }

    /// Clear stored neuron outputs
    pub fn reset(&mut self) {
        self.state.iter_mut().for_each(|v| *v = 0.0);
    }

    #[inline]
    pub fn sensor_count(&self) -> usize {
        self.sensor_count
    }

    #[inline]
    pub fn action_count(&self) -> usize {
        self.action_count
    }

    /// Internal neurons that survived pruning
    #[inline]
    pub fn neuron_count(&self) -> usize {
        self.neuron_ids.len()
    }

    #[inline]
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    /// Pre-pruning index of each surviving neuron, for labelling
    #[inline]
    pub fn neuron_ids(&self) -> &[usize] {
        &self.neuron_ids
    }

    /// Neurons that take part in a feedback loop
    pub fn cyclic_neuron_count(&self) -> usize {
        self.order
            .iter()
            .filter(|c| c.cyclic)
            .map(|c| c.neurons.len())
            .sum()
    }
}

#[inline]
fn input_sum(connections: &[Connection], inputs: &[usize], sensors: &[f32], state: &[f32]) -> f32 {
    inputs
        .iter()
        .map(|&i| {
            let conn = &connections[i];
            let value = match conn.source {
                Source::Sensor(s) => sensors.get(s).copied().unwrap_or(0.0),
                Source::Neuron(n) => state[n],
            };
            value * conn.weight
        })
        .sum()
}
