//! Graph passes run once at compile time: reachability pruning and
//! strongly connected components.

use std::collections::VecDeque;

/// Mark every node that can reach one of `targets` along `adjacency`.
///
/// `reverse` is the transposed adjacency (for each node, the nodes that feed it).
pub fn reaches_any(reverse: &[Vec<usize>], targets: impl IntoIterator<Item = usize>) -> Vec<bool> {
    let mut alive = vec![false; reverse.len()];
    let mut queue: VecDeque<usize> = VecDeque::new();

    for t in targets {
        if t < alive.len() && !alive[t] {
            alive[t] = true;
            queue.push_back(t);
        }
    }

    while let Some(node) = queue.pop_front() {
        for &src in &reverse[node] {
            if !alive[src] {
                alive[src] = true;
                queue.push_back(src);
            }
        }
    }

    alive
}

/// Tarjan's algorithm. Components come back in topological order of the
/// condensation: a component is listed before every component it feeds.
pub fn strongly_connected(adjacency: &[Vec<usize>]) -> Vec<Vec<usize>> {
    let mut tarjan = Tarjan {
        adjacency,
        next_index: 0,
        index: vec![usize::MAX; adjacency.len()],
        lowlink: vec![0; adjacency.len()],
        on_stack: vec![false; adjacency.len()],
        stack: Vec::new(),
        components: Vec::new(),
    };

    for node in 0..adjacency.len() {
        if tarjan.index[node] == usize::MAX {
            tarjan.visit(node);
        }
    }

    // Tarjan emits sinks first
    tarjan.components.reverse();
    tarjan.components
}

struct Tarjan<'a> {
    adjacency: &'a [Vec<usize>],
    next_index: usize,
    index: Vec<usize>,
    lowlink: Vec<usize>,
    on_stack: Vec<bool>,
    stack: Vec<usize>,
    components: Vec<Vec<usize>>,
}

impl Tarjan<'_> {
    // Recursion depth is bounded by the internal neuron cap
    fn visit(&mut self, v: usize) {
        let v_index = self.next_index;
        self.index[v] = v_index;
        self.lowlink[v] = v_index;
        self.next_index += 1;
        self.stack.push(v);
        self.on_stack[v] = true;

        let adjacency = self.adjacency;
        for &w in &adjacency[v] {
            if self.index[w] == usize::MAX {
                self.visit(w);
                self.lowlink[v] = self.lowlink[v].min(self.lowlink[w]);
            } else if self.on_stack[w] {
                self.lowlink[v] = self.lowlink[v].min(self.index[w]);
            }
        }

        if self.lowlink[v] == v_index {
            let mut component = Vec::new();
            while let Some(w) = self.stack.pop() {
                self.on_stack[w] = false;
                component.push(w);
                if w == v {
                    break;
                }
            }
            component.sort_unstable();
            self.components.push(component);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reaches_any() {
        // 0 -> 1 -> 2, 3 isolated
        let reverse = vec![vec![], vec![0], vec![1], vec![]];
        let alive = reaches_any(&reverse, [2]);
        assert_eq!(alive, vec![true, true, true, false]);
    }

    #[test]
    fn test_scc_chain_is_topological() {
        // 2 -> 0 -> 1
        let adjacency = vec![vec![1], vec![], vec![0]];
        let components = strongly_connected(&adjacency);
        assert_eq!(components, vec![vec![2], vec![0], vec![1]]);
    }

    #[test]
    fn test_scc_detects_cycle() {
        // 0 -> 1 -> 2 -> 0, 2 -> 3
        let adjacency = vec![vec![1], vec![2], vec![0, 3], vec![]];
        let components = strongly_connected(&adjacency);
        assert_eq!(components, vec![vec![0, 1, 2], vec![3]]);
    }

    #[test]
    fn test_scc_self_loop_is_singleton() {
        let adjacency = vec![vec![0]];
        let components = strongly_connected(&adjacency);
        assert_eq!(components, vec![vec![0]]);
    }
}
