//! Interdiction-aware fire propagation.
//!
//! # Algorithm
//!
//! Multi-origin Dijkstra over the base graph with placement-dependent arc
//! costs: an arc (u, v) costs `base + delay` while u holds a resource, its
//! base weight otherwise. All ignitions are seeded at distance 0. The
//! computation is a stateless function of its inputs and is re-run in full
//! for every placement the caller wants evaluated; nothing is memoized
//! between calls.
//!
//! Because the delay is non-negative, arrival times are monotone in the
//! resource set: adding a resource never decreases any node's arrival time.

use super::model::{FireGraph, NodeKey};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Arrival times and shortest-path tree of one propagation run.
///
/// Unreachable nodes have infinite arrival, no predecessor, and no fire
/// path. Ignitions have arrival 0 and an empty fire path.
#[derive(Debug, Clone)]
pub struct Propagation {
    arrival: Vec<f64>,
    predecessor: Vec<Option<usize>>,
}

impl Propagation {
    /// Earliest time the fire reaches the node at `idx`.
    pub fn arrival(&self, idx: usize) -> f64 {
        self.arrival[idx]
    }

    /// All arrival times, indexed by node.
    pub fn arrivals(&self) -> &[f64] {
        &self.arrival
    }

    /// Immediate predecessor of `idx` on its minimum-cost fire path.
    pub fn predecessor(&self, idx: usize) -> Option<usize> {
        self.predecessor[idx]
    }

    /// The minimum-cost path the fire takes to reach `idx`, from the first
    /// node after the ignition through `idx` itself. `None` when the fire
    /// never reaches `idx`.
    pub fn fire_path(&self, idx: usize) -> Option<Vec<usize>> {
        if !self.arrival[idx].is_finite() {
            return None;
        }
        let mut path = Vec::new();
        let mut current = idx;
        loop {
            match self.predecessor[current] {
                Some(prev) => {
                    path.push(current);
                    current = prev;
                }
                None => break,
            }
        }
        path.reverse();
        Some(path)
    }
}

/// Heap entry ordered by (arrival, node index); the index keeps distance
/// ties consistent for a fixed weight assignment.
#[derive(Debug, Clone, Copy, PartialEq)]
struct QueueEntry {
    arrival: f64,
    node: usize,
}

impl Eq for QueueEntry {}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed: BinaryHeap is a max-heap, we pop smallest arrival first.
        other
            .arrival
            .total_cmp(&self.arrival)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Computes arrival times for every node under the given resource mask.
///
/// `holds[u]` marks node u as currently holding a resource, adding `delay`
/// to each of its outgoing arcs. Runs in O(E log V).
pub fn propagate<N: NodeKey>(
    graph: &FireGraph<N>,
    ignitions: &[usize],
    delay: f64,
    holds: &[bool],
) -> Propagation {
    debug_assert_eq!(holds.len(), graph.len());

    let mut arrival = vec![f64::INFINITY; graph.len()];
    let mut predecessor = vec![None; graph.len()];
    let mut queue = BinaryHeap::with_capacity(ignitions.len());

    for &n in ignitions {
        arrival[n] = 0.0;
        queue.push(QueueEntry { arrival: 0.0, node: n });
    }

    while let Some(QueueEntry { arrival: dist, node }) = queue.pop() {
        if dist > arrival[node] {
            continue; // stale entry
        }
        let penalty = if holds[node] { delay } else { 0.0 };
        for &(next, weight) in graph.out_arcs(node) {
            let candidate = dist + weight + penalty;
            if candidate < arrival[next] {
                arrival[next] = candidate;
                predecessor[next] = Some(node);
                queue.push(QueueEntry {
                    arrival: candidate,
                    node: next,
                });
            }
        }
    }

    Propagation {
        arrival,
        predecessor,
    }
}
