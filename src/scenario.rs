//! Immutable inputs of one interdiction run: the graph, where the fire
//! starts, how strongly a resource delays it, the arrival-time target the
//! objective counts against, and the release schedule of the resources.

use crate::error::ModelError;
use crate::graph::{propagate, FireGraph, NodeKey, Propagation};
use crate::solution::Placement;

/// When resources become available, and how many at each time.
///
/// Availability is cumulative: a resource released at time t can be placed
/// at any node the fire has not reached by t. Each resource is consumable
/// once. Times are kept sorted ascending and addressed by index.
#[derive(Debug, Clone)]
pub struct ReleaseSchedule {
    times: Vec<f64>,
    capacities: Vec<usize>,
}

impl ReleaseSchedule {
    /// Builds a schedule from (release time, capacity) entries. Entries are
    /// sorted by time; duplicate or non-finite times are rejected.
    pub fn new(entries: impl IntoIterator<Item = (f64, usize)>) -> Result<Self, ModelError> {
        let mut entries: Vec<(f64, usize)> = entries.into_iter().collect();
        if entries.is_empty() {
            return Err(ModelError::EmptySchedule);
        }
        for &(t, _) in &entries {
            if !t.is_finite() {
                return Err(ModelError::InvalidReleaseTime(t));
            }
        }
        entries.sort_by(|a, b| a.0.total_cmp(&b.0));
        for pair in entries.windows(2) {
            if pair[0].0 == pair[1].0 {
                return Err(ModelError::DuplicateReleaseTime(pair[0].0));
            }
        }
        Ok(Self {
            times: entries.iter().map(|&(t, _)| t).collect(),
            capacities: entries.iter().map(|&(_, c)| c).collect(),
        })
    }

    /// Number of distinct release times.
    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// The release time at `t_idx`.
    pub fn time(&self, t_idx: usize) -> f64 {
        self.times[t_idx]
    }

    /// The capacity of the release time at `t_idx`.
    pub fn capacity(&self, t_idx: usize) -> usize {
        self.capacities[t_idx]
    }

    /// Total number of resources across all release times.
    pub fn total_capacity(&self) -> usize {
        self.capacities.iter().sum()
    }
}

/// One fire-interdiction instance: graph, ignitions, delay, target time,
/// and release schedule. Built once from input, read-only for the run.
#[derive(Debug, Clone)]
pub struct Scenario<N> {
    graph: FireGraph<N>,
    ignitions: Vec<usize>,
    delay: f64,
    target: f64,
    schedule: ReleaseSchedule,
}

impl<N: NodeKey> Scenario<N> {
    pub fn new(
        graph: FireGraph<N>,
        ignitions: impl IntoIterator<Item = N>,
        delay: f64,
        target: f64,
        schedule: ReleaseSchedule,
    ) -> Result<Self, ModelError> {
        let mut ids = Vec::new();
        for key in ignitions {
            let idx = graph
                .index_of(&key)
                .ok_or_else(|| ModelError::UnknownNode(format!("{key:?}")))?;
            if !ids.contains(&idx) {
                ids.push(idx);
            }
        }
        if ids.is_empty() {
            return Err(ModelError::NoIgnitions);
        }
        if !delay.is_finite() || delay <= 0.0 {
            return Err(ModelError::InvalidDelay(delay));
        }
        if !target.is_finite() {
            return Err(ModelError::InvalidTarget(target));
        }
        Ok(Self {
            graph,
            ignitions: ids,
            delay,
            target,
            schedule,
        })
    }

    pub fn graph(&self) -> &FireGraph<N> {
        &self.graph
    }

    pub fn schedule(&self) -> &ReleaseSchedule {
        &self.schedule
    }

    /// Ignition node indices.
    pub fn ignitions(&self) -> &[usize] {
        &self.ignitions
    }

    pub fn delay(&self) -> f64 {
        self.delay
    }

    /// The arrival-time target the objective counts against.
    pub fn target(&self) -> f64 {
        self.target
    }

    /// Runs the propagation engine under the given resource mask.
    pub fn propagate(&self, holds: &[bool]) -> Propagation {
        propagate(&self.graph, &self.ignitions, self.delay, holds)
    }

    /// Number of nodes the fire reaches strictly before the target time.
    pub fn objective(&self, propagation: &Propagation) -> usize {
        propagation
            .arrivals()
            .iter()
            .filter(|&&a| a < self.target)
            .count()
    }

    /// Propagates under `placement` and evaluates the objective.
    pub fn evaluate(&self, placement: &Placement) -> usize {
        self.objective(&self.propagate(&placement.mask()))
    }

    /// The sparse (node key, release time) boundary form of a placement.
    pub fn placement_pairs(&self, placement: &Placement) -> Vec<(N, f64)> {
        placement
            .entries()
            .map(|(node, t_idx)| (self.graph.node(node).clone(), self.schedule.time(t_idx)))
            .collect()
    }
}
