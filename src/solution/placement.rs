//! The mutable solution state: which node holds a resource, released when.

use crate::error::SearchError;
use crate::scenario::ReleaseSchedule;

/// A resource placement over (node index, release-time index).
///
/// Internally a dense per-node slot vector, which makes the one-resource-
/// per-node invariant structural; per-time counts are kept alongside so
/// capacity checks are O(1). The sparse (node, time) pair form only exists
/// at the public boundary (see `Scenario::placement_pairs`).
///
/// All mutation goes through [`Placement::place`] and [`Placement::remove`];
/// `place` validates capacity before committing, so a failed call leaves the
/// placement untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    slot: Vec<Option<usize>>,
    placed_at: Vec<usize>,
    total: usize,
}

impl Placement {
    /// The all-empty placement for `node_count` nodes under `schedule`.
    pub fn empty(node_count: usize, schedule: &ReleaseSchedule) -> Self {
        Self {
            slot: vec![None; node_count],
            placed_at: vec![0; schedule.len()],
            total: 0,
        }
    }

    /// Places a resource at `node` with the release time at `t_idx`.
    ///
    /// Fails with `CapacityExceeded` when the node already holds a resource
    /// or the release time is at capacity.
    pub fn place(
        &mut self,
        node: usize,
        t_idx: usize,
        schedule: &ReleaseSchedule,
    ) -> Result<(), SearchError> {
        if self.slot[node].is_some() {
            return Err(SearchError::CapacityExceeded(format!(
                "node index {node} already holds a resource"
            )));
        }
        let capacity = schedule.capacity(t_idx);
        if self.placed_at[t_idx] >= capacity {
            return Err(SearchError::CapacityExceeded(format!(
                "release time t = {} is at capacity ({}/{})",
                schedule.time(t_idx),
                self.placed_at[t_idx],
                capacity
            )));
        }
        self.slot[node] = Some(t_idx);
        self.placed_at[t_idx] += 1;
        self.total += 1;
        Ok(())
    }

    /// Removes the resource at `node`, returning its release-time index.
    pub fn remove(&mut self, node: usize) -> Option<usize> {
        let t_idx = self.slot[node].take()?;
        self.placed_at[t_idx] -= 1;
        self.total -= 1;
        Some(t_idx)
    }

    /// The release-time index of the resource at `node`, if any.
    pub fn release_of(&self, node: usize) -> Option<usize> {
        self.slot[node]
    }

    pub fn has_resource(&self, node: usize) -> bool {
        self.slot[node].is_some()
    }

    /// Nodes currently holding a resource, ascending by index.
    pub fn holders(&self) -> impl Iterator<Item = usize> + '_ {
        self.slot
            .iter()
            .enumerate()
            .filter_map(|(n, s)| s.map(|_| n))
    }

    /// Occupied (node index, release-time index) entries, ascending by node.
    pub fn entries(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.slot
            .iter()
            .enumerate()
            .filter_map(|(n, s)| s.map(|t| (n, t)))
    }

    /// The per-node boolean resource mask the propagation engine consumes.
    pub fn mask(&self) -> Vec<bool> {
        self.slot.iter().map(|s| s.is_some()).collect()
    }

    pub fn total_placed(&self) -> usize {
        self.total
    }

    /// Resources currently placed at the release time at `t_idx`.
    pub fn placed_count_at(&self, t_idx: usize) -> usize {
        self.placed_at[t_idx]
    }

    /// Resources still available across all release times.
    pub fn spare_capacity(&self, schedule: &ReleaseSchedule) -> usize {
        schedule.total_capacity() - self.total
    }

    /// The earliest release time with remaining capacity, if any.
    pub fn earliest_open_release(&self, schedule: &ReleaseSchedule) -> Option<usize> {
        (0..schedule.len()).find(|&t| self.placed_at[t] < schedule.capacity(t))
    }
}
