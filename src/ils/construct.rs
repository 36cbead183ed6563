//! Constructive heuristic and multistart selector.

use crate::error::SearchError;
use crate::graph::{NodeKey, Propagation};
use crate::scenario::Scenario;
use crate::solution::Placement;
use rand::Rng;
use tracing::debug;

/// Resource-free nodes the fire has not reached by `release`, paired with
/// their arrival time and sorted ascending by (arrival, node index).
pub(crate) fn eligible_sorted<N: NodeKey>(
    scenario: &Scenario<N>,
    placement: &Placement,
    propagation: &Propagation,
    release: f64,
) -> Vec<(f64, usize)> {
    let mut pool: Vec<(f64, usize)> = (0..scenario.graph().len())
        .filter(|&n| !placement.has_resource(n) && propagation.arrival(n) >= release)
        .map(|n| (propagation.arrival(n), n))
        .collect();
    pool.sort_by(|a, b| a.0.total_cmp(&b.0).then_with(|| a.1.cmp(&b.1)));
    pool
}

/// Builds one feasible placement from the all-empty state.
///
/// Repeats until every resource is placed: take the earliest release time
/// with spare capacity, propagate under the current placement, and place a
/// resource at a node drawn uniformly from the `max_candidates`
/// soonest-burning nodes still unreached at that time.
///
/// Fails with `ConstructionExhausted` when no node qualifies; the partially
/// built placement is discarded.
pub fn construct<N: NodeKey, R: Rng>(
    scenario: &Scenario<N>,
    max_candidates: usize,
    rng: &mut R,
) -> Result<Placement, SearchError> {
    let schedule = scenario.schedule();
    let mut placement = Placement::empty(scenario.graph().len(), schedule);

    while let Some(t_idx) = placement.earliest_open_release(schedule) {
        let release = schedule.time(t_idx);
        let propagation = scenario.propagate(&placement.mask());

        let mut pool = eligible_sorted(scenario, &placement, &propagation, release);
        pool.truncate(max_candidates);
        if pool.is_empty() {
            return Err(SearchError::ConstructionExhausted { time: release });
        }

        let (_, choice) = pool[rng.random_range(0..pool.len())];
        placement.place(choice, t_idx, schedule)?;
    }

    Ok(placement)
}

/// Runs the constructive heuristic `multistarts` times and keeps the
/// placement with the lowest objective (first found wins ties).
///
/// Exhausted attempts are skipped; the error only surfaces when every
/// attempt fails.
pub fn multistart<N: NodeKey, R: Rng>(
    scenario: &Scenario<N>,
    multistarts: usize,
    max_candidates: usize,
    rng: &mut R,
) -> Result<Placement, SearchError> {
    let mut best: Option<(Placement, usize)> = None;
    let mut last_err = None;

    for start in 0..multistarts {
        match construct(scenario, max_candidates, rng) {
            Ok(placement) => {
                let objective = scenario.evaluate(&placement);
                debug!(start, objective, "constructed start");
                if best.as_ref().map_or(true, |(_, b)| objective < *b) {
                    best = Some((placement, objective));
                }
            }
            Err(err) => {
                debug!(start, error = %err, "construction attempt failed");
                last_err = Some(err);
            }
        }
    }

    best.map(|(placement, _)| placement)
        .ok_or_else(|| last_err.expect("multistart requires at least one attempt"))
}
