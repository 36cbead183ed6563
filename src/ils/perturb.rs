//! Perturbation operators used to escape local optima.
//!
//! One operator runs per outer ILS iteration, chosen by a uniform draw
//! against cumulative probabilities: `p_drop` selects drop-latest, `p_add`
//! add-one, and the residual the random relocation walk. `p_drop` is forced
//! to 0 while nothing is placed and `p_add` while no spare capacity
//! remains, so the removal and addition operators are never selected when
//! they have nothing to do.

use crate::error::SearchError;
use crate::graph::NodeKey;
use crate::ils::config::IlsConfig;
use crate::ils::construct::eligible_sorted;
use crate::ils::local_search::relocation_feasible;
use crate::scenario::Scenario;
use crate::solution::Placement;
use rand::Rng;
use tracing::trace;

/// Tolerance for "within reach of the minimum arrival" in [`add_one`].
const EPS: f64 = 1e-4;

/// Removes one resource, chosen uniformly among those with the latest
/// placed release time.
pub fn drop_latest<R: Rng>(placement: &mut Placement, rng: &mut R) -> Result<(), SearchError> {
    // Release times are sorted ascending, so the maximum index is the
    // latest time.
    let latest = placement
        .entries()
        .map(|(_, t_idx)| t_idx)
        .max()
        .ok_or(SearchError::NoResourcesToRemove)?;
    let pool: Vec<usize> = placement
        .entries()
        .filter(|&(_, t_idx)| t_idx == latest)
        .map(|(node, _)| node)
        .collect();
    let choice = pool[rng.random_range(0..pool.len())];
    placement.remove(choice);
    Ok(())
}

/// Places one additional resource at the earliest open release time, drawn
/// uniformly among the most urgent eligible nodes: those within [`EPS`] of
/// the minimum arrival time in the eligible pool.
///
/// No-op when no spare capacity remains; `ConstructionExhausted` when the
/// eligible pool is empty.
pub fn add_one<N: NodeKey, R: Rng>(
    scenario: &Scenario<N>,
    placement: &mut Placement,
    rng: &mut R,
) -> Result<(), SearchError> {
    let schedule = scenario.schedule();
    let Some(t_idx) = placement.earliest_open_release(schedule) else {
        return Ok(());
    };
    let release = schedule.time(t_idx);

    let propagation = scenario.propagate(&placement.mask());
    let pool = eligible_sorted(scenario, placement, &propagation, release);
    if pool.is_empty() {
        return Err(SearchError::ConstructionExhausted { time: release });
    }

    let min_arrival = pool[0].0;
    let urgent: Vec<usize> = pool
        .iter()
        .take_while(|&&(arrival, _)| arrival < min_arrival + EPS)
        .map(|&(_, node)| node)
        .collect();
    let choice = urgent[rng.random_range(0..urgent.len())];
    placement.place(choice, t_idx, schedule)
}

/// Randomly relocates resources until `max_modifications` succeed or
/// `max_failures` consecutive attempts are infeasible.
///
/// Each attempt frees a random holder and tries a random candidate among
/// the `max_neighbours` soonest-burning resource-free nodes still unreached
/// at the freed release time, applying the same feasibility test as the
/// local search. Returns the number of relocations performed.
pub fn random_walk<N: NodeKey, R: Rng>(
    scenario: &Scenario<N>,
    placement: &mut Placement,
    max_neighbours: usize,
    max_modifications: usize,
    max_failures: usize,
    rng: &mut R,
) -> Result<usize, SearchError> {
    if placement.total_placed() == 0 {
        return Err(SearchError::NoResourcesToRemove);
    }
    let schedule = scenario.schedule();

    let mut modifications = 0;
    let mut failures = 0;
    while modifications < max_modifications && failures < max_failures {
        let holders: Vec<usize> = placement.holders().collect();
        let from = holders[rng.random_range(0..holders.len())];
        let t_idx = placement
            .release_of(from)
            .expect("holder taken from the placement");
        let release = schedule.time(t_idx);

        let mut mask = placement.mask();
        mask[from] = false;
        let removed = scenario.propagate(&mask);

        let mut candidates: Vec<(f64, usize)> = (0..scenario.graph().len())
            .filter(|&n| !placement.has_resource(n) && removed.arrival(n) >= release)
            .map(|n| (removed.arrival(n), n))
            .collect();
        candidates.sort_by(|a, b| a.0.total_cmp(&b.0).then_with(|| a.1.cmp(&b.1)));
        candidates.truncate(max_neighbours);
        if candidates.is_empty() {
            failures += 1;
            continue;
        }

        let (_, to) = candidates[rng.random_range(0..candidates.len())];
        mask[to] = true;
        let added = scenario.propagate(&mask);

        if relocation_feasible(placement, schedule, &added, to) {
            failures = 0;
            modifications += 1;
            placement.remove(from);
            placement.place(to, t_idx, schedule)?;
        } else {
            failures += 1;
        }
    }
    Ok(modifications)
}

/// Applies one perturbation operator chosen by the configured
/// probabilities.
pub fn perturb<N: NodeKey, R: Rng>(
    scenario: &Scenario<N>,
    placement: &mut Placement,
    config: &IlsConfig,
    rng: &mut R,
) -> Result<(), SearchError> {
    let p_drop = if placement.total_placed() == 0 {
        0.0
    } else {
        config.p_drop
    };
    let p_add = if placement.spare_capacity(scenario.schedule()) == 0 {
        0.0
    } else {
        config.p_add
    };

    let roll: f64 = rng.random_range(0.0..1.0);
    if roll < p_drop {
        trace!("perturbation: drop latest");
        drop_latest(placement, rng)
    } else if roll < p_drop + p_add {
        trace!("perturbation: add one");
        add_one(scenario, placement, rng)
    } else {
        trace!("perturbation: random relocation walk");
        random_walk(
            scenario,
            placement,
            config.max_neighbours,
            config.max_modifications,
            config.max_failures,
            rng,
        )
        .map(|_| ())
    }
}
