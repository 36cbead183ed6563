//! Best-improvement local search over single-resource relocations.
//!
//! # Algorithm
//!
//! One sweep snapshots the resource-holding nodes, and for each holder
//! tentatively frees it, recomputes arrival times, and tries relocating the
//! freed resource (same release time) into the structural neighborhood of
//! the remaining holders. After scanning every holder the single move with
//! the greatest objective decrease relative to the sweep's starting
//! objective is applied; sweeps repeat until one finds no improving move.
//!
//! Tentative moves run on a scratch resource mask, so the placement itself
//! is only touched when a sweep commits its best move.

use crate::graph::{NodeKey, Propagation};
use crate::scenario::{ReleaseSchedule, Scenario};
use crate::solution::Placement;
use tracing::trace;

/// A relocation into `moved_to` is feasible when every other entry of the
/// pre-move placement is still unreached at its own release time under the
/// post-move arrivals. An entry the fire now beats to its release would be
/// deployed too late to matter.
pub(crate) fn relocation_feasible(
    placement: &Placement,
    schedule: &ReleaseSchedule,
    after: &Propagation,
    moved_to: usize,
) -> bool {
    placement
        .entries()
        .all(|(m, t_idx)| m == moved_to || after.arrival(m) >= schedule.time(t_idx))
}

/// Runs best-improvement sweeps on `placement` until a sweep finds no
/// improving relocation (a local optimum for the relocate neighborhood).
pub fn local_search<N: NodeKey>(
    scenario: &Scenario<N>,
    placement: &mut Placement,
    max_neighbours: usize,
) {
    let schedule = scenario.schedule();

    loop {
        let holders: Vec<usize> = placement.holders().collect();
        let mut mask = placement.mask();
        let start_objective = scenario.objective(&scenario.propagate(&mask));

        let mut best_objective = start_objective;
        let mut best_move: Option<(usize, usize, usize)> = None;

        for &from in &holders {
            let t_idx = placement
                .release_of(from)
                .expect("sweep snapshot matches the placement");
            let release = schedule.time(t_idx);

            mask[from] = false;
            let removed = scenario.propagate(&mask);

            // Candidates: nodes near the remaining holders, not themselves
            // holding, and unreached at the freed release time.
            let mut seen = vec![false; mask.len()];
            let mut candidates: Vec<(f64, usize)> = Vec::new();
            for &other in holders.iter().filter(|&&h| h != from) {
                for &near in scenario.graph().nearby(other) {
                    if !seen[near] && !mask[near] {
                        seen[near] = true;
                        if removed.arrival(near) >= release {
                            candidates.push((removed.arrival(near), near));
                        }
                    }
                }
            }
            candidates.sort_by(|a, b| a.0.total_cmp(&b.0).then_with(|| a.1.cmp(&b.1)));
            candidates.truncate(max_neighbours);

            for &(_, to) in &candidates {
                mask[to] = true;
                let added = scenario.propagate(&mask);
                mask[to] = false;

                if !relocation_feasible(placement, schedule, &added, to) {
                    continue;
                }
                let objective = scenario.objective(&added);
                if objective < best_objective {
                    best_objective = objective;
                    best_move = Some((from, to, t_idx));
                }
            }

            mask[from] = true;
        }

        match best_move {
            Some((from, to, t_idx)) => {
                placement.remove(from);
                placement
                    .place(to, t_idx, schedule)
                    .expect("relocation keeps per-time counts unchanged");
                trace!(from, to, objective = best_objective, "applied relocation");
            }
            None => break,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Cell, FireGraph};
    use crate::scenario::ReleaseSchedule;

    /// Five cells in a row, fire entering from the left.
    fn row_scenario() -> Scenario<Cell> {
        let nodes: Vec<Cell> = (0..5).map(|c| Cell::new(0, c)).collect();
        let arcs: Vec<(Cell, Cell, f64)> = (0..4)
            .map(|c| (Cell::new(0, c), Cell::new(0, c + 1), 1.0))
            .collect();
        let graph = FireGraph::new(nodes, arcs).unwrap();
        let schedule = ReleaseSchedule::new(vec![(0.0, 2)]).unwrap();
        Scenario::new(graph, vec![Cell::new(0, 0)], 10.0, 4.0, schedule).unwrap()
    }

    fn idx(scenario: &Scenario<Cell>, col: i32) -> usize {
        scenario.graph().index_of(&Cell::new(0, col)).unwrap()
    }

    #[test]
    fn test_sweeps_walk_resources_toward_the_ignition() {
        let scenario = row_scenario();
        let schedule = scenario.schedule();
        let mut placement = Placement::empty(5, schedule);
        placement.place(idx(&scenario, 2), 0, schedule).unwrap();
        placement.place(idx(&scenario, 4), 0, schedule).unwrap();
        assert_eq!(scenario.evaluate(&placement), 3);

        local_search(&scenario, &mut placement, 20);

        // Cutting the fire off right at the ignition contains everything
        // but the ignition cell itself.
        assert_eq!(scenario.evaluate(&placement), 1);
        assert_eq!(
            placement.holders().collect::<Vec<_>>(),
            vec![idx(&scenario, 0), idx(&scenario, 1)]
        );
    }

    #[test]
    fn test_output_is_a_fixed_point() {
        let scenario = row_scenario();
        let schedule = scenario.schedule();
        let mut placement = Placement::empty(5, schedule);
        placement.place(idx(&scenario, 2), 0, schedule).unwrap();
        placement.place(idx(&scenario, 4), 0, schedule).unwrap();

        local_search(&scenario, &mut placement, 20);
        let first = placement.clone();
        local_search(&scenario, &mut placement, 20);
        assert_eq!(placement, first);
    }

    #[test]
    fn test_single_resource_has_no_relocation_neighborhood() {
        // The neighborhood is built from the holders that remain after the
        // tentative removal; with one resource there are none.
        let scenario = row_scenario();
        let schedule = scenario.schedule();
        let mut placement = Placement::empty(5, schedule);
        placement.place(idx(&scenario, 4), 0, schedule).unwrap();
        let before = placement.clone();

        local_search(&scenario, &mut placement, 20);
        assert_eq!(placement, before);
    }

    #[test]
    fn test_feasibility_holds_after_search() {
        let nodes: Vec<Cell> = (0..5).map(|c| Cell::new(0, c)).collect();
        let arcs: Vec<(Cell, Cell, f64)> = (0..4)
            .map(|c| (Cell::new(0, c), Cell::new(0, c + 1), 1.0))
            .collect();
        let graph = FireGraph::new(nodes, arcs).unwrap();
        let schedule = ReleaseSchedule::new(vec![(0.0, 1), (2.0, 1)]).unwrap();
        let scenario = Scenario::new(graph, vec![Cell::new(0, 0)], 10.0, 4.0, schedule).unwrap();
        let schedule = scenario.schedule();

        let mut placement = Placement::empty(5, schedule);
        placement.place(idx(&scenario, 2), 0, schedule).unwrap();
        placement.place(idx(&scenario, 3), 1, schedule).unwrap();

        local_search(&scenario, &mut placement, 20);

        let propagation = scenario.propagate(&placement.mask());
        for (node, t_idx) in placement.entries() {
            assert!(propagation.arrival(node) >= schedule.time(t_idx));
        }
    }

    #[test]
    fn test_improving_move_rejected_when_it_strands_a_deployment() {
        // Two branches out of the ignition. The resource on the short
        // branch shields a later deployment; pulling it over to the long
        // branch would lower the objective but let the fire reach that
        // deployment before its release, so the move must be skipped.
        let s = Cell::new(0, 0);
        let p = Cell::new(0, 1);
        let m = Cell::new(0, 2);
        let q1 = Cell::new(1, 2);
        let q2 = Cell::new(1, 3);
        let q3 = Cell::new(1, 4);
        let graph = FireGraph::new(
            vec![s, p, m, q1, q2, q3],
            vec![
                (s, p, 1.0),
                (p, m, 1.0),
                (s, q1, 1.0),
                (q1, q2, 1.0),
                (q2, q3, 1.0),
            ],
        )
        .unwrap();
        let schedule = ReleaseSchedule::new(vec![(0.0, 1), (5.0, 1)]).unwrap();
        let scenario = Scenario::new(graph, vec![s], 10.0, 4.0, schedule).unwrap();
        let schedule = scenario.schedule();

        let p_idx = scenario.graph().index_of(&p).unwrap();
        let m_idx = scenario.graph().index_of(&m).unwrap();
        let mut placement = Placement::empty(6, schedule);
        placement.place(p_idx, 0, schedule).unwrap();
        placement.place(m_idx, 1, schedule).unwrap();

        let before = placement.clone();
        let objective_before = scenario.evaluate(&placement);
        local_search(&scenario, &mut placement, 20);

        assert_eq!(placement, before);
        assert_eq!(scenario.evaluate(&placement), objective_before);
    }
}
