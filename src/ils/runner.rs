//! ILS execution loop.
//!
//! # Algorithm
//!
//! 1. Multistart: construct several random placements, keep the best
//! 2. Local search to a fixed point; this becomes the incumbent
//! 3. While the no-improvement counter is below its threshold:
//!    a. Perturb a copy of the incumbent (one of three operators)
//!    b. Local search to a new fixed point
//!    c. Strictly lower objective replaces the incumbent and resets the
//!       counter; anything else increments it
//! 4. Return the incumbent placement and objective
//!
//! Worse candidates are never accepted; there is no annealing criterion.

use crate::error::SearchError;
use crate::graph::NodeKey;
use crate::ils::config::IlsConfig;
use crate::ils::construct::multistart;
use crate::ils::local_search::local_search;
use crate::ils::perturb::perturb;
use crate::scenario::Scenario;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

/// Seed used when the configuration does not fix one.
const DEFAULT_SEED: u64 = 42;

/// Result of an ILS run.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IlsResult<N> {
    /// Occupied (node, release time) pairs of the best placement found.
    pub best: Vec<(N, f64)>,
    /// Number of nodes the fire reaches before the target time under the
    /// best placement.
    pub objective: usize,
    /// Outer (perturb + local search) iterations executed.
    pub iterations: usize,
    /// Outer iteration at which the best placement was found; 0 when the
    /// initial local optimum was never improved.
    pub best_iteration: usize,
    /// Best objective after the initial local search and after each outer
    /// iteration.
    pub objective_history: Vec<usize>,
}

/// Iterated Local Search driver.
pub struct FireIls;

impl FireIls {
    /// Runs the full ILS on a scenario.
    ///
    /// # Examples
    ///
    /// ```
    /// use fireline::graph::{Cell, FireGraph};
    /// use fireline::ils::{FireIls, IlsConfig};
    /// use fireline::scenario::{ReleaseSchedule, Scenario};
    ///
    /// let graph = FireGraph::grid(3, 3, 1.0, 1.5).unwrap();
    /// let schedule = ReleaseSchedule::new(vec![(0.0, 1)]).unwrap();
    /// let scenario =
    ///     Scenario::new(graph, vec![Cell::new(0, 0)], 5.0, 2.0, schedule).unwrap();
    ///
    /// let config = IlsConfig::default().with_multistarts(5).with_seed(42);
    /// let result = FireIls::run(&scenario, &config).unwrap();
    /// assert!(result.objective <= 9);
    /// ```
    pub fn run<N: NodeKey>(
        scenario: &Scenario<N>,
        config: &IlsConfig,
    ) -> Result<IlsResult<N>, SearchError> {
        config.validate().expect("invalid IlsConfig");
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::seed_from_u64(DEFAULT_SEED),
        };

        let mut best = multistart(scenario, config.multistarts, config.max_candidates, &mut rng)?;
        info!(
            placed = best.total_placed(),
            "multistart construction complete"
        );

        local_search(scenario, &mut best, config.max_neighbours);
        let mut best_objective = scenario.evaluate(&best);
        info!(objective = best_objective, "initial local optimum");

        let mut iterations = 0;
        let mut best_iteration = 0;
        let mut no_improvements = 0;
        let mut objective_history = vec![best_objective];

        while no_improvements < config.max_no_improvements {
            iterations += 1;

            let mut candidate = best.clone();
            if let Err(err) = perturb(scenario, &mut candidate, config, &mut rng) {
                // The probability short-circuits make this rare; the
                // iteration continues from the unperturbed copy.
                debug!(error = %err, "perturbation left the placement unchanged");
            }
            local_search(scenario, &mut candidate, config.max_neighbours);
            let objective = scenario.evaluate(&candidate);

            if objective < best_objective {
                best = candidate;
                best_objective = objective;
                best_iteration = iterations;
                no_improvements = 0;
                info!(objective, iteration = iterations, "new incumbent");
            } else {
                no_improvements += 1;
            }
            objective_history.push(best_objective);
        }

        info!(
            objective = best_objective,
            iterations, "stopping: no-improvement threshold reached"
        );
        Ok(IlsResult {
            best: scenario.placement_pairs(&best),
            objective: best_objective,
            iterations,
            best_iteration,
            objective_history,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Cell, FireGraph};
    use crate::scenario::ReleaseSchedule;

    fn chain_scenario() -> Scenario<Cell> {
        let graph = FireGraph::new(
            vec![Cell::new(0, 0), Cell::new(0, 1), Cell::new(0, 2)],
            vec![
                (Cell::new(0, 0), Cell::new(0, 1), 1.0),
                (Cell::new(0, 1), Cell::new(0, 2), 1.0),
            ],
        )
        .unwrap();
        let schedule = ReleaseSchedule::new(vec![(0.0, 1)]).unwrap();
        Scenario::new(graph, vec![Cell::new(0, 0)], 5.0, 2.0, schedule).unwrap()
    }

    fn small_config() -> IlsConfig {
        IlsConfig::default()
            .with_multistarts(10)
            .with_max_no_improvements(10)
            .with_seed(42)
    }

    #[test]
    fn test_chain_scenario_reaches_the_known_optimum() {
        // Baseline burns two nodes before the target; one well-placed
        // resource cuts that to the ignition alone.
        let scenario = chain_scenario();
        let result = FireIls::run(&scenario, &small_config()).unwrap();

        assert_eq!(result.objective, 1);
        assert_eq!(result.best.len(), 1);
        let (node, release) = result.best[0];
        assert_eq!(release, 0.0);
        // Either of the first two chain nodes blocks the spread in time.
        assert!(node == Cell::new(0, 0) || node == Cell::new(0, 1));
    }

    #[test]
    fn test_fixed_seed_runs_are_identical() {
        let scenario = chain_scenario();
        let config = small_config();
        let a = FireIls::run(&scenario, &config).unwrap();
        let b = FireIls::run(&scenario, &config).unwrap();

        assert_eq!(a.best, b.best);
        assert_eq!(a.objective, b.objective);
        assert_eq!(a.iterations, b.iterations);
        assert_eq!(a.objective_history, b.objective_history);
    }

    #[test]
    fn test_objective_history_is_non_increasing() {
        let graph = FireGraph::grid(4, 4, 1.0, 1.5).unwrap();
        let schedule = ReleaseSchedule::new(vec![(0.0, 2), (2.0, 1)]).unwrap();
        let scenario =
            Scenario::new(graph, vec![Cell::new(0, 0)], 6.0, 4.0, schedule).unwrap();
        let result = FireIls::run(&scenario, &small_config()).unwrap();

        for window in result.objective_history.windows(2) {
            assert!(window[1] <= window[0]);
        }
        assert_eq!(result.objective, *result.objective_history.last().unwrap());
    }

    #[test]
    fn test_result_respects_capacities_and_feasibility() {
        let graph = FireGraph::grid(5, 5, 1.0, 1.5).unwrap();
        let schedule = ReleaseSchedule::new(vec![(0.0, 2), (3.0, 2)]).unwrap();
        let scenario =
            Scenario::new(graph, vec![Cell::new(2, 2)], 8.0, 5.0, schedule).unwrap();
        let result = FireIls::run(&scenario, &small_config()).unwrap();

        // Per-time counts within capacity, one resource per node.
        let mut nodes_seen = Vec::new();
        let mut at_zero = 0;
        let mut at_three = 0;
        for &(node, release) in &result.best {
            assert!(!nodes_seen.contains(&node));
            nodes_seen.push(node);
            match release {
                r if r == 0.0 => at_zero += 1,
                r if r == 3.0 => at_three += 1,
                other => panic!("unexpected release time {other}"),
            }
        }
        assert!(at_zero <= 2);
        assert!(at_three <= 2);

        // Every deployment happens before the fire reaches its node.
        let holds: Vec<bool> = (0..scenario.graph().len())
            .map(|idx| {
                result
                    .best
                    .iter()
                    .any(|&(node, _)| scenario.graph().index_of(&node) == Some(idx))
            })
            .collect();
        let propagation = scenario.propagate(&holds);
        for &(node, release) in &result.best {
            let idx = scenario.graph().index_of(&node).unwrap();
            assert!(propagation.arrival(idx) >= release);
        }
    }

    #[test]
    fn test_stops_after_no_improvement_threshold() {
        let scenario = chain_scenario();
        let config = small_config().with_max_no_improvements(3);
        let result = FireIls::run(&scenario, &config).unwrap();

        // The chain optimum is found immediately; exactly the threshold's
        // worth of non-improving iterations follow.
        assert_eq!(result.iterations - result.best_iteration, 3);
        assert_eq!(
            result.objective_history.len(),
            result.iterations + 1
        );
    }

    #[test]
    fn test_surfaces_construction_exhaustion() {
        let graph = FireGraph::new(vec![Cell::new(0, 0)], Vec::new()).unwrap();
        let schedule = ReleaseSchedule::new(vec![(1.0, 1)]).unwrap();
        let scenario = Scenario::new(graph, vec![Cell::new(0, 0)], 5.0, 2.0, schedule).unwrap();

        assert!(matches!(
            FireIls::run(&scenario, &small_config()),
            Err(SearchError::ConstructionExhausted { time }) if time == 1.0
        ));
    }
}
