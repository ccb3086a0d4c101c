//! P-center tabu search execution engine.
//!
//! # Algorithm
//!
//! 1. Build an initial set of P facilities with the randomized greedy
//!    construction
//! 2. At each iteration:
//!    a. Pick a random critical vertex and collect the closed vertices
//!    strictly closer to it than the current objective
//!    b. Estimate every (open facility, candidate) swap and keep the best ones,
//!    split into tabu and free lists
//!    c. Select an improving free move, else an improving tabu move
//!    (aspiration), else any free move
//!    d. Apply the swap, forbid the pair for a randomized tenure, update the
//!    best-known set
//! 3. Terminate on the iteration budget, a reached target bound, a zero
//!    objective, cancellation, or the time limit
//!
//! # Reference
//!
//! Mladenović, N., Labbé, M. & Hansen, P. (2003). "Solving the p-Center
//! problem with Tabu Search and Variable Neighborhood Search", *Networks*
//! 42(1), 48-64.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::{PCenterError, Result};
use crate::graph::{Distance, INFINITE_DISTANCE};
use crate::random::{create_rng, resolve_seed};

use super::candidate::candidates_into;
use super::config::PCenterConfig;
use super::construct::initial_solution;
use super::facility::FacilityIndex;
use super::neighborhood::NeighborhoodEvaluator;
use super::tabu::TabuManager;
use super::types::{PCenterInstance, Termination, Vertex};

/// Result of a p-center search run.
#[derive(Debug, Clone)]
pub struct PCenterResult {
    /// Best facility set found, sorted by vertex id.
    pub facilities: Vec<Vertex>,
    /// Objective of the best set: the largest vertex-to-nearest-facility
    /// distance.
    pub objective: Distance,
    /// Search iterations executed after construction.
    pub iterations: usize,
    /// Iteration at which the best set was found (0 = construction).
    pub best_iteration: usize,
    /// Best objective after construction and after every iteration.
    pub objective_history: Vec<Distance>,
    /// Why the search stopped.
    pub termination: Termination,
    /// The best objective is the unreachable sentinel: some vertex cannot be
    /// served by any choice of facilities made so far. Such a result is not a
    /// valid p-center solution.
    pub degenerate: bool,
    /// Seed the run used; equal to `config.seed` when one was given.
    pub seed: u64,
}

/// P-center tabu search runner.
pub struct PCenterRunner;

impl PCenterRunner {
    /// Solves the instance.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_pcenter::graph::DistanceMatrix;
    /// use u_pcenter::pcenter::{PCenterConfig, PCenterInstance, PCenterRunner};
    ///
    /// let matrix = DistanceMatrix::from_rows(vec![
    ///     vec![0, 1, 2, 1],
    ///     vec![1, 0, 1, 2],
    ///     vec![2, 1, 0, 1],
    ///     vec![1, 2, 1, 0],
    /// ])
    /// .unwrap();
    /// let instance = PCenterInstance::new(matrix, 2).unwrap();
    /// let config = PCenterConfig::default().with_max_iterations(50).with_seed(42);
    ///
    /// let result = PCenterRunner::run(&instance, &config).unwrap();
    /// assert_eq!(result.objective, 1);
    /// assert_eq!(result.facilities.len(), 2);
    /// ```
    pub fn run(instance: &PCenterInstance, config: &PCenterConfig) -> Result<PCenterResult> {
        Self::run_with_cancel(instance, config, None)
    }

    /// Solves the instance with an optional cancellation flag, checked once
    /// per iteration. A cancelled run still returns the best set found.
    pub fn run_with_cancel(
        instance: &PCenterInstance,
        config: &PCenterConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<PCenterResult> {
        config.validate().map_err(PCenterError::InvalidConfig)?;

        let start = Instant::now();
        let seed = resolve_seed(config.seed);
        let mut rng = create_rng(seed);
        let matrix = instance.matrix();
        let (n, p) = (instance.n(), instance.p());

        let mut index = FacilityIndex::new(matrix);
        initial_solution(&mut index, p, &mut rng);

        let mut best = index.objective();
        let mut best_set = index.snapshot();
        let mut best_iteration = 0;

        let mut tabu = TabuManager::new(n);
        let mut evaluator = NeighborhoodEvaluator::new(n);
        let mut pool = Vec::new();

        let mut objective_history = Vec::with_capacity(config.max_iterations.min(1 << 16) + 1);
        objective_history.push(best);

        let mut termination = Termination::IterationLimit;
        let mut iterations = 0;

        for iteration in 0..config.max_iterations {
            if let Some(stop) = Self::stop_reason(best, config, cancel.as_deref(), start) {
                termination = stop;
                break;
            }

            candidates_into(&index, &mut rng, &mut pool);
            let eval = evaluator.find_pair(&mut index, &pool, &tabu, iteration);

            if let Some(selection) = TabuManager::select(eval, best, &mut rng) {
                let mv = selection.mv;
                index.add(mv.insert);
                index.remove(mv.remove);
                debug_assert_eq!(index.open_count(), p);

                let tt = TabuManager::draw_tenure(config.tenure, n, p, &mut rng);
                tabu.forbid(mv.remove, mv.insert, iteration + tt);

                if index.objective() < best {
                    best = index.objective();
                    best_set = index.snapshot();
                    best_iteration = iteration + 1;
                    log::trace!(
                        "iteration {iteration}: swap {} -> {} improves best to {best}{}",
                        mv.remove,
                        mv.insert,
                        if selection.aspiration { " (aspiration)" } else { "" }
                    );
                }
            }

            iterations += 1;
            objective_history.push(best);
        }

        // the budget may run out on the same iteration the target is hit
        if termination == Termination::IterationLimit {
            if let Some(stop) = Self::stop_reason(best, config, None, start) {
                if matches!(stop, Termination::TargetReached | Termination::LowerBound) {
                    termination = stop;
                }
            }
        }

        let degenerate = best >= INFINITE_DISTANCE;
        if degenerate {
            log::warn!("no finite p-center solution found; the graph is likely disconnected");
        }
        log::info!(
            "p-center n={n} p={p} seed={seed}: objective {best} after {iterations} iterations ({:?}, {:.3}s)",
            termination,
            start.elapsed().as_secs_f64()
        );

        Ok(PCenterResult {
            facilities: best_set,
            objective: best,
            iterations,
            best_iteration,
            objective_history,
            termination,
            degenerate,
            seed,
        })
    }

    /// Runs `workers` independent searches on the same instance and keeps
    /// the best result.
    ///
    /// Worker `w` is seeded with `base + w`, where `base` is `config.seed` or
    /// a fresh entropy seed, so the returned `seed` repeats the winning run
    /// on its own. Ties on the objective go to the lowest worker. With the
    /// `parallel` feature the workers share the rayon pool.
    pub fn run_multi_start(
        instance: &PCenterInstance,
        config: &PCenterConfig,
        workers: usize,
    ) -> Result<PCenterResult> {
        if workers == 0 {
            return Err(PCenterError::InvalidConfig(
                "workers must be at least 1".to_string(),
            ));
        }
        config.validate().map_err(PCenterError::InvalidConfig)?;
        let base = resolve_seed(config.seed);
        let solve = |w: usize| {
            let worker_config = config.clone().with_seed(base.wrapping_add(w as u64));
            Self::run(instance, &worker_config)
        };

        #[cfg(feature = "parallel")]
        let results = (0..workers)
            .into_par_iter()
            .map(solve)
            .collect::<Result<Vec<_>>>()?;

        #[cfg(not(feature = "parallel"))]
        let results = (0..workers).map(solve).collect::<Result<Vec<_>>>()?;

        let best = results
            .into_iter()
            .enumerate()
            .min_by_key(|(w, r)| (r.objective, *w))
            .map(|(_, r)| r)
            .ok_or_else(|| PCenterError::InvalidConfig("no worker finished".to_string()))?;
        log::info!(
            "multi-start with {workers} workers: best objective {} from seed {}",
            best.objective,
            best.seed
        );
        Ok(best)
    }

    fn stop_reason(
        best: Distance,
        config: &PCenterConfig,
        cancel: Option<&AtomicBool>,
        start: Instant,
    ) -> Option<Termination> {
        if config.target_objective.is_some_and(|t| best <= t) {
            return Some(Termination::TargetReached);
        }
        if best == 0 {
            return Some(Termination::LowerBound);
        }
        if cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
            return Some(Termination::Cancelled);
        }
        if config.time_limit.is_some_and(|limit| start.elapsed() >= limit) {
            return Some(Termination::TimeLimit);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{DistanceMatrix, Edge, FloydWarshall, Graph, RawInstance};
    use crate::pcenter::TenureRule;
    use proptest::prelude::*;
    use std::time::Duration;

    fn cycle4() -> PCenterInstance {
        let m = DistanceMatrix::from_rows(vec![
            vec![0, 1, 2, 1],
            vec![1, 0, 1, 2],
            vec![2, 1, 0, 1],
            vec![1, 2, 1, 0],
        ])
        .unwrap();
        PCenterInstance::new(m, 2).unwrap()
    }

    fn ring(n: usize, p: usize) -> PCenterInstance {
        let edges = (1..=n).map(|k| Edge::new(k, k % n + 1, 1)).collect();
        RawInstance {
            graph: Graph::from_edges(edges).unwrap(),
            p,
        }
        .build(&FloydWarshall)
        .unwrap()
    }

    fn brute_force(instance: &PCenterInstance) -> Distance {
        fn rec(
            m: &DistanceMatrix,
            p: usize,
            from: usize,
            chosen: &mut Vec<Vertex>,
            best: &mut Distance,
        ) {
            if chosen.len() == p {
                let obj = (0..m.len())
                    .map(|v| chosen.iter().map(|&f| m.get(v, f)).min().unwrap())
                    .max()
                    .unwrap();
                *best = (*best).min(obj);
                return;
            }
            for f in from..m.len() {
                chosen.push(f);
                rec(m, p, f + 1, chosen, best);
                chosen.pop();
            }
        }
        let mut best = Distance::MAX;
        rec(instance.matrix(), instance.p(), 0, &mut Vec::new(), &mut best);
        best
    }

    #[test]
    fn test_cycle4_reaches_optimum() {
        let instance = cycle4();
        for seed in 0..20 {
            let config = PCenterConfig::default().with_max_iterations(50).with_seed(seed);
            let result = PCenterRunner::run(&instance, &config).unwrap();
            assert_eq!(result.objective, 1, "seed {seed}");
            assert_eq!(result.facilities.len(), 2);
            assert!(!result.degenerate);
            assert!(result.iterations <= 50);
        }
    }

    #[test]
    fn test_target_stops_immediately() {
        let config = PCenterConfig::default()
            .with_target_objective(1)
            .with_seed(3);
        let result = PCenterRunner::run(&cycle4(), &config).unwrap();
        assert_eq!(result.termination, Termination::TargetReached);
        assert_eq!(result.iterations, 0);
        assert_eq!(result.objective_history, vec![1]);
    }

    #[test]
    fn test_ring_reaches_optimum() {
        // 12-ring with 3 centers: optimum radius 2
        let instance = ring(12, 3);
        assert_eq!(brute_force(&instance), 2);
        let config = PCenterConfig::default()
            .with_max_iterations(500)
            .with_target_objective(2)
            .with_seed(7);
        let result = PCenterRunner::run(&instance, &config).unwrap();
        assert_eq!(result.objective, 2);
        assert_eq!(result.termination, Termination::TargetReached);
        assert!(result.best_iteration <= result.iterations);
    }

    #[test]
    fn test_never_below_optimum() {
        let points: Vec<(f64, f64)> = (0..14)
            .map(|k| {
                let k = f64::from(k);
                ((k * 37.0) % 23.0, (k * 11.0) % 17.0)
            })
            .collect();
        let m = DistanceMatrix::from_coordinates(&points, 1.0).unwrap();
        let instance = PCenterInstance::new(m, 3).unwrap();
        let optimum = brute_force(&instance);
        let config = PCenterConfig::default().with_max_iterations(300).with_seed(1);
        let result = PCenterRunner::run(&instance, &config).unwrap();
        assert!(result.objective >= optimum);

        // the reported set really achieves the reported objective
        let m = instance.matrix();
        let achieved = (0..m.len())
            .map(|v| result.facilities.iter().map(|&f| m.get(v, f)).min().unwrap())
            .max()
            .unwrap();
        assert_eq!(achieved, result.objective);
    }

    #[test]
    fn test_p_equals_n_is_fixed_point() {
        let instance = ring(6, 6);
        let config = PCenterConfig::default().with_max_iterations(100).with_seed(5);
        let result = PCenterRunner::run(&instance, &config).unwrap();
        assert_eq!(result.objective, 0);
        assert_eq!(result.facilities, vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(result.iterations, 0);
        assert_eq!(result.termination, Termination::LowerBound);
    }

    #[test]
    fn test_disconnected_is_degenerate() {
        let raw = RawInstance {
            graph: Graph::from_edges(vec![
                Edge::new(1, 2, 3),
                Edge::new(2, 3, 1),
                Edge::new(4, 5, 2),
            ])
            .unwrap(),
            p: 1,
        };
        let instance = raw.build(&FloydWarshall).unwrap();
        let config = PCenterConfig::default().with_max_iterations(30).with_seed(9);
        let result = PCenterRunner::run(&instance, &config).unwrap();
        assert_eq!(result.objective, INFINITE_DISTANCE);
        assert!(result.degenerate);
        assert_eq!(result.facilities.len(), 1);
    }

    #[test]
    fn test_cancelled_before_start() {
        let flag = Arc::new(AtomicBool::new(true));
        let config = PCenterConfig::default().with_seed(1);
        let result = PCenterRunner::run_with_cancel(&ring(10, 2), &config, Some(flag)).unwrap();
        assert_eq!(result.termination, Termination::Cancelled);
        assert_eq!(result.iterations, 0);
        assert_eq!(result.facilities.len(), 2);
    }

    #[test]
    fn test_time_limit() {
        let config = PCenterConfig::default()
            .with_max_iterations(usize::MAX)
            .with_time_limit(Duration::from_millis(20))
            .with_seed(1);
        let result = PCenterRunner::run(&ring(40, 3), &config).unwrap();
        assert!(matches!(
            result.termination,
            Termination::TimeLimit | Termination::TargetReached
        ));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = PCenterConfig::default().with_tenure(TenureRule::Fixed(0));
        assert!(matches!(
            PCenterRunner::run(&cycle4(), &config),
            Err(PCenterError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_reproducible_with_seed() {
        let instance = ring(30, 4);
        let config = PCenterConfig::default().with_max_iterations(60).with_seed(11);
        let a = PCenterRunner::run(&instance, &config).unwrap();
        let b = PCenterRunner::run(&instance, &config).unwrap();
        assert_eq!(a.facilities, b.facilities);
        assert_eq!(a.objective_history, b.objective_history);
    }

    #[test]
    fn test_unseeded_run_can_be_repeated() {
        let instance = ring(30, 4);
        let config = PCenterConfig::default().with_max_iterations(60);
        let first = PCenterRunner::run(&instance, &config).unwrap();

        let again = PCenterRunner::run(&instance, &config.clone().with_seed(first.seed)).unwrap();
        assert_eq!(again.seed, first.seed);
        assert_eq!(again.facilities, first.facilities);
        assert_eq!(again.objective_history, first.objective_history);

        let seeded = PCenterRunner::run(&instance, &config.with_seed(5)).unwrap();
        assert_eq!(seeded.seed, 5);
    }

    #[test]
    fn test_reported_objective_matches_evaluation() {
        let instance = ring(25, 4);
        let config = PCenterConfig::default().with_max_iterations(100).with_seed(8);
        let result = PCenterRunner::run(&instance, &config).unwrap();
        assert_eq!(instance.evaluate(&result.facilities).unwrap(), result.objective);
    }

    #[test]
    fn test_multi_start_keeps_best_worker() {
        let instance = ring(30, 3);
        let config = PCenterConfig::default().with_max_iterations(40).with_seed(100);
        let best = PCenterRunner::run_multi_start(&instance, &config, 4).unwrap();

        let singles: Vec<PCenterResult> = (0..4)
            .map(|w| {
                PCenterRunner::run(&instance, &config.clone().with_seed(100 + w)).unwrap()
            })
            .collect();
        let min = singles.iter().map(|r| r.objective).min().unwrap();
        assert_eq!(best.objective, min);
        assert!((100..104).contains(&best.seed));

        let winner = singles.iter().find(|r| r.seed == best.seed).unwrap();
        assert_eq!(winner.objective_history, best.objective_history);
        assert_eq!(
            best.seed,
            singles.iter().find(|r| r.objective == min).unwrap().seed
        );
    }

    #[test]
    fn test_multi_start_rejects_zero_workers() {
        assert!(matches!(
            PCenterRunner::run_multi_start(&cycle4(), &PCenterConfig::default(), 0),
            Err(PCenterError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_tenure_rules_all_run() {
        let instance = ring(20, 3);
        for rule in [TenureRule::Scaled, TenureRule::NodeScaled, TenureRule::Fixed(3)] {
            let config = PCenterConfig::default()
                .with_max_iterations(200)
                .with_tenure(rule)
                .with_seed(2);
            let result = PCenterRunner::run(&instance, &config).unwrap();
            assert_eq!(result.facilities.len(), 3);
            assert!(result.objective <= 5, "{rule:?}: {}", result.objective);
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_history_non_increasing_and_size_p(
            pts in prop::collection::vec((0i32..30, 0i32..30), 3..16),
            p_seed in 0usize..100,
            seed in any::<u64>(),
        ) {
            let points: Vec<(f64, f64)> = pts
                .into_iter()
                .map(|(x, y)| (f64::from(x), f64::from(y)))
                .collect();
            let m = DistanceMatrix::from_coordinates(&points, 1.0).unwrap();
            let p = 1 + p_seed % m.len();
            let instance = PCenterInstance::new(m, p).unwrap();
            let config = PCenterConfig::default().with_max_iterations(40).with_seed(seed);
            let result = PCenterRunner::run(&instance, &config).unwrap();

            prop_assert_eq!(result.facilities.len(), p);
            prop_assert_eq!(result.objective_history.len(), result.iterations + 1);
            for w in result.objective_history.windows(2) {
                prop_assert!(w[1] <= w[0]);
            }
            prop_assert_eq!(*result.objective_history.last().unwrap(), result.objective);
        }
    }
}
