//! Swap neighborhood evaluation.
//!
//! For each insertion candidate `i` the evaluator opens `i`, then estimates
//! closing every other facility `f` without actually removing it: vertices
//! served by `f` would fall back to their second-nearest facility, so the
//! worst of their second distances, `M[f]`, bounds what closing `f` costs.
//! The swap estimate is `max(objective with i open, M[f])`. The tentative
//! insertion is undone before the next candidate, leaving the index as it
//! was.

use crate::graph::Distance;

use super::facility::FacilityIndex;
use super::tabu::TabuManager;
use super::types::{Move, SwapEvaluation, Vertex};

/// Evaluates candidate swaps; owns the per-facility scratch buffer `M`.
#[derive(Debug, Clone)]
pub struct NeighborhoodEvaluator {
    max_service: Vec<Distance>,
    eval: SwapEvaluation,
}

impl NeighborhoodEvaluator {
    pub fn new(n: usize) -> Self {
        Self {
            max_service: vec![0; n],
            eval: SwapEvaluation::default(),
        }
    }

    /// Finds every best-estimated `(f, i)` swap for the given insertion pool.
    ///
    /// All moves sharing the minimal estimate are kept, split by tabu status
    /// at `iteration`. Candidates that are already open are skipped.
    pub fn find_pair(
        &mut self,
        index: &mut FacilityIndex<'_>,
        candidates: &[Vertex],
        tabu: &TabuManager,
        iteration: usize,
    ) -> &SwapEvaluation {
        self.eval.clear();
        let mut best = Distance::MAX;

        for &insert in candidates {
            if index.is_open(insert) {
                continue;
            }
            index.add(insert);
            self.fill_max_service(index);

            let current = index.objective();
            for &remove in index.facilities() {
                if remove == insert {
                    continue;
                }
                let objective = current.max(self.max_service[remove]);
                if objective > best {
                    continue;
                }
                if objective < best {
                    best = objective;
                    self.eval.tabu.clear();
                    self.eval.free.clear();
                }
                let mv = Move {
                    remove,
                    insert,
                    objective,
                };
                if tabu.is_tabu(remove, insert, iteration) {
                    self.eval.tabu.push(mv);
                } else {
                    self.eval.free.push(mv);
                }
            }

            index.remove(insert);
        }

        if !self.eval.is_empty() {
            self.eval.objective = Some(best);
        }
        &self.eval
    }

    /// `M[f]` = largest second-nearest distance among vertices served by `f`.
    fn fill_max_service(&mut self, index: &FacilityIndex<'_>) {
        for &f in index.facilities() {
            self.max_service[f] = 0;
        }
        let served_by = index.nearest();
        for (v, &d1) in index.second_distance().iter().enumerate() {
            let f = served_by[v];
            if d1 > self.max_service[f] {
                self.max_service[f] = d1;
            }
        }
    }
}
