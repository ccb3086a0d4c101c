//! Swap tenure memory and the move selection policy.

use rand::Rng;

use crate::graph::Distance;
use crate::random::reservoir_sample;

use super::config::TenureRule;
use super::types::{Move, SwapEvaluation, Vertex};

/// A move picked by [`TabuManager::select`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub mv: Move,
    /// Whether the move was taken from the tabu list (aspiration).
    pub aspiration: bool,
}

/// Per-pair tenure matrix.
///
/// `T[f][i]` is the iteration until which swapping `f` out for `i` is
/// forbidden. Entries start at zero, so no pair is tabu initially.
///
/// Stamps are stored as `u32` and saturate at `u32::MAX`; a run past that
/// many iterations sees every earlier pair as expired.
#[derive(Debug, Clone)]
pub struct TabuManager {
    n: usize,
    tenure: Vec<u32>,
}

impl TabuManager {
    pub fn new(n: usize) -> Self {
        Self {
            n,
            tenure: vec![0; n * n],
        }
    }

    /// Whether swapping `remove` out for `insert` is forbidden at `iteration`.
    #[inline]
    pub fn is_tabu(&self, remove: Vertex, insert: Vertex, iteration: usize) -> bool {
        self.tenure[remove * self.n + insert] as usize > iteration
    }

    /// Iteration until which the pair is forbidden.
    pub fn expiry(&self, remove: Vertex, insert: Vertex) -> usize {
        self.tenure[remove * self.n + insert] as usize
    }

    /// Forbids the pair in both directions until `until`.
    pub fn forbid(&mut self, remove: Vertex, insert: Vertex, until: usize) {
        let until = u32::try_from(until).unwrap_or(u32::MAX);
        self.tenure[remove * self.n + insert] = until;
        self.tenure[insert * self.n + remove] = until;
    }

    /// Draws a tenure length for an instance with `n` vertices and `p`
    /// facilities.
    pub fn draw_tenure<R: Rng>(rule: TenureRule, n: usize, p: usize, rng: &mut R) -> usize {
        match rule {
            TenureRule::Scaled => p / 5 + 5 + rng.random_range(1..=p / 10 + 5),
            TenureRule::NodeScaled => {
                let span = ((0.8 * p as f64) as usize).max(1);
                (0.6 * n as f64) as usize + rng.random_range(0..span)
            }
            TenureRule::Fixed(t) => t,
        }
    }

    /// Chooses the move to apply, or `None` when no move is available.
    ///
    /// In order of preference:
    /// 1. a free move that improves `best`;
    /// 2. a tabu move that improves `best` (aspiration);
    /// 3. any free move, even a non-improving one.
    ///
    /// Ties within a list are broken uniformly at random.
    pub fn select<R: Rng>(
        eval: &SwapEvaluation,
        best: Distance,
        rng: &mut R,
    ) -> Option<Selection> {
        let improves = |moves: &[Move]| moves.first().is_some_and(|m| m.objective < best);

        let (moves, aspiration) = if improves(eval.free.as_slice()) {
            (&eval.free, false)
        } else if improves(eval.tabu.as_slice()) {
            (&eval.tabu, true)
        } else if !eval.free.is_empty() {
            (&eval.free, false)
        } else {
            return None;
        };

        reservoir_sample(moves.iter().copied(), rng).map(|mv| Selection { mv, aspiration })
    }
}
