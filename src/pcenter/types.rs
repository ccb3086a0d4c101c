//! Core types of the p-center search.

use crate::error::{PCenterError, Result};
use crate::graph::{Distance, DistanceMatrix, INFINITE_DISTANCE};

/// Vertex id in `0..N`.
pub type Vertex = usize;

/// Marks an empty nearest/second-nearest slot.
pub const NO_FACILITY: Vertex = Vertex::MAX;

/// A validated p-center instance: a distance matrix and the facility count.
#[derive(Debug, Clone)]
pub struct PCenterInstance {
    matrix: DistanceMatrix,
    p: usize,
}

impl PCenterInstance {
    /// Validates `1 <= p <= N`.
    pub fn new(matrix: DistanceMatrix, p: usize) -> Result<Self> {
        let n = matrix.len();
        if n == 0 {
            return Err(PCenterError::invalid_instance("instance has no vertices"));
        }
        if p == 0 {
            return Err(PCenterError::invalid_instance("P must be at least 1"));
        }
        if p > n {
            return Err(PCenterError::invalid_instance(format!(
                "P = {p} exceeds the vertex count N = {n}"
            )));
        }
        Ok(Self { matrix, p })
    }

    pub fn matrix(&self) -> &DistanceMatrix {
        &self.matrix
    }

    pub fn n(&self) -> usize {
        self.matrix.len()
    }

    pub fn p(&self) -> usize {
        self.p
    }

    /// Recomputes the objective of a facility set from scratch.
    ///
    /// The set must hold exactly P distinct vertices in `0..N`; anything else
    /// is reported as [`PCenterError::InvalidInstance`]. Runs in O(N·P).
    ///
    /// # Examples
    ///
    /// ```
    /// use u_pcenter::graph::DistanceMatrix;
    /// use u_pcenter::pcenter::PCenterInstance;
    ///
    /// let m = DistanceMatrix::from_rows(vec![vec![0, 4, 6], vec![4, 0, 2], vec![6, 2, 0]])
    ///     .unwrap();
    /// let instance = PCenterInstance::new(m, 1).unwrap();
    /// assert_eq!(instance.evaluate(&[1]).unwrap(), 4);
    /// assert!(instance.evaluate(&[3]).is_err());
    /// ```
    pub fn evaluate(&self, facilities: &[Vertex]) -> Result<Distance> {
        let n = self.n();
        if facilities.len() != self.p {
            return Err(PCenterError::invalid_instance(format!(
                "facility set has {} vertices, expected P = {}",
                facilities.len(),
                self.p
            )));
        }
        let mut seen = vec![false; n];
        for &f in facilities {
            if f >= n {
                return Err(PCenterError::invalid_instance(format!(
                    "facility {f} is outside 0..{n}"
                )));
            }
            if std::mem::replace(&mut seen[f], true) {
                return Err(PCenterError::invalid_instance(format!(
                    "facility {f} appears more than once"
                )));
            }
        }

        let objective = (0..n)
            .map(|v| {
                facilities
                    .iter()
                    .map(|&f| self.matrix.get(v, f))
                    .min()
                    .unwrap_or(INFINITE_DISTANCE)
            })
            .max()
            .unwrap_or(0);
        Ok(objective)
    }
}

/// A facility swap: close `remove`, open `insert`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    pub remove: Vertex,
    pub insert: Vertex,
    /// Estimated objective after the swap.
    pub objective: Distance,
}

/// Outcome of one neighborhood evaluation.
///
/// Both lists only hold moves whose estimate equals `objective`, the minimum
/// over every evaluated pair; they differ by tabu status.
#[derive(Debug, Clone, Default)]
pub struct SwapEvaluation {
    pub tabu: Vec<Move>,
    pub free: Vec<Move>,
    /// `None` when no pair was evaluated.
    pub objective: Option<Distance>,
}

impl SwapEvaluation {
    pub fn is_empty(&self) -> bool {
        self.tabu.is_empty() && self.free.is_empty()
    }

    pub(crate) fn clear(&mut self) {
        self.tabu.clear();
        self.free.clear();
        self.objective = None;
    }
}

/// Why a search run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The iteration budget was used up.
    IterationLimit,
    /// The best objective reached the configured target bound.
    TargetReached,
    /// The best objective is zero and cannot improve.
    LowerBound,
    /// The cancellation flag was raised.
    Cancelled,
    /// The wall-clock limit elapsed.
    TimeLimit,
}
