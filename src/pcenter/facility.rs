//! Open facility set with incremental nearest/second-nearest bookkeeping.
//!
//! For every vertex `v` the index keeps the nearest open facility `F0[v]` and
//! the second-nearest `F1[v]` together with their distances `D0[v]` and
//! `D1[v]`. Facilities are ranked by `(distance, id)`, so the tables are a
//! pure function of the open set: opening and then closing a facility
//! restores them exactly.
//!
//! | Operation | Cost |
//! |-----------|------|
//! | [`FacilityIndex::add`] | O(N) |
//! | [`FacilityIndex::remove`] | O(N · P) worst case |
//! | [`FacilityIndex::is_open`] | O(1) |

use crate::graph::{Distance, DistanceMatrix, INFINITE_DISTANCE};

use super::types::{Vertex, NO_FACILITY};

/// Incrementally maintained facility assignment for one instance.
#[derive(Debug, Clone)]
pub struct FacilityIndex<'a> {
    matrix: &'a DistanceMatrix,
    /// Membership by vertex id.
    open: Vec<bool>,
    /// Open facilities, iteration order.
    members: Vec<Vertex>,
    /// Position of each open facility in `members`.
    position: Vec<usize>,
    f0: Vec<Vertex>,
    f1: Vec<Vertex>,
    d0: Vec<Distance>,
    d1: Vec<Distance>,
    objective: Distance,
}

impl<'a> FacilityIndex<'a> {
    /// Creates an index with no open facility.
    pub fn new(matrix: &'a DistanceMatrix) -> Self {
        let n = matrix.len();
        Self {
            matrix,
            open: vec![false; n],
            members: Vec::with_capacity(n),
            position: vec![usize::MAX; n],
            f0: vec![NO_FACILITY; n],
            f1: vec![NO_FACILITY; n],
            d0: vec![INFINITE_DISTANCE; n],
            d1: vec![INFINITE_DISTANCE; n],
            objective: INFINITE_DISTANCE,
        }
    }

    pub fn matrix(&self) -> &'a DistanceMatrix {
        self.matrix
    }

    /// Number of vertices.
    pub fn len(&self) -> usize {
        self.open.len()
    }

    pub fn is_empty(&self) -> bool {
        self.open.is_empty()
    }

    #[inline]
    pub fn is_open(&self, v: Vertex) -> bool {
        self.open[v]
    }

    pub fn open_count(&self) -> usize {
        self.members.len()
    }

    /// Open facilities in internal order.
    pub fn facilities(&self) -> &[Vertex] {
        &self.members
    }

    /// Open facilities sorted by id.
    pub fn snapshot(&self) -> Vec<Vertex> {
        let mut set = self.members.clone();
        set.sort_unstable();
        set
    }

    /// Current objective: the largest nearest-facility distance.
    #[inline]
    pub fn objective(&self) -> Distance {
        self.objective
    }

    /// Nearest open facility per vertex (`NO_FACILITY` when none).
    pub fn nearest(&self) -> &[Vertex] {
        &self.f0
    }

    /// Second-nearest open facility per vertex (`NO_FACILITY` when none).
    pub fn second(&self) -> &[Vertex] {
        &self.f1
    }

    pub fn nearest_distance(&self) -> &[Distance] {
        &self.d0
    }

    pub fn second_distance(&self) -> &[Distance] {
        &self.d1
    }

    /// Opens facility `f`.
    ///
    /// # Panics
    /// Panics if `f` is already open.
    pub fn add(&mut self, f: Vertex) {
        assert!(!self.open[f], "facility {f} is already open");
        self.open[f] = true;
        self.position[f] = self.members.len();
        self.members.push(f);

        let row = self.matrix.row(f);
        for (v, &d) in row.iter().enumerate() {
            let key = (d, f);
            if key < (self.d0[v], self.f0[v]) {
                self.d1[v] = self.d0[v];
                self.f1[v] = self.f0[v];
                self.d0[v] = d;
                self.f0[v] = f;
            } else if key < (self.d1[v], self.f1[v]) {
                self.d1[v] = d;
                self.f1[v] = f;
            }
        }
        self.refresh_objective();
    }

    /// Closes facility `f`.
    ///
    /// Vertices served by `f` fall back to their second-nearest facility and
    /// get a fresh second choice; vertices whose second choice was `f` only
    /// need the fresh second choice.
    ///
    /// # Panics
    /// Panics if `f` is not open.
    pub fn remove(&mut self, f: Vertex) {
        assert!(self.open[f], "facility {f} is not open");
        self.open[f] = false;
        let pos = self.position[f];
        self.members.swap_remove(pos);
        if let Some(&moved) = self.members.get(pos) {
            self.position[moved] = pos;
        }
        self.position[f] = usize::MAX;

        for v in 0..self.len() {
            if self.f0[v] == f {
                self.d0[v] = self.d1[v];
                self.f0[v] = self.f1[v];
                let (d, g) = self.find_next(v, self.f0[v]);
                self.d1[v] = d;
                self.f1[v] = g;
            } else if self.f1[v] == f {
                let (d, g) = self.find_next(v, self.f0[v]);
                self.d1[v] = d;
                self.f1[v] = g;
            }
        }
        self.refresh_objective();
    }

    /// Closest open facility to `v` other than `exclude`, ranked by
    /// `(distance, id)`. Returns the sentinel pair when there is none.
    pub fn find_next(&self, v: Vertex, exclude: Vertex) -> (Distance, Vertex) {
        let row = self.matrix.row(v);
        self.members
            .iter()
            .filter(|&&s| s != exclude)
            .map(|&s| (row[s], s))
            .min()
            .unwrap_or((INFINITE_DISTANCE, NO_FACILITY))
    }

    fn refresh_objective(&mut self) {
        self.objective = self.d0.iter().copied().max().unwrap_or(INFINITE_DISTANCE);
    }
}
