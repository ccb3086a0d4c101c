//! Critical vertices and insertion candidates.
//!
//! A critical vertex realizes the current objective. Any swap that lowers the
//! objective must open a facility strictly closer to it than the objective,
//! so those vertices form the insertion pool.

use rand::Rng;

use crate::random::reservoir_sample;

use super::facility::FacilityIndex;
use super::types::Vertex;

/// Picks one critical vertex uniformly at random.
///
/// Returns `None` only for an empty index.
pub fn critical_vertex<R: Rng>(index: &FacilityIndex<'_>, rng: &mut R) -> Option<Vertex> {
    let max_dist = index.objective();
    let critical = index
        .nearest_distance()
        .iter()
        .enumerate()
        .filter(move |&(_, &d)| d == max_dist)
        .map(|(v, _)| v);
    reservoir_sample(critical, rng)
}

/// Fills `out` with the closed vertices strictly closer to a random critical
/// vertex than the current objective, nearest first.
///
/// The pool is empty when the objective is already zero.
pub fn candidates_into<R: Rng>(index: &FacilityIndex<'_>, rng: &mut R, out: &mut Vec<Vertex>) {
    out.clear();
    let Some(critical) = critical_vertex(index, rng) else {
        return;
    };
    let radius = index.objective();
    out.extend(
        index
            .matrix()
            .within(critical, radius)
            .filter(|&v| !index.is_open(v)),
    );
}

/// Allocating form of [`candidates_into`].
pub fn candidates<R: Rng>(index: &FacilityIndex<'_>, rng: &mut R) -> Vec<Vertex> {
    let mut out = Vec::new();
    candidates_into(index, rng, &mut out);
    out
}
