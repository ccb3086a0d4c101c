//! Randomized greedy construction of an initial facility set.

use rand::Rng;

use crate::random::reservoir_sample;

use super::candidate::candidates_into;
use super::facility::FacilityIndex;

/// Opens facilities until `p` are open.
///
/// The first facility is uniform over all vertices. Each further facility is
/// drawn uniformly from the insertion pool of a random critical vertex, so
/// every step targets the current bottleneck. When the pool is empty (the
/// objective is already zero) a uniformly random closed vertex is opened
/// instead, keeping the set size exact.
///
/// # Panics
/// Panics if `p` exceeds the vertex count or the index is not empty.
pub fn initial_solution<R: Rng>(index: &mut FacilityIndex<'_>, p: usize, rng: &mut R) {
    let n = index.len();
    assert!(p <= n, "cannot open {p} facilities on {n} vertices");
    assert_eq!(index.open_count(), 0, "construction needs an empty index");
    if p == 0 {
        return;
    }

    index.add(rng.random_range(0..n));

    let mut pool = Vec::new();
    while index.open_count() < p {
        candidates_into(index, rng, &mut pool);
        let next = match reservoir_sample(pool.iter().copied(), rng) {
            Some(v) => v,
            None => {
                let closed = (0..n).filter(|&v| !index.is_open(v));
                match reservoir_sample(closed, rng) {
                    Some(v) => v,
                    None => unreachable!("p <= n leaves a closed vertex"),
                }
            }
        };
        index.add(next);
    }

    log::debug!(
        "construction opened {} facilities, objective {}",
        index.open_count(),
        index.objective()
    );
}
