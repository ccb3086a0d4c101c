//! Seeded random number generation and uniform selection helpers.
//!
//! Every random decision in the solver flows through an explicitly passed
//! generator so that a fixed seed reproduces a run exactly.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Creates a deterministic generator from a seed.
pub fn create_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Returns `seed`, or a fresh entropy-drawn seed when `None`.
///
/// Callers keep the returned value so that an unseeded run can be repeated.
pub fn resolve_seed(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(rand::random)
}

/// Picks one element of a stream uniformly at random in a single pass.
///
/// The k-th element (1-based) replaces the current pick with probability
/// `1/k`, so every element of a stream of unknown length ends up selected
/// with probability `1/len`. Returns `None` for an empty stream.
///
/// # Examples
///
/// ```
/// use u_pcenter::random::{create_rng, reservoir_sample};
///
/// let mut rng = create_rng(7);
/// let pick = reservoir_sample((0..10).filter(|x| x % 3 == 0), &mut rng);
/// assert!(matches!(pick, Some(0 | 3 | 6 | 9)));
/// assert_eq!(reservoir_sample(std::iter::empty::<u8>(), &mut rng), None);
/// ```
pub fn reservoir_sample<T, I, R>(items: I, rng: &mut R) -> Option<T>
where
    I: IntoIterator<Item = T>,
    R: Rng,
{
    let mut chosen = None;
    for (seen, item) in items.into_iter().enumerate() {
        if rng.random_range(0..=seen) == 0 {
            chosen = Some(item);
        }
    }
    chosen
}
