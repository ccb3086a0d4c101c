//! Tabu search for the vertex p-center problem.
//!
//! Chooses P of N vertices as facilities so that the largest distance from
//! any vertex to its nearest facility is minimal. The search swaps one open
//! facility for one closed vertex per iteration, restricting insertions to
//! the vertices that can relieve the current bottleneck and forbidding
//! recently swapped pairs for a randomized tenure.
//!
//! # Components
//!
//! - [`FacilityIndex`]: nearest and second-nearest facility per vertex,
//!   updated incrementally on open/close
//! - [`candidates`]: critical vertex selection and the insertion pool
//! - [`initial_solution`]: randomized greedy construction
//! - [`NeighborhoodEvaluator`]: swap estimates without committing them
//! - [`TabuManager`]: tenure memory and move selection with aspiration
//! - [`PCenterRunner`]: the iteration loop
//!
//! # References
//!
//! - Mladenović, N., Labbé, M. & Hansen, P. (2003). "Solving the p-Center
//!   problem with Tabu Search and Variable Neighborhood Search",
//!   *Networks* 42(1), 48-64.
//! - Vitter, J. S. (1985). "Random sampling with a reservoir",
//!   *ACM Transactions on Mathematical Software* 11(1), 37-57.

mod candidate;
mod config;
mod construct;
mod facility;
mod neighborhood;
mod runner;
mod tabu;
mod types;

pub use candidate::{candidates, candidates_into, critical_vertex};
pub use config::{PCenterConfig, TenureRule};
pub use construct::initial_solution;
pub use facility::FacilityIndex;
pub use neighborhood::NeighborhoodEvaluator;
pub use runner::{PCenterResult, PCenterRunner};
pub use tabu::{Selection, TabuManager};
pub use types::{Move, PCenterInstance, SwapEvaluation, Termination, Vertex, NO_FACILITY};
