//! Graph input and the all-pairs distance layer.
//!
//! The search engine only ever sees a [`DistanceMatrix`]. How the matrix is
//! produced (shortest paths over an edge list via a [`DistanceOracle`], or
//! rounded euclidean distances between points) is decided here.

mod matrix;
mod oracle;
mod reader;

pub use matrix::{Distance, DistanceMatrix, INFINITE_DISTANCE, MAX_VERTICES};
pub use oracle::{Dijkstra, DistanceOracle, Edge, FloydWarshall, Graph};
pub use reader::{parse_pmed, read_pmed, RawInstance};

#[cfg(feature = "serde")]
pub use reader::{parse_json, read_json};
