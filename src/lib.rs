//! Tabu search for the vertex p-center facility location problem.
//!
//! Given a weighted undirected graph with N vertices and a count P, choose
//! P vertices as facilities so that the largest shortest-path distance from
//! any vertex to its nearest facility is minimal.
//!
//! - **Graph layer** ([`graph`]): edge-list graphs, all-pairs shortest
//!   paths (Floyd-Warshall or repeated Dijkstra), Euclidean matrices and
//!   instance readers for the OR-Library `pmed` format and JSON.
//! - **Search engine** ([`pcenter`]): incremental nearest/second-nearest
//!   facility bookkeeping, critical-vertex candidate restriction, swap
//!   evaluation without committing the swap, and a tabu memory with
//!   aspiration.
//! - **Batch and reporting** ([`batch`], [`report`]): many instances per
//!   call with isolated state, and append-only per-instance records.
//!
//! # Example
//!
//! ```
//! use u_pcenter::graph::{parse_pmed, FloydWarshall};
//! use u_pcenter::pcenter::{PCenterConfig, PCenterRunner};
//!
//! let raw = parse_pmed("4 4 2\n1 2 1\n2 3 1\n3 4 1\n4 1 1\n").unwrap();
//! let instance = raw.build(&FloydWarshall).unwrap();
//! let config = PCenterConfig::default().with_max_iterations(100).with_seed(7);
//!
//! let result = PCenterRunner::run(&instance, &config).unwrap();
//! assert_eq!(result.objective, 1);
//! ```
//!
//! # Features
//!
//! - `serde`: serialization of edges and records, JSON instance reader
//! - `parallel`: rayon-parallel Dijkstra rows, multi-start workers and batch
//!   solving

pub mod batch;
pub mod error;
pub mod graph;
pub mod pcenter;
pub mod random;
pub mod report;

pub use error::{PCenterError, Result};
