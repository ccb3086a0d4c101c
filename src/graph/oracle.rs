//! Weighted graphs and all-pairs shortest-path oracles.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::matrix::{check_vertex_count, Distance, DistanceMatrix, INFINITE_DISTANCE};
use crate::error::{PCenterError, Result};

/// Undirected weighted edge between two 1-indexed vertices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Edge {
    pub source: usize,
    pub target: usize,
    pub length: Distance,
}

impl Edge {
    pub fn new(source: usize, target: usize, length: Distance) -> Self {
        Self {
            source,
            target,
            length,
        }
    }
}

/// Undirected weighted graph given as an edge list.
///
/// Vertex ids in the edges are 1-indexed; internally vertex `k` is `k - 1`.
/// Vertices with no incident edge cannot be represented unless the vertex
/// count is given explicitly.
#[derive(Debug, Clone)]
pub struct Graph {
    n: usize,
    edges: Vec<Edge>,
}

impl Graph {
    /// Builds a graph whose vertex count is the largest referenced id.
    pub fn from_edges(edges: Vec<Edge>) -> Result<Self> {
        let n = edges
            .iter()
            .map(|e| e.source.max(e.target))
            .max()
            .unwrap_or(0);
        Self::with_vertex_count(n, edges)
    }

    /// Builds a graph with an explicit vertex count, at most
    /// [`MAX_VERTICES`](super::MAX_VERTICES).
    pub fn with_vertex_count(n: usize, edges: Vec<Edge>) -> Result<Self> {
        if n == 0 {
            return Err(PCenterError::invalid_instance("graph has no vertices"));
        }
        check_vertex_count(n)?;
        for (k, e) in edges.iter().enumerate() {
            if e.source == 0 || e.target == 0 || e.source > n || e.target > n {
                return Err(PCenterError::invalid_instance(format!(
                    "edge {k} ({} -> {}) references a vertex outside 1..={n}",
                    e.source, e.target
                )));
            }
        }
        let graph = Self { n, edges };
        graph.check_overflow()?;
        Ok(graph)
    }

    pub fn vertex_count(&self) -> usize {
        self.n
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Sum of all edge lengths, an upper bound on any shortest path.
    pub fn total_length(&self) -> u64 {
        self.edges.iter().map(|e| u64::from(e.length)).sum()
    }

    /// Ensures that no real shortest path can reach the sentinel.
    fn check_overflow(&self) -> Result<()> {
        let total = self.total_length();
        if total >= u64::from(INFINITE_DISTANCE) {
            return Err(PCenterError::DistanceOverflow {
                total,
                limit: INFINITE_DISTANCE,
            });
        }
        Ok(())
    }

    /// Row-major direct-edge matrix; parallel edges keep the shortest length.
    fn direct_distances(&self) -> Vec<Distance> {
        let n = self.n;
        let mut g = vec![INFINITE_DISTANCE; n * n];
        for i in 0..n {
            g[i * n + i] = 0;
        }
        for e in &self.edges {
            let (s, t) = (e.source - 1, e.target - 1);
            if s == t {
                continue;
            }
            if e.length < g[s * n + t] {
                g[s * n + t] = e.length;
                g[t * n + s] = e.length;
            }
        }
        g
    }

    fn adjacency(&self) -> Vec<Vec<(usize, Distance)>> {
        let mut adj = vec![Vec::new(); self.n];
        for e in &self.edges {
            let (s, t) = (e.source - 1, e.target - 1);
            if s == t {
                continue;
            }
            adj[s].push((t, e.length));
            adj[t].push((s, e.length));
        }
        adj
    }
}

/// Produces the all-pairs shortest-path matrix of a graph.
///
/// Unreachable pairs are reported as [`INFINITE_DISTANCE`].
pub trait DistanceOracle {
    fn distances(&self, graph: &Graph) -> Result<DistanceMatrix>;
}

/// Floyd–Warshall relaxation, O(N³).
#[derive(Debug, Clone, Copy, Default)]
pub struct FloydWarshall;

impl DistanceOracle for FloydWarshall {
    fn distances(&self, graph: &Graph) -> Result<DistanceMatrix> {
        let n = graph.vertex_count();
        let mut g = graph.direct_distances();

        for k in 0..n {
            for i in 0..n {
                let ik = g[i * n + k];
                if ik >= INFINITE_DISTANCE {
                    continue;
                }
                for j in 0..n {
                    let through = ik + g[k * n + j];
                    if through < g[i * n + j] {
                        g[i * n + j] = through;
                    }
                }
            }
        }

        Ok(DistanceMatrix::from_flat(n, g))
    }
}

/// Repeated single-source Dijkstra, O(N · E log N).
///
/// Sources are solved independently, in parallel with the `parallel` feature.
#[derive(Debug, Clone, Copy, Default)]
pub struct Dijkstra;

impl Dijkstra {
    fn single_source(adj: &[Vec<(usize, Distance)>], source: usize) -> Vec<Distance> {
        let mut dist = vec![INFINITE_DISTANCE; adj.len()];
        let mut heap = BinaryHeap::new();
        dist[source] = 0;
        heap.push(Reverse((0, source)));

        while let Some(Reverse((d, u))) = heap.pop() {
            if d > dist[u] {
                continue;
            }
            for &(v, w) in &adj[u] {
                let nd = d + w;
                if nd < dist[v] {
                    dist[v] = nd;
                    heap.push(Reverse((nd, v)));
                }
            }
        }
        dist
    }
}

impl DistanceOracle for Dijkstra {
    fn distances(&self, graph: &Graph) -> Result<DistanceMatrix> {
        let n = graph.vertex_count();
        let adj = graph.adjacency();

        #[cfg(feature = "parallel")]
        let rows: Vec<Vec<Distance>> = (0..n)
            .into_par_iter()
            .map(|s| Self::single_source(&adj, s))
            .collect();

        #[cfg(not(feature = "parallel"))]
        let rows: Vec<Vec<Distance>> = (0..n).map(|s| Self::single_source(&adj, s)).collect();

        Ok(DistanceMatrix::from_flat(n, rows.concat()))
    }
}
