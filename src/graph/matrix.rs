//! Dense all-pairs distance matrix.

use crate::error::{PCenterError, Result};

/// Integer distance between two vertices.
pub type Distance = u32;

/// Sentinel for unreachable vertex pairs.
///
/// Kept at a quarter of the integer range so that the sentinel plus two path
/// sums never overflows during relaxation.
pub const INFINITE_DISTANCE: Distance = Distance::MAX / 4;

/// Largest vertex count accepted for a dense instance.
///
/// The matrix, its neighbour order and the tabu tenure table each hold N²
/// entries; at this bound they already take several gigabytes together.
pub const MAX_VERTICES: usize = 16_384;

/// Rejects vertex counts whose N² tables cannot be allocated.
pub(crate) fn check_vertex_count(n: usize) -> Result<()> {
    if n > MAX_VERTICES || n.checked_mul(n).is_none() {
        return Err(PCenterError::invalid_instance(format!(
            "{n} vertices exceed the supported maximum of {MAX_VERTICES}"
        )));
    }
    Ok(())
}

/// Immutable N×N distance matrix closed under shortest paths.
///
/// Besides the raw distances the matrix stores, for every vertex, all
/// vertices ordered by increasing `(distance, id)`. Candidate generation walks
/// these rows to enumerate the vertices closer than a radius without a full
/// scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistanceMatrix {
    n: usize,
    data: Vec<Distance>,
    order: Vec<usize>,
}

impl DistanceMatrix {
    /// Builds a matrix from explicit rows.
    ///
    /// The rows must form a non-empty square, symmetric matrix with a zero
    /// diagonal and no entry above [`INFINITE_DISTANCE`].
    ///
    /// # Examples
    ///
    /// ```
    /// use u_pcenter::graph::DistanceMatrix;
    ///
    /// let m = DistanceMatrix::from_rows(vec![vec![0, 3], vec![3, 0]]).unwrap();
    /// assert_eq!(m.len(), 2);
    /// assert_eq!(m.get(0, 1), 3);
    /// ```
    pub fn from_rows(rows: Vec<Vec<Distance>>) -> Result<Self> {
        let n = rows.len();
        if n == 0 {
            return Err(PCenterError::invalid_instance("distance matrix is empty"));
        }
        check_vertex_count(n)?;
        let mut data = Vec::with_capacity(n * n);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != n {
                return Err(PCenterError::invalid_instance(format!(
                    "row {i} has {} entries, expected {n}",
                    row.len()
                )));
            }
            data.extend(row);
        }

        for i in 0..n {
            if data[i * n + i] != 0 {
                return Err(PCenterError::invalid_instance(format!(
                    "diagonal entry ({i}, {i}) is not zero"
                )));
            }
            for j in (i + 1)..n {
                let d = data[i * n + j];
                if d != data[j * n + i] {
                    return Err(PCenterError::invalid_instance(format!(
                        "matrix is not symmetric at ({i}, {j})"
                    )));
                }
                if d > INFINITE_DISTANCE {
                    return Err(PCenterError::DistanceOverflow {
                        total: u64::from(d),
                        limit: INFINITE_DISTANCE,
                    });
                }
            }
        }

        Ok(Self::from_flat(n, data))
    }

    /// Builds a matrix for planar points, rounding `scale × euclidean` to the
    /// nearest integer.
    ///
    /// Scaling keeps fractional geometry meaningful under integer distances;
    /// objectives must be divided by `scale` to recover the original unit.
    pub fn from_coordinates(points: &[(f64, f64)], scale: f64) -> Result<Self> {
        let n = points.len();
        if n == 0 {
            return Err(PCenterError::invalid_instance("no points given"));
        }
        if !(scale.is_finite() && scale > 0.0) {
            return Err(PCenterError::invalid_instance(format!(
                "scale must be positive and finite, got {scale}"
            )));
        }
        check_vertex_count(n)?;

        let mut data = vec![0; n * n];
        for i in 0..n {
            let (xi, yi) = points[i];
            for j in (i + 1)..n {
                let (xj, yj) = points[j];
                let d = (scale * (xi - xj).hypot(yi - yj)).round();
                if !d.is_finite() || d >= f64::from(INFINITE_DISTANCE) {
                    return Err(PCenterError::DistanceOverflow {
                        total: if d.is_finite() { d as u64 } else { u64::MAX },
                        limit: INFINITE_DISTANCE,
                    });
                }
                let d = d as Distance;
                data[i * n + j] = d;
                data[j * n + i] = d;
            }
        }

        Ok(Self::from_flat(n, data))
    }

    /// Wraps an already validated row-major matrix.
    pub(crate) fn from_flat(n: usize, data: Vec<Distance>) -> Self {
        debug_assert_eq!(data.len(), n * n);
        let mut order = Vec::with_capacity(n * n);
        for i in 0..n {
            let row = &data[i * n..(i + 1) * n];
            let mut ids: Vec<usize> = (0..n).collect();
            ids.sort_unstable_by_key(|&j| (row[j], j));
            order.extend(ids);
        }
        Self { n, data, order }
    }

    /// Number of vertices.
    pub fn len(&self) -> usize {
        self.n
    }

    /// Always false for a constructed matrix; present for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    #[inline]
    pub fn get(&self, u: usize, v: usize) -> Distance {
        self.data[u * self.n + v]
    }

    /// Distances from `u` to every vertex.
    #[inline]
    pub fn row(&self, u: usize) -> &[Distance] {
        &self.data[u * self.n..(u + 1) * self.n]
    }

    /// All vertices ordered by increasing distance from `u` (ties by id).
    #[inline]
    pub fn neighbors_by_distance(&self, u: usize) -> &[usize] {
        &self.order[u * self.n..(u + 1) * self.n]
    }

    /// Vertices strictly closer to `u` than `radius`, nearest first.
    pub fn within(&self, u: usize, radius: Distance) -> impl Iterator<Item = usize> + '_ {
        let row = self.row(u);
        self.neighbors_by_distance(u)
            .iter()
            .copied()
            .take_while(move |&v| row[v] < radius)
    }

    /// Whether every pair of vertices is reachable.
    pub fn is_connected(&self) -> bool {
        self.data.iter().all(|&d| d < INFINITE_DISTANCE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cycle4() -> DistanceMatrix {
        DistanceMatrix::from_rows(vec![
            vec![0, 1, 2, 1],
            vec![1, 0, 1, 2],
            vec![2, 1, 0, 1],
            vec![1, 2, 1, 0],
        ])
        .unwrap()
    }

    #[test]
    fn test_from_rows_accessors() {
        let m = cycle4();
        assert_eq!(m.len(), 4);
        assert!(!m.is_empty());
        assert_eq!(m.get(0, 2), 2);
        assert_eq!(m.row(1), &[1, 0, 1, 2]);
        assert!(m.is_connected());
    }

    #[test]
    fn test_neighbor_order_ties_by_id() {
        let m = cycle4();
        assert_eq!(m.neighbors_by_distance(0), &[0, 1, 3, 2]);
        assert_eq!(m.neighbors_by_distance(2), &[2, 1, 3, 0]);
    }

    #[test]
    fn test_within_radius_is_strict() {
        let m = cycle4();
        let near: Vec<usize> = m.within(0, 2).collect();
        assert_eq!(near, vec![0, 1, 3]);
        assert_eq!(m.within(0, 0).count(), 0);
    }

    #[test]
    fn test_rejects_bad_rows() {
        assert!(DistanceMatrix::from_rows(vec![]).is_err());
        assert!(DistanceMatrix::from_rows(vec![vec![0, 1], vec![1]]).is_err());
        assert!(DistanceMatrix::from_rows(vec![vec![1, 1], vec![1, 0]]).is_err());
        assert!(DistanceMatrix::from_rows(vec![vec![0, 1], vec![2, 0]]).is_err());
        let too_far = INFINITE_DISTANCE + 1;
        assert!(matches!(
            DistanceMatrix::from_rows(vec![vec![0, too_far], vec![too_far, 0]]),
            Err(PCenterError::DistanceOverflow { .. })
        ));
    }

    #[test]
    fn test_sentinel_marks_disconnected() {
        let inf = INFINITE_DISTANCE;
        let m = DistanceMatrix::from_rows(vec![vec![0, inf], vec![inf, 0]]).unwrap();
        assert!(!m.is_connected());
    }

    #[test]
    fn test_from_coordinates() {
        let points = [(0.0, 0.0), (3.0, 4.0), (0.0, 1.5)];
        let m = DistanceMatrix::from_coordinates(&points, 10.0).unwrap();
        assert_eq!(m.get(0, 1), 50);
        assert_eq!(m.get(1, 0), 50);
        assert_eq!(m.get(0, 2), 15);
        assert_eq!(m.get(2, 2), 0);
        assert!(DistanceMatrix::from_coordinates(&points, 0.0).is_err());
        assert!(DistanceMatrix::from_coordinates(&[], 1.0).is_err());
    }
}
