//! Brute-force squared Euclidean index.

use ordered_float::OrderedFloat;
use rayon::prelude::*;
use std::cmp::Ordering;

use crate::error::{RagError, Result};
use crate::types::Neighbor;

/// Row count from which [`FlatIndex::search`] scans partitions in parallel.
pub const PARALLEL_THRESHOLD: usize = 16_384;

/// Rows per partition in the parallel scan.
const PARTITION_ROWS: usize = 4_096;

/// Squared Euclidean distance between two vectors of equal length.
#[must_use]
pub fn squared_euclidean(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b)
        .map(|(lhs, rhs)| {
            let diff = lhs - rhs;
            diff * diff
        })
        .sum()
}

/// Ascending distance, then ascending position.
fn by_rank(a: &Neighbor, b: &Neighbor) -> Ordering {
    OrderedFloat(a.distance)
        .cmp(&OrderedFloat(b.distance))
        .then(a.position.cmp(&b.position))
}

/// The `k` best rows of `block`, whose first row sits at `first_position` in the index.
fn top_k(block: &[f32], first_position: usize, query: &[f32], k: usize) -> Vec<Neighbor> {
    let mut scored: Vec<Neighbor> = block
        .chunks_exact(query.len())
        .enumerate()
        .map(|(row, vector)| Neighbor {
            position: first_position + row,
            distance: squared_euclidean(vector, query),
        })
        .collect();

    if scored.len() > k {
        scored.select_nth_unstable_by(k - 1, by_rank);
        scored.truncate(k);
    }
    scored.sort_unstable_by(by_rank);
    scored
}

fn merge(mut left: Vec<Neighbor>, right: Vec<Neighbor>, k: usize) -> Vec<Neighbor> {
    left.extend(right);
    left.sort_unstable_by(by_rank);
    left.truncate(k);
    left
}

/// An immutable, in-memory matrix of `N` vectors of dimension `D`.
///
/// # Example
///
/// ```rust
/// use sift_rag::FlatIndex;
///
/// let index = FlatIndex::build(vec![vec![0.0, 0.0], vec![1.0, 0.0], vec![10.0, 10.0]]).unwrap();
/// let hits = index.search(&[0.0, 0.0], 2).unwrap();
/// assert_eq!(hits[0].position, 0);
/// assert_eq!(hits[1].distance, 1.0);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct FlatIndex {
    dimension: usize,
    data: Vec<f32>,
}

impl FlatIndex {
    /// Builds an index from vectors; the first vector fixes the dimension.
    ///
    /// # Errors
    /// - [`RagError::EmptyInput`] if there are no vectors.
    /// - [`RagError::InvalidConfiguration`] if the first vector is empty.
    /// - [`RagError::DimensionMismatch`] if any vector's length differs from the first one's.
    pub fn build<I>(vectors: I) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: AsRef<[f32]>,
    {
        let mut vectors = vectors.into_iter();
        let first = vectors.next().ok_or(RagError::EmptyInput)?;
        let first = first.as_ref();
        let dimension = first.len();
        if dimension == 0 {
            return Err(RagError::InvalidConfiguration(
                "vectors must have at least one dimension".into(),
            ));
        }

        let mut data = Vec::with_capacity(dimension * (vectors.size_hint().0 + 1));
        data.extend_from_slice(first);
        for vector in vectors {
            let vector = vector.as_ref();
            if vector.len() != dimension {
                return Err(RagError::DimensionMismatch {
                    expected: dimension,
                    actual: vector.len(),
                });
            }
            data.extend_from_slice(vector);
        }

        let index = Self { dimension, data };
        tracing::info!(vectors = index.len(), dimension, "built flat index");
        Ok(index)
    }

    /// Wraps an already validated row-major matrix.
    pub(crate) fn from_raw(dimension: usize, data: Vec<f32>) -> Self {
        debug_assert!(dimension > 0 && data.len() % dimension == 0);
        Self { dimension, data }
    }

    /// Number of stored vectors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len() / self.dimension
    }

    /// Returns `true` if no vectors are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Dimension shared by every vector.
    #[must_use]
    pub const fn dimension(&self) -> usize {
        self.dimension
    }

    /// The vector stored at `position`.
    #[must_use]
    pub fn vector(&self, position: usize) -> Option<&[f32]> {
        let start = position.checked_mul(self.dimension)?;
        self.data.get(start..start + self.dimension)
    }

    /// Iterates over the stored vectors in position order.
    pub fn vectors(&self) -> impl ExactSizeIterator<Item = &[f32]> {
        self.data.chunks_exact(self.dimension)
    }

    /// The whole matrix, row-major.
    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Returns the `k` nearest vectors to `query`, closest first.
    ///
    /// Distances are squared Euclidean; equal distances are ordered by position. `k` is clamped
    /// to the number of stored vectors, and `k == 0` yields no results.
    ///
    /// # Errors
    /// [`RagError::DimensionMismatch`] if `query` does not have the index dimension.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor>> {
        if query.len() != self.dimension {
            return Err(RagError::DimensionMismatch {
                expected: self.dimension,
                actual: query.len(),
            });
        }

        let k = k.min(self.len());
        if k == 0 {
            return Ok(Vec::new());
        }

        let neighbors = if self.len() >= PARALLEL_THRESHOLD {
            self.data
                .par_chunks(PARTITION_ROWS * self.dimension)
                .enumerate()
                .map(|(partition, block)| top_k(block, partition * PARTITION_ROWS, query, k))
                .reduce(Vec::new, |left, right| merge(left, right, k))
        } else {
            top_k(&self.data, 0, query, k)
        };

        tracing::debug!(
            k,
            vectors = self.len(),
            nearest = neighbors.first().map(|n| n.distance),
            "searched flat index"
        );
        Ok(neighbors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toy_index() -> FlatIndex {
        FlatIndex::build(vec![vec![0.0, 0.0], vec![1.0, 0.0], vec![10.0, 10.0]]).unwrap()
    }

    #[test]
    fn golden_query() {
        let hits = toy_index().search(&[0.0, 0.0], 2).unwrap();
        assert_eq!(
            hits,
            [
                Neighbor {
                    position: 0,
                    distance: 0.0,
                },
                Neighbor {
                    position: 1,
                    distance: 1.0,
                },
            ]
        );
    }

    #[test]
    fn k_larger_than_len_returns_everything_sorted() {
        let hits = toy_index().search(&[9.0, 9.0], 10).unwrap();
        let positions: Vec<_> = hits.iter().map(|n| n.position).collect();
        assert_eq!(positions, [2, 1, 0]);
        assert!(hits.windows(2).all(|w| w[0].distance <= w[1].distance));
    }

    #[test]
    fn zero_k_is_empty() {
        assert!(toy_index().search(&[0.0, 0.0], 0).unwrap().is_empty());
    }

    #[test]
    fn ties_break_by_position() {
        let index = FlatIndex::build(vec![
            vec![1.0, 0.0],
            vec![0.0, 1.0],
            vec![-1.0, 0.0],
            vec![0.0, -1.0],
        ])
        .unwrap();
        let hits = index.search(&[0.0, 0.0], 3).unwrap();
        let positions: Vec<_> = hits.iter().map(|n| n.position).collect();
        assert_eq!(positions, [0, 1, 2]);
    }

    #[test]
    fn search_is_idempotent() {
        let index = toy_index();
        let first = index.search(&[0.5, 0.5], 3).unwrap();
        for _ in 0..5 {
            assert_eq!(index.search(&[0.5, 0.5], 3).unwrap(), first);
        }
    }

    #[test]
    fn empty_input_rejected() {
        let vectors: Vec<Vec<f32>> = Vec::new();
        assert!(matches!(FlatIndex::build(vectors), Err(RagError::EmptyInput)));
    }

    #[test]
    fn dimension_mismatch_rejected() {
        let result = FlatIndex::build(vec![vec![1.0, 0.0], vec![1.0, 0.0, 0.0]]);
        assert!(matches!(
            result,
            Err(RagError::DimensionMismatch { expected: 2, actual: 3 })
        ));

        let err = toy_index().search(&[1.0], 1).unwrap_err();
        assert!(matches!(err, RagError::DimensionMismatch { expected: 2, actual: 1 }));
    }

    #[test]
    fn zero_dimension_rejected() {
        let result = FlatIndex::build(vec![Vec::<f32>::new()]);
        assert!(matches!(result, Err(RagError::InvalidConfiguration(_))));
    }

    #[test]
    fn accessors() {
        let index = toy_index();
        assert_eq!(index.len(), 3);
        assert_eq!(index.dimension(), 2);
        assert!(!index.is_empty());
        assert_eq!(index.vector(2), Some(&[10.0, 10.0][..]));
        assert_eq!(index.vector(3), None);
        assert_eq!(index.vectors().len(), 3);
    }

    #[test]
    #[allow(clippy::cast_precision_loss)]
    fn parallel_scan_matches_serial_scan() {
        let rows = PARALLEL_THRESHOLD + PARTITION_ROWS + 17;
        // Many duplicate rows so ties cross partition boundaries.
        let vectors: Vec<Vec<f32>> = (0..rows)
            .map(|i| vec![(i % 97) as f32, (i % 13) as f32, 0.5])
            .collect();
        let index = FlatIndex::build(&vectors).unwrap();
        let query = [3.0, 4.0, 0.5];

        for k in [1, 5, 64, 500] {
            let parallel = index.search(&query, k).unwrap();
            let serial = top_k(index.as_slice(), 0, &query, k);
            assert_eq!(parallel, serial);
            assert_eq!(parallel.len(), k);
        }
    }

    #[test]
    fn exact_match_has_zero_distance() {
        let index = toy_index();
        for position in 0..index.len() {
            let query = index.vector(position).unwrap().to_vec();
            let hits = index.search(&query, index.len()).unwrap();
            assert_eq!(hits[0].position, position);
            assert_eq!(hits[0].distance, 0.0);
        }
    }
}
