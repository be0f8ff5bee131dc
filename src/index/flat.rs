//! Exact, exhaustive nearest-neighbor search over a dense matrix.

use crate::error::{ReelError, Result};

/// A neighbor returned from a flat search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    /// Row position in the matrix.
    pub position: usize,
    /// Squared Euclidean distance to the query.
    pub distance: f32,
}

/// Row-major embedding matrix searched by squared Euclidean distance.
#[derive(Debug, Clone)]
pub struct FlatIndex {
    dimensions: usize,
    data: Vec<f32>,
}

impl FlatIndex {
    /// Build a matrix from equal-width rows.
    pub fn from_rows(rows: Vec<Vec<f32>>) -> Result<Self> {
        let dimensions = rows.first().map(|r| r.len()).unwrap_or(0);
        if dimensions == 0 && !rows.is_empty() {
            return Err(ReelError::EmbeddingRejected(
                "Embedding vectors are empty".to_string(),
            ));
        }

        let mut data = Vec::with_capacity(rows.len() * dimensions);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != dimensions {
                return Err(ReelError::EmbeddingRejected(format!(
                    "Embedding {} has {} dimensions, expected {}",
                    i,
                    row.len(),
                    dimensions
                )));
            }
            data.extend(row);
        }

        Ok(Self { dimensions, data })
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        if self.dimensions == 0 {
            0
        } else {
            self.data.len() / self.dimensions
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Row at `position`, if in range.
    pub fn row(&self, position: usize) -> Option<&[f32]> {
        let start = position.checked_mul(self.dimensions)?;
        self.data.get(start..start + self.dimensions)
    }

    /// The `k` closest rows to `query`, ascending by distance.
    ///
    /// Equal distances keep row order. Returns fewer than `k` neighbors when
    /// the matrix has fewer rows.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor>> {
        if self.is_empty() {
            return Ok(Vec::new());
        }
        if query.len() != self.dimensions {
            return Err(ReelError::Search(format!(
                "Query has {} dimensions, index has {}",
                query.len(),
                self.dimensions
            )));
        }

        let mut neighbors: Vec<Neighbor> = self
            .data
            .chunks_exact(self.dimensions)
            .enumerate()
            .map(|(position, row)| Neighbor {
                position,
                distance: squared_distance(query, row),
            })
            .collect();

        // Stable sort keeps insertion order for ties
        neighbors.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        neighbors.truncate(k);

        Ok(neighbors)
    }
}

/// Squared Euclidean distance between two equal-length vectors.
pub fn squared_distance(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}
