//! In-memory vector index over transcript chunks.
//!
//! The index keeps a dense embedding matrix and the chunk list side by side:
//! row `i` of the matrix is the embedding of chunk `i`. Both are built
//! together and never mutated afterwards.

mod builder;
mod flat;

pub use builder::{ChunkPlan, Indexer};
pub use flat::{squared_distance, FlatIndex, Neighbor};

use crate::chunking::Chunk;
use crate::error::{ReelError, Result};

/// A search hit: a chunk and its squared distance to the query.
#[derive(Debug, Clone)]
pub struct SearchHit<'a> {
    /// Position of the chunk in the index.
    pub position: usize,
    /// The matched chunk.
    pub chunk: &'a Chunk,
    /// Squared Euclidean distance (lower is closer).
    pub distance: f32,
}

/// Embedding matrix plus the chunks it was built from.
#[derive(Debug, Clone)]
pub struct Index {
    vectors: FlatIndex,
    chunks: Vec<Chunk>,
}

impl Index {
    /// Pair an embedding matrix with its chunks.
    ///
    /// Fails if the row count differs from the chunk count.
    pub fn new(vectors: FlatIndex, chunks: Vec<Chunk>) -> Result<Self> {
        if vectors.len() != chunks.len() {
            return Err(ReelError::EmbeddingRejected(format!(
                "Index has {} vectors for {} chunks",
                vectors.len(),
                chunks.len()
            )));
        }
        Ok(Self { vectors, chunks })
    }

    /// Number of indexed chunks (and matrix rows).
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Embedding width.
    pub fn dimensions(&self) -> usize {
        self.vectors.dimensions()
    }

    /// All chunks in index order.
    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    pub fn vectors(&self) -> &FlatIndex {
        &self.vectors
    }

    /// Chunks belonging to one document, in index order.
    pub fn chunks_for_document<'a>(
        &'a self,
        document_id: &'a str,
    ) -> impl Iterator<Item = &'a Chunk> + 'a {
        self.chunks
            .iter()
            .filter(move |c| c.document_id == document_id)
    }

    /// Exact nearest-neighbor search, closest first.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<SearchHit<'_>>> {
        let neighbors = self.vectors.search(query, k)?;
        Ok(neighbors
            .into_iter()
            .map(|n| SearchHit {
                position: n.position,
                chunk: &self.chunks[n.position],
                distance: n.distance,
            })
            .collect())
    }
}
