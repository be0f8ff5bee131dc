//! Index construction: parse, chunk, embed.

use super::{FlatIndex, Index};
use crate::chunking::{Chunk, WindowChunker};
use crate::embedding::Embedder;
use crate::error::{ReelError, Result};
use crate::retry::RetryPolicy;
use crate::source::Document;
use crate::transcript::TranscriptParser;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Chunks produced from a set of documents, before embedding.
#[derive(Debug, Clone, Default)]
pub struct ChunkPlan {
    /// All chunks across all documents, in document order.
    pub chunks: Vec<Chunk>,
    /// IDs of documents whose transcript yielded no utterances.
    pub skipped: Vec<String>,
}

impl ChunkPlan {
    /// Number of chunks contributed by one document.
    pub fn chunk_count(&self, document_id: &str) -> usize {
        self.chunks
            .iter()
            .filter(|c| c.document_id == document_id)
            .count()
    }
}

/// Builds the global index from a document set.
pub struct Indexer {
    parser: TranscriptParser,
    chunker: WindowChunker,
    embedder: Arc<dyn Embedder>,
    retry: RetryPolicy,
}

impl Indexer {
    /// Create an indexer with the given chunk window.
    pub fn new(embedder: Arc<dyn Embedder>, window_seconds: u64) -> Self {
        Self {
            parser: TranscriptParser::new(),
            chunker: WindowChunker::new(window_seconds),
            embedder,
            retry: RetryPolicy::none(),
        }
    }

    /// Set the retry policy for the embedding call.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Parse and chunk every document without embedding.
    pub fn chunk_documents(&self, documents: &[Document]) -> ChunkPlan {
        let mut plan = ChunkPlan::default();

        for document in documents {
            let utterances = self.parser.parse(&document.transcript);
            if utterances.is_empty() {
                debug!("No timestamped speech in {}, skipping", document.document_id);
                plan.skipped.push(document.document_id.clone());
                continue;
            }

            let windows = self.chunker.chunk(&utterances);
            debug!(
                "{}: {} utterances -> {} chunks",
                document.document_id,
                utterances.len(),
                windows.len()
            );
            plan.chunks.extend(
                windows
                    .into_iter()
                    .map(|w| Chunk::from_window(w, document)),
            );
        }

        plan
    }

    /// Build the index for all documents.
    ///
    /// Fails with [`ReelError::EmptyCorpus`] before calling the embedder if no
    /// document produced a chunk. Any embedding failure aborts the build.
    #[instrument(skip(self, documents), fields(documents = documents.len()))]
    pub async fn build(&self, documents: &[Document]) -> Result<(Index, ChunkPlan)> {
        let mut plan = self.chunk_documents(documents);
        if plan.chunks.is_empty() {
            return Err(ReelError::EmptyCorpus);
        }

        info!(
            "Embedding {} chunks from {} documents",
            plan.chunks.len(),
            documents.len() - plan.skipped.len()
        );

        let texts: Vec<String> = plan.chunks.iter().map(|c| c.text.clone()).collect();
        let embeddings = self
            .retry
            .run("Chunk embedding", || self.embedder.embed_batch(&texts))
            .await?;

        if embeddings.len() != texts.len() {
            return Err(ReelError::EmbeddingRejected(format!(
                "Expected {} embeddings, got {}",
                texts.len(),
                embeddings.len()
            )));
        }

        let vectors = FlatIndex::from_rows(embeddings)?;
        let chunks = std::mem::take(&mut plan.chunks);
        let index = Index::new(vectors, chunks)?;

        info!(
            "Built index with {} chunks ({} dimensions)",
            index.len(),
            index.dimensions()
        );
        Ok((index, plan))
    }
}
