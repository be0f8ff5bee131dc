//! Question retrieval over the chunk index.
//!
//! Embeds the question, runs an exact nearest-neighbor search and applies
//! document scoping. A scoped query whose top hits all belong to other
//! documents falls back to the scoped document's first chunks, so it never
//! comes back empty while that document has indexed content.

use crate::chunking::Chunk;
use crate::embedding::Embedder;
use crate::error::{ReelError, Result};
use crate::index::Index;
use crate::retry::RetryPolicy;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, instrument};

/// A chunk selected for a question.
#[derive(Debug, Clone, Serialize)]
pub struct RetrievedChunk {
    pub chunk: Chunk,
    /// Squared distance to the question; `None` for fallback chunks.
    pub distance: Option<f32>,
}

/// Result of a retrieval.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Retrieval {
    /// Selected chunks, most relevant first (or in index order on fallback).
    pub chunks: Vec<RetrievedChunk>,
    /// Whether the scoped fallback replaced the search result.
    pub fallback: bool,
}

impl Retrieval {
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Chunk texts joined by newlines, in result order.
    pub fn context(&self) -> String {
        self.chunks
            .iter()
            .map(|c| c.chunk.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Retrieves the chunks relevant to a question.
pub struct Retriever {
    embedder: Arc<dyn Embedder>,
    retry: RetryPolicy,
}

impl Retriever {
    /// Create a new retriever.
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self {
            embedder,
            retry: RetryPolicy::none(),
        }
    }

    /// Set the retry policy for the question embedding.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Retrieve up to `top_k` chunks for `question`.
    ///
    /// Fails with [`ReelError::IndexNotBuilt`] before any external call when
    /// `index` is `None`.
    #[instrument(skip(self, index, question))]
    pub async fn retrieve(
        &self,
        index: Option<&Index>,
        question: &str,
        top_k: usize,
        scope: Option<&str>,
    ) -> Result<Retrieval> {
        let index = index.ok_or(ReelError::IndexNotBuilt)?;
        if top_k == 0 {
            return Err(ReelError::InvalidInput("top_k must be positive".to_string()));
        }

        let query_embedding = self
            .retry
            .run("Question embedding", || self.embedder.embed(question))
            .await?;

        let hits = index.search(&query_embedding, top_k)?;
        debug!("Search returned {} hits", hits.len());

        let Some(document_id) = scope else {
            return Ok(Retrieval {
                chunks: hits
                    .into_iter()
                    .map(|h| RetrievedChunk {
                        chunk: h.chunk.clone(),
                        distance: Some(h.distance),
                    })
                    .collect(),
                fallback: false,
            });
        };

        let scoped: Vec<RetrievedChunk> = hits
            .into_iter()
            .filter(|h| h.chunk.document_id == document_id)
            .map(|h| RetrievedChunk {
                chunk: h.chunk.clone(),
                distance: Some(h.distance),
            })
            .collect();

        if !scoped.is_empty() {
            return Ok(Retrieval {
                chunks: scoped,
                fallback: false,
            });
        }

        debug!(
            "No top-{} hit in {}, falling back to its first chunks",
            top_k, document_id
        );
        Ok(Retrieval {
            chunks: index
                .chunks_for_document(document_id)
                .take(top_k)
                .map(|c| RetrievedChunk {
                    chunk: c.clone(),
                    distance: None,
                })
                .collect(),
            fallback: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::Indexer;
    use crate::source::Document;
    use crate::testing::{FailingEmbedder, KeywordEmbedder};

    fn documents() -> Vec<Document> {
        vec![
            Document::new(
                "city",
                "City life",
                "0:00 city streets\n0:40 city trains\n1:20 more city streets",
            ),
            Document::new("farm", "Farm life", "0:00 cows in fields\n1:00 farm work"),
            Document::new("school", "School days", "0:00 hello school\n0:50 school work"),
        ]
    }

    async fn build(embedder: Arc<KeywordEmbedder>) -> Index {
        let (index, _) = Indexer::new(embedder, 30)
            .build(&documents())
            .await
            .unwrap();
        index
    }

    #[tokio::test]
    async fn test_retrieve_without_index_fails_fast() {
        let embedder = Arc::new(KeywordEmbedder::default());
        let retriever = Retriever::new(embedder.clone());

        let err = retriever.retrieve(None, "city", 3, None).await.unwrap_err();
        assert!(matches!(err, ReelError::IndexNotBuilt));
        assert_eq!(embedder.batch_calls(), 0);
        assert_eq!(embedder.single_calls(), 0);
    }

    #[tokio::test]
    async fn test_unscoped_ranks_by_distance() {
        let embedder = Arc::new(KeywordEmbedder::default());
        let index = build(embedder.clone()).await;
        let retriever = Retriever::new(embedder.clone());

        let retrieval = retriever
            .retrieve(Some(&index), "city streets", 2, None)
            .await
            .unwrap();

        // One batch for the build, one single call for the question.
        assert_eq!(embedder.batch_calls(), 1);
        assert_eq!(embedder.single_calls(), 1);

        assert!(!retrieval.fallback);
        assert_eq!(retrieval.chunks.len(), 2);
        assert_eq!(retrieval.chunks[0].chunk.text, "city streets");
        assert!(retrieval.chunks[0].distance <= retrieval.chunks[1].distance);
        assert!(retrieval.chunks.iter().all(|c| c.chunk.document_id == "city"));
    }

    #[tokio::test]
    async fn test_scope_filters_hits() {
        let embedder = Arc::new(KeywordEmbedder::default());
        let index = build(embedder.clone()).await;
        let retriever = Retriever::new(embedder);

        let retrieval = retriever
            .retrieve(Some(&index), "school work", 3, Some("farm"))
            .await
            .unwrap();

        assert!(!retrieval.fallback);
        assert_eq!(retrieval.chunks.len(), 1);
        assert_eq!(retrieval.chunks[0].chunk.text, "farm work");
    }

    #[tokio::test]
    async fn test_scope_fallback_uses_index_order() {
        let embedder = Arc::new(KeywordEmbedder::default());
        let index = build(embedder.clone()).await;
        let retriever = Retriever::new(embedder);

        // Every top-1 hit is a city chunk, so the farm scope falls back.
        let retrieval = retriever
            .retrieve(Some(&index), "city city streets", 1, Some("farm"))
            .await
            .unwrap();

        assert!(retrieval.fallback);
        assert_eq!(retrieval.chunks.len(), 1);
        assert_eq!(retrieval.chunks[0].chunk.text, "cows in fields");
        assert!(retrieval.chunks[0].distance.is_none());
    }

    #[tokio::test]
    async fn test_scoped_never_empty_for_indexed_document() {
        let embedder = Arc::new(KeywordEmbedder::default());
        let index = build(embedder.clone()).await;
        let retriever = Retriever::new(embedder);

        for question in ["city", "cows", "school", "nothing matches this", ""] {
            for scope in ["city", "farm", "school"] {
                for k in 1..=4 {
                    let retrieval = retriever
                        .retrieve(Some(&index), question, k, Some(scope))
                        .await
                        .unwrap();
                    assert!(!retrieval.is_empty(), "{question:?} {scope} {k}");
                    assert!(retrieval.chunks.len() <= k);
                    assert!(retrieval.chunks.iter().all(|c| c.chunk.document_id == scope));
                }
            }
        }
    }

    #[tokio::test]
    async fn test_unknown_scope_is_empty() {
        let embedder = Arc::new(KeywordEmbedder::default());
        let index = build(embedder.clone()).await;
        let retriever = Retriever::new(embedder);

        let retrieval = retriever
            .retrieve(Some(&index), "city", 3, Some("missing"))
            .await
            .unwrap();
        assert!(retrieval.is_empty());
    }

    #[tokio::test]
    async fn test_context_joins_with_newlines() {
        let embedder = Arc::new(KeywordEmbedder::default());
        let index = build(embedder.clone()).await;
        let retriever = Retriever::new(embedder);

        let retrieval = retriever
            .retrieve(Some(&index), "cows farm", 2, Some("farm"))
            .await
            .unwrap();
        assert_eq!(retrieval.context(), "cows in fields\nfarm work");
    }

    #[tokio::test]
    async fn test_embedding_failure_propagates() {
        let embedder = Arc::new(KeywordEmbedder::default());
        let index = build(embedder).await;
        let retriever = Retriever::new(Arc::new(FailingEmbedder));

        let err = retriever
            .retrieve(Some(&index), "city", 3, None)
            .await
            .unwrap_err();
        assert_eq!(err.stage(), "embed");
    }

    #[tokio::test]
    async fn test_question_embedding_retried_until_budget() {
        let embedder = Arc::new(KeywordEmbedder::default());
        let index = build(embedder.clone()).await;
        let retriever = Retriever::new(embedder.clone())
            .with_retry(RetryPolicy::new(3, std::time::Duration::ZERO));

        embedder.set_failing(true);
        let err = retriever
            .retrieve(Some(&index), "city", 3, None)
            .await
            .unwrap_err();

        assert!(err.is_transient());
        assert_eq!(embedder.single_calls(), 3);
    }

    #[tokio::test]
    async fn test_zero_top_k_rejected() {
        let embedder = Arc::new(KeywordEmbedder::default());
        let index = build(embedder.clone()).await;
        let retriever = Retriever::new(embedder);

        let err = retriever.retrieve(Some(&index), "city", 0, None).await.unwrap_err();
        assert!(matches!(err, ReelError::InvalidInput(_)));
    }
}
