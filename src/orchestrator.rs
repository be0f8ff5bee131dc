//! Application state and pipeline coordination for Reel.
//!
//! The orchestrator owns the current [`KnowledgeBase`]: the documents and
//! index from the last successful build. A rebuild prepares a complete new
//! generation and swaps it in at once, so readers see either the old or the
//! new one, never a mix. A failed rebuild leaves the old generation serving.

use crate::chunking::Chunk;
use crate::config::{Prompts, Settings};
use crate::embedding::{Embedder, OpenAIEmbedder};
use crate::error::{ReelError, Result};
use crate::generation::{Generator, OpenAIGenerator};
use crate::index::{Index, Indexer};
use crate::rag::{
    citations, format_context_for_prompt, AnswerSynthesizer, Citation, RagResponse,
};
use crate::retrieval::{Retrieval, Retriever};
use crate::retry::RetryPolicy;
use crate::source::{CsvDocumentSource, Document, DocumentSource};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::{Arc, RwLock};
use tokio::sync::Mutex;
use tracing::{info, instrument, warn};

/// One build generation: documents plus the index built from them.
#[derive(Debug)]
pub struct KnowledgeBase {
    pub documents: Vec<Document>,
    pub index: Index,
    /// Documents whose transcript produced no chunks.
    pub skipped: Vec<String>,
    pub built_at: DateTime<Utc>,
}

impl KnowledgeBase {
    /// Look up a document by ID.
    pub fn document(&self, document_id: &str) -> Option<&Document> {
        self.documents.iter().find(|d| d.document_id == document_id)
    }

    pub fn stats(&self) -> IndexStats {
        IndexStats {
            documents: self.documents.len(),
            skipped_documents: self.skipped.clone(),
            chunks: self.index.len(),
            dimensions: self.index.dimensions(),
            built_at: self.built_at,
        }
    }
}

/// Summary of an index build.
#[derive(Debug, Clone, Serialize)]
pub struct IndexStats {
    pub documents: usize,
    pub skipped_documents: Vec<String>,
    pub chunks: usize,
    pub dimensions: usize,
    pub built_at: DateTime<Utc>,
}

/// Per-document overview, available without embedding.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentOverview {
    pub document_id: String,
    pub title: String,
    pub chunk_count: usize,
    /// Start of the last chunk, in seconds.
    pub last_timestamp: u64,
}

/// The main orchestrator for the Reel pipeline.
pub struct Orchestrator {
    settings: Settings,
    source: Arc<dyn DocumentSource>,
    indexer: Indexer,
    retriever: Retriever,
    synthesizer: AnswerSynthesizer,
    current: RwLock<Option<Arc<KnowledgeBase>>>,
    rebuild_lock: Mutex<()>,
}

impl Orchestrator {
    /// Create an orchestrator with the CSV source and OpenAI services from settings.
    pub fn new(settings: Settings) -> Result<Self> {
        let prompts = Prompts::load(
            settings.prompts.custom_dir.as_deref(),
            Some(&settings.prompts.variables),
        )?;

        let source = Arc::new(CsvDocumentSource::new(settings.source_path()));

        let embedder = Arc::new(OpenAIEmbedder::with_config(
            &settings.embedding.model,
            settings.embedding.dimensions as usize,
        )?);

        let generator = Arc::new(
            OpenAIGenerator::new(&settings.generation.model)?
                .with_temperature(settings.generation.temperature),
        );

        Self::with_components(settings, prompts, source, embedder, generator)
    }

    /// Create an orchestrator with custom components.
    pub fn with_components(
        settings: Settings,
        prompts: Prompts,
        source: Arc<dyn DocumentSource>,
        embedder: Arc<dyn Embedder>,
        generator: Arc<dyn Generator>,
    ) -> Result<Self> {
        settings.validate()?;
        let retry = RetryPolicy::from_settings(&settings.retry);

        let indexer =
            Indexer::new(embedder.clone(), settings.chunking.window_seconds).with_retry(retry);
        let retriever = Retriever::new(embedder).with_retry(retry);
        let synthesizer = AnswerSynthesizer::new(generator)
            .with_prompts(prompts)
            .with_retry(retry);

        Ok(Self {
            settings,
            source,
            indexer,
            retriever,
            synthesizer,
            current: RwLock::new(None),
            rebuild_lock: Mutex::new(()),
        })
    }

    /// Get the settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The current build generation, if any.
    pub fn knowledge_base(&self) -> Option<Arc<KnowledgeBase>> {
        self.current
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Stats of the current build generation, if any.
    pub fn stats(&self) -> Option<IndexStats> {
        self.knowledge_base().map(|kb| kb.stats())
    }

    /// Reload every document and rebuild the index from scratch.
    ///
    /// At most one rebuild runs at a time. Readers keep using the previous
    /// generation until the new one is complete.
    #[instrument(skip(self))]
    pub async fn rebuild_index(&self) -> Result<IndexStats> {
        let _guard = self.rebuild_lock.lock().await;

        info!("Loading documents from {}", self.source.describe());
        let documents = self.source.load_documents().await?;

        let (index, plan) = match self.indexer.build(&documents).await {
            Ok(built) => built,
            Err(e) => {
                warn!("Index build failed, keeping previous index: {}", e);
                return Err(e);
            }
        };

        let knowledge_base = Arc::new(KnowledgeBase {
            documents,
            index,
            skipped: plan.skipped,
            built_at: Utc::now(),
        });
        let stats = knowledge_base.stats();

        *self.current.write().unwrap_or_else(|e| e.into_inner()) = Some(knowledge_base);

        info!(
            "Indexed {} chunks from {} documents ({} skipped)",
            stats.chunks,
            stats.documents - stats.skipped_documents.len(),
            stats.skipped_documents.len()
        );
        Ok(stats)
    }

    /// Retrieve chunks for a question without generating an answer.
    pub async fn search(
        &self,
        question: &str,
        top_k: Option<usize>,
        scope: Option<&str>,
    ) -> Result<Retrieval> {
        let knowledge_base = self.knowledge_base();
        let top_k = self.settings.retrieval.resolve_top_k(top_k);

        self.retriever
            .retrieve(knowledge_base.as_ref().map(|kb| &kb.index), question, top_k, scope)
            .await
    }

    /// Retrieve chunks for a question and build their citations.
    pub async fn search_citations(
        &self,
        question: &str,
        top_k: Option<usize>,
        scope: Option<&str>,
    ) -> Result<(Vec<Citation>, bool)> {
        let retrieval = self.search(question, top_k, scope).await?;
        Ok((
            citations(&retrieval, &self.settings.source.playback_base_url),
            retrieval.fallback,
        ))
    }

    /// Answer a question grounded in the retrieved chunks.
    #[instrument(skip(self), fields(question = %question))]
    pub async fn ask(
        &self,
        question: &str,
        top_k: Option<usize>,
        scope: Option<&str>,
    ) -> Result<RagResponse> {
        if question.trim().is_empty() {
            return Err(ReelError::InvalidInput("Question is empty".to_string()));
        }

        let (sources, fallback) = self.search_citations(question, top_k, scope).await?;
        let context = format_context_for_prompt(&sources);
        let answer = self.synthesizer.answer(question, &context).await?;

        Ok(RagResponse {
            answer,
            sources,
            fallback,
        })
    }

    /// Summarize one document.
    ///
    /// Uses the documents of the current generation, or loads them from the
    /// source when nothing has been built yet. Summaries do not need the index.
    pub async fn summarize(&self, document_id: &str) -> Result<String> {
        let document = match self.knowledge_base() {
            Some(kb) => kb.document(document_id).cloned(),
            None => self
                .source
                .load_documents()
                .await?
                .into_iter()
                .find(|d| d.document_id == document_id),
        }
        .ok_or_else(|| ReelError::DocumentNotFound(document_id.to_string()))?;

        self.synthesizer.summarize(&document).await
    }

    /// Documents of the current generation, with their indexed chunk counts.
    pub fn documents(&self) -> Option<Vec<DocumentOverview>> {
        self.knowledge_base()
            .map(|kb| overview_of(&kb.documents, kb.index.chunks()))
    }

    /// Load, parse and chunk every document without embedding.
    pub async fn overview(&self) -> Result<Vec<DocumentOverview>> {
        let documents = self.source.load_documents().await?;
        let plan = self.indexer.chunk_documents(&documents);
        Ok(overview_of(&documents, &plan.chunks))
    }
}

fn overview_of(documents: &[Document], chunks: &[Chunk]) -> Vec<DocumentOverview> {
    documents
        .iter()
        .map(|doc| {
            let chunks: Vec<_> = chunks
                .iter()
                .filter(|c| c.document_id == doc.document_id)
                .collect();
            DocumentOverview {
                document_id: doc.document_id.clone(),
                title: doc.title.clone(),
                chunk_count: chunks.len(),
                last_timestamp: chunks.last().map(|c| c.start).unwrap_or(0),
            }
        })
        .collect()
}
