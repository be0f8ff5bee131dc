//! RAG (Retrieval-Augmented Generation) for question answering with sources.
//!
//! Turns retrieved chunks into a grounding context and citations, and asks the
//! generator for an answer constrained to that context.

pub mod context;
mod response;

pub use context::{citations, format_context_for_display, format_context_for_prompt};
pub use response::{AnswerSynthesizer, RagResponse};

use crate::retrieval::RetrievedChunk;
use serde::Serialize;

/// A retrieved chunk formatted for citation.
#[derive(Debug, Clone, Serialize)]
pub struct Citation {
    /// Video ID.
    pub document_id: String,
    /// Video title.
    pub title: String,
    /// Start time in seconds.
    pub start: u64,
    /// End time in seconds.
    pub end: u64,
    /// Formatted start timestamp (e.g., "02:34").
    pub timestamp: String,
    /// Chunk text.
    pub text: String,
    /// Squared distance to the question, if ranked by search.
    pub distance: Option<f32>,
    /// Playback URL starting at this chunk.
    pub url: Option<String>,
}

impl From<RetrievedChunk> for Citation {
    fn from(retrieved: RetrievedChunk) -> Self {
        let chunk = retrieved.chunk;
        Self {
            timestamp: chunk.format_timestamp(),
            document_id: chunk.document_id,
            title: chunk.title,
            start: chunk.start,
            end: chunk.end,
            text: chunk.text,
            distance: retrieved.distance,
            url: None, // Filled in by `citations`
        }
    }
}
