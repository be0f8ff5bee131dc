//! Document sources for the transcript library.
//!
//! A document is one video: its ID, title, and raw timestamped transcript.

mod csv_file;
mod memory;

pub use csv_file::CsvDocumentSource;
pub use memory::MemoryDocumentSource;

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::warn;

/// A video transcript as loaded from the source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Unique video ID.
    #[serde(rename = "video_id")]
    pub document_id: String,
    /// Video title.
    pub title: String,
    /// Raw transcript text with embedded `m:ss` timestamps.
    pub transcript: String,
}

impl Document {
    /// Create a new document.
    pub fn new(
        document_id: impl Into<String>,
        title: impl Into<String>,
        transcript: impl Into<String>,
    ) -> Self {
        Self {
            document_id: document_id.into(),
            title: title.into(),
            transcript: transcript.into(),
        }
    }
}

/// Trait for document sources.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Load every document. Called once per index build.
    async fn load_documents(&self) -> Result<Vec<Document>>;

    /// Human-readable description of where documents come from.
    fn describe(&self) -> String;
}

/// Drop documents whose ID was already seen, keeping the first occurrence.
pub(crate) fn dedupe_documents(documents: Vec<Document>) -> Vec<Document> {
    let mut seen = HashSet::new();
    documents
        .into_iter()
        .filter(|doc| {
            let fresh = seen.insert(doc.document_id.clone());
            if !fresh {
                warn!("Skipping duplicate document ID: {}", doc.document_id);
            }
            fresh
        })
        .collect()
}
