//! In-memory document source.
//!
//! Useful for testing and for embedding Reel in another program.

use super::{dedupe_documents, Document, DocumentSource};
use crate::error::Result;
use async_trait::async_trait;
use std::sync::RwLock;

/// In-memory document source.
pub struct MemoryDocumentSource {
    documents: RwLock<Vec<Document>>,
}

impl MemoryDocumentSource {
    /// Create a source serving the given documents.
    pub fn new(documents: Vec<Document>) -> Self {
        Self {
            documents: RwLock::new(documents),
        }
    }

    /// Replace the documents served by the next load.
    pub fn replace(&self, documents: Vec<Document>) {
        let mut docs = self.documents.write().unwrap_or_else(|e| e.into_inner());
        *docs = documents;
    }
}

impl Default for MemoryDocumentSource {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

#[async_trait]
impl DocumentSource for MemoryDocumentSource {
    async fn load_documents(&self) -> Result<Vec<Document>> {
        let docs = self.documents.read().unwrap_or_else(|e| e.into_inner());
        Ok(dedupe_documents(docs.clone()))
    }

    fn describe(&self) -> String {
        "in-memory".to_string()
    }
}
