//! CSV document source.
//!
//! Expects a header row with `video_id`, `title` and `transcript` columns.
//! Transcripts are usually multi-line quoted fields.

use super::{dedupe_documents, Document, DocumentSource};
use crate::error::{ReelError, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

/// Document source backed by a CSV file.
pub struct CsvDocumentSource {
    path: PathBuf,
}

impl CsvDocumentSource {
    /// Create a source reading from the given CSV file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse documents from CSV bytes.
    pub fn parse(bytes: &[u8]) -> Result<Vec<Document>> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::Headers)
            .from_reader(bytes);

        let headers = reader.headers()?.clone();
        for required in ["video_id", "title", "transcript"] {
            if !headers.iter().any(|h| h.trim() == required) {
                return Err(ReelError::Source(format!(
                    "Missing required column '{}'",
                    required
                )));
            }
        }

        let mut documents = Vec::new();
        for record in reader.deserialize::<Document>() {
            documents.push(record?);
        }

        Ok(dedupe_documents(documents))
    }
}

#[async_trait]
impl DocumentSource for CsvDocumentSource {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn load_documents(&self) -> Result<Vec<Document>> {
        let bytes = tokio::fs::read(&self.path).await.map_err(|e| {
            ReelError::Source(format!("Failed to read {}: {}", self.path.display(), e))
        })?;

        let documents = Self::parse(&bytes)?;
        debug!("Loaded {} documents", documents.len());
        Ok(documents)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = "video_id,title,transcript\n\
        abc,Cities,\"0:00\n[Music]\n0:14\nhi everyone\"\n\
        def,\"Work, and school\",0:05 commute\n\
        abc,Duplicate,0:01 ignored\n";

    #[test]
    fn test_parse_multiline_transcripts() {
        let docs = CsvDocumentSource::parse(SAMPLE.as_bytes()).unwrap();

        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].document_id, "abc");
        assert_eq!(docs[0].transcript, "0:00\n[Music]\n0:14\nhi everyone");
        assert_eq!(docs[1].title, "Work, and school");
    }

    #[test]
    fn test_extra_columns_ignored() {
        let csv = "video_id,channel,title,transcript\nx,chan,T,0:01 hello\n";
        let docs = CsvDocumentSource::parse(csv.as_bytes()).unwrap();

        assert_eq!(docs, vec![Document::new("x", "T", "0:01 hello")]);
    }

    #[test]
    fn test_missing_column_rejected() {
        let csv = "video_id,title\nx,T\n";
        let err = CsvDocumentSource::parse(csv.as_bytes()).unwrap_err();

        assert!(matches!(err, ReelError::Source(_)));
        assert!(err.to_string().contains("transcript"));
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let source = CsvDocumentSource::new(file.path());
        let docs = source.load_documents().await.unwrap();
        assert_eq!(docs.len(), 2);
    }

    #[tokio::test]
    async fn test_missing_file_is_source_error() {
        let source = CsvDocumentSource::new("/nonexistent/transcripts.csv");
        let err = source.load_documents().await.unwrap_err();

        assert!(matches!(err, ReelError::Source(_)));
        assert_eq!(err.stage(), "load");
    }
}
