//! Error types for Reel.

use thiserror::Error;

/// Library-level error type for Reel operations.
#[derive(Error, Debug)]
pub enum ReelError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Index not built yet. Rebuild the index before asking questions.")]
    IndexNotBuilt,

    #[error("Nothing to index: no transcript produced any timestamped chunks")]
    EmptyCorpus,

    #[error("Document source error: {0}")]
    Source(String),

    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    /// The embedding request or its response was malformed; retrying cannot help.
    #[error("Embedding request rejected: {0}")]
    EmbeddingRejected(String),

    #[error("Search failed: {0}")]
    Search(String),

    #[error("Answer generation failed: {0}")]
    Generation(String),

    #[error("Document not found: {0}")]
    DocumentNotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl ReelError {
    /// Name of the pipeline stage that failed, for user-facing messages.
    pub fn stage(&self) -> &'static str {
        match self {
            ReelError::Config(_) | ReelError::TomlParse(_) => "config",
            ReelError::IndexNotBuilt => "search",
            ReelError::EmptyCorpus => "chunk",
            ReelError::Source(_) | ReelError::Csv(_) | ReelError::Io(_) | ReelError::Json(_) => {
                "load"
            }
            ReelError::Embedding(_) | ReelError::EmbeddingRejected(_) => "embed",
            ReelError::Search(_) => "search",
            ReelError::Generation(_) => "generate",
            ReelError::DocumentNotFound(_) | ReelError::InvalidInput(_) => "input",
        }
    }

    /// Whether the failure came from an external service and may succeed on retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, ReelError::Embedding(_) | ReelError::Generation(_))
    }
}

/// Result type alias for Reel operations.
pub type Result<T> = std::result::Result<T, ReelError>;
