//! Pre-flight checks before expensive operations.
//!
//! Validates that the transcript source and API key are available before
//! starting work that would otherwise fail midway.

use crate::config::Settings;
use crate::error::{ReelError, Result};

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// Building the index needs the source and the embedding API.
    Index,
    /// Summaries need the source and the generation API.
    Summarize,
    /// Listing only reads the source.
    List,
}

/// Run pre-flight checks for the given operation.
///
/// Returns Ok(()) if all checks pass, or an error describing what's missing.
pub fn check(operation: Operation, settings: &Settings) -> Result<()> {
    check_source(settings)?;
    match operation {
        Operation::Index | Operation::Summarize => check_api_key()?,
        Operation::List => {}
    }
    Ok(())
}

/// Check that the transcript source file exists.
fn check_source(settings: &Settings) -> Result<()> {
    let path = settings.source_path();
    if path.is_file() {
        Ok(())
    } else {
        Err(ReelError::Config(format!(
            "Transcript source not found at {}. Set source.path in the config or pass --source.",
            path.display()
        )))
    }
}

/// Check if OpenAI API key is configured.
fn check_api_key() -> Result<()> {
    match std::env::var("OPENAI_API_KEY") {
        Ok(key) if !key.is_empty() => Ok(()),
        Ok(_) => Err(ReelError::Config(
            "OPENAI_API_KEY is empty. Set it with: export OPENAI_API_KEY='sk-...'".to_string(),
        )),
        Err(_) => Err(ReelError::Config(
            "OPENAI_API_KEY not set. Set it with: export OPENAI_API_KEY='sk-...'".to_string(),
        )),
    }
}
