//! List command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use anyhow::Result;

/// Run the list command.
pub async fn run_list(settings: Settings) -> Result<()> {
    if let Err(e) = preflight::check(Operation::List, &settings) {
        Output::error(&e.to_string());
        return Err(e.into());
    }

    let orchestrator = Orchestrator::new(settings)?;

    match orchestrator.overview().await {
        Ok(documents) => {
            if documents.is_empty() {
                Output::info("The transcript source has no videos.");
            } else {
                Output::header(&format!("Videos ({})", documents.len()));
                println!();

                for doc in &documents {
                    Output::document_info(
                        &doc.title,
                        &doc.document_id,
                        doc.chunk_count,
                        doc.last_timestamp,
                    );
                }

                let total_chunks: usize = documents.iter().map(|d| d.chunk_count).sum();
                let unindexable = documents.iter().filter(|d| d.chunk_count == 0).count();
                println!();
                Output::kv("Total videos", &documents.len().to_string());
                Output::kv("Total chunks", &total_chunks.to_string());
                if unindexable > 0 {
                    Output::kv("Without timestamps", &unindexable.to_string());
                }
            }
        }
        Err(e) => {
            Output::error(&format!("Failed to list videos: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
