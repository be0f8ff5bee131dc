//! Search command implementation.

use super::build_orchestrator;
use crate::cli::Output;
use crate::config::Settings;
use anyhow::Result;

/// Run the search command.
pub async fn run_search(
    query: &str,
    video: Option<&str>,
    top_k: Option<usize>,
    settings: Settings,
) -> Result<()> {
    let orchestrator = build_orchestrator(settings).await?;

    let (citations, fallback) = match orchestrator.search_citations(query, top_k, video).await {
        Ok(found) => found,
        Err(e) => {
            Output::error(&format!("Search failed at the {} stage: {}", e.stage(), e));
            return Err(e.into());
        }
    };

    if citations.is_empty() {
        Output::info("No matching segments found.");
        return Ok(());
    }

    Output::header(&format!("Found {} segments", citations.len()));
    if fallback {
        Output::warning("No close match in this video; showing its opening segments.");
    }
    for citation in &citations {
        Output::citation(citation);
    }

    Ok(())
}
