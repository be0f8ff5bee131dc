//! Index command implementation.

use super::build_orchestrator;
use crate::cli::Output;
use crate::config::Settings;
use anyhow::Result;

/// Run the index command.
pub async fn run_index(settings: Settings) -> Result<()> {
    let source = settings.source_path();
    let orchestrator = build_orchestrator(settings).await?;

    if let Some(stats) = orchestrator.stats() {
        Output::success(&format!("Indexed {}", source.display()));
        Output::index_stats(&stats);
    }

    Ok(())
}
