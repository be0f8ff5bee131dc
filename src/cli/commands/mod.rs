//! CLI command implementations.

mod ask;
mod chat;
mod config;
mod index;
mod list;
mod search;
mod serve;
mod summarize;

pub use ask::run_ask;
pub use chat::run_chat;
pub use config::run_config;
pub use index::run_index;
pub use list::run_list;
pub use search::run_search;
pub use serve::run_serve;
pub use summarize::run_summarize;

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use anyhow::Result;

/// Check requirements, then build the index with a spinner.
///
/// Every process starts without an index, so commands that query build one first.
pub(crate) async fn build_orchestrator(settings: Settings) -> Result<Orchestrator> {
    if let Err(e) = preflight::check(Operation::Index, &settings) {
        Output::error(&e.to_string());
        return Err(e.into());
    }

    let orchestrator = Orchestrator::new(settings)?;

    let spinner = Output::spinner("Indexing transcripts...");
    match orchestrator.rebuild_index().await {
        Ok(stats) => {
            spinner.finish_and_clear();
            tracing::info!("Index ready: {} chunks", stats.chunks);
            Ok(orchestrator)
        }
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("Indexing failed at the {} stage: {}", e.stage(), e));
            Err(e.into())
        }
    }
}
