//! Summarize command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use anyhow::Result;

/// Run the summarize command.
pub async fn run_summarize(
    video_id: &str,
    model: Option<String>,
    mut settings: Settings,
) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Summarize, &settings) {
        Output::error(&e.to_string());
        return Err(e.into());
    }

    if let Some(model) = model {
        settings.generation.model = model;
    }

    let orchestrator = Orchestrator::new(settings)?;

    let spinner = Output::spinner("Summarizing...");
    match orchestrator.summarize(video_id).await {
        Ok(summary) => {
            spinner.finish_and_clear();
            Output::header("Summary");
            println!("\n{}\n", summary);
        }
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("Failed at the {} stage: {}", e.stage(), e));
            return Err(e.into());
        }
    }

    Ok(())
}
