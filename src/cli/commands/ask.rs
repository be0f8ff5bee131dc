//! Ask command implementation.

use super::build_orchestrator;
use crate::cli::Output;
use crate::config::Settings;
use anyhow::Result;

/// Run the ask command.
pub async fn run_ask(
    question: &str,
    video: Option<&str>,
    top_k: Option<usize>,
    model: Option<String>,
    mut settings: Settings,
) -> Result<()> {
    if let Some(model) = model {
        settings.generation.model = model;
    }

    let orchestrator = build_orchestrator(settings).await?;

    let spinner = Output::spinner("Searching transcripts...");

    match orchestrator.ask(question, top_k, video).await {
        Ok(response) => {
            spinner.finish_and_clear();

            println!("\n{}\n", response.answer);

            if !response.sources.is_empty() {
                Output::header("Top Segments");
                if response.fallback {
                    Output::warning("No close match in this video; showing its opening segments.");
                }
                for source in &response.sources {
                    Output::citation(source);
                }
            }
        }
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("Failed at the {} stage: {}", e.stage(), e));
            return Err(e.into());
        }
    }

    Ok(())
}
