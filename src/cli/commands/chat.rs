//! Interactive question loop over one in-memory index.
//!
//! Each question is answered on its own; no conversation history is kept.

use super::build_orchestrator;
use crate::cli::Output;
use crate::config::Settings;
use anyhow::Result;
use console::style;
use std::io::{self, BufRead, Write};

/// Run the interactive chat command.
pub async fn run_chat(video: Option<String>, top_k: Option<usize>, settings: Settings) -> Result<()> {
    let orchestrator = build_orchestrator(settings).await?;

    println!("\n{}", style("Reel Chat").bold().cyan());
    if let Some(video) = &video {
        println!("{}", style(format!("Questions are scoped to video {}", video)).dim());
    }
    println!(
        "{}\n",
        style("Type your questions, 'rebuild' to re-index, or 'exit' to quit.").dim()
    );

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("{} ", style("You:").green().bold());
        stdout.flush()?;

        let mut input = String::new();
        if stdin.lock().read_line(&mut input)? == 0 {
            break;
        }

        let input = input.trim();

        if input.is_empty() {
            continue;
        }

        if input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit") {
            Output::info("Goodbye!");
            break;
        }

        if input.eq_ignore_ascii_case("rebuild") {
            match orchestrator.rebuild_index().await {
                Ok(stats) => Output::success(&format!("Re-indexed {} chunks.", stats.chunks)),
                Err(e) => Output::error(&format!(
                    "Rebuild failed at the {} stage, keeping the previous index: {}",
                    e.stage(),
                    e
                )),
            }
            continue;
        }

        match orchestrator.ask(input, top_k, video.as_deref()).await {
            Ok(response) => {
                println!("\n{} {}\n", style("Reel:").cyan().bold(), response.answer);
                for source in &response.sources {
                    Output::citation(source);
                }
                println!();
            }
            Err(e) => {
                Output::error(&format!("Failed at the {} stage: {}", e.stage(), e));
            }
        }
    }

    Ok(())
}
