//! Reel CLI entry point.

use anyhow::Result;
use clap::Parser;
use reel::cli::{commands, Cli, Commands};
use reel::config::Settings;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut settings = match &cli.config {
        Some(path) => Settings::load_from(Some(&std::path::PathBuf::from(path)))?,
        None => Settings::load()?,
    };

    // Initialize logging
    let log_level = cli.log_level(&settings.general.log_level);

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("reel={}", log_level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    if let Some(source) = &cli.source {
        settings.source.path = source.clone();
    }

    // Execute command
    match &cli.command {
        Commands::Index => {
            commands::run_index(settings).await?;
        }

        Commands::Ask {
            question,
            video,
            top_k,
            model,
        } => {
            commands::run_ask(question, video.as_deref(), *top_k, model.clone(), settings).await?;
        }

        Commands::Search {
            query,
            video,
            top_k,
        } => {
            commands::run_search(query, video.as_deref(), *top_k, settings).await?;
        }

        Commands::List => {
            commands::run_list(settings).await?;
        }

        Commands::Summarize { video_id, model } => {
            commands::run_summarize(video_id, model.clone(), settings).await?;
        }

        Commands::Chat { video, top_k } => {
            commands::run_chat(video.clone(), *top_k, settings).await?;
        }

        Commands::Serve { host, port } => {
            commands::run_serve(host, *port, settings).await?;
        }

        Commands::Config { action } => {
            commands::run_config(action, settings)?;
        }
    }

    Ok(())
}
