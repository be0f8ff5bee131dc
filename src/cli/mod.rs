//! CLI module for Reel.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Reel - Grounded Q&A over video transcripts
///
/// Ask questions across your video transcripts and jump straight to the
/// moments that answer them.
#[derive(Parser, Debug)]
#[command(name = "reel")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Transcript CSV (overrides source.path from the config)
    #[arg(short, long, global = true, env = "REEL_SOURCE")]
    pub source: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Log level from `-v` flags, falling back to the configured one.
    pub fn log_level<'a>(&self, configured: &'a str) -> &'a str {
        match self.verbose {
            0 => configured,
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the index and report what was indexed
    Index,

    /// Ask a question and get a grounded answer with timestamps
    Ask {
        /// The question to ask
        question: String,

        /// Restrict the question to one video ID
        #[arg(long)]
        video: Option<String>,

        /// Number of transcript segments to retrieve
        #[arg(short = 'k', long)]
        top_k: Option<usize>,

        /// LLM model to use for the answer
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Search for relevant transcript segments without generating an answer
    Search {
        /// Search query
        query: String,

        /// Restrict the search to one video ID
        #[arg(long)]
        video: Option<String>,

        /// Number of segments to return
        #[arg(short = 'k', long)]
        top_k: Option<usize>,
    },

    /// List videos in the transcript source with their chunk counts
    List,

    /// Summarize a video in bullet points
    Summarize {
        /// Video ID to summarize
        video_id: String,

        /// LLM model to use
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Ask questions interactively against one in-memory index
    Chat {
        /// Restrict every question to one video ID
        #[arg(long)]
        video: Option<String>,

        /// Number of transcript segments to retrieve per question
        #[arg(short = 'k', long)]
        top_k: Option<usize>,
    },

    /// Start HTTP API server for integration with other systems
    Serve {
        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(short, long, default_value = "3000")]
        port: u16,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Open configuration file in editor
    Edit,

    /// Show configuration file path
    Path,
}
