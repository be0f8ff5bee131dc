//! Reel - Grounded Q&A over video transcripts
//!
//! Ask questions across a library of timestamped video transcripts and get
//! answers grounded in the transcript segments they came from, with links
//! back to the exact moment in each video.
//!
//! # Overview
//!
//! Reel allows you to:
//! - Parse `m:ss` timestamped transcripts into spoken utterances
//! - Group utterances into time-windowed chunks and index them
//! - Ask questions across every video, or scoped to a single one
//! - Summarize a video into bullet points
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration management
//! - `source` - Transcript document sources (CSV, in-memory)
//! - `transcript` - Timestamped transcript parsing
//! - `chunking` - Time-window chunking
//! - `embedding` - Embedding generation
//! - `generation` - Answer generation
//! - `index` - Exact in-memory vector index
//! - `retrieval` - Question retrieval with document scoping
//! - `rag` - Grounded answers and citations
//! - `orchestrator` - Application state and pipeline coordination
//!
//! # Example
//!
//! ```rust,no_run
//! use reel::config::Settings;
//! use reel::orchestrator::Orchestrator;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let orchestrator = Orchestrator::new(settings)?;
//!
//!     let stats = orchestrator.rebuild_index().await?;
//!     println!("Indexed {} chunks", stats.chunks);
//!
//!     let response = orchestrator.ask("How do people commute?", None, None).await?;
//!     println!("{}", response.format_for_display());
//!
//!     Ok(())
//! }
//! ```

pub mod chunking;
pub mod cli;
pub mod config;
pub mod embedding;
pub mod error;
pub mod generation;
pub mod index;
pub mod openai;
pub mod orchestrator;
pub mod rag;
pub mod retrieval;
pub mod retry;
pub mod source;
pub mod transcript;

#[cfg(test)]
mod testing;

pub use error::{ReelError, Result};
