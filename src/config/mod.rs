//! Configuration module for Reel.
//!
//! Handles loading and managing application settings and prompt templates.

mod prompts;
mod settings;

pub use prompts::{Prompts, RagPrompts, SummaryPrompts};
pub use settings::{
    ChunkingSettings, EmbeddingSettings, GeneralSettings, GenerationSettings, PromptSettings,
    RetrievalSettings, RetrySettings, Settings, SourceSettings,
};
