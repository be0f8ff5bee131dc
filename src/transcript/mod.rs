//! Timestamped transcript parsing.
//!
//! Raw transcripts arrive as plain text with `minutes:seconds` markers, either
//! on their own line or leading a line of speech. The parser turns them into
//! an ordered list of [`Utterance`]s.

mod parser;

pub use parser::{parse, TranscriptParser};

use serde::{Deserialize, Serialize};

/// A single spoken line with the timestamp it was heard at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Utterance {
    /// Start time in whole seconds.
    pub start: u64,
    /// Spoken text, never empty.
    pub text: String,
}

impl Utterance {
    /// Create a new utterance.
    pub fn new(start: u64, text: impl Into<String>) -> Self {
        Self {
            start,
            text: text.into(),
        }
    }
}

/// Format seconds as MM:SS or HH:MM:SS.
pub fn format_timestamp(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{:02}:{:02}", minutes, secs)
    }
}
