//! Time-window chunking of parsed transcripts.
//!
//! Groups utterances into bounded windows that are embedded and searched as a unit.

mod window;

pub use window::{TimeWindow, WindowChunker};

use crate::source::Document;
use crate::transcript::format_timestamp;
use serde::{Deserialize, Serialize};
use url::Url;

/// A chunk of transcript text from one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Start of the first utterance in this chunk, in seconds.
    pub start: u64,
    /// Start of the last utterance in this chunk, in seconds.
    pub end: u64,
    /// Member utterance texts joined by a single space.
    pub text: String,
    /// Document (video) this chunk belongs to.
    pub document_id: String,
    /// Document title.
    pub title: String,
}

impl Chunk {
    /// Stamp a time window with the document it came from.
    pub fn from_window(window: TimeWindow, document: &Document) -> Self {
        Self {
            start: window.start,
            end: window.end,
            text: window.text,
            document_id: document.document_id.clone(),
            title: document.title.clone(),
        }
    }

    /// Duration of this chunk in seconds.
    pub fn duration(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    /// Format timestamp for display.
    pub fn format_timestamp(&self) -> String {
        format_timestamp(self.start)
    }

    /// Playback URL that opens the video at this chunk's start.
    ///
    /// Returns `None` if `base` is not a valid URL.
    pub fn playback_url(&self, base: &str) -> Option<String> {
        let url = Url::parse_with_params(
            base,
            &[
                ("v", self.document_id.clone()),
                ("t", format!("{}s", self.start)),
            ],
        )
        .ok()?;
        Some(url.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document() -> Document {
        Document::new("abc123", "Commuting", "0:00 hi")
    }

    #[test]
    fn test_from_window_stamps_document() {
        let window = TimeWindow {
            start: 14,
            end: 17,
            text: "hello world how are you".to_string(),
        };
        let chunk = Chunk::from_window(window, &document());

        assert_eq!(chunk.document_id, "abc123");
        assert_eq!(chunk.title, "Commuting");
        assert_eq!(chunk.duration(), 3);
        assert_eq!(chunk.format_timestamp(), "00:14");
    }

    #[test]
    fn test_playback_url() {
        let window = TimeWindow {
            start: 125,
            end: 130,
            text: "text".to_string(),
        };
        let chunk = Chunk::from_window(window, &document());

        assert_eq!(
            chunk.playback_url("https://www.youtube.com/watch").as_deref(),
            Some("https://www.youtube.com/watch?v=abc123&t=125s")
        );
        assert!(chunk.playback_url("not a url").is_none());
    }
}
