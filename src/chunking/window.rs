//! Greedy forward-window chunking.
//!
//! Each window is anchored at its first utterance and admits every following
//! utterance that starts within `window_seconds` of that anchor.

use crate::transcript::Utterance;
use serde::{Deserialize, Serialize};

/// A run of utterances before it is attributed to a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    /// Start of the anchor utterance.
    pub start: u64,
    /// Start of the last admitted utterance.
    pub end: u64,
    /// Admitted texts joined by a single space.
    pub text: String,
}

/// Time-window chunker.
#[derive(Debug, Clone, Copy)]
pub struct WindowChunker {
    window_seconds: u64,
}

impl WindowChunker {
    /// Create a chunker with the given window size in seconds.
    pub fn new(window_seconds: u64) -> Self {
        Self { window_seconds }
    }

    pub fn window_seconds(&self) -> u64 {
        self.window_seconds
    }

    /// Group utterances into windows.
    ///
    /// Real window duration ranges from 0 to `window_seconds`. An utterance
    /// that starts before the anchor (non-monotonic source timestamps) is
    /// admitted to the current window.
    pub fn chunk(&self, utterances: &[Utterance]) -> Vec<TimeWindow> {
        let mut windows = Vec::new();
        let Some(first) = utterances.first() else {
            return windows;
        };

        let mut anchor = first.start;
        let mut current: Vec<&Utterance> = Vec::new();

        for utterance in utterances {
            if utterance.start.saturating_sub(anchor) <= self.window_seconds {
                current.push(utterance);
            } else {
                windows.push(close_window(anchor, &current));
                current.clear();
                current.push(utterance);
                anchor = utterance.start;
            }
        }

        // The trailing window is always kept, even as a singleton.
        windows.push(close_window(anchor, &current));
        windows
    }
}

fn close_window(anchor: u64, members: &[&Utterance]) -> TimeWindow {
    let end = members.last().map(|u| u.start).unwrap_or(anchor);
    let text = members
        .iter()
        .map(|u| u.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");

    TimeWindow {
        start: anchor,
        end,
        text,
    }
}
