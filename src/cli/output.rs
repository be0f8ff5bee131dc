//! CLI output formatting utilities.

use crate::orchestrator::IndexStats;
use crate::rag::Citation;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Output helper for CLI formatting.
pub struct Output;

impl Output {
    /// Print an info message.
    pub fn info(msg: &str) {
        println!("{} {}", style(">>").cyan().bold(), msg);
    }

    /// Print a success message.
    pub fn success(msg: &str) {
        println!("{} {}", style(">>").green().bold(), msg);
    }

    /// Print a warning message.
    pub fn warning(msg: &str) {
        eprintln!("{} {}", style(">>").yellow().bold(), msg);
    }

    /// Print an error message.
    pub fn error(msg: &str) {
        eprintln!("{} {}", style(">>").red().bold(), msg);
    }

    /// Print a header.
    pub fn header(msg: &str) {
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Print a key-value pair.
    pub fn kv(key: &str, value: &str) {
        println!("  {}: {}", style(key).dim(), value);
    }

    /// Print document info.
    pub fn document_info(title: &str, id: &str, chunks: usize, last_timestamp: u64) {
        println!(
            "  {} {} ({}, {} chunks, {})",
            style("*").cyan(),
            style(title).bold(),
            style(id).dim(),
            chunks,
            format_duration(last_timestamp)
        );
    }

    /// Print a cited transcript segment.
    pub fn citation(citation: &Citation) {
        let distance = citation
            .distance
            .map(|d| format!(" (distance: {:.3})", d))
            .unwrap_or_default();

        println!(
            "\n{} {} [{}s-{}s]{}",
            style(">>").green(),
            style(&citation.title).bold(),
            style(citation.start).cyan(),
            style(citation.end).cyan(),
            distance
        );
        println!("   {}", content_preview(&citation.text, 200));
        if let Some(u) = &citation.url {
            println!("   {}", style(u).dim());
        }
    }

    /// Print index build stats.
    pub fn index_stats(stats: &IndexStats) {
        Output::kv("Documents", &stats.documents.to_string());
        Output::kv("Chunks", &stats.chunks.to_string());
        Output::kv("Dimensions", &stats.dimensions.to_string());
        if !stats.skipped_documents.is_empty() {
            Output::kv(
                "Skipped (no timestamps)",
                &stats.skipped_documents.join(", "),
            );
        }
    }

    /// Create a spinner.
    pub fn spinner(msg: &str) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}")
        {
            pb.set_style(spinner_style);
        }
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb
    }
}

/// Format duration in seconds to a human-readable string.
fn format_duration(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, secs)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, secs)
    } else {
        format!("{}s", secs)
    }
}

/// Truncate content with ellipsis.
fn content_preview(content: &str, max_chars: usize) -> String {
    let content = content.replace('\n', " ");
    if content.chars().count() <= max_chars {
        content
    } else {
        let truncated: String = content.chars().take(max_chars).collect();
        format!("{}...", truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(5), "5s");
        assert_eq!(format_duration(125), "2m 5s");
        assert_eq!(format_duration(3725), "1h 2m 5s");
    }

    #[test]
    fn test_content_preview_is_char_safe() {
        assert_eq!(content_preview("short", 10), "short");
        assert_eq!(content_preview("ééééé", 3), "ééé...");
        assert_eq!(content_preview("a\nb", 10), "a b");
    }
}
