//! Context building for RAG responses.

use super::Citation;
use crate::retrieval::Retrieval;

/// Build citations for a retrieval, with playback links under `playback_base_url`.
pub fn citations(retrieval: &Retrieval, playback_base_url: &str) -> Vec<Citation> {
    retrieval
        .chunks
        .iter()
        .map(|r| {
            let url = r.chunk.playback_url(playback_base_url);
            let mut citation = Citation::from(r.clone());
            citation.url = url;
            citation
        })
        .collect()
}

/// Grounding context for the prompt: chunk texts, one per line, in result order.
pub fn format_context_for_prompt(citations: &[Citation]) -> String {
    citations
        .iter()
        .map(|c| c.text.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format citations for display to the user.
pub fn format_context_for_display(citations: &[Citation]) -> String {
    citations
        .iter()
        .map(|c| {
            let url_part = c
                .url
                .as_ref()
                .map(|u| format!("\n  Link: {}", u))
                .unwrap_or_default();

            format!(
                "{} [{}s-{}s]{}\n  {}",
                c.title, c.start, c.end, url_part, c.text
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunking::Chunk;
    use crate::retrieval::RetrievedChunk;

    fn retrieval() -> Retrieval {
        let chunk = |id: &str, start: u64, text: &str| RetrievedChunk {
            chunk: Chunk {
                start,
                end: start + 3,
                text: text.to_string(),
                document_id: id.to_string(),
                title: format!("Title {}", id),
            },
            distance: Some(0.5),
        };
        Retrieval {
            chunks: vec![chunk("v1", 14, "hello world"), chunk("v2", 90, "second")],
            fallback: false,
        }
    }

    #[test]
    fn test_citations_have_playback_links() {
        let cites = citations(&retrieval(), "https://www.youtube.com/watch");

        assert_eq!(cites.len(), 2);
        assert_eq!(
            cites[0].url.as_deref(),
            Some("https://www.youtube.com/watch?v=v1&t=14s")
        );
        assert_eq!(cites[1].timestamp, "01:30");
        assert_eq!(cites[1].end, 93);
    }

    #[test]
    fn test_prompt_context_matches_retrieval_context() {
        let r = retrieval();
        let cites = citations(&r, "https://www.youtube.com/watch");

        assert_eq!(format_context_for_prompt(&cites), r.context());
        assert_eq!(format_context_for_prompt(&cites), "hello world\nsecond");
    }

    #[test]
    fn test_display_format() {
        let cites = citations(&retrieval(), "https://www.youtube.com/watch");
        let display = format_context_for_display(&cites);

        assert!(display.starts_with("Title v1 [14s-17s]"));
        assert!(display.contains("Link: https://www.youtube.com/watch?v=v2&t=90s"));
    }
}
