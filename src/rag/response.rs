//! RAG response generation.

use super::Citation;
use crate::config::Prompts;
use crate::error::Result;
use crate::generation::Generator;
use crate::retry::RetryPolicy;
use crate::source::Document;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Builds constrained prompts and calls the generator.
pub struct AnswerSynthesizer {
    generator: Arc<dyn Generator>,
    prompts: Prompts,
    retry: RetryPolicy,
}

impl AnswerSynthesizer {
    /// Create a new synthesizer with the default prompts.
    pub fn new(generator: Arc<dyn Generator>) -> Self {
        Self {
            generator,
            prompts: Prompts::default(),
            retry: RetryPolicy::none(),
        }
    }

    /// Set custom prompts (with user-defined variables).
    pub fn with_prompts(mut self, prompts: Prompts) -> Self {
        self.prompts = prompts;
        self
    }

    /// Set the retry policy for generator calls.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Render the grounded question prompt.
    pub fn answer_prompt(&self, question: &str, context: &str) -> String {
        let mut vars = HashMap::new();
        vars.insert("context".to_string(), context.to_string());
        vars.insert("question".to_string(), question.to_string());
        self.prompts.render_with_custom(&self.prompts.rag.user, &vars)
    }

    /// Render the summary prompt from the start of the raw transcript.
    pub fn summary_prompt(&self, document: &Document) -> String {
        let excerpt: String = document
            .transcript
            .chars()
            .take(self.prompts.summary.max_transcript_chars)
            .collect();

        let mut vars = HashMap::new();
        vars.insert("title".to_string(), document.title.clone());
        vars.insert("transcript".to_string(), excerpt);
        self.prompts.render_with_custom(&self.prompts.summary.user, &vars)
    }

    /// Answer a question using only the given context.
    #[instrument(skip(self, context), fields(context_len = context.len()))]
    pub async fn answer(&self, question: &str, context: &str) -> Result<String> {
        let prompt = self.answer_prompt(question, context);
        let answer = self.generate("Answer generation", &prompt).await?;
        debug!("Generated answer with {} characters", answer.len());
        Ok(answer)
    }

    /// Summarize a document into bullet points.
    #[instrument(skip(self, document), fields(document_id = %document.document_id))]
    pub async fn summarize(&self, document: &Document) -> Result<String> {
        let prompt = self.summary_prompt(document);
        self.generate("Summary generation", &prompt).await
    }

    async fn generate(&self, what: &str, prompt: &str) -> Result<String> {
        self.retry
            .run(what, || self.generator.generate(prompt))
            .await
    }
}

/// A RAG response with answer and sources.
#[derive(Debug, Clone, Serialize)]
pub struct RagResponse {
    /// The generated answer.
    pub answer: String,
    /// Source chunks used for the answer.
    pub sources: Vec<Citation>,
    /// Whether the sources came from the scoped fallback rather than search.
    pub fallback: bool,
}

impl RagResponse {
    /// Format the response for display.
    pub fn format_for_display(&self) -> String {
        let mut output = self.answer.clone();

        if !self.sources.is_empty() {
            output.push_str("\n\n--- Sources ---\n");
            for source in &self.sources {
                output.push_str(&format!(
                    "\n{} [{}s-{}s]",
                    source.title, source.start, source.end
                ));
                if let Some(url) = &source.url {
                    output.push_str(&format!("\n  {}", url));
                }
            }
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FailingGenerator, RecordingGenerator};

    #[tokio::test]
    async fn test_answer_prompt_is_grounded() {
        let generator = Arc::new(RecordingGenerator::new("Cities are busy."));
        let synthesizer = AnswerSynthesizer::new(generator.clone());

        let answer = synthesizer
            .answer("Are cities busy?", "busy streets\ncrowded trains")
            .await
            .unwrap();

        assert_eq!(answer, "Cities are busy.");
        let prompts = generator.prompts();
        assert_eq!(prompts.len(), 1);
        assert_eq!(
            prompts[0],
            "Answer the question using ONLY the context below.\n\n\
             Context:\nbusy streets\ncrowded trains\n\n\
             Question:\nAre cities busy?"
        );
    }

    #[tokio::test]
    async fn test_summary_truncates_to_character_limit() {
        let generator = Arc::new(RecordingGenerator::new("- point"));
        let synthesizer = AnswerSynthesizer::new(generator.clone());

        // Multi-byte characters make byte and char limits differ.
        let transcript = "é".repeat(5000);
        let document = Document::new("v", "Accents", transcript);

        synthesizer.summarize(&document).await.unwrap();

        let prompt = &generator.prompts()[0];
        assert!(prompt.starts_with("Summarize the video titled 'Accents' in 5 bullet points."));
        assert_eq!(prompt.matches('é').count(), 4000);
    }

    #[tokio::test]
    async fn test_short_transcript_kept_whole() {
        let generator = Arc::new(RecordingGenerator::new("- point"));
        let synthesizer = AnswerSynthesizer::new(generator.clone());
        let document = Document::new("v", "Short", "0:00 hi");

        synthesizer.summarize(&document).await.unwrap();
        assert!(generator.prompts()[0].ends_with("\n\n0:00 hi"));
    }

    #[tokio::test]
    async fn test_generation_failure_reported() {
        let synthesizer = AnswerSynthesizer::new(Arc::new(FailingGenerator));

        let err = synthesizer.answer("q", "c").await.unwrap_err();
        assert_eq!(err.stage(), "generate");
    }

    #[test]
    fn test_format_for_display() {
        let response = RagResponse {
            answer: "Yes.".to_string(),
            sources: vec![Citation {
                document_id: "v1".to_string(),
                title: "City life".to_string(),
                start: 14,
                end: 17,
                timestamp: "00:14".to_string(),
                text: "hello".to_string(),
                distance: Some(0.0),
                url: Some("https://www.youtube.com/watch?v=v1&t=14s".to_string()),
            }],
            fallback: false,
        };

        let display = response.format_for_display();
        assert!(display.starts_with("Yes.\n\n--- Sources ---"));
        assert!(display.contains("City life [14s-17s]"));
    }
}
