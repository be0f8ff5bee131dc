//! Deterministic stand-ins for the external services, for unit tests.

use crate::embedding::Embedder;
use crate::error::{ReelError, Result};
use crate::generation::Generator;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

const VOCABULARY: &[&str] = &[
    "city", "streets", "trains", "cows", "fields", "farm", "music", "school", "work", "hello",
];

/// Embeds text as keyword counts over a fixed vocabulary.
pub struct KeywordEmbedder {
    vocabulary: Vec<&'static str>,
    batch_calls: AtomicUsize,
    single_calls: AtomicUsize,
    failing: AtomicBool,
    truncate: bool,
}

impl KeywordEmbedder {
    /// Drop the last vector of every batch.
    pub fn truncating(mut self) -> Self {
        self.truncate = true;
        self
    }

    /// Make every following call fail with a transient error.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn batch_calls(&self) -> usize {
        self.batch_calls.load(Ordering::SeqCst)
    }

    pub fn single_calls(&self) -> usize {
        self.single_calls.load(Ordering::SeqCst)
    }

    fn vectorize(&self, text: &str) -> Vec<f32> {
        let words: Vec<String> = text
            .split_whitespace()
            .map(|w| {
                w.trim_matches(|c: char| !c.is_alphanumeric())
                    .to_lowercase()
            })
            .collect();

        self.vocabulary
            .iter()
            .map(|term| words.iter().filter(|w| w == term).count() as f32)
            .collect()
    }

    fn check(&self) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            Err(ReelError::Embedding("embedding service unavailable".to_string()))
        } else {
            Ok(())
        }
    }
}

impl Default for KeywordEmbedder {
    fn default() -> Self {
        Self {
            vocabulary: VOCABULARY.to_vec(),
            batch_calls: AtomicUsize::new(0),
            single_calls: AtomicUsize::new(0),
            failing: AtomicBool::new(false),
            truncate: false,
        }
    }
}

#[async_trait]
impl Embedder for KeywordEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.single_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        Ok(self.vectorize(text))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        self.batch_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        let mut vectors: Vec<Vec<f32>> = texts.iter().map(|t| self.vectorize(t)).collect();
        if self.truncate {
            vectors.pop();
        }
        Ok(vectors)
    }

    fn dimensions(&self) -> usize {
        self.vocabulary.len()
    }
}

/// Embedder that always fails.
pub struct FailingEmbedder;

#[async_trait]
impl Embedder for FailingEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        Err(ReelError::Embedding("connection refused".to_string()))
    }

    async fn embed_batch(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Err(ReelError::Embedding("connection refused".to_string()))
    }

    fn dimensions(&self) -> usize {
        0
    }
}

/// Generator that records prompts and answers with a fixed reply.
pub struct RecordingGenerator {
    reply: String,
    prompts: Mutex<Vec<String>>,
}

impl RecordingGenerator {
    pub fn new(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Generator for RecordingGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self.reply.clone())
    }

    fn model(&self) -> &str {
        "recording"
    }
}

/// Generator that always fails.
pub struct FailingGenerator;

#[async_trait]
impl Generator for FailingGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String> {
        Err(ReelError::Generation("model overloaded".to_string()))
    }

    fn model(&self) -> &str {
        "failing"
    }
}
