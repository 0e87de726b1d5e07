//! Test doubles shared by the integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use docqa_rag::{
    AnswerGenerator, DocumentLoader, EmbeddingProvider, IndexReport, IndexedVector, LoadError,
    PageDocument, RagError, SearchResult, VectorStore,
};

pub const DIMENSIONS: usize = 32;

/// Deterministic hash-based embeddings; counts every call.
#[derive(Default)]
pub struct MockEmbeddingProvider {
    pub calls: AtomicUsize,
    pub fail: bool,
}

impl MockEmbeddingProvider {
    pub fn failing() -> Self {
        Self { calls: AtomicUsize::new(0), fail: true }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

pub fn hash_embedding(text: &str) -> Vec<f32> {
    let hash = text.bytes().fold(0u64, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u64));
    let mut v = vec![0.0f32; DIMENSIONS];
    for (i, x) in v.iter_mut().enumerate() {
        *x = ((hash.wrapping_add(i as u64)) as f32).sin();
    }
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        v.iter_mut().for_each(|x| *x /= norm);
    }
    v
}

#[async_trait]
impl EmbeddingProvider for MockEmbeddingProvider {
    async fn embed(&self, text: &str) -> docqa_rag::Result<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(RagError::EmbeddingError {
                provider: "mock".into(),
                message: "quota exceeded".into(),
            });
        }
        Ok(hash_embedding(text))
    }

    fn dimensions(&self) -> usize {
        DIMENSIONS
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// Returns one vector too few for any batch.
pub struct ShortBatchEmbeddingProvider;

#[async_trait]
impl EmbeddingProvider for ShortBatchEmbeddingProvider {
    async fn embed(&self, text: &str) -> docqa_rag::Result<Vec<f32>> {
        Ok(hash_embedding(text))
    }

    async fn embed_batch(&self, texts: &[&str]) -> docqa_rag::Result<Vec<Vec<f32>>> {
        Ok(texts.iter().skip(1).map(|t| hash_embedding(t)).collect())
    }

    fn dimensions(&self) -> usize {
        DIMENSIONS
    }
}

/// Wraps another store and counts calls; can be told to reject writes.
pub struct CountingStore<S> {
    pub inner: S,
    pub calls: AtomicUsize,
    pub reject_upsert: bool,
}

impl<S> CountingStore<S> {
    pub fn new(inner: S) -> Self {
        Self { inner, calls: AtomicUsize::new(0), reject_upsert: false }
    }

    pub fn rejecting(inner: S) -> Self {
        Self { inner, calls: AtomicUsize::new(0), reject_upsert: true }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<S: VectorStore> VectorStore for CountingStore<S> {
    async fn create_collection(&self, name: &str, dimensions: usize) -> docqa_rag::Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.create_collection(name, dimensions).await
    }

    async fn upsert(&self, collection: &str, vectors: &[IndexedVector]) -> docqa_rag::Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.reject_upsert {
            return Err(RagError::VectorStoreError {
                backend: "counting".into(),
                message: "connection refused".into(),
            });
        }
        self.inner.upsert(collection, vectors).await
    }

    async fn search(
        &self,
        collection: &str,
        embedding: &[f32],
        top_k: usize,
    ) -> docqa_rag::Result<Vec<SearchResult>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.search(collection, embedding, top_k).await
    }
}

/// Serves canned pages per file name; unknown files fail to parse.
#[derive(Default)]
pub struct StubLoader {
    pub pages: HashMap<String, Vec<String>>,
}

impl StubLoader {
    pub fn with_file(mut self, name: &str, pages: &[&str]) -> Self {
        self.pages.insert(name.to_string(), pages.iter().map(|p| p.to_string()).collect());
        self
    }
}

impl DocumentLoader for StubLoader {
    fn load(&self, path: &Path) -> Result<Vec<PageDocument>, LoadError> {
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        let pages = self.pages.get(&name).ok_or_else(|| LoadError::Pdf {
            path: path.to_path_buf(),
            message: "invalid file header".into(),
        })?;
        Ok(pages
            .iter()
            .enumerate()
            .map(|(i, text)| PageDocument {
                text: text.clone(),
                page_label: (i + 1).to_string(),
                source_file_name: name.clone(),
                page_index: i,
                source: path.display().to_string(),
            })
            .collect())
    }
}

/// Records every prompt it receives and answers with a fixed string.
pub struct RecordingGenerator {
    pub answer: Option<String>,
    pub prompts: Mutex<Vec<(String, String)>>,
}

impl RecordingGenerator {
    pub fn answering(answer: &str) -> Self {
        Self { answer: Some(answer.to_string()), prompts: Mutex::new(Vec::new()) }
    }

    pub fn failing() -> Self {
        Self { answer: None, prompts: Mutex::new(Vec::new()) }
    }

    pub fn prompts(&self) -> Vec<(String, String)> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl AnswerGenerator for RecordingGenerator {
    async fn generate(
        &self,
        system_instruction: &str,
        question: &str,
    ) -> docqa_rag::Result<String> {
        self.prompts.lock().unwrap().push((system_instruction.to_string(), question.to_string()));
        self.answer.clone().ok_or_else(|| RagError::GenerationError {
            provider: "recording".into(),
            message: "response contained no answer text".into(),
        })
    }
}

/// Create `names` as empty files in `dir`.
pub fn touch(dir: &Path, names: &[&str]) {
    for name in names {
        std::fs::write(dir.join(name), b"").unwrap();
    }
}

/// `(file, chunk count)` pairs of a report, borrowed for comparison.
pub fn indexed_files(report: &IndexReport) -> Vec<(&str, usize)> {
    report.files_indexed.iter().map(|(file, count)| (file.as_str(), *count)).collect()
}
