//! In-memory vector store using cosine similarity.
//!
//! [`InMemoryVectorStore`] keeps each collection as an append-only list behind
//! a `tokio::sync::RwLock`. It backs the test suite and small local corpora.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::document::{IndexedVector, SearchResult};
use crate::error::{RagError, Result};
use crate::vectorstore::VectorStore;

const BACKEND: &str = "InMemory";

/// An in-memory vector store using cosine similarity for search.
///
/// Points keep their insertion order, so equal scores come back oldest first.
///
/// # Example
///
/// ```rust,ignore
/// use docqa_rag::{InMemoryVectorStore, VectorStore};
///
/// let store = InMemoryVectorStore::new();
/// store.create_collection("law_docs", 384).await?;
/// ```
#[derive(Debug, Default)]
pub struct InMemoryVectorStore {
    collections: RwLock<HashMap<String, Vec<IndexedVector>>>,
}

impl InMemoryVectorStore {
    /// Create a new empty in-memory vector store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of points stored in `collection`, or `None` if it does not exist.
    pub async fn point_count(&self, collection: &str) -> Option<usize> {
        self.collections.read().await.get(collection).map(Vec::len)
    }

    fn missing(collection: &str) -> RagError {
        RagError::VectorStoreError {
            backend: BACKEND.to_string(),
            message: format!("collection '{collection}' does not exist"),
        }
    }
}

/// Compute cosine similarity between two vectors.
///
/// Returns 0.0 if either vector has zero magnitude.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn create_collection(&self, name: &str, _dimensions: usize) -> Result<()> {
        let mut collections = self.collections.write().await;
        collections.entry(name.to_string()).or_default();
        Ok(())
    }

    async fn upsert(&self, collection: &str, vectors: &[IndexedVector]) -> Result<()> {
        let mut collections = self.collections.write().await;
        let points = collections.get_mut(collection).ok_or_else(|| Self::missing(collection))?;
        points.extend_from_slice(vectors);
        debug!(collection, count = vectors.len(), "appended points in memory");
        Ok(())
    }

    async fn search(
        &self,
        collection: &str,
        embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<SearchResult>> {
        let collections = self.collections.read().await;
        let points = collections.get(collection).ok_or_else(|| Self::missing(collection))?;

        let mut scored: Vec<SearchResult> = points
            .iter()
            .map(|point| SearchResult {
                chunk: point.chunk.clone(),
                score: cosine_similarity(&point.vector, embedding),
            })
            .collect();

        // Stable sort keeps insertion order among equal scores.
        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(top_k);
        Ok(scored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Chunk;

    fn point(text: &str, vector: Vec<f32>) -> IndexedVector {
        IndexedVector { vector, chunk: Chunk { text: text.into(), metadata: HashMap::new() } }
    }

    #[test]
    fn cosine_of_orthogonal_and_zero_vectors() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
        assert!((cosine_similarity(&[2.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-6);
    }

    #[tokio::test]
    async fn upsert_appends_duplicates() {
        let store = InMemoryVectorStore::new();
        store.create_collection("docs", 2).await.unwrap();
        let batch = vec![point("a", vec![1.0, 0.0])];
        store.upsert("docs", &batch).await.unwrap();
        store.upsert("docs", &batch).await.unwrap();
        assert_eq!(store.point_count("docs").await, Some(2));
    }

    #[tokio::test]
    async fn equal_scores_keep_insertion_order() {
        let store = InMemoryVectorStore::new();
        store.create_collection("docs", 2).await.unwrap();
        let batch = vec![
            point("first", vec![1.0, 0.0]),
            point("other", vec![0.0, 1.0]),
            point("second", vec![2.0, 0.0]),
        ];
        store.upsert("docs", &batch).await.unwrap();

        let hits = store.search("docs", &[1.0, 0.1], 3).await.unwrap();
        let texts: Vec<&str> = hits.iter().map(|h| h.chunk.text.as_str()).collect();
        assert_eq!(texts, ["first", "second", "other"]);
    }

    #[tokio::test]
    async fn empty_collection_returns_nothing_and_missing_collection_errors() {
        let store = InMemoryVectorStore::new();
        store.create_collection("docs", 2).await.unwrap();
        assert!(store.search("docs", &[1.0, 0.0], 5).await.unwrap().is_empty());

        let err = store.search("nope", &[1.0, 0.0], 5).await.unwrap_err();
        assert!(matches!(err, RagError::VectorStoreError { backend, .. } if backend == "InMemory"));
    }
}
