//! Vector store trait for persisting chunk vectors and searching them.

use async_trait::async_trait;

use crate::document::{IndexedVector, SearchResult};
use crate::error::Result;

/// A storage backend for chunk vectors with similarity search.
///
/// Collections are append-only from this crate's point of view: every
/// [`upsert`](VectorStore::upsert) adds new points, so indexing the same
/// corpus twice stores every chunk twice.
///
/// # Example
///
/// ```rust,ignore
/// use docqa_rag::{InMemoryVectorStore, VectorStore};
///
/// let store = InMemoryVectorStore::new();
/// store.create_collection("law_docs", 1536).await?;
/// store.upsert("law_docs", &vectors).await?;
/// let hits = store.search("law_docs", &query_vector, 5).await?;
/// ```
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Create a named collection. No-op if it already exists.
    async fn create_collection(&self, name: &str, dimensions: usize) -> Result<()>;

    /// Add vectors and their chunk metadata to a collection.
    async fn upsert(&self, collection: &str, vectors: &[IndexedVector]) -> Result<()>;

    /// Return up to `top_k` chunks most similar to `embedding`.
    ///
    /// Results are ordered by descending similarity score. An empty
    /// collection yields an empty `Vec`; a missing collection is an error.
    async fn search(
        &self,
        collection: &str,
        embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<SearchResult>>;
}
