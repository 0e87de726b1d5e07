//! Similarity retrieval over an indexed collection.

use std::sync::Arc;

use tracing::{debug, error};

use crate::document::Chunk;
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::vectorstore::VectorStore;

/// Embeds a question and returns the most similar chunks of one collection.
pub struct Retriever {
    embedding_provider: Arc<dyn EmbeddingProvider>,
    vector_store: Arc<dyn VectorStore>,
    collection: String,
}

impl Retriever {
    /// Create a retriever over `collection`.
    pub fn new(
        embedding_provider: Arc<dyn EmbeddingProvider>,
        vector_store: Arc<dyn VectorStore>,
        collection: impl Into<String>,
    ) -> Self {
        Self { embedding_provider, vector_store, collection: collection.into() }
    }

    /// The collection searched by this retriever.
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Return up to `k` chunks, most similar first.
    ///
    /// Ties keep the vector store's own order. An empty collection yields an
    /// empty `Vec`.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if `k` is zero. Embedding and vector
    /// store failures are returned as produced by the backend.
    pub async fn retrieve(&self, query: &str, k: usize) -> Result<Vec<Chunk>> {
        if k == 0 {
            return Err(RagError::ConfigError("k must be greater than zero".to_string()));
        }

        let query_embedding = self.embedding_provider.embed(query).await.inspect_err(|e| {
            error!(error = %e, "embedding failed during retrieval");
        })?;

        let results = self
            .vector_store
            .search(&self.collection, &query_embedding, k)
            .await
            .inspect_err(|e| {
                error!(collection = %self.collection, error = %e, "vector store search failed");
            })?;

        debug!(
            collection = %self.collection,
            k,
            hits = results.len(),
            top_score = results.first().map(|r| r.score),
            "retrieved chunks"
        );

        Ok(results.into_iter().map(|result| result.chunk).collect())
    }
}
