//! Embedding provider trait.

use async_trait::async_trait;

use crate::error::Result;

/// Converts text into fixed-dimensionality vectors.
///
/// The indexer sends a whole corpus through [`embed_batch`](EmbeddingProvider::embed_batch)
/// in one call; the retriever embeds each question with [`embed`](EmbeddingProvider::embed).
/// Backends that talk to a remote API split the batch into request-sized
/// pieces themselves.
///
/// # Example
///
/// ```rust,ignore
/// use docqa_rag::EmbeddingProvider;
///
/// let vectors = provider.embed_batch(&["Clause 1.", "Clause 2."]).await?;
/// assert_eq!(vectors[0].len(), provider.dimensions());
/// ```
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a single text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Embed many texts, returning one vector per input in input order.
    ///
    /// The default implementation calls [`embed`](EmbeddingProvider::embed)
    /// sequentially.
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let mut vectors = Vec::with_capacity(texts.len());
        for text in texts {
            vectors.push(self.embed(text).await?);
        }
        Ok(vectors)
    }

    /// Length of the vectors this provider produces.
    fn dimensions(&self) -> usize;

    /// Provider name used in error reports.
    fn name(&self) -> &str {
        "custom"
    }
}
