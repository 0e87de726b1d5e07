//! Qdrant vector store backend.
//!
//! Provides [`QdrantVectorStore`] which implements [`VectorStore`] using
//! the [qdrant-client](https://docs.rs/qdrant-client) crate over gRPC.
//!
//! Points are stored with a random UUID and a payload of the form
//! `{ "page_content": <chunk text>, "metadata": { "page_label": .., "file_name": .., .. } }`.
//!
//! # Example
//!
//! ```rust,ignore
//! use docqa_rag::qdrant::QdrantVectorStore;
//!
//! let store = QdrantVectorStore::new("http://localhost:6334")?;
//! store.create_collection("law_docs", 1536).await?;
//! ```

use std::collections::HashMap;

use async_trait::async_trait;
use qdrant_client::qdrant::value::Kind;
use qdrant_client::qdrant::{
    CreateCollectionBuilder, Distance, PointStruct, SearchPointsBuilder, UpsertPointsBuilder,
    Value as QdrantValue, VectorParamsBuilder,
};
use qdrant_client::{Payload, Qdrant};
use tracing::debug;
use uuid::Uuid;

use crate::document::{Chunk, IndexedVector, SearchResult};
use crate::error::{RagError, Result};
use crate::vectorstore::VectorStore;

/// The default Qdrant gRPC URL.
pub const DEFAULT_URL: &str = "http://localhost:6334";

/// Payload key holding the chunk text.
const CONTENT_KEY: &str = "page_content";
/// Payload key holding the chunk metadata object.
const METADATA_KEY: &str = "metadata";
/// Points per upsert request.
const UPSERT_BATCH_SIZE: usize = 64;

/// A [`VectorStore`] backed by [Qdrant](https://qdrant.tech/).
///
/// Collections use cosine distance. Every upsert adds new points, so
/// re-indexing a corpus stores duplicates.
pub struct QdrantVectorStore {
    client: Qdrant,
}

impl QdrantVectorStore {
    /// Create a new Qdrant vector store connecting to the given URL.
    pub fn new(url: &str) -> Result<Self> {
        let client = Qdrant::from_url(url).build().map_err(Self::map_err)?;
        Ok(Self { client })
    }

    /// Create a new Qdrant vector store with the default URL.
    pub fn default_url() -> Result<Self> {
        Self::new(DEFAULT_URL)
    }

    /// Create a new Qdrant vector store from an existing client.
    pub fn from_client(client: Qdrant) -> Self {
        Self { client }
    }

    fn map_err(e: qdrant_client::QdrantError) -> RagError {
        RagError::VectorStoreError { backend: "qdrant".to_string(), message: e.to_string() }
    }

    /// Extract a string from a Qdrant payload value.
    fn extract_string(value: &QdrantValue) -> Option<String> {
        match &value.kind {
            Some(Kind::StringValue(s)) => Some(s.clone()),
            _ => None,
        }
    }
}

/// Build the point payload for a chunk.
fn chunk_payload(chunk: &Chunk) -> Payload {
    let metadata: serde_json::Map<String, serde_json::Value> = chunk
        .metadata
        .iter()
        .map(|(k, v)| (k.clone(), serde_json::Value::String(v.clone())))
        .collect();

    let mut payload = Payload::new();
    payload.insert(CONTENT_KEY, chunk.text.clone());
    payload.insert(METADATA_KEY, serde_json::Value::Object(metadata));
    payload
}

/// Rebuild a chunk from a point payload. Non-string metadata values are dropped.
fn payload_chunk(payload: &HashMap<String, QdrantValue>) -> Chunk {
    let text =
        payload.get(CONTENT_KEY).and_then(QdrantVectorStore::extract_string).unwrap_or_default();

    let metadata: HashMap<String, String> = payload
        .get(METADATA_KEY)
        .and_then(|v| match &v.kind {
            Some(Kind::StructValue(s)) => Some(
                s.fields
                    .iter()
                    .filter_map(|(k, v)| {
                        QdrantVectorStore::extract_string(v).map(|s| (k.clone(), s))
                    })
                    .collect(),
            ),
            _ => None,
        })
        .unwrap_or_default();

    Chunk { text, metadata }
}

#[async_trait]
impl VectorStore for QdrantVectorStore {
    async fn create_collection(&self, name: &str, dimensions: usize) -> Result<()> {
        let collections = self.client.list_collections().await.map_err(Self::map_err)?;
        if collections.collections.iter().any(|c| c.name == name) {
            debug!(collection = name, "qdrant collection already exists, skipping creation");
            return Ok(());
        }

        self.client
            .create_collection(
                CreateCollectionBuilder::new(name)
                    .vectors_config(VectorParamsBuilder::new(dimensions as u64, Distance::Cosine)),
            )
            .await
            .map_err(Self::map_err)?;

        debug!(collection = name, dimensions, "created qdrant collection");
        Ok(())
    }

    async fn upsert(&self, collection: &str, vectors: &[IndexedVector]) -> Result<()> {
        for batch in vectors.chunks(UPSERT_BATCH_SIZE) {
            let points: Vec<PointStruct> = batch
                .iter()
                .map(|indexed| {
                    PointStruct::new(
                        Uuid::new_v4().to_string(),
                        indexed.vector.clone(),
                        chunk_payload(&indexed.chunk),
                    )
                })
                .collect();

            self.client
                .upsert_points(UpsertPointsBuilder::new(collection, points).wait(true))
                .await
                .map_err(Self::map_err)?;
        }

        debug!(collection, count = vectors.len(), "upserted chunks to qdrant");
        Ok(())
    }

    async fn search(
        &self,
        collection: &str,
        embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<SearchResult>> {
        let response = self
            .client
            .search_points(
                SearchPointsBuilder::new(collection, embedding.to_vec(), top_k as u64)
                    .with_payload(true),
            )
            .await
            .map_err(Self::map_err)?;

        let results = response
            .result
            .into_iter()
            .map(|scored| SearchResult {
                chunk: payload_chunk(&scored.payload),
                score: scored.score,
            })
            .collect();

        Ok(results)
    }
}
