//! # docqa-rag
//!
//! Question answering over a folder of PDFs, with page citations.
//!
//! Indexing reads every PDF page, cuts it into overlapping chunks, embeds the
//! chunks in one batch and appends them to a vector store collection.
//! Answering embeds the question, retrieves the closest chunks, and asks a
//! language model to answer from those chunks alone.
//!
//! The embedding provider, vector store, answer generator and document loader
//! are traits; concrete backends are behind cargo features:
//!
//! | Feature  | Backend                                           |
//! |----------|---------------------------------------------------|
//! | `pdf`    | [`PdfLoader`] (lopdf), on by default              |
//! | `openai` | [`openai::OpenAIEmbeddingProvider`], [`openai::OpenAIAnswerGenerator`] |
//! | `qdrant` | [`qdrant::QdrantVectorStore`]                     |
//!
//! [`InMemoryVectorStore`] is always available.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::path::Path;
//! use std::sync::Arc;
//! use docqa_rag::*;
//!
//! let config = RagConfig::from_env()?;
//! let store: Arc<dyn VectorStore> = Arc::new(InMemoryVectorStore::new());
//!
//! let indexer = Indexer::builder()
//!     .loader(Arc::new(PdfLoader::new()))
//!     .embedding_provider(embedder.clone())
//!     .vector_store(store.clone())
//!     .collection(&config.collection)
//!     .build()?;
//! indexer.index_corpus(Path::new("pdfs"), config.chunk_size, config.chunk_overlap).await?;
//!
//! let pipeline = QueryPipeline::builder()
//!     .config(config)
//!     .embedding_provider(embedder)
//!     .vector_store(store)
//!     .generator(generator)
//!     .build()?;
//! let answer = pipeline.answer("What is the payment term?").await?;
//! ```

pub mod chunking;
pub mod config;
pub mod context;
pub mod document;
pub mod embedding;
pub mod error;
pub mod generation;
pub mod indexer;
pub mod inmemory;
pub mod loader;
pub mod pipeline;
pub mod prompt;
pub mod retrieval;
pub mod vectorstore;

#[cfg(feature = "openai")]
pub mod openai;

#[cfg(feature = "qdrant")]
pub mod qdrant;

pub use chunking::{Chunks, RecursiveChunker};
pub use config::{RagConfig, RagConfigBuilder};
pub use context::{AssembledContext, assemble, snippet};
pub use document::{Chunk, Citation, IndexedVector, PageDocument, SearchResult};
pub use embedding::EmbeddingProvider;
pub use error::{LoadError, RagError, Result};
pub use generation::AnswerGenerator;
pub use indexer::{IndexReport, Indexer, IndexerBuilder};
pub use inmemory::InMemoryVectorStore;
pub use loader::DocumentLoader;
#[cfg(feature = "pdf")]
pub use loader::PdfLoader;
pub use pipeline::{Answer, QueryPipeline, QueryPipelineBuilder};
pub use prompt::{NOT_FOUND_ANSWER, grounding_instruction};
pub use retrieval::Retriever;
pub use vectorstore::VectorStore;
