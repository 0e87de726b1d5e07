//! Question answering pipeline.
//!
//! The [`QueryPipeline`] is the one path both the one-shot and the interactive
//! front ends go through: retrieve → assemble context → generate.
//!
//! # Example
//!
//! ```rust,ignore
//! use docqa_rag::{QueryPipeline, RagConfig};
//!
//! let pipeline = QueryPipeline::builder()
//!     .config(RagConfig::default())
//!     .embedding_provider(Arc::new(embedder))
//!     .vector_store(Arc::new(store))
//!     .generator(Arc::new(generator))
//!     .build()?;
//!
//! let answer = pipeline.answer("What is the payment term?").await?;
//! for citation in &answer.citations {
//!     println!("{} p.{}", citation.file, citation.page);
//! }
//! ```

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::config::RagConfig;
use crate::context::assemble;
use crate::document::Citation;
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::generation::AnswerGenerator;
use crate::prompt::grounding_instruction;
use crate::retrieval::Retriever;
use crate::vectorstore::VectorStore;

/// The generator's answer and the chunks it was given, as citations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    /// The model's text, unmodified.
    pub text: String,
    /// One citation per retrieved chunk, best match first.
    pub citations: Vec<Citation>,
}

/// Answers questions from the indexed corpus with page citations.
///
/// Every retrieved chunk is cited whether or not the model used it. When
/// nothing is retrieved the generator still runs with an empty context, so the
/// "not found" answer comes from the model rather than from this pipeline.
/// Construct one via [`QueryPipeline::builder()`].
pub struct QueryPipeline {
    config: RagConfig,
    retriever: Retriever,
    generator: Arc<dyn AnswerGenerator>,
}

impl QueryPipeline {
    /// Create a new [`QueryPipelineBuilder`].
    pub fn builder() -> QueryPipelineBuilder {
        QueryPipelineBuilder::default()
    }

    /// Return a reference to the pipeline configuration.
    pub fn config(&self) -> &RagConfig {
        &self.config
    }

    /// Answer `query` from the top `top_k` chunks of the configured collection.
    ///
    /// # Errors
    ///
    /// Embedding, vector store and generation failures are returned as
    /// produced by the backend.
    pub async fn answer(&self, query: &str) -> Result<Answer> {
        let chunks = self.retriever.retrieve(query, self.config.top_k).await?;
        let assembled = assemble(&chunks);
        let instruction = grounding_instruction(&assembled.context);

        let text = self.generator.generate(&instruction, query).await.inspect_err(|e| {
            error!(error = %e, "answer generation failed");
        })?;

        info!(
            collection = %self.config.collection,
            retrieved = chunks.len(),
            answer_len = text.len(),
            "answered query"
        );

        Ok(Answer { text, citations: assembled.citations })
    }
}

/// Builder for constructing a [`QueryPipeline`].
///
/// All fields except `config` are required; `config` defaults to
/// [`RagConfig::default()`].
#[derive(Default)]
pub struct QueryPipelineBuilder {
    config: Option<RagConfig>,
    embedding_provider: Option<Arc<dyn EmbeddingProvider>>,
    vector_store: Option<Arc<dyn VectorStore>>,
    generator: Option<Arc<dyn AnswerGenerator>>,
}

impl QueryPipelineBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: RagConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the embedding provider used for questions.
    pub fn embedding_provider(mut self, provider: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedding_provider = Some(provider);
        self
    }

    /// Set the vector store backend.
    pub fn vector_store(mut self, store: Arc<dyn VectorStore>) -> Self {
        self.vector_store = Some(store);
        self
    }

    /// Set the answer generator.
    pub fn generator(mut self, generator: Arc<dyn AnswerGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    /// Build the [`QueryPipeline`], validating that all required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if any required field is missing.
    pub fn build(self) -> Result<QueryPipeline> {
        let config = self.config.unwrap_or_default();
        let embedding_provider = self
            .embedding_provider
            .ok_or_else(|| RagError::ConfigError("embedding_provider is required".to_string()))?;
        let vector_store = self
            .vector_store
            .ok_or_else(|| RagError::ConfigError("vector_store is required".to_string()))?;
        let generator = self
            .generator
            .ok_or_else(|| RagError::ConfigError("generator is required".to_string()))?;

        Ok(QueryPipeline {
            retriever: Retriever::new(embedding_provider, vector_store, config.collection.clone()),
            config,
            generator,
        })
    }
}
