use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use docqa_rag::openai::{
    DEFAULT_CHAT_MODEL, DEFAULT_EMBEDDING_MODEL, OpenAIAnswerGenerator, OpenAIEmbeddingProvider,
};
use docqa_rag::qdrant::{DEFAULT_URL, QdrantVectorStore};
use docqa_rag::{EmbeddingProvider, Indexer, PdfLoader, QueryPipeline, RagConfig, VectorStore};
use tracing::debug;

/// Backend and tuning flags shared by every subcommand.
///
/// Unset tuning flags fall back to the `DOCQA_*` variables read by
/// [`RagConfig::from_env`].
#[derive(Args, Debug)]
pub struct BackendArgs {
    /// Qdrant gRPC endpoint
    #[arg(long, global = true, env = "QDRANT_URL", default_value = DEFAULT_URL)]
    pub qdrant_url: String,

    /// OpenAI embedding model
    #[arg(
        long,
        global = true,
        env = "DOCQA_EMBEDDING_MODEL",
        default_value = DEFAULT_EMBEDDING_MODEL
    )]
    pub embedding_model: String,

    /// Embedding size requested from the model; also sizes new collections
    #[arg(long, global = true, env = "DOCQA_EMBEDDING_DIMENSIONS")]
    pub embedding_dimensions: Option<usize>,

    /// OpenAI chat model used to write answers
    #[arg(long, global = true, env = "DOCQA_CHAT_MODEL", default_value = DEFAULT_CHAT_MODEL)]
    pub chat_model: String,

    /// Base URL of an OpenAI-compatible API
    #[arg(long, global = true, env = "OPENAI_BASE_URL")]
    pub openai_base_url: Option<String>,

    /// Vector store collection
    #[arg(long, global = true)]
    pub collection: Option<String>,

    /// Maximum chunk size in characters
    #[arg(long, global = true)]
    pub chunk_size: Option<usize>,

    /// Characters shared by consecutive chunks
    #[arg(long, global = true)]
    pub chunk_overlap: Option<usize>,

    /// Chunks retrieved per question
    #[arg(long, global = true)]
    pub top_k: Option<usize>,
}

/// Shared application state for CLI commands
pub struct App {
    pub config: RagConfig,
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStore>,
    chat_model: String,
    openai_base_url: Option<String>,
}

impl App {
    /// Resolve configuration and connect the embedding and storage backends.
    pub fn new(args: &BackendArgs) -> Result<Self> {
        let config = resolve_config(args)?;
        debug!(?config, qdrant_url = %args.qdrant_url, "resolved configuration");

        let mut embedder = OpenAIEmbeddingProvider::from_env()
            .context("Failed to set up the embedding provider")?
            .with_model(&args.embedding_model);
        if let Some(base_url) = &args.openai_base_url {
            embedder = embedder.with_base_url(base_url);
        }
        if let Some(dims) = args.embedding_dimensions {
            embedder = embedder.with_dimensions(dims);
        }

        let store = QdrantVectorStore::new(&args.qdrant_url)
            .with_context(|| format!("Failed to connect to Qdrant at {}", args.qdrant_url))?;

        Ok(Self {
            config,
            embedder: Arc::new(embedder),
            store: Arc::new(store),
            chat_model: args.chat_model.clone(),
            openai_base_url: args.openai_base_url.clone(),
        })
    }

    /// An indexer writing PDFs into the configured collection.
    pub fn indexer(&self) -> Result<Indexer> {
        Ok(Indexer::builder()
            .loader(Arc::new(PdfLoader::new()))
            .embedding_provider(self.embedder.clone())
            .vector_store(self.store.clone())
            .collection(&self.config.collection)
            .build()?)
    }

    /// A query pipeline answering from the configured collection.
    pub fn pipeline(&self) -> Result<QueryPipeline> {
        let mut generator = OpenAIAnswerGenerator::from_env()
            .context("Failed to set up the answer generator")?
            .with_model(&self.chat_model);
        if let Some(base_url) = &self.openai_base_url {
            generator = generator.with_base_url(base_url);
        }

        Ok(QueryPipeline::builder()
            .config(self.config.clone())
            .embedding_provider(self.embedder.clone())
            .vector_store(self.store.clone())
            .generator(Arc::new(generator))
            .build()?)
    }
}

/// Environment-derived config with command-line overrides applied.
fn resolve_config(args: &BackendArgs) -> Result<RagConfig> {
    let base = RagConfig::from_env().context("Invalid DOCQA_* environment configuration")?;
    let config = RagConfig::builder()
        .collection(args.collection.clone().unwrap_or(base.collection))
        .chunk_size(args.chunk_size.unwrap_or(base.chunk_size))
        .chunk_overlap(args.chunk_overlap.unwrap_or(base.chunk_overlap))
        .top_k(args.top_k.unwrap_or(base.top_k))
        .build()?;
    Ok(config)
}
