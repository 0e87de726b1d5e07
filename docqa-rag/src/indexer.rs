//! Corpus indexing: load → split → tag → embed → store.
//!
//! # Example
//!
//! ```rust,ignore
//! use docqa_rag::{Indexer, PdfLoader};
//!
//! let indexer = Indexer::builder()
//!     .loader(Arc::new(PdfLoader::new()))
//!     .embedding_provider(Arc::new(embedder))
//!     .vector_store(Arc::new(store))
//!     .collection("law_docs")
//!     .build()?;
//!
//! let report = indexer.index_corpus(Path::new("pdfs"), 1000, 200).await?;
//! println!("{} chunks stored", report.total_chunks);
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::chunking::RecursiveChunker;
use crate::document::{Chunk, FILE_NAME_KEY, IndexedVector, PageDocument};
use crate::embedding::EmbeddingProvider;
use crate::error::{LoadError, RagError, Result};
use crate::loader::{DocumentLoader, file_name_of};
use crate::vectorstore::VectorStore;

/// Outcome of one [`Indexer::index_corpus`] run.
#[derive(Debug, Default)]
pub struct IndexReport {
    /// Number of chunks embedded and stored.
    pub total_chunks: usize,
    /// Files that loaded successfully with their chunk counts, in processing order.
    pub files_indexed: Vec<(String, usize)>,
    /// Files that could not be loaded, with the reason.
    pub files_failed: Vec<(String, LoadError)>,
}

/// Indexes a directory of PDFs into one vector store collection.
///
/// All chunks of a run are embedded in one batch and written in one bulk
/// upsert after every file has been read. Construct one via
/// [`Indexer::builder()`].
pub struct Indexer {
    loader: Arc<dyn DocumentLoader>,
    embedding_provider: Arc<dyn EmbeddingProvider>,
    vector_store: Arc<dyn VectorStore>,
    collection: String,
}

impl Indexer {
    /// Create a new [`IndexerBuilder`].
    pub fn builder() -> IndexerBuilder {
        IndexerBuilder::default()
    }

    /// The collection this indexer writes to.
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Index every `.pdf` file directly inside `directory`.
    ///
    /// A file that fails to load is recorded in
    /// [`IndexReport::files_failed`] and skipped. When no chunks are produced
    /// (no PDFs, or only empty ones) neither the embedding provider nor the
    /// vector store is contacted.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] for invalid chunking parameters,
    /// [`RagError::Corpus`] if `directory` cannot be listed, and the
    /// provider's or store's error if embedding or storing fails.
    pub async fn index_corpus(
        &self,
        directory: &Path,
        chunk_size: usize,
        chunk_overlap: usize,
    ) -> Result<IndexReport> {
        let chunker = RecursiveChunker::new(chunk_size, chunk_overlap)?;
        let files = pdf_files(directory)?;
        let mut report = IndexReport::default();

        if files.is_empty() {
            info!(directory = %directory.display(), "no PDF files found");
            return Ok(report);
        }

        let mut chunks: Vec<Chunk> = Vec::new();
        for path in files {
            let file_name = file_name_of(&path);
            match self.load(path).await {
                Ok(pages) => {
                    let before = chunks.len();
                    for page in &pages {
                        chunks.extend(chunker.chunk_page(page).into_iter().map(|mut chunk| {
                            chunk.metadata.insert(FILE_NAME_KEY.to_string(), file_name.clone());
                            chunk
                        }));
                    }
                    let chunk_count = chunks.len() - before;
                    info!(file = %file_name, pages = pages.len(), chunk_count, "loaded file");
                    report.files_indexed.push((file_name, chunk_count));
                }
                Err(e) => {
                    warn!(file = %file_name, error = %e, "skipping file that failed to load");
                    report.files_failed.push((file_name, e));
                }
            }
        }

        if chunks.is_empty() {
            info!(files = report.files_indexed.len(), "corpus produced no chunks");
            return Ok(report);
        }

        self.embed_and_store(chunks, &mut report).await?;
        info!(
            collection = %self.collection,
            total_chunks = report.total_chunks,
            files_indexed = report.files_indexed.len(),
            files_failed = report.files_failed.len(),
            "indexing complete"
        );
        Ok(report)
    }

    /// Run the loader on the blocking pool.
    async fn load(&self, path: PathBuf) -> std::result::Result<Vec<PageDocument>, LoadError> {
        let loader = Arc::clone(&self.loader);
        let task_path = path.clone();
        tokio::task::spawn_blocking(move || loader.load(&task_path)).await.unwrap_or_else(|e| {
            Err(LoadError::Pdf { path, message: format!("loader task failed: {e}") })
        })
    }

    async fn embed_and_store(&self, chunks: Vec<Chunk>, report: &mut IndexReport) -> Result<()> {
        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        debug!(batch_size = texts.len(), "embedding corpus");

        let vectors = self.embedding_provider.embed_batch(&texts).await.inspect_err(|e| {
            error!(error = %e, "embedding failed during indexing");
        })?;
        if vectors.len() != chunks.len() {
            error!(expected = chunks.len(), got = vectors.len(), "embedding count mismatch");
            return Err(RagError::EmbeddingError {
                provider: self.embedding_provider.name().to_string(),
                message: format!("expected {} vectors, got {}", chunks.len(), vectors.len()),
            });
        }

        let indexed: Vec<IndexedVector> = vectors
            .into_iter()
            .zip(chunks)
            .map(|(vector, chunk)| IndexedVector { vector, chunk })
            .collect();

        self.vector_store
            .create_collection(&self.collection, self.embedding_provider.dimensions())
            .await
            .inspect_err(|e| {
                error!(collection = %self.collection, error = %e, "failed to create collection");
            })?;
        self.vector_store.upsert(&self.collection, &indexed).await.inspect_err(|e| {
            error!(collection = %self.collection, error = %e, "bulk upsert failed");
        })?;

        report.total_chunks = indexed.len();
        Ok(())
    }
}

/// `.pdf` files directly inside `directory`, sorted by name.
fn pdf_files(directory: &Path) -> Result<Vec<PathBuf>> {
    let corpus_err =
        |source: std::io::Error| RagError::Corpus { path: directory.to_path_buf(), source };

    let mut files = Vec::new();
    for entry in std::fs::read_dir(directory).map_err(corpus_err)? {
        let path = entry.map_err(corpus_err)?.path();
        let is_pdf = path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
        if is_pdf && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Builder for constructing an [`Indexer`].
///
/// Every field except the collection is required; the collection defaults to
/// [`DEFAULT_COLLECTION`](crate::config::DEFAULT_COLLECTION).
#[derive(Default)]
pub struct IndexerBuilder {
    loader: Option<Arc<dyn DocumentLoader>>,
    embedding_provider: Option<Arc<dyn EmbeddingProvider>>,
    vector_store: Option<Arc<dyn VectorStore>>,
    collection: Option<String>,
}

impl IndexerBuilder {
    /// Set the document loader.
    pub fn loader(mut self, loader: Arc<dyn DocumentLoader>) -> Self {
        self.loader = Some(loader);
        self
    }

    /// Set the embedding provider.
    pub fn embedding_provider(mut self, provider: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedding_provider = Some(provider);
        self
    }

    /// Set the vector store backend.
    pub fn vector_store(mut self, store: Arc<dyn VectorStore>) -> Self {
        self.vector_store = Some(store);
        self
    }

    /// Set the target collection.
    pub fn collection(mut self, name: impl Into<String>) -> Self {
        self.collection = Some(name.into());
        self
    }

    /// Build the [`Indexer`], validating that all required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if any required field is missing.
    pub fn build(self) -> Result<Indexer> {
        let loader =
            self.loader.ok_or_else(|| RagError::ConfigError("loader is required".to_string()))?;
        let embedding_provider = self
            .embedding_provider
            .ok_or_else(|| RagError::ConfigError("embedding_provider is required".to_string()))?;
        let vector_store = self
            .vector_store
            .ok_or_else(|| RagError::ConfigError("vector_store is required".to_string()))?;

        Ok(Indexer {
            loader,
            embedding_provider,
            vector_store,
            collection: self
                .collection
                .unwrap_or_else(|| crate::config::DEFAULT_COLLECTION.to_string()),
        })
    }
}
