//! Error types for the `docqa-rag` crate.

use std::path::PathBuf;

use thiserror::Error;

/// A single PDF could not be turned into page documents.
///
/// The [`Indexer`](crate::Indexer) records these per file and keeps going;
/// they only become a [`RagError`] when a caller loads a file directly.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file could not be opened or read.
    #[error("failed to read '{}': {source}", path.display())]
    Io {
        /// The file that failed.
        path: PathBuf,
        /// The underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The file was read but is not a PDF the parser understands.
    #[error("failed to parse PDF '{}': {message}", path.display())]
    Pdf {
        /// The file that failed.
        path: PathBuf,
        /// A description of the parse failure.
        message: String,
    },
}

/// Errors that can occur in indexing and query operations.
#[derive(Debug, Error)]
pub enum RagError {
    /// A document could not be loaded.
    #[error(transparent)]
    Load(#[from] LoadError),

    /// The corpus directory could not be enumerated.
    #[error("Corpus error ({}): {source}", path.display())]
    Corpus {
        /// The directory that was being indexed.
        path: PathBuf,
        /// The underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// An error occurred during embedding generation.
    #[error("Embedding error ({provider}): {message}")]
    EmbeddingError {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// An error occurred in the vector store backend.
    #[error("Vector store error ({backend}): {message}")]
    VectorStoreError {
        /// The vector store backend that produced the error.
        backend: String,
        /// A description of the failure.
        message: String,
    },

    /// The answer generator failed or returned no content.
    #[error("Generation error ({provider}): {message}")]
    GenerationError {
        /// The generation backend that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// A configuration validation error.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// A convenience result type for indexing and query operations.
pub type Result<T> = std::result::Result<T, RagError>;
