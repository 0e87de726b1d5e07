//! Data types for pages, chunks, indexed vectors, search results and citations.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Metadata key holding the page label of a chunk's source page.
pub const PAGE_LABEL_KEY: &str = "page_label";
/// Metadata key holding the base name of a chunk's source file.
pub const FILE_NAME_KEY: &str = "file_name";
/// Metadata key holding the 0-based position of the source page.
pub const PAGE_INDEX_KEY: &str = "page";
/// Metadata key holding the path the source file was loaded from.
pub const SOURCE_KEY: &str = "source";

/// The text of one PDF page plus where it came from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageDocument {
    /// Extracted page text.
    pub text: String,
    /// The document's own label for this page, or its 1-based position.
    pub page_label: String,
    /// Base name of the source file, e.g. `contract.pdf`.
    pub source_file_name: String,
    /// 0-based position of the page within the file.
    pub page_index: usize,
    /// The path the file was loaded from.
    pub source: String,
}

impl PageDocument {
    /// Metadata inherited by every chunk split from this page.
    pub fn metadata(&self) -> HashMap<String, String> {
        HashMap::from([
            (PAGE_LABEL_KEY.to_string(), self.page_label.clone()),
            (FILE_NAME_KEY.to_string(), self.source_file_name.clone()),
            (PAGE_INDEX_KEY.to_string(), self.page_index.to_string()),
            (SOURCE_KEY.to_string(), self.source.clone()),
        ])
    }
}

/// A bounded piece of a page's text with the page's metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chunk {
    /// The text content of the chunk.
    pub text: String,
    /// Key-value metadata; always has `page_label` and `file_name`.
    pub metadata: HashMap<String, String>,
}

impl Chunk {
    /// The source page label, if recorded.
    pub fn page_label(&self) -> Option<&str> {
        self.metadata.get(PAGE_LABEL_KEY).map(String::as_str)
    }

    /// The source file name, if recorded.
    pub fn file_name(&self) -> Option<&str> {
        self.metadata.get(FILE_NAME_KEY).map(String::as_str)
    }
}

/// A [`Chunk`] with its embedding, ready to be written to a vector store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IndexedVector {
    /// The embedding of `chunk.text`.
    pub vector: Vec<f32>,
    /// The chunk the vector was computed from.
    pub chunk: Chunk,
}

/// A retrieved [`Chunk`] paired with a relevance score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// The retrieved chunk.
    pub chunk: Chunk,
    /// The similarity score (higher is more relevant).
    pub score: f32,
}

/// Links an answer back to the page and file that informed it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Citation {
    /// Page label of the cited chunk.
    pub page: String,
    /// File name of the cited chunk.
    pub file: String,
    /// The first characters of the chunk followed by `...`.
    pub snippet: String,
}
