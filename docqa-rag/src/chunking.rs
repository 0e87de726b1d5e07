//! Page chunking.
//!
//! [`RecursiveChunker`] cuts text into pieces of at most `chunk_size`
//! characters, preferring the most structural boundary available:
//!
//! 1. paragraph breaks (`\n\n`)
//! 2. line breaks (`\n`)
//! 3. sentence ends (`. `, `! `, `? `)
//! 4. whitespace (` `)
//! 5. a hard cut at `chunk_size` characters
//!
//! Each chunk after the first starts exactly `chunk_overlap` characters before
//! the end of the previous one. Sizes are counted in `char`s, never bytes.

use crate::config::validate_chunking;
use crate::document::{Chunk, PageDocument};
use crate::error::Result;

/// Boundaries in priority order. A separator stays attached to the chunk it ends.
const SEPARATORS: [&str; 6] = ["\n\n", "\n", ". ", "! ", "? ", " "];

/// Splits text hierarchically by paragraphs, lines, sentences, then words.
///
/// # Example
///
/// ```rust,ignore
/// use docqa_rag::RecursiveChunker;
///
/// let chunker = RecursiveChunker::new(1000, 200)?;
/// for piece in chunker.split(&page.text) {
///     println!("{piece}");
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RecursiveChunker {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl RecursiveChunker {
    /// Create a new `RecursiveChunker`.
    ///
    /// # Arguments
    ///
    /// * `chunk_size` - maximum number of characters per chunk
    /// * `chunk_overlap` - number of overlapping characters between consecutive chunks
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`](crate::RagError::ConfigError) unless
    /// `chunk_size > 0` and `chunk_overlap < chunk_size`.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        validate_chunking(chunk_size, chunk_overlap)?;
        Ok(Self { chunk_size, chunk_overlap })
    }

    /// Maximum number of characters per chunk.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Number of characters shared by consecutive chunks.
    pub fn chunk_overlap(&self) -> usize {
        self.chunk_overlap
    }

    /// Lazily split `text` into chunks in reading order.
    ///
    /// The returned iterator can be cloned to restart from its current position.
    /// Text that is empty or only whitespace yields nothing.
    pub fn split<'a>(&self, text: &'a str) -> Chunks<'a> {
        let offsets: Vec<usize> =
            text.char_indices().map(|(i, _)| i).chain(std::iter::once(text.len())).collect();
        Chunks {
            text,
            offsets,
            start: 0,
            chunk_size: self.chunk_size,
            chunk_overlap: self.chunk_overlap,
            done: text.trim().is_empty(),
        }
    }

    /// Split a page into [`Chunk`]s that all carry the page's metadata.
    pub fn chunk_page(&self, page: &PageDocument) -> Vec<Chunk> {
        let metadata = page.metadata();
        self.split(&page.text)
            .map(|text| Chunk { text: text.to_string(), metadata: metadata.clone() })
            .collect()
    }
}

/// Iterator over the chunks of one text, produced by [`RecursiveChunker::split`].
#[derive(Debug, Clone)]
pub struct Chunks<'a> {
    text: &'a str,
    /// Byte offset of every char boundary, including `text.len()`.
    offsets: Vec<usize>,
    /// Char position where the next chunk begins.
    start: usize,
    chunk_size: usize,
    chunk_overlap: usize,
    done: bool,
}

impl Chunks<'_> {
    fn char_count(&self) -> usize {
        self.offsets.len() - 1
    }

    fn char_position(&self, byte: usize) -> usize {
        self.offsets.binary_search(&byte).unwrap_or_else(|i| i)
    }

    /// Pick the end (exclusive, in chars) of the chunk starting at `start`.
    ///
    /// The end must lie past `start + chunk_overlap` so the next chunk makes progress.
    fn break_point(&self, start: usize, limit: usize) -> usize {
        let min_end = start + self.chunk_overlap + 1;
        let base = self.offsets[start];
        let window = &self.text[base..self.offsets[limit]];

        for separator in SEPARATORS {
            // Only the last occurrence matters: earlier ones end even sooner.
            if let Some(pos) = window.rfind(separator) {
                let end = self.char_position(base + pos + separator.len());
                if end >= min_end {
                    return end;
                }
            }
        }
        limit
    }
}

impl<'a> Iterator for Chunks<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        if self.done {
            return None;
        }

        let start = self.start;
        let limit = start + self.chunk_size;
        if limit >= self.char_count() {
            self.done = true;
            return Some(&self.text[self.offsets[start]..]);
        }

        let end = self.break_point(start, limit);
        self.start = end - self.chunk_overlap;
        Some(&self.text[self.offsets[start]..self.offsets[end]])
    }
}

impl std::iter::FusedIterator for Chunks<'_> {}
