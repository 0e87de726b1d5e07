//! Grounding context and citation assembly.

use crate::document::{Chunk, Citation};

/// Number of characters of chunk text kept in a citation snippet.
pub const SNIPPET_CHARS: usize = 150;

/// Marker appended to every snippet, whether or not text was cut.
pub const SNIPPET_ELLIPSIS: &str = "...";

/// Page shown when a chunk carries no `page_label`.
const UNKNOWN_PAGE: &str = "N/A";
/// File shown when a chunk carries no `file_name`.
const UNKNOWN_FILE: &str = "unknown";

/// The text handed to the generator plus one citation per retrieved chunk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssembledContext {
    /// Retrieved chunks in rank order, each under a `Page {page} — {file}` header.
    pub context: String,
    /// Citations in the same order as the chunks.
    pub citations: Vec<Citation>,
}

/// Formats retrieved chunks into a grounding context and citations.
///
/// Input order is preserved, so the best match comes first.
pub fn assemble(chunks: &[Chunk]) -> AssembledContext {
    let mut assembled = AssembledContext::default();

    for chunk in chunks {
        let page = chunk.page_label().unwrap_or(UNKNOWN_PAGE);
        let file = chunk.file_name().unwrap_or(UNKNOWN_FILE);

        assembled.context.push_str(&format!("\nPage {page} — {file}\n{}\n", chunk.text));
        assembled.citations.push(Citation {
            page: page.to_string(),
            file: file.to_string(),
            snippet: snippet(&chunk.text),
        });
    }

    assembled
}

/// The first [`SNIPPET_CHARS`] characters of `text` followed by [`SNIPPET_ELLIPSIS`].
pub fn snippet(text: &str) -> String {
    let mut snippet: String = text.chars().take(SNIPPET_CHARS).collect();
    snippet.push_str(SNIPPET_ELLIPSIS);
    snippet
}
