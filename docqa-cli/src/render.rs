use std::fmt::Write;
use std::path::Path;

use anyhow::Result;
use docqa_rag::{Answer, Citation, IndexReport};

use crate::OutputFormat;

/// One citation line: `• {file} — Page {page} — Snippet: {snippet}`.
pub fn citation(citation: &Citation) -> String {
    format!("• {} — Page {} — Snippet: {}", citation.file, citation.page, citation.snippet)
}

/// The answer text followed by its citations.
pub fn answer(answer: &Answer, format: OutputFormat) -> Result<String> {
    if let OutputFormat::Json = format {
        return Ok(serde_json::to_string_pretty(answer)?);
    }

    let mut out = format!("\n🤖 Answer:\n\n{}\n\n📚 Citations Used:", answer.text);
    if answer.citations.is_empty() {
        out.push_str("\n(none)");
    }
    for c in &answer.citations {
        out.push('\n');
        out.push_str(&citation(c));
    }
    Ok(out)
}

/// Per-file chunk counts, failures and the total.
pub fn index_report(report: &IndexReport, dir: &Path, collection: &str) -> String {
    let mut out = String::new();
    if report.files_indexed.is_empty() && report.files_failed.is_empty() {
        let _ = writeln!(out, "❌ No PDF files found in {}.", dir.display());
        return out;
    }

    for (file, chunks) in &report.files_indexed {
        let _ = writeln!(out, "📄 {file} → Chunks created: {chunks}");
    }
    for (file, error) in &report.files_failed {
        let _ = writeln!(out, "⚠️  {file} skipped: {error}");
    }
    let _ = writeln!(out, "\n✅ Indexing complete!");
    let _ = writeln!(out, "👍 Total chunks stored in '{collection}': {}", report.total_chunks);
    out
}
