use std::path::Path;

use anyhow::{Context, Result};

use crate::app::App;
use crate::render;

pub async fn run(app: &App, dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create PDF directory {}", dir.display()))?;

    let config = &app.config;
    let report = app
        .indexer()?
        .index_corpus(dir, config.chunk_size, config.chunk_overlap)
        .await
        .with_context(|| format!("Indexing {} failed", dir.display()))?;

    print!("{}", render::index_report(&report, dir, &config.collection));
    Ok(())
}
