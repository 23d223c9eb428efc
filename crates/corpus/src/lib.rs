//! Recipe corpus for ladle.
//!
//! Builds and queries a local index over cookbook documents: recipe-aware
//! chunking, embeddings, SQLite-backed cosine retrieval, and structured
//! recipe extraction via the reasoning service.
//!
//! The pipeline consumes this crate through two narrow seams:
//! [`PassageRetriever`] (query -> passages) and [`RecipeExtractor`]
//! (passages -> structured candidates).

pub mod chunker;
pub mod embeddings;
pub mod extract;
pub mod index;
pub mod retriever;
pub mod types;

// Re-export commonly used types
pub use extract::RecipeExtractor;
pub use retriever::{IndexRetriever, PassageRetriever};
pub use types::{CorpusChunk, CorpusSource, LearnOptions, LearnStats};

use chrono::Utc;
use ladle_core::config::CorpusSettings;
use ladle_core::{AppError, AppResult};
use std::path::{Path, PathBuf};
use std::time::Instant;
use walkdir::WalkDir;

/// Build (or refresh) the corpus index from source documents.
///
/// A missing source path is a permanent configuration error, raised
/// immediately, since retrying cannot fix it.
pub async fn learn(
    db_path: &Path,
    settings: &CorpusSettings,
    options: &LearnOptions,
) -> AppResult<LearnStats> {
    let start = Instant::now();

    tracing::info!("Building corpus index at {:?}", db_path);

    let conn = index::init_index(db_path)?;

    if options.reset {
        tracing::info!("Resetting corpus index");
        index::reset_index(&conn)?;
    }

    let provider = embeddings::create_provider(settings)?;

    let mut sources_count = 0u32;
    let mut chunks_count = 0u32;
    let mut bytes_processed = 0u64;

    for path in &options.paths {
        if !path.exists() {
            return Err(AppError::Corpus(format!(
                "Corpus source not found: {:?}",
                path
            )));
        }

        for file in collect_files(path) {
            let text = std::fs::read_to_string(&file).map_err(|e| {
                AppError::Corpus(format!("Failed to read source {:?}: {}", file, e))
            })?;

            let source_id = uuid::Uuid::new_v4().to_string();
            let mut chunks = chunker::chunk_document(&source_id, &text, settings)?;

            if chunks.is_empty() {
                tracing::warn!("No recipes found in {:?}, skipping", file);
                continue;
            }

            let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
            let vectors = provider.embed_batch(&texts).await?;

            for (chunk, vector) in chunks.iter_mut().zip(vectors) {
                chunk.embedding = Some(vector);
                index::insert_chunk(&conn, chunk)?;
            }

            let source = types::CorpusSource {
                source_id,
                path: file.display().to_string(),
                indexed_at: Utc::now(),
                chunk_count: chunks.len() as u32,
                byte_count: text.len() as u64,
            };
            index::insert_source(&conn, &source)?;

            sources_count += 1;
            chunks_count += chunks.len() as u32;
            bytes_processed += text.len() as u64;

            tracing::info!("Indexed {:?}: {} chunks", file, chunks.len());
        }
    }

    Ok(LearnStats {
        sources_count,
        chunks_count,
        bytes_processed,
        duration_secs: start.elapsed().as_secs_f64(),
    })
}

/// Get index statistics: (sources, chunks).
pub fn stats(db_path: &Path) -> AppResult<(u32, u32)> {
    if !db_path.exists() {
        return Ok((0, 0));
    }
    let conn = index::init_index(db_path)?;
    index::get_stats(&conn)
}

/// Remove the index database entirely.
pub fn clean(db_path: &Path) -> AppResult<()> {
    if db_path.exists() {
        std::fs::remove_file(db_path)
            .map_err(|e| AppError::Corpus(format!("Failed to remove index: {}", e)))?;
    }
    Ok(())
}

/// Expand a path into indexable text files.
fn collect_files(path: &Path) -> Vec<PathBuf> {
    if path.is_file() {
        return vec![path.to_path_buf()];
    }

    WalkDir::new(path)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_file())
        .filter(|e| {
            matches!(
                e.path().extension().and_then(|s| s.to_str()),
                Some("txt") | Some("md")
            )
        })
        .map(|e| e.path().to_path_buf())
        .collect()
}
